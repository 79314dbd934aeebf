//! Composing and interpolating glyphs from RoboCJK projects.
//!
//! A RoboCJK project builds CJK character glyphs from three tiers of
//! sources. Character glyphs refer to deep components (radicals and other
//! recurring shapes), which in turn refer to atomic elements (strokes).
//! Every reference carries a placement transform and the location in the
//! referenced glyph's own design space at which it should be instantiated,
//! so a single character can combine differently weighted and proportioned
//! versions of the same parts.
//!
//! Each glyph may declare variation axes. For every axis a master at the
//! axis maximum is read from a layer directory next to the glyph's source,
//! and the glyph is interpolated between its neutral and these masters.
//!
//! The entry point is [`Project`]:
//!
//! ```no_run
//! # #[cfg(feature = "json")]
//! # fn main() -> Result<(), rcjk::Error> {
//! use std::rc::Rc;
//!
//! use rcjk::{JsonGlyphParser, Location, NullPen, Project};
//!
//! let project = Project::open("MyFont.rcjk", Rc::new(JsonGlyphParser));
//! let location: Location = [("wght", 0.5)].into_iter().collect();
//! let width = project.draw_character_glyph("uni4E00", &location, &mut NullPen)?;
//! println!("advance: {width}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "json"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub extern crate kurbo;

pub mod blend;
mod component;
mod coords;
pub mod error;
pub mod filename;
#[cfg(feature = "glif")]
mod glif;
mod glyph;
#[cfg(feature = "json")]
mod json;
mod model;
mod outline;
pub mod parse;
mod pen;
mod project;
pub mod source;
mod store;
pub mod transform;

#[cfg(test)]
mod testing;

pub use blend::Blend;
pub use component::{Component, TransformParams};
pub use coords::{AxisRange, AxisTable, CoordValue, Coordinates, Location};
pub use error::{BlendError, Error, InterpolationError};
#[cfg(feature = "glif")]
pub use glif::GlifGlyphParser;
pub use glyph::{Glyph, MasterGlyph, Variation};
#[cfg(feature = "json")]
pub use json::JsonGlyphParser;
pub use model::{ModelError, VariationModel};
pub use outline::{Outline, OutlineMismatch, OutlinePoint, PointCommand, ToPathError};
pub use pen::{NullPen, PointPen, SegmentType};
pub use project::{
    AtomicElementInstance, CharacterGlyphInstance, DeepComponentInstance, ExportOptions,
    FlattenedGlyph, Project, ATOMIC_ELEMENT_DIR, CHARACTER_GLYPH_DIR, DEEP_COMPONENT_DIR,
};
pub use store::GlyphStore;
