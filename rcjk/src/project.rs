//! Composing character glyphs from deep components and atomic elements.

use std::{path::Path, rc::Rc};

use indexmap::IndexMap;
use kurbo::{Affine, BezPath};

use crate::{
    coords::Location,
    error::{Error, InterpolationError},
    glyph::{Glyph, MasterGlyph},
    outline::Outline,
    parse::GlyphParser,
    pen::PointPen,
    source::{FsDir, SourceDir},
    store::GlyphStore,
    transform::compose,
};

/// Directory holding the character glyph sources.
pub const CHARACTER_GLYPH_DIR: &str = "characterGlyph";
/// Directory holding the deep component sources.
pub const DEEP_COMPONENT_DIR: &str = "deepComponent";
/// Directory holding the atomic element sources.
pub const ATOMIC_ELEMENT_DIR: &str = "atomicElement";

/// An atomic element placed in character glyph space.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomicElementInstance {
    pub name: String,
    pub outline: Outline,
}

/// The atomic elements of one deep component of a character glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct DeepComponentInstance {
    pub name: String,
    pub atomic_elements: Vec<AtomicElementInstance>,
}

/// A character glyph instantiated at a location, as a tree of outlines.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterGlyphInstance {
    pub name: String,
    /// The character glyph's own outline.
    pub outline: Outline,
    pub deep_components: Vec<DeepComponentInstance>,
    pub width: f64,
}

impl CharacterGlyphInstance {
    /// Every outline in drawing order: the glyph's own, then each atomic
    /// element.
    pub fn outlines(&self) -> impl Iterator<Item = &Outline> + '_ {
        std::iter::once(&self.outline).chain(
            self.deep_components
                .iter()
                .flat_map(|dc| dc.atomic_elements.iter().map(|ae| &ae.outline)),
        )
    }

    /// Replay every outline into `pen`.
    pub fn draw_points(&self, pen: &mut impl PointPen) {
        for outline in self.outlines() {
            outline.draw_points(pen);
        }
    }
}

/// Options for [`Project::flatten_glyphs`].
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Skip glyphs whose names are not ASCII.
    pub skip_non_ascii_names: bool,
    /// Raise negative advance widths to zero.
    pub clamp_negative_widths: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            skip_non_ascii_names: true,
            clamp_negative_widths: true,
        }
    }
}

/// A character glyph flattened into a single path.
#[derive(Clone, Debug)]
pub struct FlattenedGlyph {
    pub name: String,
    pub unicodes: Vec<u32>,
    /// The advance width, after [`ExportOptions::clamp_negative_widths`].
    pub width: f64,
    /// Every outline of the glyph, in character glyph space.
    pub path: BezPath,
}

/// A RoboCJK project: three tiers of glyph sources.
///
/// Character glyphs refer to deep components, which refer to atomic
/// elements. Each reference carries the location at which the referenced
/// glyph is instantiated and the transform that places it.
pub struct Project {
    character_glyphs: GlyphStore,
    deep_components: GlyphStore,
    atomic_elements: GlyphStore,
}

impl Project {
    /// Create a project whose tier directories are sub-directories of `root`.
    pub fn new(root: Rc<dyn SourceDir>, parser: Rc<dyn GlyphParser>) -> Self {
        let store = |name| GlyphStore::new(root.sub_dir(name), parser.clone());
        Self {
            character_glyphs: store(CHARACTER_GLYPH_DIR),
            deep_components: store(DEEP_COMPONENT_DIR),
            atomic_elements: store(ATOMIC_ELEMENT_DIR),
        }
    }

    /// Open a project directory on the file system.
    pub fn open(path: impl AsRef<Path>, parser: Rc<dyn GlyphParser>) -> Self {
        Self::new(Rc::new(FsDir::new(path.as_ref())), parser)
    }

    /// The store of character glyph sources.
    pub fn character_glyphs(&self) -> &GlyphStore {
        &self.character_glyphs
    }

    /// The store of deep component sources.
    pub fn deep_components(&self) -> &GlyphStore {
        &self.deep_components
    }

    /// The store of atomic element sources.
    pub fn atomic_elements(&self) -> &GlyphStore {
        &self.atomic_elements
    }

    /// Every character glyph name with its code points.
    pub fn glyph_names_and_unicodes(&self) -> Result<IndexMap<String, Vec<u32>>, Error> {
        self.character_glyphs.glyph_names_and_unicodes()
    }

    /// Instantiate a character glyph and everything it refers to.
    pub fn instantiate_character_glyph(
        &self,
        name: &str,
        location: &Location,
    ) -> Result<CharacterGlyphInstance, Error> {
        let glyph = instantiate(&self.character_glyphs, name, location)?;
        let deep_components = glyph
            .components
            .iter()
            .map(|component| {
                Ok(DeepComponentInstance {
                    name: component.name.clone(),
                    atomic_elements: self.instantiate_deep_component(
                        &component.name,
                        &component.coord.to_location(),
                        component.transform.to_affine(),
                    )?,
                })
            })
            .collect::<Result<_, Error>>()?;
        Ok(CharacterGlyphInstance {
            name: glyph.name,
            outline: glyph.outline,
            deep_components,
            width: glyph.width,
        })
    }

    /// Instantiate a deep component, placing its atomic elements with
    /// `transform`.
    pub fn instantiate_deep_component(
        &self,
        name: &str,
        location: &Location,
        transform: Affine,
    ) -> Result<Vec<AtomicElementInstance>, Error> {
        let glyph = instantiate(&self.deep_components, name, location)?;
        glyph
            .components
            .iter()
            .map(|component| {
                let transform = compose(transform, component.transform.to_affine());
                Ok(AtomicElementInstance {
                    name: component.name.clone(),
                    outline: self.instantiate_atomic_element(
                        &component.name,
                        &component.coord.to_location(),
                        transform,
                    )?,
                })
            })
            .collect()
    }

    /// Instantiate an atomic element and transform its outline.
    ///
    /// Atomic elements are the last tier; one with components is an error.
    pub fn instantiate_atomic_element(
        &self,
        name: &str,
        location: &Location,
        transform: Affine,
    ) -> Result<Outline, Error> {
        let glyph = instantiate(&self.atomic_elements, name, location)?;
        if !glyph.components.is_empty() {
            return Err(Error::UnexpectedComponents(name.to_owned()));
        }
        Ok(glyph.outline.transform(transform))
    }

    /// Draw a character glyph with all of its components into `pen`,
    /// returning its advance width.
    pub fn draw_character_glyph(
        &self,
        name: &str,
        location: &Location,
        pen: &mut impl PointPen,
    ) -> Result<f64, Error> {
        let instance = self.instantiate_character_glyph(name, location)?;
        instance.draw_points(pen);
        Ok(instance.width)
    }

    /// Flatten every character glyph at `location`, in glyph name order.
    ///
    /// Glyphs whose masters cannot be interpolated are logged and skipped;
    /// any other error stops the export.
    pub fn flatten_glyphs(
        &self,
        location: &Location,
        options: &ExportOptions,
    ) -> Result<Vec<FlattenedGlyph>, Error> {
        let mut cmap = self.glyph_names_and_unicodes()?;
        cmap.sort_keys();
        let mut result = Vec::with_capacity(cmap.len());
        for (name, unicodes) in cmap {
            if options.skip_non_ascii_names && !name.is_ascii() {
                log::warn!("glyph name {name} is not ASCII, and will not be exported");
                continue;
            }
            let mut outline = Outline::new();
            let width = match self.draw_character_glyph(&name, location, &mut outline) {
                Ok(width) => width,
                Err(Error::Interpolation(e)) => {
                    log::warn!("glyph {name} can't be interpolated ({e})");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let path = outline.to_bezpath().map_err(|inner| Error::ToPath {
                glyph: name.clone(),
                inner,
            })?;
            let width = if options.clamp_negative_widths {
                width.max(0.0)
            } else {
                width
            };
            result.push(FlattenedGlyph {
                name,
                unicodes,
                width,
                path,
            });
        }
        Ok(result)
    }
}

fn instantiate(store: &GlyphStore, name: &str, location: &Location) -> Result<Glyph, Error> {
    let master: Rc<MasterGlyph> = store.lookup(name)?;
    master
        .instantiate(location)
        .map_err(|e| InterpolationError::new(name, e).into())
}
