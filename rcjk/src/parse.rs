//! The interface to glyph source parsers.

use std::fmt;

use serde_json::{Map, Value};

use crate::pen::PointPen;

/// The metadata key holding a glyph's component list.
pub const DEEP_COMPONENTS_KEY: &str = "robocjk.deepComponents";

/// The metadata keys that may hold a glyph's variation declarations.
///
/// The first one present is used.
pub const VARIATION_KEYS: [&str; 2] = [
    "robocjk.fontVariationGlyphs",
    "robocjk.glyphVariationGlyphs",
];

/// Arbitrary glyph metadata.
pub type Lib = Map<String, Value>;

/// The name and code points of a glyph, read without building its outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphHeader {
    pub name: Option<String>,
    pub unicodes: Vec<u32>,
}

/// Everything a parser produces apart from the outline itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedGlyph {
    pub name: Option<String>,
    pub width: f64,
    pub unicodes: Vec<u32>,
    pub lib: Lib,
}

/// An error reported by a glyph parser.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    /// Create an error with a description of what went wrong.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Reads glyph source files.
pub trait GlyphParser {
    /// The file name suffix of sources this parser reads, including the dot.
    fn suffix(&self) -> &str;

    /// Parse a source, drawing its outline into `pen`.
    fn parse(&self, data: &[u8], pen: &mut dyn PointPen) -> Result<ParsedGlyph, ParseError>;

    /// Read only the glyph name and code points of a source.
    fn read_header(&self, data: &[u8]) -> Result<GlyphHeader, ParseError>;
}
