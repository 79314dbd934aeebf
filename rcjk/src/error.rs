//! Errors that occur while loading and composing glyphs.

use std::fmt;
use std::io;

use crate::{
    outline::{OutlineMismatch, ToPathError},
    parse::ParseError,
};

/// Two values could not be combined during interpolation.
#[derive(Clone, Debug, PartialEq)]
pub enum BlendError {
    /// Two outlines do not have the same structure.
    GeometryMismatch(OutlineMismatch),
    /// A non-numeric entry differs between two coordinate maps.
    ValueMismatch { key: String },
    /// Two glyphs have a different number of components.
    ComponentCountMismatch { expected: usize, actual: usize },
    /// The number of masters does not match the variation model.
    MasterCountMismatch { expected: usize, actual: usize },
}

impl From<OutlineMismatch> for BlendError {
    fn from(value: OutlineMismatch) -> Self {
        Self::GeometryMismatch(value)
    }
}

impl fmt::Display for BlendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::GeometryMismatch(e) => write!(f, "incompatible outline: {e}"),
            Self::ValueMismatch { key } => {
                write!(f, "incompatible values for non-numeric key '{key}'")
            }
            Self::ComponentCountMismatch { expected, actual } => write!(
                f,
                "incompatible component count (expected {expected}, found {actual})"
            ),
            Self::MasterCountMismatch { expected, actual } => write!(
                f,
                "variation model has {expected} masters but {actual} values were given"
            ),
        }
    }
}

impl std::error::Error for BlendError {}

/// The masters of a glyph could not be interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationError {
    glyph_name: String,
    inner: BlendError,
}

impl InterpolationError {
    /// Attach the name of the glyph being interpolated to a blend failure.
    pub fn new(glyph_name: impl Into<String>, inner: BlendError) -> Self {
        Self {
            glyph_name: glyph_name.into(),
            inner,
        }
    }

    /// The name of the glyph whose masters are incompatible.
    pub fn glyph_name(&self) -> &str {
        &self.glyph_name
    }

    /// The blend failure that stopped interpolation.
    pub fn inner(&self) -> &BlendError {
        &self.inner
    }
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "glyph '{}': {}", self.glyph_name, self.inner)
    }
}

impl std::error::Error for InterpolationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

/// Errors that may occur when loading or composing a glyph.
#[derive(Debug)]
pub enum Error {
    /// The requested glyph has no source in the store.
    GlyphNotFound(String),
    /// A glyph source is missing required data or has inconsistent masters.
    MalformedSource { glyph: String, reason: String },
    /// The masters of a glyph are not compatible.
    Interpolation(InterpolationError),
    /// An atomic element refers to further components.
    UnexpectedComponents(String),
    /// The glyph parser rejected a source file.
    Parse { file_name: String, inner: ParseError },
    /// A source file could not be read.
    Io { file_name: String, inner: io::Error },
    /// A flattened outline could not be converted to a path.
    ToPath { glyph: String, inner: ToPathError },
}

impl Error {
    pub(crate) fn malformed(glyph: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSource {
            glyph: glyph.into(),
            reason: reason.into(),
        }
    }
}

impl From<InterpolationError> for Error {
    fn from(value: InterpolationError) -> Self {
        Self::Interpolation(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::GlyphNotFound(name) => write!(f, "glyph '{name}' was not found"),
            Self::MalformedSource { glyph, reason } => {
                write!(f, "malformed source for glyph '{glyph}': {reason}")
            }
            Self::Interpolation(e) => write!(f, "{e}"),
            Self::UnexpectedComponents(name) => write!(
                f,
                "atomic element '{name}' has components, which exceeds the maximum nesting depth"
            ),
            Self::Parse { file_name, inner } => write!(f, "failed to parse '{file_name}': {inner}"),
            Self::Io { file_name, inner } => write!(f, "failed to read '{file_name}': {inner}"),
            Self::ToPath { glyph, inner } => write!(f, "glyph '{glyph}': {inner}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Interpolation(e) => Some(e),
            Self::Parse { inner, .. } => Some(inner),
            Self::Io { inner, .. } => Some(inner),
            Self::ToPath { inner, .. } => Some(inner),
            _ => None,
        }
    }
}
