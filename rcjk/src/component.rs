//! Component references and their placement parameters.

use indexmap::IndexMap;
use kurbo::Affine;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    blend::{BinaryOp, Blend},
    coords::Coordinates,
    error::BlendError,
    transform::make_transform,
};

/// The parameters that place a component in its parent glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParams {
    pub x: f64,
    pub y: f64,
    /// Counter-clockwise rotation in degrees.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl TransformParams {
    /// The affine transform these parameters describe.
    ///
    /// See [`make_transform`] for the order of operations.
    pub fn to_affine(&self) -> Affine {
        make_transform(
            self.x,
            self.y,
            self.rotation,
            self.scale_x,
            self.scale_y,
            self.center_x,
            self.center_y,
        )
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            x: f(self.x, other.x),
            y: f(self.y, other.y),
            rotation: f(self.rotation, other.rotation),
            scale_x: f(self.scale_x, other.scale_x),
            scale_y: f(self.scale_y, other.scale_y),
            center_x: f(self.center_x, other.center_x),
            center_y: f(self.center_y, other.center_y),
        }
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            center_x: 0.0,
            center_y: 0.0,
        }
    }
}

impl Blend for TransformParams {
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        Ok(self.zip_with(other, |a, b| op.apply(a, b)))
    }

    fn scale(&self, scalar: f64) -> Self {
        self.zip_with(self, |a, _| a * scalar)
    }
}

/// A reference from one glyph to a glyph of the next tier down.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// The name of the referenced glyph.
    pub name: String,
    /// The location at which the referenced glyph is instantiated.
    pub coord: Coordinates,
    pub transform: TransformParams,
}

impl Component {
    /// Create a reference to the glyph named `name`.
    pub fn new(name: impl Into<String>, coord: Coordinates, transform: TransformParams) -> Self {
        Self {
            name: name.into(),
            coord,
            transform,
        }
    }
}

/// Components are paired by position; the result keeps the left name.
impl Blend for Component {
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        Ok(Self {
            name: self.name.clone(),
            coord: self.coord.combine(&other.coord, op)?,
            transform: self.transform.combine(&other.transform, op)?,
        })
    }

    fn scale(&self, scalar: f64) -> Self {
        Self {
            name: self.name.clone(),
            coord: self.coord.scale(scalar),
            transform: self.transform.scale(scalar),
        }
    }
}

/// A component record as stored in glyph metadata.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ComponentRecord {
    name: String,
    coord: IndexMap<String, Value>,
    x: f64,
    y: f64,
    rotation: f64,
    #[serde(rename = "scalex")]
    scale_x: f64,
    #[serde(rename = "scaley")]
    scale_y: f64,
    #[serde(rename = "rcenterx")]
    center_x: f64,
    #[serde(rename = "rcentery")]
    center_y: f64,
}

impl From<ComponentRecord> for Component {
    fn from(record: ComponentRecord) -> Self {
        Component {
            name: record.name,
            coord: record.coord.into_iter().collect(),
            transform: TransformParams {
                x: record.x,
                y: record.y,
                rotation: record.rotation,
                scale_x: record.scale_x,
                scale_y: record.scale_y,
                center_x: record.center_x,
                center_y: record.center_y,
            },
        }
    }
}
