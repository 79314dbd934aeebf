//! Locations in design space and interpolatable coordinate maps.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    blend::{BinaryOp, Blend},
    error::BlendError,
};

/// The raw value range of a variation axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    min: f64,
    max: f64,
}

impl AxisRange {
    /// Returns `None` unless `min < max`.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min < max).then_some(Self { min, max })
    }

    /// The raw value at the default location.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The raw value of the axis master, normalized to 1.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map a raw axis value into `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        clamp_unit((value - self.min) / (self.max - self.min))
    }
}

/// Axis name to raw value range.
pub type AxisTable = IndexMap<String, AxisRange>;

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// A position in design space, as axis name to value.
///
/// Axes that are not present are at their default (neutral) position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Location(IndexMap<String, f64>);

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The value on `axis`, or `None` if the axis is at its default.
    pub fn get(&self, axis: &str) -> Option<f64> {
        self.0.get(axis).copied()
    }

    /// Set the value on an axis, returning the previous one.
    pub fn insert(&mut self, axis: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(axis.into(), value)
    }

    /// Iterate over the axis values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(axis, value)| (axis.as_str(), *value))
    }

    /// Normalize each value against the axis table and clamp it to `[0, 1]`.
    ///
    /// Axes missing from the table are assumed to already be normalized and
    /// are only clamped.
    pub fn normalized(&self, axes: &AxisTable) -> Location {
        self.0
            .iter()
            .map(|(axis, value)| {
                let value = match axes.get(axis) {
                    Some(range) => range.normalize(*value),
                    None => clamp_unit(*value),
                };
                (axis.clone(), value)
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Location {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(axis, value)| (axis.into(), value))
                .collect(),
        )
    }
}

/// A value in a component's coordinate map.
#[derive(Clone, Debug, PartialEq)]
pub enum CoordValue {
    Number(f64),
    /// Anything else, which must be equal in every master.
    Other(Value),
}

/// Booleans count as the numbers 0 and 1.
impl From<Value> for CoordValue {
    fn from(value: Value) -> Self {
        if let Value::Bool(flag) = value {
            return Self::Number(if flag { 1.0 } else { 0.0 });
        }
        match value.as_f64() {
            Some(number) => Self::Number(number),
            None => Self::Other(value),
        }
    }
}

impl From<f64> for CoordValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// The coordinates a component passes to the glyph it refers to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates(IndexMap<String, CoordValue>);

impl Coordinates {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coordinate for `axis`, if present.
    pub fn get(&self, axis: &str) -> Option<&CoordValue> {
        self.0.get(axis)
    }

    /// Set the coordinate for an axis.
    pub fn insert(&mut self, axis: impl Into<String>, value: impl Into<CoordValue>) {
        self.0.insert(axis.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The numeric entries, as a location in the referenced glyph's space.
    pub fn to_location(&self) -> Location {
        self.0
            .iter()
            .filter_map(|(axis, value)| match value {
                CoordValue::Number(number) => Some((axis.as_str(), *number)),
                CoordValue::Other(_) => {
                    log::trace!("ignoring non-numeric coordinate '{axis}'");
                    None
                }
            })
            .collect()
    }
}

impl<S: Into<String>, V: Into<CoordValue>> FromIterator<(S, V)> for Coordinates {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(axis, value)| (axis.into(), value.into()))
                .collect(),
        )
    }
}

impl Blend for Coordinates {
    /// Keys missing from one operand take their value from the other.
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        let keys = self
            .0
            .keys()
            .chain(other.0.keys().filter(|key| !self.0.contains_key(*key)));
        let mut result = IndexMap::with_capacity(self.0.len().max(other.0.len()));
        for key in keys {
            let (left, right) = (self.0.get(key), other.0.get(key));
            let (Some(left), Some(right)) = (left.or(right), right.or(left)) else {
                continue;
            };
            let value = match (left, right) {
                (CoordValue::Number(a), CoordValue::Number(b)) => {
                    CoordValue::Number(op.apply(*a, *b))
                }
                (a, b) if a == b => a.clone(),
                _ => return Err(BlendError::ValueMismatch { key: key.clone() }),
            };
            result.insert(key.clone(), value);
        }
        Ok(Coordinates(result))
    }

    fn scale(&self, scalar: f64) -> Self {
        Coordinates(
            self.0
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        CoordValue::Number(number) => CoordValue::Number(number * scalar),
                        other => other.clone(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        )
    }
}
