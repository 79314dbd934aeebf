//! A variation model for masters on single-axis extremes.
//!
//! This is the piecewise linear model of
//! [fontTools.varLib.models](https://github.com/fonttools/fonttools/blob/main/Lib/fontTools/varLib/models.py)
//! restricted to the master layout used by RoboCJK sources: one neutral
//! master at the default location plus at most one master per axis, each at
//! that axis' maximum. The support of an axis master is `(0, 1, 1)` on its
//! own axis, so its scalar at a location is just that axis' clamped value.

use std::fmt;

use crate::{blend::Blend, coords::Location, error::BlendError};

/// The master locations could not be used to build a model.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// There were no locations at all.
    Empty,
    /// The first location is not the default location.
    MissingNeutral,
    /// A non-neutral master is not at a single axis' maximum.
    UnsupportedLocation(usize),
    /// More than one master on the same axis.
    DuplicateAxis(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no master locations"),
            Self::MissingNeutral => write!(f, "the first master must be at the default location"),
            Self::UnsupportedLocation(ix) => write!(
                f,
                "master {ix} must be at 1.0 on exactly one axis"
            ),
            Self::DuplicateAxis(axis) => write!(f, "more than one master on axis '{axis}'"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Computes interpolation deltas for a fixed set of master locations.
#[derive(Clone, Debug)]
pub struct VariationModel {
    /// The axis of each master, `None` for the neutral master.
    supports: Vec<Option<String>>,
}

impl VariationModel {
    /// Build a model from master locations.
    ///
    /// The first location must be the default location; every other one must
    /// be at 1.0 on exactly one axis, with no axis used twice.
    pub fn new(locations: &[Location]) -> Result<Self, ModelError> {
        let (neutral, others) = locations.split_first().ok_or(ModelError::Empty)?;
        if !neutral.is_empty() {
            return Err(ModelError::MissingNeutral);
        }
        let mut supports = vec![None];
        for (ix, location) in others.iter().enumerate() {
            let mut axes = location.iter();
            let axis = match (axes.next(), axes.next()) {
                (Some((axis, value)), None) if value == 1.0 => axis,
                _ => return Err(ModelError::UnsupportedLocation(ix + 1)),
            };
            if supports.iter().flatten().any(|seen| seen == axis) {
                return Err(ModelError::DuplicateAxis(axis.to_owned()));
            }
            supports.push(Some(axis.to_owned()));
        }
        Ok(Self { supports })
    }

    /// The number of masters, including the neutral one.
    pub fn master_count(&self) -> usize {
        self.supports.len()
    }

    /// The weight of each master's delta at a normalized location.
    pub fn scalars(&self, location: &Location) -> Vec<f64> {
        self.supports
            .iter()
            .map(|support| support_scalar(support.as_deref(), location))
            .collect()
    }

    /// Compute the deltas from which every master can be reconstructed.
    ///
    /// `masters` must be in the same order as the locations the model was
    /// built from.
    pub fn compute_deltas<T: Blend + Clone>(&self, masters: &[T]) -> Result<Vec<T>, BlendError> {
        if masters.len() != self.supports.len() {
            return Err(BlendError::MasterCountMismatch {
                expected: self.supports.len(),
                actual: masters.len(),
            });
        }
        let mut deltas: Vec<T> = Vec::with_capacity(masters.len());
        for (master, support) in masters.iter().zip(&self.supports) {
            let location: Location = support.iter().map(|axis| (axis.as_str(), 1.0)).collect();
            let mut delta = master.clone();
            for (prev, prev_support) in deltas.iter().zip(&self.supports) {
                let scalar = support_scalar(prev_support.as_deref(), &location);
                if scalar != 0.0 {
                    delta = delta.sub(&prev.scale(scalar))?;
                }
            }
            deltas.push(delta);
        }
        Ok(deltas)
    }

    /// Interpolate a value at a normalized location from precomputed deltas.
    pub fn interpolate_from_deltas<T: Blend>(
        &self,
        location: &Location,
        deltas: &[T],
    ) -> Result<T, BlendError> {
        if deltas.len() != self.supports.len() {
            return Err(BlendError::MasterCountMismatch {
                expected: self.supports.len(),
                actual: deltas.len(),
            });
        }
        let mut result: Option<T> = None;
        for (delta, scalar) in deltas.iter().zip(self.scalars(location)) {
            if scalar == 0.0 {
                continue;
            }
            let contribution = delta.scale(scalar);
            result = Some(match result {
                Some(value) => value.add(&contribution)?,
                None => contribution,
            });
        }
        // the neutral scalar is always 1, and there is always a neutral
        Ok(result.unwrap_or_else(|| deltas[0].scale(0.0)))
    }
}

fn support_scalar(support: Option<&str>, location: &Location) -> f64 {
    match support {
        None => 1.0,
        Some(axis) => location.get(axis).unwrap_or(0.0).clamp(0.0, 1.0),
    }
}
