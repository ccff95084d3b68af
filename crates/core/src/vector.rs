use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::space::ParameterSpace;

/// A vector's length does not match the declared dimensionality.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected} parameter values, found {found}")]
pub struct ShapeError {
    pub expected: usize,
    pub found: usize,
}

/// An immutable point in a [`ParameterSpace`].
///
/// Values are stored in field order with each field's representation
/// applied, so integer fields always hold whole numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterVector {
    space: Arc<ParameterSpace>,
    values: Vec<f64>,
}

impl ParameterVector {
    /// Converts a raw array into a vector of `space`.
    ///
    /// Integer fields are truncated toward zero; real fields pass through.
    /// Bounds are not checked.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `values` does not have one entry per field.
    pub fn from_array(space: Arc<ParameterSpace>, values: &[f64]) -> Result<Self, ShapeError> {
        if values.len() != space.dim() {
            return Err(ShapeError {
                expected: space.dim(),
                found: values.len(),
            });
        }

        let values = space
            .fields()
            .iter()
            .zip(values)
            .map(|(field, &value)| field.coerce(value))
            .collect();

        Ok(Self { space, values })
    }

    /// Returns the values as an owned array in field order.
    #[must_use]
    pub fn to_array(&self) -> Vec<f64> {
        self.values.clone()
    }

    /// Returns the values in field order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the value of the named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.space.index_of(name).map(|index| self.values[index])
    }

    /// Returns the space this vector belongs to.
    #[must_use]
    pub fn space(&self) -> &Arc<ParameterSpace> {
        &self.space
    }

    /// Returns `true` if every value lies within its field's bounds.
    #[must_use]
    pub fn in_bounds(&self) -> bool {
        self.space.contains(&self.values)
    }

    /// Renders the vector for an operator: integers without decimals, reals
    /// with two decimal places.
    #[must_use]
    pub fn format(&self) -> String {
        let parts: Vec<String> = self
            .space
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, &value)| format!("{}={}", field.name, field.render(value)))
            .collect();
        parts.join(", ")
    }
}

impl fmt::Display for ParameterVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
