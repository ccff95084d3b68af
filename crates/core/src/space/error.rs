use std::num::ParseFloatError;

use thiserror::Error;

use crate::vector::ShapeError;

/// Errors that can occur when declaring a parameter space.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpaceError {
    #[error("a parameter space needs at least one field")]
    Empty,

    #[error("field names must not be empty")]
    EmptyName,

    #[error("field `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("field `{name}` has invalid bounds [{min}, {max}]")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("integer field `{0}` must have whole-number bounds")]
    FractionalIntegerBounds(String),
}

/// Errors that can occur when parsing operator input into a vector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("`{entry}` is not a number")]
    Number {
        entry: String,
        #[source]
        source: ParseFloatError,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
