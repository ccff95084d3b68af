mod error;
mod field;
mod presets;

use std::{collections::HashSet, sync::Arc};

use nalgebra::DMatrix;
use serde::Deserialize;

use crate::vector::{ParameterVector, ShapeError};

pub use error::{ParseError, SpaceError};
pub use field::{Field, FieldKind};

/// The declared tunable dimensions shared by every vector in a session.
///
/// A space is an ordered list of [`Field`]s. Its dimensionality and bounds
/// are fixed once constructed, and every [`ParameterVector`] carries a shared
/// handle to the space it belongs to.
///
/// Spaces are versioned configuration: the follow-the-gap driver has shipped
/// with different parameter sets over time, so the space is data rather than a
/// hardcoded type. Use one of the presets or deserialize from a TOML file:
///
/// ```toml
/// [[fields]]
/// name = "bubble_radius"
/// kind = "integer"
/// min = 20
/// max = 100
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSpace")]
pub struct ParameterSpace {
    fields: Vec<Field>,
}

#[derive(Deserialize)]
struct RawSpace {
    fields: Vec<Field>,
}

impl TryFrom<RawSpace> for ParameterSpace {
    type Error = SpaceError;

    fn try_from(raw: RawSpace) -> Result<Self, Self::Error> {
        Self::new(raw.fields)
    }
}

impl ParameterSpace {
    /// Creates a validated parameter space.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no fields, a name is empty or repeated,
    /// a bound is non-finite or reversed, or an integer field has a
    /// fractional bound.
    pub fn new(fields: Vec<Field>) -> Result<Self, SpaceError> {
        if fields.is_empty() {
            return Err(SpaceError::Empty);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(SpaceError::EmptyName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SpaceError::DuplicateName(field.name.clone()));
            }
            if !field.min.is_finite() || !field.max.is_finite() || field.min > field.max {
                return Err(SpaceError::InvalidBounds {
                    name: field.name.clone(),
                    min: field.min,
                    max: field.max,
                });
            }
            if field.kind == FieldKind::Integer
                && (field.min.fract() != 0.0 || field.max.fract() != 0.0)
            {
                return Err(SpaceError::FractionalIntegerBounds(field.name.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.fields.len()
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the index of the field with the given name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Returns the lower bounds of every field.
    #[must_use]
    pub fn lower_bounds(&self) -> Vec<f64> {
        self.fields.iter().map(|field| field.min).collect()
    }

    /// Returns the upper bounds of every field.
    #[must_use]
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.fields.iter().map(|field| field.max).collect()
    }

    /// Returns `true` if every value lies within its field's bounds.
    ///
    /// Values of the wrong length are never contained.
    #[must_use]
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.dim()
            && self
                .fields
                .iter()
                .zip(values)
                .all(|(field, &value)| field.contains(value))
    }

    /// Maps each column of `matrix` onto `[0, 1]` using the field bounds.
    ///
    /// A field with `min == max` maps to `0.5`. Values outside the bounds map
    /// outside `[0, 1]`; nothing is clamped.
    ///
    /// # Panics
    ///
    /// Panics if `matrix` does not have one column per field.
    #[must_use]
    pub fn normalize_rows(&self, matrix: &DMatrix<f64>) -> DMatrix<f64> {
        assert_eq!(
            matrix.ncols(),
            self.dim(),
            "matrix columns must match the space dimension"
        );
        DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |row, col| {
            self.fields[col].normalize(matrix[(row, col)])
        })
    }

    /// Parses a comma-separated list of numbers into a vector of this space.
    ///
    /// Whitespace around each entry is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not a number or the count is wrong.
    pub fn parse(self: &Arc<Self>, text: &str) -> Result<ParameterVector, ParseError> {
        let values = text
            .split(',')
            .map(str::trim)
            .map(|entry| {
                entry.parse::<f64>().map_err(|source| ParseError::Number {
                    entry: entry.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.vector(&values)?)
    }

    /// Builds a vector of this space from raw values.
    ///
    /// Integer fields are truncated toward zero. Bounds are not enforced, so
    /// externally measured vectors outside the search box are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] if `values` does not have one entry per field.
    pub fn vector(self: &Arc<Self>, values: &[f64]) -> Result<ParameterVector, ShapeError> {
        ParameterVector::from_array(Arc::clone(self), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn two_field_space() -> Arc<ParameterSpace> {
        Arc::new(
            ParameterSpace::new(vec![
                Field::integer("radius", 20.0, 100.0),
                Field::real("alpha", 0.0, 0.5),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn rejects_empty_space() {
        assert_eq!(ParameterSpace::new(vec![]), Err(SpaceError::Empty));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = ParameterSpace::new(vec![
            Field::real("speed", 1.0, 2.0),
            Field::real("speed", 1.0, 3.0),
        ]);
        assert_eq!(result, Err(SpaceError::DuplicateName("speed".into())));
    }

    #[test]
    fn rejects_reversed_and_non_finite_bounds() {
        assert!(matches!(
            ParameterSpace::new(vec![Field::real("speed", 2.0, 1.0)]),
            Err(SpaceError::InvalidBounds { .. })
        ));
        assert!(matches!(
            ParameterSpace::new(vec![Field::real("speed", 0.0, f64::INFINITY)]),
            Err(SpaceError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn rejects_fractional_integer_bounds() {
        let result = ParameterSpace::new(vec![Field::integer("conv", 1.5, 10.0)]);
        assert_eq!(result, Err(SpaceError::FractionalIntegerBounds("conv".into())));
    }

    #[test]
    fn normalizes_columns_to_unit_interval() {
        let space = two_field_space();
        let matrix = DMatrix::from_row_slice(2, 2, &[20.0, 0.25, 100.0, 0.5]);

        let unit = space.normalize_rows(&matrix);

        assert_relative_eq!(unit[(0, 0)], 0.0);
        assert_relative_eq!(unit[(0, 1)], 0.5);
        assert_relative_eq!(unit[(1, 0)], 1.0);
        assert_relative_eq!(unit[(1, 1)], 1.0);
    }

    #[test]
    fn parses_operator_input() {
        let space = two_field_space();

        let vector = space.parse(" 42.9, 0.3 ").unwrap();

        assert_eq!(vector.to_array(), vec![42.0, 0.3]);
    }

    #[test]
    fn parse_reports_bad_entries_and_shape() {
        let space = two_field_space();

        assert!(matches!(
            space.parse("42, fast"),
            Err(ParseError::Number { entry, .. }) if entry == "fast"
        ));
        assert!(matches!(space.parse("42"), Err(ParseError::Shape(_))));
    }

    #[test]
    fn deserializes_from_toml() {
        let text = r#"
            [[fields]]
            name = "bubble_radius"
            kind = "integer"
            min = 20
            max = 100

            [[fields]]
            name = "speed_max"
            kind = "real"
            min = 1.0
            max = 7.0
        "#;

        let space: ParameterSpace = toml::from_str(text).unwrap();

        assert_eq!(space.dim(), 2);
        assert_eq!(space.index_of("speed_max"), Some(1));
        assert_eq!(space.fields()[0].kind, FieldKind::Integer);
    }

    #[test]
    fn toml_goes_through_validation() {
        let text = r#"
            [[fields]]
            name = "speed_max"
            kind = "real"
            min = 7.0
            max = 1.0
        "#;

        assert!(toml::from_str::<ParameterSpace>(text).is_err());
    }
}
