use serde::Deserialize;

/// How values of a field are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Whole numbers; fractional inputs are truncated toward zero.
    Integer,

    /// Real numbers, passed through unchanged.
    Real,
}

/// One named, bounded dimension of a [`ParameterSpace`].
///
/// [`ParameterSpace`]: super::ParameterSpace
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    /// Field name, unique within a space.
    pub name: String,

    /// Value representation.
    pub kind: FieldKind,

    /// Inclusive lower bound.
    pub min: f64,

    /// Inclusive upper bound.
    pub max: f64,
}

impl Field {
    /// Creates an integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Integer,
            min,
            max,
        }
    }

    /// Creates a real-valued field.
    #[must_use]
    pub fn real(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Real,
            min,
            max,
        }
    }

    /// Applies the field's representation to a raw value.
    #[must_use]
    pub fn coerce(&self, value: f64) -> f64 {
        match self.kind {
            FieldKind::Integer => value.trunc(),
            FieldKind::Real => value,
        }
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Maps `value` onto the unit interval spanned by the bounds.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width == 0.0 {
            0.5
        } else {
            (value - self.min) / width
        }
    }

    pub(crate) fn render(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Integer => format!("{value:.0}"),
            FieldKind::Real => format!("{value:.2}"),
        }
    }
}
