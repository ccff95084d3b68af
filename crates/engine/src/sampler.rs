use std::sync::Arc;

use gaptune_core::{Field, FieldKind, ParameterSpace, ParameterVector};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Draws candidate vectors uniformly within a space's bounds.
///
/// Each coordinate is drawn independently: real fields uniformly from their
/// closed bounds interval, integer fields uniformly from the whole numbers
/// within their bounds.
/// Larger batches cover the space more finely at the cost of more surrogate
/// predictions per request.
#[derive(Debug, Clone)]
pub struct CandidateSampler {
    rng: StdRng,
}

impl CandidateSampler {
    /// Creates a sampler, seeded from entropy unless `seed` is given.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_rng(seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64))
    }

    /// Creates a sampler that draws from `rng`.
    #[must_use]
    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Draws `count` raw candidates, one per row.
    pub fn sample(&mut self, space: &ParameterSpace, count: usize) -> DMatrix<f64> {
        let fields = space.fields();
        let mut candidates = DMatrix::zeros(count, fields.len());
        for row in 0..count {
            for (col, field) in fields.iter().enumerate() {
                candidates[(row, col)] = self.draw(field);
            }
        }
        candidates
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw(&mut self, field: &Field) -> f64 {
        if field.min >= field.max {
            return field.min;
        }
        match field.kind {
            // Integer bounds are whole numbers, so the casts are exact.
            FieldKind::Integer => self.rng.gen_range(field.min as i64..=field.max as i64) as f64,
            FieldKind::Real => self.rng.gen_range(field.min..=field.max),
        }
    }

    /// Draws a single vector.
    pub fn sample_vector(&mut self, space: &Arc<ParameterSpace>) -> ParameterVector {
        let row = self.sample(space, 1);
        ParameterVector::from_array(Arc::clone(space), row.as_slice())
            .expect("sampled row has one value per field")
    }
}
