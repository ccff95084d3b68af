//! Core types for tuning follow-the-gap parameters one lap at a time.
//!
//! This crate defines the data every other gaptune crate builds on:
//!
//! - [`ParameterSpace`]: the named, bounded dimensions being tuned
//! - [`ParameterVector`]: one point in that space
//! - [`LapTime`]: a measured lap or an explicit did-not-finish
//! - [`ObservationStore`]: the append-only history of tested vectors
//! - [`Surrogate`]: the regression model seam used by the engine

mod lap_time;
mod observation;
mod space;
mod surrogate;
mod vector;

pub use lap_time::{DNF_LAP_TIME, LapTime, LapTimeError};
pub use observation::{Observation, ObservationStore};
pub use space::{Field, FieldKind, ParameterSpace, ParseError, SpaceError};
pub use surrogate::{Prediction, Surrogate};
pub use vector::{ParameterVector, ShapeError};
