use std::{cmp::Ordering, fmt};

use thiserror::Error;

/// Lap time, in seconds, that stands in for a lap the car did not finish.
///
/// This value enters the fitting targets and the history file whenever a lap
/// is recorded as [`LapTime::DidNotFinish`]. It is reserved: a measured lap
/// can never take this value, so a DNF is never confused with a slow lap.
pub const DNF_LAP_TIME: f64 = 100_000.0;

/// Errors that can occur when constructing a measured lap time.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LapTimeError {
    #[error("lap time must be finite, got {0}")]
    NonFinite(f64),

    #[error("lap time must be non-negative, got {0}")]
    Negative(f64),

    #[error("lap time {0} is reserved for laps that did not finish")]
    Reserved(f64),
}

/// The outcome of one physical lap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LapTime {
    /// The car returned to the start line after this many seconds.
    Finished(f64),

    /// The car crashed or never returned to the start line.
    DidNotFinish,
}

impl LapTime {
    /// Creates a measured lap time.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is non-finite, negative, or at least
    /// [`DNF_LAP_TIME`].
    pub fn finished(seconds: f64) -> Result<Self, LapTimeError> {
        if !seconds.is_finite() {
            return Err(LapTimeError::NonFinite(seconds));
        }
        if seconds < 0.0 {
            return Err(LapTimeError::Negative(seconds));
        }
        if seconds >= DNF_LAP_TIME {
            return Err(LapTimeError::Reserved(seconds));
        }
        Ok(Self::Finished(seconds))
    }

    /// Decodes a stored value, mapping exactly [`DNF_LAP_TIME`] back to
    /// [`LapTime::DidNotFinish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither the sentinel nor a valid
    /// measured lap time.
    pub fn from_seconds(seconds: f64) -> Result<Self, LapTimeError> {
        #[allow(clippy::float_cmp)]
        if seconds == DNF_LAP_TIME {
            Ok(Self::DidNotFinish)
        } else {
            Self::finished(seconds)
        }
    }

    /// Returns the value used for fitting and storage.
    #[must_use]
    pub fn seconds(self) -> f64 {
        match self {
            Self::Finished(seconds) => seconds,
            Self::DidNotFinish => DNF_LAP_TIME,
        }
    }

    /// Returns `true` if the lap was completed.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

impl PartialOrd for LapTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Finished(a), Self::Finished(b)) => a.partial_cmp(b),
            (Self::Finished(_), Self::DidNotFinish) => Some(Ordering::Less),
            (Self::DidNotFinish, Self::Finished(_)) => Some(Ordering::Greater),
            (Self::DidNotFinish, Self::DidNotFinish) => Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for LapTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished(seconds) => write!(f, "{seconds:.4} s"),
            Self::DidNotFinish => f.write_str("DNF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_measured_laps() {
        assert_eq!(LapTime::finished(9.5), Ok(LapTime::Finished(9.5)));
        assert_eq!(LapTime::finished(0.0), Ok(LapTime::Finished(0.0)));
        assert_eq!(LapTime::finished(-1.0), Err(LapTimeError::Negative(-1.0)));
        assert!(matches!(
            LapTime::finished(f64::NAN),
            Err(LapTimeError::NonFinite(_))
        ));
        assert_eq!(
            LapTime::finished(DNF_LAP_TIME),
            Err(LapTimeError::Reserved(DNF_LAP_TIME))
        );
    }

    #[test]
    fn sentinel_round_trips_through_seconds() {
        let dnf = LapTime::DidNotFinish;

        assert_eq!(LapTime::from_seconds(dnf.seconds()), Ok(dnf));
        assert_eq!(LapTime::from_seconds(12.0), Ok(LapTime::Finished(12.0)));
    }

    #[test]
    fn any_finished_lap_beats_a_dnf() {
        let slow = LapTime::finished(99_999.0).unwrap();

        assert!(slow < LapTime::DidNotFinish);
        assert!(LapTime::Finished(9.5) < LapTime::Finished(12.0));
        assert_eq!(LapTime::DidNotFinish.to_string(), "DNF");
    }
}
