/// The inverse golden ratio, `1/φ = φ - 1`.
const INV_PHI: f64 = 0.618_033_988_749_895;

/// Which probe survives a shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Keep {
    /// The lower probe was better; the bracket becomes `[lo, upper]`.
    Lower,

    /// The upper probe was better; the bracket becomes `[lower, hi]`.
    Upper,
}

/// An interval with two golden-ratio probes.
#[derive(Debug, Clone, Copy)]
pub(super) struct Bracket {
    pub(super) lo: f64,
    pub(super) hi: f64,
    pub(super) lower: f64,
    pub(super) upper: f64,
}

impl Bracket {
    /// Creates a bracket, swapping reversed bounds.
    pub(super) fn new([a, b]: [f64; 2]) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let step = INV_PHI * (hi - lo);
        Self {
            lo,
            hi,
            lower: hi - step,
            upper: lo + step,
        }
    }

    pub(super) fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Shrinks toward the surviving probe and returns the new probe location.
    pub(super) fn shrink(&mut self, keep: Keep) -> f64 {
        match keep {
            Keep::Lower => {
                self.hi = self.upper;
                self.upper = self.lower;
                self.lower = self.hi - INV_PHI * (self.hi - self.lo);
                self.lower
            }
            Keep::Upper => {
                self.lo = self.lower;
                self.lower = self.upper;
                self.upper = self.lo + INV_PHI * (self.hi - self.lo);
                self.upper
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn probes_split_the_unit_interval_by_the_golden_ratio() {
        let bracket = Bracket::new([0.0, 1.0]);

        assert_relative_eq!(bracket.lower, 1.0 - INV_PHI);
        assert_relative_eq!(bracket.upper, INV_PHI);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let bracket = Bracket::new([4.0, -2.0]);

        assert_relative_eq!(bracket.lo, -2.0);
        assert_relative_eq!(bracket.hi, 4.0);
    }

    #[test]
    fn shrinking_reuses_the_surviving_probe() {
        let mut bracket = Bracket::new([0.0, 1.0]);
        let old_lower = bracket.lower;

        let probe = bracket.shrink(Keep::Lower);

        assert_relative_eq!(bracket.hi, INV_PHI);
        assert_relative_eq!(bracket.upper, old_lower);
        assert_relative_eq!(probe, bracket.lower);
        assert_relative_eq!(bracket.lower, bracket.hi - INV_PHI * bracket.hi);

        let old_upper = bracket.upper;
        let probe = bracket.shrink(Keep::Upper);

        assert_relative_eq!(bracket.lower, old_upper);
        assert_relative_eq!(probe, bracket.upper);
    }
}
