// Severity Fuzzifier - Triangular Membership
//
// Raw reading → clamp into declared range → position x ∈ [0, 1]
// low = max(0, 1 - 2x), medium = max(0, 1 - |2x - 1|), high = max(0, 2x - 1)

use fuzzydx_common::db::{SeverityBand, Symptom};

/// Declared numeric range of a symptom, guaranteed `min < max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymptomRange {
    min: f64,
    max: f64,
}

impl SymptomRange {
    /// `None` unless both bounds are finite and `min < max`
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min < max).then_some(Self { min, max })
    }

    pub fn of(symptom: &Symptom) -> Option<Self> {
        Self::new(symptom.min_value, symptom.max_value)
    }

    /// Clamp `value` into the range and scale to [0, 1]
    pub fn position(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        ((clamped - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Degrees of membership in each severity band (each 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Membership {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Membership {
    pub fn degree(&self, band: SeverityBand) -> f64 {
        match band {
            SeverityBand::Low => self.low,
            SeverityBand::Medium => self.medium,
            SeverityBand::High => self.high,
        }
    }
}

/// Fuzzify a raw reading against its symptom's range
///
/// Out-of-range values are clamped, never rejected. Callers filter NaN.
pub fn fuzzify(value: f64, range: &SymptomRange) -> Membership {
    let x = range.position(value);

    Membership {
        low: (1.0 - 2.0 * x).max(0.0),
        medium: (1.0 - (2.0 * x - 1.0).abs()).max(0.0),
        high: (2.0 * x - 1.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn fever() -> SymptomRange {
        SymptomRange::new(95.0, 105.0).unwrap()
    }

    fn scale() -> SymptomRange {
        SymptomRange::new(0.0, 10.0).unwrap()
    }

    fn assert_bounded(m: &Membership) {
        for degree in [m.low, m.medium, m.high] {
            assert!((0.0..=1.0).contains(&degree), "degree out of bounds: {:?}", m);
        }
    }

    #[test]
    fn test_range_rejects_invalid_bounds() {
        assert!(SymptomRange::new(5.0, 5.0).is_none());
        assert!(SymptomRange::new(10.0, 0.0).is_none());
        assert!(SymptomRange::new(f64::NAN, 1.0).is_none());
        assert!(SymptomRange::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_midpoint_is_fully_medium() {
        for (range, mid) in [(fever(), 100.0), (scale(), 5.0)] {
            let m = fuzzify(mid, &range);
            assert!((m.medium - 1.0).abs() < EPS);
            assert!(m.low.abs() < EPS);
            assert!(m.high.abs() < EPS);
        }
    }

    #[test]
    fn test_min_is_fully_low() {
        let m = fuzzify(95.0, &fever());
        assert!((m.low - 1.0).abs() < EPS);
        assert!(m.medium.abs() < EPS);
        assert!(m.high.abs() < EPS);
        assert_bounded(&m);
    }

    #[test]
    fn test_max_is_fully_high() {
        let m = fuzzify(10.0, &scale());
        assert!((m.high - 1.0).abs() < EPS);
        assert!(m.medium.abs() < EPS);
        assert!(m.low.abs() < EPS);
        assert_bounded(&m);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        assert_eq!(fuzzify(120.0, &fever()), fuzzify(105.0, &fever()));
        assert_eq!(fuzzify(-3.0, &scale()), fuzzify(0.0, &scale()));
        assert_eq!(fuzzify(f64::INFINITY, &scale()), fuzzify(10.0, &scale()));
        assert_bounded(&fuzzify(f64::NEG_INFINITY, &fever()));
    }

    #[test]
    fn test_intermediate_values() {
        // 101°F is 60% of the fever range
        let m = fuzzify(101.0, &fever());
        assert!(m.low.abs() < EPS);
        assert!((m.medium - 0.8).abs() < EPS);
        assert!((m.high - 0.2).abs() < EPS);

        // 2/10 is 20% of the scale
        let m = fuzzify(2.0, &scale());
        assert!((m.low - 0.6).abs() < EPS);
        assert!((m.medium - 0.4).abs() < EPS);
        assert!(m.high.abs() < EPS);
    }

    #[test]
    fn test_memberships_bounded_across_range() {
        let range = scale();
        for step in 0..=100 {
            assert_bounded(&fuzzify(step as f64 / 10.0, &range));
        }
    }

    #[test]
    fn test_degree_selects_band() {
        let m = Membership {
            low: 0.1,
            medium: 0.2,
            high: 0.3,
        };
        assert_eq!(m.degree(SeverityBand::Low), 0.1);
        assert_eq!(m.degree(SeverityBand::Medium), 0.2);
        assert_eq!(m.degree(SeverityBand::High), 0.3);
    }
}
