//! Resolution curve and wire encoding
//!
//! The resolution slider covers two orders of magnitude with the default
//! bounds, so slider position maps to the multiplier through an exponential
//! curve rather than linearly. Position 0 lands exactly on the minimum,
//! position 1 on the maximum, and most of the slider travel goes to the low
//! end of the range where small changes matter.
//!
//! Toward the capture service the multiplier travels as a fixed-point
//! integer scaled by [`BASE_WINDOW`]. That integer doubles as the capture
//! window length in samples.

/// Samples per unit of resolution multiplier.
///
/// A multiplier of 1.0 corresponds to a 1024-sample window, and the wire
/// encoding of a multiplier is `round(multiplier * 1024)`.
pub const BASE_WINDOW: u32 = 1024;

/// Default lower bound of the multiplier range.
pub const DEFAULT_MIN: f32 = 0.01;

/// Default upper bound of the multiplier range.
pub const DEFAULT_MAX: f32 = 3.0;

/// Default step-size parameter of the curve.
pub const DEFAULT_STEP: f32 = 0.01;

/// Bidirectional exponential mapping between a slider position in `[0, 1]`
/// and a resolution multiplier in `[min, max]`.
///
/// The forward map is `multiplier = a * e^(b * position) + c` with
/// `a = step`, `c = min - a` and `b = ln((max - min) / a + 1)`, which pins
/// position 0 to `min` and position 1 to `max`. Shrinking `step` compresses
/// more of the slider travel into the low end of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionCurve {
    min: f32,
    max: f32,
    step: f32,
}

impl ResolutionCurve {
    /// Create a curve over `[min, max]` with the given step-size parameter.
    ///
    /// Degenerate inputs fall back to the default values so the curve is
    /// always well defined: `step` must be a positive finite number and
    /// `max` must exceed `min`.
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            DEFAULT_STEP
        };
        let (min, max) = if min.is_finite() && max.is_finite() && max > min {
            (min, max)
        } else {
            (DEFAULT_MIN, DEFAULT_MAX)
        };

        Self { min, max, step }
    }

    /// Lower bound of the multiplier range.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound of the multiplier range.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Map a slider position in `[0, 1]` to a multiplier in `[min, max]`.
    pub fn to_multiplier(&self, position: f32) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let a = self.step;
        let c = self.min - a;
        let b = ((self.max - self.min) / a + 1.0).ln();

        (a * (b * position).exp() + c).clamp(self.min, self.max)
    }

    /// Map a multiplier back to a slider position in `[0, 1]`.
    ///
    /// The multiplier is clamped into `[min, max]` before inversion, so
    /// out-of-range inputs land on the nearest endpoint. Wire values can
    /// decode below the minimum and still need a valid position.
    pub fn to_position(&self, multiplier: f32) -> f32 {
        let m = multiplier.clamp(self.min, self.max);
        let a = self.step;
        let c = self.min - a;
        let b = ((self.max - self.min) / a + 1.0).ln();

        (((m - c) / a).ln() / b).clamp(0.0, 1.0)
    }
}

impl Default for ResolutionCurve {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
            step: DEFAULT_STEP,
        }
    }
}

/// Encode a multiplier as its fixed-point wire value.
///
/// The result is also the capture window length in samples.
pub fn multiplier_to_samples(multiplier: f32) -> u32 {
    (multiplier * BASE_WINDOW as f32).round() as u32
}

/// Recover a one-decimal multiplier from a wire value.
pub fn samples_to_multiplier(samples: u32) -> f32 {
    (10.0 * samples as f32 / BASE_WINDOW as f32).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_hit_bounds() {
        let curve = ResolutionCurve::default();
        assert!((curve.to_multiplier(0.0) - DEFAULT_MIN).abs() < 1e-4);
        assert!((curve.to_multiplier(1.0) - DEFAULT_MAX).abs() < 1e-4);
        assert!(curve.to_position(DEFAULT_MIN).abs() < 1e-4);
        assert!((curve.to_position(DEFAULT_MAX) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_round_trip_across_positions() {
        let curve = ResolutionCurve::default();
        for p in [0.0f32, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
            let back = curve.to_position(curve.to_multiplier(p));
            assert!((back - p).abs() < 1e-3, "position {} came back as {}", p, back);
        }
    }

    #[test]
    fn test_monotonically_increasing() {
        let curve = ResolutionCurve::default();
        let mut prev = curve.to_multiplier(0.0);
        for i in 1..=100 {
            let m = curve.to_multiplier(i as f32 / 100.0);
            assert!(m > prev, "curve not increasing at position {}", i);
            prev = m;
        }
    }

    #[test]
    fn test_low_end_gets_most_of_the_travel() {
        // Half the slider should cover far less than half the range
        let curve = ResolutionCurve::default();
        let mid = curve.to_multiplier(0.5);
        assert!(mid < (DEFAULT_MIN + DEFAULT_MAX) / 2.0);
    }

    #[test]
    fn test_inversion_clamps_out_of_range_multipliers() {
        let curve = ResolutionCurve::default();
        // One-decimal wire recovery can land below the minimum
        assert!(curve.to_position(0.0).abs() < 1e-6);
        assert!((curve.to_position(100.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_bounds() {
        let curve = ResolutionCurve::new(0.5, 10.0, 0.1);
        assert!((curve.to_multiplier(0.0) - 0.5).abs() < 1e-4);
        assert!((curve.to_multiplier(1.0) - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_parameters_fall_back_to_defaults() {
        let curve = ResolutionCurve::new(3.0, 0.01, -1.0);
        assert!((curve.to_multiplier(0.0) - DEFAULT_MIN).abs() < 1e-4);
        assert!((curve.to_multiplier(1.0) - DEFAULT_MAX).abs() < 1e-4);
    }

    #[test]
    fn test_wire_unit_multiplier() {
        assert_eq!(multiplier_to_samples(1.0), 1024);
        assert!((samples_to_multiplier(1024) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wire_recovery_rounds_to_one_decimal() {
        // 0.05 encodes to 51 samples, which recovers as 0.0
        assert_eq!(multiplier_to_samples(0.05), 51);
        assert_eq!(samples_to_multiplier(51), 0.0);

        assert_eq!(multiplier_to_samples(3.0), 3072);
        assert!((samples_to_multiplier(3072) - 3.0).abs() < f32::EPSILON);
    }
}
