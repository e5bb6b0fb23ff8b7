#![forbid(unsafe_code)]

//! Scale factor arithmetic: bounds, clamping, rounding, and DPI mapping.
//!
//! Every pixel computation in the workspace funnels through the rounding
//! rule defined here: multiply by the factor, then round half away from
//! zero to an integer. Keeping a single rounding site means a constraint
//! string, a geometry value, and a rendered asset size all land on the same
//! pixel for the same input.
//!
//! # Invariants
//!
//! 1. [`ScaleBounds::clamp`] always returns a value inside the bounds,
//!    including for non-finite input (NaN lands on `min`).
//! 2. `scale_len` / `unscale_len` round-trip within ±1 for any factor the
//!    default bounds admit.
//! 3. Two factors closer than [`SCALE_EPSILON`] are the same factor for
//!    change-detection purposes.

use serde::{Deserialize, Serialize};

/// Baseline DPI at which a factor of 1.0 renders (the Windows 100% setting).
pub const BASE_DPI: u32 = 96;

/// Minimum supported scale factor (75%, 72 DPI).
pub const MIN_SCALE: f64 = 0.75;

/// Maximum supported scale factor (300%, 288 DPI).
pub const MAX_SCALE: f64 = 3.0;

/// Minimum difference for two factors to count as distinct.
pub const SCALE_EPSILON: f64 = 0.001;

/// Inclusive range a scale factor is kept within.
///
/// Out-of-range factors are never rejected, only clamped; see
/// [`ScaleBounds::clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    /// Lower bound, exclusive of zero.
    pub min: f64,
    /// Upper bound, `>= min`.
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
        }
    }
}

impl ScaleBounds {
    /// Create bounds from an explicit range.
    ///
    /// # Panics
    ///
    /// Panics when `min` is not positive or exceeds `max`; such bounds are a
    /// programming defect, not an environmental condition.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min > 0.0 && min <= max,
            "scale bounds require 0 < min <= max, got {min}..={max}"
        );
        Self { min, max }
    }

    /// Force `factor` into the bounds. Never an error.
    ///
    /// Non-finite input cannot escape the bounds: `NaN` and `-inf` land on
    /// `min`, `+inf` lands on `max`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, factor: f64) -> f64 {
        factor.max(self.min).min(self.max)
    }

    /// Whether `factor` already lies inside the bounds.
    #[inline]
    #[must_use]
    pub fn contains(&self, factor: f64) -> bool {
        factor >= self.min && factor <= self.max
    }
}

/// Whether two factors are the same for change-detection purposes.
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= SCALE_EPSILON
}

/// Scale a fractional value, rounding half away from zero to an integer.
#[inline]
#[must_use]
pub fn round_scaled(value: f64, factor: f64) -> i64 {
    (value * factor).round() as i64
}

/// Scale an integer length by `factor`.
#[inline]
#[must_use]
pub fn scale_len(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor).round() as i32
}

/// Convert a scaled length back to its baseline value.
///
/// Inverse of [`scale_len`] within ±1 (rounding in both directions).
#[inline]
#[must_use]
pub fn unscale_len(value: i32, factor: f64) -> i32 {
    debug_assert!(factor > 0.0, "unscale_len requires a positive factor");
    (f64::from(value) / factor).round() as i32
}

/// DPI value corresponding to a factor (96 at 1.0, 192 at 2.0, ...).
#[inline]
#[must_use]
pub fn dpi_for_factor(factor: f64) -> u32 {
    (factor * f64::from(BASE_DPI)).round() as u32
}

/// Factor corresponding to a DPI value (1.0 at 96, 1.25 at 120, ...).
#[inline]
#[must_use]
pub fn factor_for_dpi(dpi: u32) -> f64 {
    f64::from(dpi) / f64::from(BASE_DPI)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds() {
        let bounds = ScaleBounds::default();
        assert_eq!(bounds.min, MIN_SCALE);
        assert_eq!(bounds.max, MAX_SCALE);
    }

    #[test]
    fn clamp_inside_unchanged() {
        let bounds = ScaleBounds::default();
        assert_eq!(bounds.clamp(1.5), 1.5);
        assert_eq!(bounds.clamp(0.75), 0.75);
        assert_eq!(bounds.clamp(3.0), 3.0);
    }

    #[test]
    fn clamp_outside() {
        let bounds = ScaleBounds::default();
        assert_eq!(bounds.clamp(0.1), 0.75);
        assert_eq!(bounds.clamp(10.0), 3.0);
    }

    #[test]
    fn clamp_non_finite_stays_bounded() {
        let bounds = ScaleBounds::default();
        assert!(bounds.contains(bounds.clamp(f64::NAN)));
        assert_eq!(bounds.clamp(f64::INFINITY), 3.0);
        assert_eq!(bounds.clamp(f64::NEG_INFINITY), 0.75);
    }

    #[test]
    #[should_panic(expected = "scale bounds")]
    fn invalid_bounds_panic() {
        let _ = ScaleBounds::new(2.0, 1.0);
    }

    #[test]
    fn rounding_half_away_from_zero() {
        assert_eq!(scale_len(5, 1.5), 8); // 7.5 rounds up
        assert_eq!(scale_len(3, 1.5), 5); // 4.5 rounds up
        assert_eq!(scale_len(10, 2.0), 20);
        assert_eq!(scale_len(0, 2.0), 0);
        assert_eq!(round_scaled(2.5, 1.0), 3);
    }

    #[test]
    fn unscale_inverts_scale() {
        for v in [0, 1, 7, 16, 100, 1000] {
            for f in [0.75, 1.0, 1.25, 1.5, 2.0, 3.0] {
                let back = unscale_len(scale_len(v, f), f);
                assert!((back - v).abs() <= 1, "v={v} f={f} back={back}");
            }
        }
    }

    #[test]
    fn dpi_mapping() {
        assert_eq!(dpi_for_factor(1.0), 96);
        assert_eq!(dpi_for_factor(1.5), 144);
        assert_eq!(dpi_for_factor(2.0), 192);
        assert_eq!(factor_for_dpi(96), 1.0);
        assert_eq!(factor_for_dpi(144), 1.5);
    }

    #[test]
    fn epsilon_comparison() {
        assert!(approx_eq(2.0, 2.0004));
        assert!(!approx_eq(2.0, 2.002));
    }
}
