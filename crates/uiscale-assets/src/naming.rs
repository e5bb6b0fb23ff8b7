#![forbid(unsafe_code)]

//! The `@2x` file-naming convention for pre-rendered variants.
//!
//! Variants of `icons/save.png` live next to it as `icons/save@1.5x.png`,
//! `icons/save@2x.png`, `icons/save@3x.png`. Whole factors drop the
//! fractional part of the suffix; the 1x base has no suffix at all.

use uiscale_core::factor::SCALE_EPSILON;

/// Factors assets are conventionally pre-rendered at.
pub const SCALE_LADDER: [f64; 4] = [1.0, 1.5, 2.0, 3.0];

/// Filename suffix for a variant factor: `""`, `"@1.5x"`, `"@2x"`.
#[must_use]
pub fn variant_suffix(factor: f64) -> String {
    if (factor - 1.0).abs() <= SCALE_EPSILON {
        return String::new();
    }
    let rounded = factor.round();
    if (factor - rounded).abs() <= SCALE_EPSILON {
        format!("@{}x", rounded as i64)
    } else {
        format!("@{factor}x")
    }
}

/// Full variant file name: `variant_file_name("icons/save", "png", 2.0)`
/// is `"icons/save@2x.png"`.
#[must_use]
pub fn variant_file_name(base: &str, extension: &str, factor: f64) -> String {
    format!("{base}{}.{extension}", variant_suffix(factor))
}
