#![forbid(unsafe_code)]

//! Logical font sizes for density-independent text.
//!
//! Components pick a [`LogicalFontSize`] instead of a hardcoded point size;
//! the point size actually used follows the active scale factor, so text
//! keeps its proportions across densities.

use serde::{Deserialize, Serialize};

use crate::factor::scale_len;

/// A named text size with a fixed baseline point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalFontSize {
    /// Tooltips, minor labels (9pt baseline).
    Tiny,
    /// Secondary text, captions (10pt baseline).
    Small,
    /// Body text, form fields (12pt baseline).
    Normal,
    /// Emphasized text (14pt baseline).
    Medium,
    /// Section headers (16pt baseline).
    Large,
    /// Dialog titles (18pt baseline).
    XLarge,
    /// Main titles (24pt baseline).
    Huge,
}

impl LogicalFontSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 7] = [
        Self::Tiny,
        Self::Small,
        Self::Normal,
        Self::Medium,
        Self::Large,
        Self::XLarge,
        Self::Huge,
    ];

    /// Point size at factor 1.0.
    #[must_use]
    pub const fn base_pt(self) -> i32 {
        match self {
            Self::Tiny => 9,
            Self::Small => 10,
            Self::Normal => 12,
            Self::Medium => 14,
            Self::Large => 16,
            Self::XLarge => 18,
            Self::Huge => 24,
        }
    }

    /// Point size at `factor`, rounded half away from zero.
    #[must_use]
    pub fn scaled_pt(self, factor: f64) -> i32 {
        scale_len(self.base_pt(), factor)
    }
}
