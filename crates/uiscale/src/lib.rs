#![forbid(unsafe_code)]

//! Density-consistent UI scaling.
//!
//! One import surface over the three uiscale crates:
//!
//! - [`ScaleState`] (from `uiscale-core`): the canonical scale factor,
//!   clamped, deduplicated, observable.
//! - [`transform`] (from `uiscale-layout`): rescales pixel-denominated
//!   constraint strings.
//! - [`VariantSelector`] (from `uiscale-assets`): picks the best
//!   pre-rendered asset variant for the active factor.
//!
//! # Example
//!
//! ```
//! use uiscale::{ScaleState, Size, VariantSelector, VariantSet, transform};
//!
//! // One state instance, constructed at startup and passed around.
//! let state = ScaleState::new();
//! state.update(2.0);
//!
//! // Constraint strings follow the factor.
//! assert_eq!(transform("insets 10, gap 5", state.get()), "insets 20, gap 10");
//!
//! // Assets pick their sharpest variant.
//! let icon = VariantSelector::attach(
//!     &state,
//!     "save",
//!     Size::new(16, 16),
//!     VariantSet::from_variants([(1.0, "save.png"), (2.0, "save@2x.png")]),
//! );
//! assert_eq!(icon.select_current().handle, Some(&"save@2x.png"));
//! ```

pub use uiscale_core::{
    BASE_DPI, DetectError, DisplayContextProvider, EnvScale, FixedScale, Insets,
    LogicalFontSize, MAX_SCALE, MIN_SCALE, Point, Rect, SCALE_EPSILON, ScaleBounds,
    ScaleListener, ScaleState, Size, SubscriptionToken, listener_fn,
};

pub use uiscale_layout::{has_scalable_values, transform};

pub use uiscale_assets::{
    AssetCatalog, SCALE_LADDER, Selection, StaticCatalog, VariantSelector, VariantSet,
    variant_file_name, variant_suffix,
};

/// Factor state, bounds, rounding, geometry, providers.
pub mod core {
    pub use uiscale_core::*;
}

/// Constraint mini-language rescaling.
pub mod layout {
    pub use uiscale_layout::*;
}

/// Pre-rendered asset variant selection.
pub mod assets {
    pub use uiscale_assets::*;
}
