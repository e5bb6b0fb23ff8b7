#![forbid(unsafe_code)]

//! Resolution variant selection for pre-rendered assets.
//!
//! # Role in uiscale
//!
//! Crisp rendering at high density needs pre-rendered variants of each
//! asset; this crate picks the right one. A [`VariantSelector`] holds the
//! registry for one logical asset, answers "which handle, at what size"
//! for any factor, and — when attached to a
//! [`ScaleState`](uiscale_core::ScaleState) — drops its cached answer
//! whenever the factor changes.
//!
//! # Example
//!
//! ```
//! use uiscale_core::{ScaleState, Size};
//! use uiscale_assets::{VariantSelector, VariantSet};
//!
//! let state = ScaleState::new();
//! let variants = VariantSet::from_variants([
//!     (1.0, "save.png"),
//!     (2.0, "save@2x.png"),
//! ]);
//! let selector = VariantSelector::attach(&state, "save", Size::new(16, 16), variants);
//!
//! state.update(1.5);
//! let selection = selector.select_current();
//! assert_eq!(selection.handle, Some(&"save@2x.png")); // downscale the 2x asset
//! assert_eq!(selection.rendered, Size::new(24, 24));  // logical 16 at 1.5x
//! ```

pub mod catalog;
pub mod naming;
pub mod variant;

pub use catalog::{AssetCatalog, StaticCatalog};
pub use naming::{SCALE_LADDER, variant_file_name, variant_suffix};
pub use variant::{Selection, VariantSelector, VariantSet};
