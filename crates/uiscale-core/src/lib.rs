#![forbid(unsafe_code)]

//! Core: scale factor state, bounds, rounding, and geometry for uiscale.
//!
//! # Role in uiscale
//!
//! `uiscale-core` owns the canonical scale factor and everything that turns
//! logical units into physical ones. The constraint transformer
//! (`uiscale-layout`) and the asset variant selector (`uiscale-assets`)
//! both read their factor from here and reuse the single rounding rule.
//!
//! # Primary responsibilities
//!
//! - **[`ScaleState`]**: clamped, deduplicated factor updates with
//!   synchronous change notification.
//! - **[`factor`]**: bounds, epsilon, half-away-from-zero rounding, and
//!   DPI mapping.
//! - **[`geometry`]**: logical `Size`/`Point`/`Insets`/`Rect` values and
//!   their scaled counterparts.
//! - **[`provider`]**: the injected display-context detection seam; the
//!   core never probes the platform itself.
//!
//! # Example
//!
//! ```
//! use uiscale_core::{ScaleState, listener_fn};
//!
//! let state = ScaleState::new();
//! let listener = listener_fn(|old, new| {
//!     println!("scale changed {old} -> {new}");
//! });
//! let token = state.subscribe(&listener);
//!
//! state.update(2.0);
//! assert_eq!(state.get(), 2.0);
//! assert_eq!(state.scale(10), 20);
//!
//! state.unsubscribe(token);
//! ```

pub mod factor;
pub mod font;
pub mod geometry;
pub mod provider;
pub mod state;

pub use factor::{BASE_DPI, MAX_SCALE, MIN_SCALE, SCALE_EPSILON, ScaleBounds};
pub use font::LogicalFontSize;
pub use geometry::{Insets, Point, Rect, Size};
pub use provider::{DetectError, DisplayContextProvider, EnvScale, FixedScale};
pub use state::{ScaleListener, ScaleState, SubscriptionToken, listener_fn};
