#![forbid(unsafe_code)]

//! Constraint mini-language transformer for uiscale.
//!
//! # Role in uiscale
//!
//! Layout specifications carry pixel-denominated values (`gap 5`,
//! `insets 10`, `width 100!`, `[64]`) that must grow and shrink with the
//! display density. This crate rewrites such strings for a given scale
//! factor while leaving density-resilient tokens — percentages and flow
//! keywords like `grow`, `fill`, `push`, `wrap` — untouched.
//!
//! The transformer is a pure function of `(input, factor)`: it keeps no
//! state, performs no I/O, and reads its factor from whatever
//! `uiscale_core::ScaleState` the caller consults.
//!
//! # Example
//!
//! ```
//! use uiscale_core::ScaleState;
//! use uiscale_layout::transform;
//!
//! let state = ScaleState::new();
//! state.update(2.0);
//!
//! let scaled = transform("insets 10, gap 5, [100][grow]", state.get());
//! assert_eq!(scaled, "insets 20, gap 10, [200][grow]");
//! ```

pub mod transform;

pub use transform::{has_scalable_values, transform};
