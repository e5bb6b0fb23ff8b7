#![forbid(unsafe_code)]

//! Selection of the best pre-rendered variant for the active factor.
//!
//! # Design
//!
//! A [`VariantSet`] maps scale factors to opaque handles for one logical
//! asset. Selection prefers, in order: an exact match, the smallest variant
//! strictly above the requested factor (downscaling a higher-resolution
//! asset keeps it crisp), then the highest variant available (upscaling as
//! a last resort). An empty set selects nothing and the caller draws its
//! placeholder.
//!
//! There is deliberately no "next lower" fallback between the exact match
//! and the highest-available step: over-provisioning resolution avoids
//! visible blur.
//!
//! Factors are keyed at milli-precision ([`SCALE_EPSILON`] is 0.001), so
//! registry equality is exact integer equality rather than float
//! comparison.
//!
//! # Invariants
//!
//! 1. A selection from a non-empty set is always a registered handle.
//! 2. The rendered size is `logical * factor` under the shared rounding
//!    rule, independent of which physical variant was chosen.
//! 3. The logical size never changes with the factor.
//!
//! [`SCALE_EPSILON`]: uiscale_core::SCALE_EPSILON

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::{Arc, Mutex};

use uiscale_core::geometry::Size;
use uiscale_core::state::{ScaleListener, ScaleState, SubscriptionToken};

/// Factor quantized to milli-units; the registry key.
pub(crate) fn quantize(factor: f64) -> u32 {
    (factor * 1000.0).round() as u32
}

fn dequantize(key: u32) -> f64 {
    f64::from(key) / 1000.0
}

/// Resolution variants of one logical asset, keyed by scale factor.
pub struct VariantSet<H> {
    entries: BTreeMap<u32, H>,
}

impl<H> Default for VariantSet<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: fmt::Debug> fmt::Debug for VariantSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (dequantize(*k), v)))
            .finish()
    }
}

impl<H> VariantSet<H> {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a set from `(factor, handle)` pairs. Later duplicates of a
    /// factor replace earlier ones.
    #[must_use]
    pub fn from_variants<I>(variants: I) -> Self
    where
        I: IntoIterator<Item = (f64, H)>,
    {
        let mut set = Self::new();
        for (factor, handle) in variants {
            set.insert(factor, handle);
        }
        set
    }

    /// Register a variant for `factor`, replacing any existing one within
    /// epsilon of it.
    pub fn insert(&mut self, factor: f64, handle: H) {
        if self.entries.insert(quantize(factor), handle).is_some() {
            tracing::debug!(factor, "asset variant replaced");
        }
    }

    /// Number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no variants are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Factors that have a variant, ascending.
    #[must_use]
    pub fn scales(&self) -> Vec<f64> {
        self.entries.keys().map(|k| dequantize(*k)).collect()
    }

    /// The variant registered exactly at `factor`, if any.
    #[must_use]
    pub fn get(&self, factor: f64) -> Option<&H> {
        self.entries.get(&quantize(factor))
    }

    /// Best variant for `factor`: exact match, else smallest strictly
    /// higher, else highest available, else none.
    #[must_use]
    pub fn select(&self, factor: f64) -> Option<(f64, &H)> {
        let key = self.select_key(quantize(factor))?;
        self.entries.get(&key).map(|h| (dequantize(key), h))
    }

    fn select_key(&self, key: u32) -> Option<u32> {
        if self.entries.contains_key(&key) {
            return Some(key);
        }
        if let Some((higher, _)) = self.entries.range((Excluded(key), Unbounded)).next() {
            return Some(*higher);
        }
        self.entries.keys().next_back().copied()
    }
}

/// Outcome of a variant selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a, H> {
    /// The chosen physical variant; `None` when the set is empty, in which
    /// case the caller supplies a placeholder.
    pub handle: Option<&'a H>,
    /// Factor the chosen variant was produced for.
    pub variant_scale: Option<f64>,
    /// Size to render at: `logical * factor`, rounded half away from zero,
    /// whatever variant was chosen.
    pub rendered: Size,
}

struct Binding {
    state: ScaleState,
    token: SubscriptionToken,
}

struct Cache {
    factor_key: u32,
    variant_key: Option<u32>,
}

/// Picks the best variant of one logical asset for the active factor.
///
/// The selector keeps a one-entry cache of its last answer; when attached
/// to a [`ScaleState`] the cache is invalidated on every factor change and
/// the subscription is released when the selector is dropped.
pub struct VariantSelector<H> {
    id: String,
    logical: Size,
    variants: VariantSet<H>,
    cache: Mutex<Option<Cache>>,
    binding: Mutex<Option<Binding>>,
}

impl<H: fmt::Debug> fmt::Debug for VariantSelector<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantSelector")
            .field("id", &self.id)
            .field("logical", &self.logical)
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}

impl<H> VariantSelector<H> {
    /// Detached selector: selection works, but nothing invalidates the
    /// cache on factor changes. Prefer [`VariantSelector::attach`] for
    /// anything long-lived.
    #[must_use]
    pub fn new(id: impl Into<String>, logical: Size, variants: VariantSet<H>) -> Self {
        let id = id.into();
        if variants.is_empty() {
            tracing::warn!(asset = %id, "no variants registered; selections will be empty");
        }
        Self {
            id,
            logical,
            variants,
            cache: Mutex::new(None),
            binding: Mutex::new(None),
        }
    }

    /// Logical asset id this selector serves.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The logical (unscaled) size; invariant under factor changes.
    #[must_use]
    pub fn logical_size(&self) -> Size {
        self.logical
    }

    /// The registered variants.
    #[must_use]
    pub fn variants(&self) -> &VariantSet<H> {
        &self.variants
    }

    /// The size the asset renders at under `factor`.
    #[must_use]
    pub fn rendered_size(&self, factor: f64) -> Size {
        self.logical.scaled(factor)
    }

    /// Best variant for `factor`, plus the size to render it at.
    ///
    /// Cached per factor; referentially transparent given the variant set
    /// and the factor.
    #[must_use]
    pub fn select(&self, factor: f64) -> Selection<'_, H> {
        let rendered = self.logical.scaled(factor);
        let factor_key = quantize(factor);
        let variant_key = {
            let mut cache = self.cache.lock().expect("variant cache poisoned");
            match &*cache {
                Some(hit) if hit.factor_key == factor_key => hit.variant_key,
                _ => {
                    let key = self.variants.select_key(factor_key);
                    *cache = Some(Cache {
                        factor_key,
                        variant_key: key,
                    });
                    key
                }
            }
        };
        match variant_key {
            Some(key) => Selection {
                handle: self.variants.entries.get(&key),
                variant_scale: Some(dequantize(key)),
                rendered,
            },
            None => Selection {
                handle: None,
                variant_scale: None,
                rendered,
            },
        }
    }

    /// Drop the cached selection; the next [`select`](Self::select)
    /// re-resolves against the registry.
    pub fn invalidate(&self) {
        *self.cache.lock().expect("variant cache poisoned") = None;
        tracing::debug!(asset = %self.id, "variant cache invalidated");
    }
}

impl<H: Send + Sync + 'static> VariantSelector<H> {
    /// Selector wired to `state`: every factor change invalidates the
    /// cache; dropping the selector unsubscribes it.
    #[must_use]
    pub fn attach(
        state: &ScaleState,
        id: impl Into<String>,
        logical: Size,
        variants: VariantSet<H>,
    ) -> Arc<Self> {
        let selector = Arc::new(Self::new(id, logical, variants));
        let listener: Arc<dyn ScaleListener> = selector.clone();
        let token = state.subscribe(&listener);
        *selector.binding.lock().expect("selector binding poisoned") = Some(Binding {
            state: state.clone(),
            token,
        });
        selector
    }

    /// Best variant for the factor of the state this selector is attached
    /// to (or 1.0 when detached).
    #[must_use]
    pub fn select_current(&self) -> Selection<'_, H> {
        let factor = self
            .binding
            .lock()
            .expect("selector binding poisoned")
            .as_ref()
            .map_or(1.0, |b| b.state.get());
        self.select(factor)
    }
}

impl<H: Send + Sync> ScaleListener for VariantSelector<H> {
    fn scale_changed(&self, _old: f64, _new: f64) {
        self.invalidate();
    }
}

impl<H> Drop for VariantSelector<H> {
    fn drop(&mut self) {
        let binding = self
            .binding
            .get_mut()
            .map(Option::take)
            .unwrap_or_default();
        if let Some(binding) = binding {
            binding.state.unsubscribe(binding.token);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
