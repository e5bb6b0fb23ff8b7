#![forbid(unsafe_code)]

//! Asset catalogs: where variant registries come from.
//!
//! A catalog resolves a logical asset id to its available `(factor,
//! handle)` pairs once, at selector construction. The trait is the seam to
//! whatever actually stores assets (embedded resources, a theme pack, a
//! test fixture); [`StaticCatalog`] is the in-memory implementation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use uiscale_core::geometry::Size;
use uiscale_core::state::ScaleState;

use crate::variant::{VariantSelector, VariantSet};

/// Source of resolution variants for logical asset ids.
pub trait AssetCatalog<H> {
    /// All available variants for `id`, as `(factor, handle)` pairs.
    /// Unknown ids yield an empty collection.
    fn variants(&self, id: &str) -> Vec<(f64, H)>;
}

/// An in-memory catalog populated up front.
#[derive(Debug, Clone)]
pub struct StaticCatalog<H> {
    assets: FxHashMap<String, Vec<(f64, H)>>,
}

impl<H> Default for StaticCatalog<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> StaticCatalog<H> {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: FxHashMap::default(),
        }
    }

    /// Register one variant of `id`.
    pub fn insert(&mut self, id: impl Into<String>, factor: f64, handle: H) {
        self.assets.entry(id.into()).or_default().push((factor, handle));
    }

    /// Number of distinct asset ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no assets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<H: Clone> AssetCatalog<H> for StaticCatalog<H> {
    fn variants(&self, id: &str) -> Vec<(f64, H)> {
        self.assets.get(id).cloned().unwrap_or_default()
    }
}

impl<H: Send + Sync + 'static> VariantSelector<H> {
    /// Build an attached selector for `id`, populated from `catalog`.
    #[must_use]
    pub fn from_catalog<C>(
        state: &ScaleState,
        catalog: &C,
        id: impl Into<String>,
        logical: Size,
    ) -> Arc<Self>
    where
        C: AssetCatalog<H> + ?Sized,
    {
        let id = id.into();
        let variants = VariantSet::from_variants(catalog.variants(&id));
        tracing::debug!(asset = %id, variants = variants.len(), "selector built from catalog");
        Self::attach(state, id, logical, variants)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
