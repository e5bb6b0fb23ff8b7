//! Property-based invariant tests for variant selection.
//!
//! These must hold for **any** registry and factor:
//!
//! 1. A selection from a non-empty set is always a registered handle.
//! 2. An exact registration is always preferred.
//! 3. When higher variants exist, the chosen factor is the smallest one
//!    above the request; otherwise it is the maximum registered factor.
//! 4. The rendered size tracks `logical * factor`, never the chosen
//!    variant.

use proptest::prelude::*;
use uiscale_assets::{VariantSelector, VariantSet};
use uiscale_core::Size;
use uiscale_core::factor::scale_len;

fn registry_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::btree_set(75u32..=300, 1..8)
        .prop_map(|set| set.into_iter().map(|m| f64::from(m) / 100.0).collect())
}

fn factor_strategy() -> impl Strategy<Value = f64> {
    (75u32..=300).prop_map(|m| f64::from(m) / 100.0)
}

proptest! {
    #[test]
    fn selection_is_registered(scales in registry_strategy(), f in factor_strategy()) {
        let set = VariantSet::from_variants(scales.iter().map(|s| (*s, *s)));
        let (chosen, handle) = set.select(f).expect("non-empty set must select");
        prop_assert!(scales.contains(handle));
        prop_assert_eq!(chosen, *handle);
    }

    #[test]
    fn exact_match_wins(scales in registry_strategy(), idx in 0usize..8) {
        let set = VariantSet::from_variants(scales.iter().map(|s| (*s, *s)));
        let target = scales[idx % scales.len()];
        let (chosen, _) = set.select(target).expect("non-empty set must select");
        prop_assert_eq!(chosen, target);
    }

    #[test]
    fn higher_else_highest(scales in registry_strategy(), f in factor_strategy()) {
        let set = VariantSet::from_variants(scales.iter().map(|s| (*s, *s)));
        let (chosen, _) = set.select(f).expect("non-empty set must select");
        if scales.contains(&f) {
            prop_assert_eq!(chosen, f);
        } else if let Some(next) = scales.iter().copied().filter(|s| *s > f).reduce(f64::min) {
            prop_assert_eq!(chosen, next);
        } else {
            let highest = scales.iter().copied().reduce(f64::max).unwrap();
            prop_assert_eq!(chosen, highest);
        }
    }

    #[test]
    fn rendered_size_tracks_factor(
        scales in registry_strategy(),
        f in factor_strategy(),
        w in 1i32..=256,
        h in 1i32..=256,
    ) {
        let set = VariantSet::from_variants(scales.iter().map(|s| (*s, *s)));
        let selector = VariantSelector::new("asset", Size::new(w, h), set);
        let selection = selector.select(f);
        prop_assert_eq!(selection.rendered, Size::new(scale_len(w, f), scale_len(h, f)));
    }
}
