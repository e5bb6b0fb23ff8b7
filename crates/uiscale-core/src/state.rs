#![forbid(unsafe_code)]

//! Canonical scale factor state with change notification.
//!
//! # Design
//!
//! [`ScaleState`] is the single source of truth for the active scale
//! factor. It is a cheaply cloneable handle: every clone shares the same
//! inner state, so one instance constructed at startup can be passed to
//! every consumer instead of reaching for a process-wide global.
//!
//! Updates are clamped into the configured [`ScaleBounds`] and deduplicated
//! against [`SCALE_EPSILON`]; a real change is fanned out synchronously to
//! all live listeners on the calling thread, each receiving the same
//! `(old, new)` pair.
//!
//! # Invariants
//!
//! 1. The stored factor is always inside the bounds.
//! 2. An update within [`SCALE_EPSILON`] of the current factor commits
//!    nothing and notifies nobody.
//! 3. The state holds listeners weakly and never keeps one alive; entries
//!    whose owner dropped are pruned lazily and are never invoked.
//! 4. Subscribing the same listener twice yields the original token and a
//!    single notification per change.
//! 5. A panicking listener is logged and skipped; delivery continues and
//!    the panic does not reach the caller of [`ScaleState::update`].
//!
//! # Concurrency
//!
//! `update` may be called from any number of threads; the commit (clamp,
//! epsilon check, store, listener snapshot) is one critical section, so the
//! `(old, new)` pair handed to each listener is always consistent.
//! [`ScaleState::get`] reads an atomic and never blocks. Dispatch runs on
//! whichever thread called `update`, after the value is committed; there is
//! no queued or asynchronous delivery.
//!
//! # Re-entrancy
//!
//! Calling `update` (or `refresh`) from inside a listener callback is
//! forbidden: it recurses into dispatch and indicates a design bug in the
//! subscriber graph. Subscribing or unsubscribing from inside a callback is
//! fine; the change applies from the next update onward.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::factor::{SCALE_EPSILON, ScaleBounds, dpi_for_factor, scale_len, unscale_len};
use crate::geometry::{Insets, Point, Rect, Size};
use crate::provider::DisplayContextProvider;

/// Callback contract for scale factor changes.
///
/// Implementations must be cheap; they run synchronously inside the
/// updating call.
pub trait ScaleListener: Send + Sync {
    /// Invoked after a factor change committed, with the previous and the
    /// new value.
    fn scale_changed(&self, old: f64, new: f64);
}

/// Wrap a closure as a shareable [`ScaleListener`].
///
/// The returned `Arc` is the listener's lifetime: keep it alive for as long
/// as notifications are wanted, and [`unsubscribe`](ScaleState::unsubscribe)
/// on teardown.
#[must_use]
pub fn listener_fn<F>(f: F) -> Arc<dyn ScaleListener>
where
    F: Fn(f64, f64) + Send + Sync + 'static,
{
    struct FnListener<F>(F);

    impl<F: Fn(f64, f64) + Send + Sync> ScaleListener for FnListener<F> {
        fn scale_changed(&self, old: f64, new: f64) {
            (self.0)(old, new);
        }
    }

    Arc::new(FnListener(f))
}

/// Handle identifying one registration, detached from the listener itself.
///
/// Tokens from one [`ScaleState`] are meaningless to another; passing an
/// unknown token to [`ScaleState::unsubscribe`] is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

struct Entry {
    token: SubscriptionToken,
    listener: Weak<dyn ScaleListener>,
}

struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn prune(&mut self) {
        self.entries.retain(|e| e.listener.strong_count() > 0);
    }
}

struct Inner {
    bounds: ScaleBounds,
    /// Bit pattern of the committed factor; read lock-free by `get`,
    /// written only inside the registry critical section.
    factor_bits: AtomicU64,
    registry: Mutex<Registry>,
}

/// Shared scale factor authority. Clones share the same inner state.
#[derive(Clone)]
pub struct ScaleState {
    inner: Arc<Inner>,
}

impl fmt::Debug for ScaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaleState")
            .field("factor", &self.get())
            .field("bounds", &self.inner.bounds)
            .finish_non_exhaustive()
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScaleState {
    /// State at factor 1.0 with the default bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bounds(ScaleBounds::default())
    }

    /// State at factor 1.0 (clamped) with explicit bounds.
    #[must_use]
    pub fn with_bounds(bounds: ScaleBounds) -> Self {
        let initial = bounds.clamp(1.0);
        Self {
            inner: Arc::new(Inner {
                bounds,
                factor_bits: AtomicU64::new(initial.to_bits()),
                registry: Mutex::new(Registry {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// State initialized from a provider; detection failure falls back to
    /// factor 1.0.
    #[must_use]
    pub fn detect(provider: &dyn DisplayContextProvider) -> Self {
        let state = Self::new();
        match provider.detect() {
            Ok(detected) => {
                let clamped = state.inner.bounds.clamp(detected);
                state
                    .inner
                    .factor_bits
                    .store(clamped.to_bits(), Ordering::Release);
            }
            Err(err) => {
                tracing::warn!(error = %err, "scale detection failed at startup; using 1.0");
            }
        }
        tracing::info!(factor = state.get(), "scale state initialized");
        state
    }

    /// The current factor. Lock-free; never blocks.
    #[inline]
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.inner.factor_bits.load(Ordering::Acquire))
    }

    /// The bounds every committed factor is kept within.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> ScaleBounds {
        self.inner.bounds
    }

    /// Clamp `requested` into bounds and commit it if it differs from the
    /// current factor by more than [`SCALE_EPSILON`], notifying all live
    /// listeners with `(old, new)`. Within epsilon this is a no-op.
    pub fn update(&self, requested: f64) {
        let clamped = self.inner.bounds.clamp(requested);
        let (old, live) = {
            let mut registry = self.inner.registry.lock().expect("scale registry poisoned");
            let old = f64::from_bits(self.inner.factor_bits.load(Ordering::Acquire));
            if (clamped - old).abs() <= SCALE_EPSILON {
                return;
            }
            self.inner
                .factor_bits
                .store(clamped.to_bits(), Ordering::Release);
            registry.prune();
            let live: Vec<Arc<dyn ScaleListener>> = registry
                .entries
                .iter()
                .filter_map(|e| e.listener.upgrade())
                .collect();
            (old, live)
        };
        tracing::info!(old, new = clamped, "scale factor changed");
        for listener in live {
            let delivery = catch_unwind(AssertUnwindSafe(|| listener.scale_changed(old, clamped)));
            if delivery.is_err() {
                tracing::error!(old, new = clamped, "scale listener panicked during notification");
            }
        }
    }

    /// Detect once via `provider` and feed the result to [`update`].
    ///
    /// Detection failure is not an error here: the factor stays as-is and
    /// the failure is only visible in the logs.
    ///
    /// [`update`]: ScaleState::update
    pub fn refresh(&self, provider: &dyn DisplayContextProvider) {
        match provider.detect() {
            Ok(detected) => self.update(detected),
            Err(err) => {
                tracing::warn!(error = %err, "scale detection failed; factor unchanged");
            }
        }
    }

    /// Register `listener` for change notifications.
    ///
    /// The state holds the listener weakly: dropping the last `Arc` makes
    /// the registration inert. Subscribing the same `Arc` again returns the
    /// existing token without duplicating notifications.
    pub fn subscribe(&self, listener: &Arc<dyn ScaleListener>) -> SubscriptionToken {
        let mut registry = self.inner.registry.lock().expect("scale registry poisoned");
        registry.prune();
        let weak = Arc::downgrade(listener);
        if let Some(existing) = registry
            .entries
            .iter()
            .find(|e| Weak::ptr_eq(&e.listener, &weak))
        {
            return existing.token;
        }
        let token = SubscriptionToken(registry.next_id);
        registry.next_id += 1;
        registry.entries.push(Entry {
            token,
            listener: weak,
        });
        tracing::debug!(listeners = registry.entries.len(), "scale listener added");
        token
    }

    /// Remove the registration behind `token`. Idempotent; unknown tokens
    /// are a no-op.
    pub fn unsubscribe(&self, token: SubscriptionToken) {
        let mut registry = self.inner.registry.lock().expect("scale registry poisoned");
        let before = registry.entries.len();
        registry
            .entries
            .retain(|e| e.token != token && e.listener.strong_count() > 0);
        if registry.entries.len() < before {
            tracing::debug!(
                listeners = registry.entries.len(),
                "scale listener removed"
            );
        }
    }

    /// Number of live registrations. Dead entries are pruned first.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        let mut registry = self.inner.registry.lock().expect("scale registry poisoned");
        registry.prune();
        registry.entries.len()
    }

    /// Scale an integer length by the current factor.
    #[inline]
    #[must_use]
    pub fn scale(&self, value: i32) -> i32 {
        scale_len(value, self.get())
    }

    /// Scale a fractional value by the current factor.
    #[inline]
    #[must_use]
    pub fn scale_f64(&self, value: f64) -> f64 {
        value * self.get()
    }

    /// Convert a scaled length back to baseline units.
    #[inline]
    #[must_use]
    pub fn unscale(&self, value: i32) -> i32 {
        unscale_len(value, self.get())
    }

    /// A size rendered at the current factor.
    #[inline]
    #[must_use]
    pub fn scale_size(&self, size: Size) -> Size {
        size.scaled(self.get())
    }

    /// Insets rendered at the current factor.
    #[inline]
    #[must_use]
    pub fn scale_insets(&self, insets: Insets) -> Insets {
        insets.scaled(self.get())
    }

    /// A rectangle rendered at the current factor.
    #[inline]
    #[must_use]
    pub fn scale_rect(&self, rect: Rect) -> Rect {
        rect.scaled(self.get())
    }

    /// A point rendered at the current factor.
    #[inline]
    #[must_use]
    pub fn scale_point(&self, point: Point) -> Point {
        point.scaled(self.get())
    }

    /// The DPI value corresponding to the current factor.
    #[inline]
    #[must_use]
    pub fn current_dpi(&self) -> u32 {
        dpi_for_factor(self.get())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::provider::{DetectError, FixedScale};

    struct FailingProvider;

    impl DisplayContextProvider for FailingProvider {
        fn detect(&self) -> Result<f64, DetectError> {
            Err(DetectError::Unavailable)
        }
    }

    fn counting_listener() -> (Arc<dyn ScaleListener>, Arc<AtomicU32>) {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let listener = listener_fn(move |_, _| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (listener, count)
    }

    #[test]
    fn starts_at_one() {
        assert_eq!(ScaleState::new().get(), 1.0);
    }

    #[test]
    fn update_clamps_low_and_high() {
        let state = ScaleState::new();
        state.update(0.1);
        assert_eq!(state.get(), 0.75);
        state.update(10.0);
        assert_eq!(state.get(), 3.0);
    }

    #[test]
    fn update_within_epsilon_is_noop() {
        let state = ScaleState::new();
        let (listener, count) = counting_listener();
        state.subscribe(&listener);

        state.update(2.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(state.get(), 2.0);

        state.update(2.0004);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(state.get(), 2.0);
    }

    #[test]
    fn listener_receives_old_and_new() {
        let state = ScaleState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let listener = listener_fn(move |old, new| {
            seen_clone.lock().unwrap().push((old, new));
        });
        state.subscribe(&listener);

        state.update(2.0);
        state.update(1.5);
        assert_eq!(*seen.lock().unwrap(), vec![(1.0, 2.0), (2.0, 1.5)]);
    }

    #[test]
    fn multiple_listeners_each_notified_once() {
        let state = ScaleState::new();
        let (a, count_a) = counting_listener();
        let (b, count_b) = counting_listener();
        state.subscribe(&a);
        state.subscribe(&b);

        state.update(2.0);
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_subscribe_returns_same_token_and_single_delivery() {
        let state = ScaleState::new();
        let (listener, count) = counting_listener();
        let first = state.subscribe(&listener);
        let second = state.subscribe(&listener);
        assert_eq!(first, second);
        assert_eq!(state.listener_count(), 1);

        state.update(2.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let state = ScaleState::new();
        let (listener, count) = counting_listener();
        let token = state.subscribe(&listener);

        state.update(2.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        state.unsubscribe(token);
        state.unsubscribe(token); // unknown by now; no-op
        state.update(1.25);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropped_listener_is_inert() {
        let state = ScaleState::new();
        let (listener, count) = counting_listener();
        state.subscribe(&listener);
        drop(listener);

        state.update(2.0); // must not crash or deliver
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(state.listener_count(), 0);
    }

    #[test]
    fn panicking_listener_does_not_stop_delivery() {
        let state = ScaleState::new();
        let bad = listener_fn(|_, _| panic!("listener failure"));
        let (good, count) = counting_listener();
        state.subscribe(&bad);
        state.subscribe(&good);

        state.update(2.0); // must return normally
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(state.get(), 2.0);
    }

    #[test]
    fn refresh_failure_keeps_factor() {
        let state = ScaleState::new();
        state.update(2.0);
        state.refresh(&FailingProvider);
        assert_eq!(state.get(), 2.0);
    }

    #[test]
    fn refresh_success_updates() {
        let state = ScaleState::new();
        state.refresh(&FixedScale(1.5));
        assert_eq!(state.get(), 1.5);
    }

    #[test]
    fn detect_uses_provider_and_clamps() {
        assert_eq!(ScaleState::detect(&FixedScale(2.0)).get(), 2.0);
        assert_eq!(ScaleState::detect(&FixedScale(50.0)).get(), 3.0);
        assert_eq!(ScaleState::detect(&FailingProvider).get(), 1.0);
    }

    #[test]
    fn clones_share_state() {
        let state = ScaleState::new();
        let other = state.clone();
        let (listener, count) = counting_listener();
        state.subscribe(&listener);

        other.update(2.0);
        assert_eq!(state.get(), 2.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn convenience_scaling() {
        let state = ScaleState::new();
        state.update(2.0);
        assert_eq!(state.scale(10), 20);
        assert_eq!(state.unscale(20), 10);
        assert_eq!(state.scale_f64(1.25), 2.5);
        assert_eq!(state.scale_size(Size::new(3, 4)), Size::new(6, 8));
        assert_eq!(
            state.scale_insets(Insets::uniform(5)),
            Insets::uniform(10)
        );
        assert_eq!(state.current_dpi(), 192);
    }

    #[test]
    fn concurrent_updates_stay_bounded_and_consistent() {
        let state = ScaleState::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let listener = listener_fn(move |old, new| {
            seen_clone.lock().unwrap().push((old, new));
        });
        state.subscribe(&listener);

        std::thread::scope(|scope| {
            for i in 0..4 {
                let state = state.clone();
                scope.spawn(move || {
                    for j in 0..50 {
                        state.update(0.5 + f64::from(i * 50 + j) * 0.05);
                    }
                });
            }
        });

        let bounds = state.bounds();
        assert!(bounds.contains(state.get()));
        for (old, new) in seen.lock().unwrap().iter() {
            assert!(bounds.contains(*old));
            assert!(bounds.contains(*new));
            assert!((old - new).abs() > SCALE_EPSILON);
        }
    }
}
