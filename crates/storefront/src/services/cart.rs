//! Cart store: the single owner of the visitor's cart.
//!
//! Every change follows the same path: apply to a copy of the cart, write the
//! copy to the storage slot, swap it in, re-render. A failed write leaves the
//! in-memory cart as it was, so memory never drifts from what was persisted.
//!
//! Checkout clears the cart after a confirmation delay on the async runtime.
//! The cart stays fully usable during that window; anything added then is
//! persisted normally and is wiped by the clear when it fires.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use althawqa_core::{AddOutcome, Cart, CartSummary, LineItem, Notification, Price, QuantityChange};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::config::CartSettings;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::notify::{CartRenderer, Notifier};
use crate::storage::KeyValueStore;
use crate::views::CartView;

/// Persisted, rendered cart.
///
/// Cheap to clone; clones share the same cart. Construct one per page (or
/// per test) with [`CartStore::open`].
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    cart: Mutex<Cart>,
    storage: Arc<dyn KeyValueStore>,
    renderer: Arc<dyn CartRenderer>,
    notifier: Arc<dyn Notifier>,
    settings: CartSettings,
}

/// What [`CartStore::checkout`] did.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Nothing to check out; an error notification was sent.
    EmptyCart,
    /// The order total was reported and the clear is scheduled.
    Scheduled(PendingCheckout),
}

/// A checkout waiting for its confirmation delay.
///
/// Dropping this does not cancel the clear.
#[derive(Debug)]
pub struct PendingCheckout {
    total: u64,
    handle: JoinHandle<Result<()>>,
}

impl PendingCheckout {
    /// Order total at the moment checkout started.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Wait until the cart has been cleared and persisted.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the empty cart could not be written, or
    /// `AppError::Internal` if the checkout task panicked.
    pub async fn confirmed(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| AppError::Internal(format!("checkout task failed: {e}")))?
    }
}

impl CartStore {
    /// Load the cart from `storage` and render it once.
    ///
    /// A missing slot, an unreadable backend or malformed content all start
    /// the visitor with an empty cart.
    pub fn open(
        settings: CartSettings,
        storage: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn CartRenderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = load_cart(storage.as_ref(), &settings.storage_key);
        tracing::debug!(lines = cart.len(), key = %settings.storage_key, "Cart loaded");

        let store = Self {
            inner: Arc::new(CartStoreInner {
                cart: Mutex::new(cart),
                storage,
                renderer,
                notifier,
                settings,
            }),
        };
        let view = store.view();
        store.inner.renderer.render(&view);
        store
    }

    /// Add one unit of a product, appending it if the name is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted; the cart
    /// is left unchanged in that case.
    #[instrument(skip(self, description, image))]
    pub fn add_item(
        &self,
        name: &str,
        price: u64,
        description: &str,
        image: &str,
    ) -> Result<AddOutcome> {
        let (outcome, changed) = self.commit(|cart| cart.add(name, price, description, image))?;
        if !changed {
            tracing::debug!(?outcome, "Quantity already at its limit");
            return Ok(outcome);
        }

        add_breadcrumb("cart", "Added item", Some(&[("name", name)]));
        tracing::info!(?outcome, "Item added to cart");
        self.notify(Notification::success(format!("{name} added to the cart")));
        Ok(outcome)
    }

    /// Remove the line at `index`.
    ///
    /// An out-of-range index is ignored and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&self, index: usize) -> Result<Option<LineItem>> {
        let (Some(removed), _) = self.commit(|cart| cart.remove(index))? else {
            tracing::debug!("Ignoring remove for unknown cart row");
            return Ok(None);
        };

        add_breadcrumb("cart", "Removed item", Some(&[("name", removed.name.as_str())]));
        self.notify(Notification::info(format!(
            "{} removed from the cart",
            removed.name
        )));
        Ok(Some(removed))
    }

    /// Change the quantity of the line at `index` by `delta`.
    ///
    /// A quantity that drops to zero or below removes the line. An
    /// out-of-range index is ignored and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, index: usize, delta: i64) -> Result<Option<QuantityChange>> {
        let (Some((name, change)), changed) = self.commit(|cart| {
            let name = cart.get(index)?.name.clone();
            cart.update_quantity(index, delta).map(|change| (name, change))
        })?
        else {
            tracing::debug!("Ignoring quantity change for unknown cart row");
            return Ok(None);
        };
        if !changed {
            return Ok(Some(change));
        }

        let message = match &change {
            QuantityChange::Updated(quantity) => format!("{name} quantity updated to {quantity}"),
            QuantityChange::Removed(_) => format!("{name} removed from the cart"),
        };
        add_breadcrumb("cart", "Changed quantity", Some(&[("name", name.as_str())]));
        self.notify(Notification::info(message));
        Ok(Some(change))
    }

    /// Start checkout.
    ///
    /// On an empty cart this sends an error notification and changes nothing.
    /// Otherwise the total is reported and, after the configured delay, the
    /// cart is cleared, persisted, re-rendered and a confirmation is sent.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` when called outside a Tokio runtime.
    #[instrument(skip(self))]
    pub fn checkout(&self) -> Result<CheckoutOutcome> {
        let total = {
            let cart = self.lock();
            (!cart.is_empty()).then(|| cart.total())
        };

        let Some(total) = total else {
            tracing::info!("Checkout attempted with an empty cart");
            self.notify(Notification::error("Your cart is empty"));
            return Ok(CheckoutOutcome::EmptyCart);
        };

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::Internal(format!("checkout needs an async runtime: {e}")))?;

        add_breadcrumb("cart", "Checkout started", None);
        tracing::info!(total, "Checkout started");
        self.notify(Notification::info(format!(
            "Redirecting you to payment. Total: {}",
            self.format_price(total)
        )));

        let store = self.clone();
        let delay = self.inner.settings.checkout_delay;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::task::spawn_blocking(move || store.finish_checkout())
                .await
                .map_err(|e| AppError::Internal(format!("checkout clear failed: {e}")))?
        });

        Ok(CheckoutOutcome::Scheduled(PendingCheckout { total, handle }))
    }

    /// Fresh summary of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.lock().summary()
    }

    /// Fresh view of the current cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        self.view_of(&self.lock())
    }

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Runs on the blocking pool: it holds the cart lock across the write.
    fn finish_checkout(&self) -> Result<()> {
        let view = {
            let mut cart = self.lock();
            let emptied = Cart::new();
            if let Err(e) = self.persist(&emptied) {
                drop(cart);
                self.notify(Notification::error(
                    "We could not complete your order. Please try again.",
                ));
                return Err(e);
            }
            *cart = emptied;
            self.view_of(&cart)
        };
        self.inner.renderer.render(&view);

        add_breadcrumb("cart", "Order confirmed", None);
        tracing::info!("Checkout confirmed, cart cleared");
        self.notify(Notification::success(
            "Thank you for your order! It will be ready soon.",
        ));
        Ok(())
    }

    /// Apply `apply` to a copy of the cart, persist it, swap it in, re-render.
    ///
    /// Returns the outcome and whether the cart changed. If the copy comes
    /// back unchanged nothing is written or rendered.
    fn commit<T>(&self, apply: impl FnOnce(&mut Cart) -> T) -> Result<(T, bool)> {
        let (outcome, view) = {
            let mut cart = self.lock();
            let mut draft = cart.clone();
            let outcome = apply(&mut draft);
            if draft == *cart {
                return Ok((outcome, false));
            }
            self.persist(&draft)?;
            *cart = draft;
            (outcome, self.view_of(&cart))
        };
        self.inner.renderer.render(&view);
        Ok((outcome, true))
    }

    fn persist(&self, cart: &Cart) -> Result<()> {
        let json = cart.to_json().map_err(|e| AppError::from(e).captured())?;
        self.inner
            .storage
            .set(&self.inner.settings.storage_key, &json)
            .map_err(|e| AppError::from(e).captured())
    }

    fn view_of(&self, cart: &Cart) -> CartView {
        CartView::from_summary(&cart.summary(), self.inner.settings.currency)
    }

    fn format_price(&self, amount: u64) -> String {
        Price::new(amount, self.inner.settings.currency).display()
    }

    fn notify(&self, notification: Notification) {
        self.inner.notifier.notify(notification);
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read the cart slot, falling back to an empty cart on any failure.
fn load_cart(storage: &dyn KeyValueStore, key: &str) -> Cart {
    match storage.get(key) {
        Ok(Some(json)) => match Cart::from_json_partial(&json) {
            Ok((cart, 0)) => cart,
            Ok((cart, skipped)) => {
                tracing::warn!(skipped, key, "Dropped unreadable cart lines");
                cart
            }
            Err(e) => {
                tracing::warn!(error = %e, key, "Stored cart is malformed, starting empty");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, key, "Could not read stored cart, starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use althawqa_core::Severity;

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    struct Harness {
        store: CartStore,
        storage: Arc<MemoryStore>,
        notes: Arc<Mutex<Vec<Notification>>>,
        views: Arc<Mutex<Vec<CartView>>>,
    }

    impl Harness {
        fn new(storage: MemoryStore) -> Self {
            Self::with_settings(storage, CartSettings::default())
        }

        fn with_settings(storage: MemoryStore, settings: CartSettings) -> Self {
            let storage = Arc::new(storage);
            let notes = Arc::new(Mutex::new(Vec::new()));
            let views = Arc::new(Mutex::new(Vec::new()));

            let sink = Arc::clone(&notes);
            let notifier = move |n: Notification| sink.lock().unwrap().push(n);
            let sink = Arc::clone(&views);
            let renderer = move |v: &CartView| sink.lock().unwrap().push(v.clone());

            let store = CartStore::open(
                settings,
                storage.clone(),
                Arc::new(renderer),
                Arc::new(notifier),
            );
            Self {
                store,
                storage,
                notes,
                views,
            }
        }

        fn persisted(&self) -> Cart {
            Cart::from_json(&self.storage.get("restaurantCart").unwrap().unwrap()).unwrap()
        }

        fn notes(&self) -> Vec<Notification> {
            self.notes.lock().unwrap().clone()
        }

        fn render_count(&self) -> usize {
            self.views.lock().unwrap().len()
        }

        fn last_view(&self) -> CartView {
            self.views.lock().unwrap().last().cloned().unwrap()
        }
    }

    fn add_pizza(h: &Harness) {
        h.store
            .add_item("Pizza", 40, "Stone-baked", "img/pizza.jpg")
            .unwrap();
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    /// Accepts a fixed number of writes, then fails every one after.
    struct FlakyStore {
        inner: MemoryStore,
        writes_left: AtomicUsize,
    }

    impl FlakyStore {
        fn new(writes: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                writes_left: AtomicUsize::new(writes),
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            let allowed = self
                .writes_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if !allowed {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn flaky_store(writes: usize) -> (CartStore, Arc<FlakyStore>, Arc<Mutex<Vec<Notification>>>) {
        let storage = Arc::new(FlakyStore::new(writes));
        let notes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&notes);
        let store = CartStore::open(
            CartSettings::default(),
            storage.clone(),
            Arc::new(|_: &CartView| {}),
            Arc::new(move |n: Notification| sink.lock().unwrap().push(n)),
        );
        (store, storage, notes)
    }

    #[test]
    fn test_open_renders_initial_state() {
        let h = Harness::new(MemoryStore::new());
        assert_eq!(h.render_count(), 1);
        assert!(h.last_view().is_empty());
        assert!(h.notes().is_empty());
    }

    #[test]
    fn test_open_restores_persisted_cart() {
        let h = Harness::new(MemoryStore::with_entries([(
            "restaurantCart",
            r#"[{"name":"Kabsa","price":55,"description":"","image":"","quantity":2}]"#,
        )]));
        assert_eq!(h.store.summary().total, 110);
        assert_eq!(h.last_view().item_count, 2);
    }

    #[test]
    fn test_open_with_malformed_slot_starts_empty() {
        let h = Harness::new(MemoryStore::with_entries([("restaurantCart", "{oops")]));
        assert!(h.store.snapshot().is_empty());
    }

    #[test]
    fn test_open_keeps_lines_next_to_unreadable_ones() {
        let h = Harness::new(MemoryStore::with_entries([(
            "restaurantCart",
            r#"[{"name":"Tea","price":5,"quantity":2},{"name":"Old","quantity":1},{"quantity":3}]"#,
        )]));

        let cart = h.store.snapshot();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].name, "Tea");
        assert_eq!(cart.items()[1].price, 0);
        assert_eq!(h.store.summary().total, 10);
        assert_eq!(h.last_view().item_count, 3);
    }

    #[test]
    fn test_open_with_unreadable_storage_starts_empty() {
        struct BrokenStore;
        impl KeyValueStore for BrokenStore {
            fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
                Err(StorageError::Unavailable("disk gone".to_string()))
            }
            fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
                Ok(())
            }
            fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
                Ok(())
            }
        }

        let store = CartStore::open(
            CartSettings::default(),
            Arc::new(BrokenStore),
            Arc::new(|_: &CartView| {}),
            Arc::new(|_: Notification| {}),
        );
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_add_twice_is_one_line() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        add_pizza(&h);

        let cart = h.store.snapshot();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(h.persisted(), cart);
    }

    #[test]
    fn test_add_at_quantity_limit_is_silent() {
        let h = Harness::new(MemoryStore::with_entries([(
            "restaurantCart",
            r#"[{"name":"Tea","price":5,"quantity":4294967295}]"#,
        )]));
        let renders = h.render_count();

        let outcome = h.store.add_item("Tea", 5, "", "").unwrap();
        assert_eq!(outcome, AddOutcome::Incremented(u32::MAX));
        assert!(h.notes().is_empty());
        assert_eq!(h.render_count(), renders);
        assert_eq!(h.store.snapshot().items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_add_notifies_success_and_renders() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);

        let notes = h.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Success);
        assert!(notes[0].message.contains("Pizza"));
        assert_eq!(h.render_count(), 2);
        assert_eq!(h.last_view().total, "40 SAR");
    }

    #[test]
    fn test_worked_example() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        add_pizza(&h);
        assert_eq!(h.store.snapshot().items()[0].quantity, 2);

        assert_eq!(
            h.store.update_quantity(0, 1).unwrap(),
            Some(QuantityChange::Updated(3))
        );
        assert_eq!(h.store.summary().total, 120);

        h.store.remove_item(0).unwrap();
        assert!(h.store.snapshot().is_empty());
        assert!(h.persisted().is_empty());

        let before = h.notes().len();
        assert!(matches!(
            h.store.checkout().unwrap(),
            CheckoutOutcome::EmptyCart
        ));
        let notes = h.notes();
        assert_eq!(notes.len(), before + 1);
        assert_eq!(notes.last().unwrap().severity, Severity::Error);
        assert!(h.store.snapshot().is_empty());
    }

    #[test]
    fn test_remove_out_of_range_is_silent() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        let renders = h.render_count();
        let notes = h.notes().len();

        assert!(h.store.remove_item(3).unwrap().is_none());
        assert_eq!(h.store.snapshot().len(), 1);
        assert_eq!(h.render_count(), renders);
        assert_eq!(h.notes().len(), notes);
    }

    #[test]
    fn test_update_out_of_range_is_silent() {
        let h = Harness::new(MemoryStore::new());
        assert!(h.store.update_quantity(0, 1).unwrap().is_none());
        assert!(h.storage.get("restaurantCart").unwrap().is_none());
    }

    #[test]
    fn test_decrement_to_zero_removes_and_persists() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        add_pizza(&h);

        let change = h.store.update_quantity(0, -2).unwrap().unwrap();
        assert!(matches!(change, QuantityChange::Removed(_)));
        assert!(h.persisted().is_empty());
        assert!(h.last_view().is_empty());
        assert!(h.notes().last().unwrap().message.contains("removed"));
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let h = Harness::new(MemoryStore::new());
        let ops: [(&str, i64); 6] = [
            ("add:Tea", 0),
            ("add:Mandi", 0),
            ("inc", 1),
            ("add:Tea", 0),
            ("dec", -1),
            ("rm", 0),
        ];
        for (op, delta) in ops {
            match op.split_once(':') {
                Some((_, name)) => {
                    let price = if name == "Tea" { 5 } else { 60 };
                    h.store.add_item(name, price, "", "").unwrap();
                }
                None if op == "rm" => {
                    h.store.remove_item(0).unwrap();
                }
                None => {
                    h.store.update_quantity(1, delta).unwrap();
                }
            }
            let fresh: u64 = h
                .store
                .snapshot()
                .items()
                .iter()
                .map(|i| i.price * u64::from(i.quantity))
                .sum();
            assert_eq!(h.store.summary().total, fresh);
            assert_eq!(h.persisted().total(), fresh);
        }
    }

    #[test]
    fn test_write_failure_keeps_cart_unchanged() {
        let store = CartStore::open(
            CartSettings::default(),
            Arc::new(ReadOnlyStore),
            Arc::new(|_: &CartView| {}),
            Arc::new(|_: Notification| {}),
        );

        let err = store.add_item("Pizza", 40, "", "").unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Unavailable(_))));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_remove_write_failure_keeps_cart_unchanged() {
        let (store, _storage, notes) = flaky_store(1);
        store.add_item("Pizza", 40, "", "").unwrap();
        let before = store.snapshot();

        let err = store.remove_item(0).unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Unavailable(_))));
        assert_eq!(store.snapshot(), before);
        assert_eq!(notes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_update_write_failure_keeps_cart_unchanged() {
        let (store, storage, _notes) = flaky_store(1);
        store.add_item("Pizza", 40, "", "").unwrap();

        assert!(store.update_quantity(0, 1).is_err());
        assert!(store.update_quantity(0, -1).is_err());
        assert_eq!(store.snapshot().items()[0].quantity, 1);

        let stored = storage.get("restaurantCart").unwrap().unwrap();
        assert_eq!(Cart::from_json(&stored).unwrap(), store.snapshot());
    }

    #[test]
    fn test_checkout_outside_runtime_is_an_error() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        let notes = h.notes().len();

        assert!(matches!(h.store.checkout(), Err(AppError::Internal(_))));
        assert_eq!(h.notes().len(), notes);
        assert_eq!(h.store.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_reports_total_then_clears() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);
        h.store.update_quantity(0, 2).unwrap();

        let CheckoutOutcome::Scheduled(pending) = h.store.checkout().unwrap() else {
            panic!("expected a scheduled checkout");
        };
        assert_eq!(pending.total(), 120);
        let info = h.notes().last().cloned().unwrap();
        assert_eq!(info.severity, Severity::Info);
        assert!(info.message.contains("120 SAR"));

        // Still intact until the delay elapses.
        assert_eq!(h.persisted().total(), 120);

        pending.confirmed().await.unwrap();
        assert!(h.store.snapshot().is_empty());
        assert!(h.persisted().is_empty());
        assert!(h.last_view().is_empty());
        assert_eq!(h.notes().last().unwrap().severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutations_during_checkout_window_are_persisted_then_cleared() {
        let h = Harness::new(MemoryStore::new());
        add_pizza(&h);

        let CheckoutOutcome::Scheduled(pending) = h.store.checkout().unwrap() else {
            panic!("expected a scheduled checkout");
        };

        h.store.add_item("Tea", 5, "", "").unwrap();
        assert_eq!(h.persisted().len(), 2);

        pending.confirmed().await.unwrap();
        assert!(h.persisted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_checkout_still_fires() {
        let settings = CartSettings {
            checkout_delay: Duration::from_secs(2),
            ..CartSettings::default()
        };
        let h = Harness::with_settings(MemoryStore::new(), settings);
        add_pizza(&h);

        drop(h.store.checkout().unwrap());
        tokio::time::sleep(Duration::from_millis(2001)).await;

        // The clear runs on the blocking pool; give it a moment to land.
        for _ in 0..200 {
            if h.store.snapshot().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(h.store.snapshot().is_empty());
        assert!(h.persisted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_clear_failure_notifies_and_keeps_cart() {
        let (store, storage, notes) = flaky_store(1);
        store.add_item("Pizza", 40, "", "").unwrap();

        let CheckoutOutcome::Scheduled(pending) = store.checkout().unwrap() else {
            panic!("expected a scheduled checkout");
        };
        let err = pending.confirmed().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Unavailable(_))));

        assert_eq!(store.snapshot().len(), 1);
        let stored = storage.get("restaurantCart").unwrap().unwrap();
        assert_eq!(Cart::from_json(&stored).unwrap().len(), 1);

        let notes = notes.lock().unwrap();
        let severities: Vec<_> = notes.iter().map(|n| n.severity).collect();
        assert_eq!(
            severities,
            [Severity::Success, Severity::Info, Severity::Error]
        );
        assert!(notes[2].message.contains("could not complete your order"));
    }

    #[tokio::test]
    async fn test_empty_checkout_schedules_nothing() {
        let settings = CartSettings {
            checkout_delay: Duration::ZERO,
            ..CartSettings::default()
        };
        let h = Harness::with_settings(MemoryStore::new(), settings);

        assert!(matches!(
            h.store.checkout().unwrap(),
            CheckoutOutcome::EmptyCart
        ));
        tokio::task::yield_now().await;

        assert!(h.storage.get("restaurantCart").unwrap().is_none());
        assert_eq!(h.notes().len(), 1);
        assert_eq!(h.render_count(), 1);
    }
}
