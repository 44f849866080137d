//! Thread-safe handle around a [`GeoFilterStore`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use traffic_map_accident_models::{AccidentView, SeverityCount};

use crate::observer::ViewObserver;
use crate::store::GeoFilterStore;

/// Cloneable handle that serializes access to one store.
///
/// A bound update and its recomputation happen under a single lock, so
/// readers never observe a view that mixes old and new bounds.
#[derive(Clone)]
pub struct SharedGeoFilterStore {
    inner: Arc<Mutex<GeoFilterStore>>,
}

impl SharedGeoFilterStore {
    #[must_use]
    pub fn new(store: GeoFilterStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn set_date_range(&self, start_millis: i64, end_millis: i64) {
        self.lock().set_date_range(start_millis, end_millis);
    }

    pub fn set_casualty_range(&self, start: u32, end: u32) {
        self.lock().set_casualty_range(start, end);
    }

    /// Copies the filtered view and its severity counts together, along with
    /// the version they belong to.
    #[must_use]
    pub fn snapshot(&self) -> (u64, Vec<AccidentView>, Vec<SeverityCount>) {
        let store = self.lock();
        (
            store.version(),
            store.accident_view(),
            store.severity_counts().to_vec(),
        )
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.lock().version()
    }

    pub fn subscribe(&self, observer: Arc<dyn ViewObserver>) {
        self.lock().subscribe(observer);
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut GeoFilterStore) -> R) -> R {
        f(&mut self.lock())
    }

    // A panicking observer must not wedge every other caller.
    fn lock(&self) -> MutexGuard<'_, GeoFilterStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
