//! Change notification for store consumers.

/// Which filter bound triggered a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    DateRange,
    CasualtyRange,
}

/// Receives a notification after every recomputation of the filtered view.
///
/// Implementations must be `Send + Sync` so a store wrapped in
/// [`crate::SharedGeoFilterStore`] can be driven from several threads.
/// Observers are called while the store is still borrowed, so they should
/// record the change and read the store afterwards.
pub trait ViewObserver: Send + Sync {
    /// Called with the store's new version token and the number of records
    /// in the recomputed view.
    fn view_changed(&self, version: u64, change: FilterChange, filtered: usize);
}
