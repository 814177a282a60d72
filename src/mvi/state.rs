//! Base trait for store state in MVI architecture.

/// Marker trait for store state objects.
///
/// States should be:
/// - Cloneable (subscribers receive snapshots)
/// - Comparable (PartialEq for detecting changes)
/// - Defaultable (the empty store)
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}
