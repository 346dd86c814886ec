//! Base trait for feature state.

/// Marker trait for state held by a store.
///
/// States should be:
/// - Fully formed (no uninitialized fields)
/// - Cheap enough to clone for snapshots
/// - Comparable (PartialEq drives change detection)
pub trait FeatureState: Clone + PartialEq + Send + Sync + 'static {}
