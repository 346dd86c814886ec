//! Base trait for actions in the store runtime.

use std::fmt::Debug;

/// Marker trait for action values.
///
/// Actions represent:
/// - User input (tab selected, query typed)
/// - Lifecycle notices (screen appeared)
/// - Effect results (network responses, persistence outcomes)
///
/// Every feature declares one closed enum of actions. Parents embed child
/// actions under a dedicated variant so the root can route them.
pub trait Action: Clone + Debug + Send + 'static {}
