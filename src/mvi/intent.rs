//! Base trait for intents (named state mutations).

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (selection, filter edits, form input)
/// - Results of simulated backend round-trips (entity created, status changed)
/// - Failures reported by store actions
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
