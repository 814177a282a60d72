//! Model-View-Intent (MVI) primitives shared by every feature store.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Subscribers
//!    ↑                               │
//!    └───────────────────────────────┘
//! ```
//!
//! - **State**: plain data snapshot of one feature (collections, filters, flags)
//! - **Intent**: closed union of every mutation the feature supports
//! - **Reducer**: pure function that folds an intent into a new state
//! - **Store**: owns the current state and publishes changes to subscribers

mod intent;
mod reducer;
mod state;
mod store;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::StoreState;
pub use store::Store;
