//! Campaign management core: A/B testing, drafts and the campaign wizard,
//! each exposed as an observable store over a simulated backend.

pub mod abtest;
pub mod backend;
pub mod cli;
pub mod config;
pub mod drafts;
pub mod error;
pub mod logging;
pub mod mvi;
pub mod persist;
pub mod wizard;
