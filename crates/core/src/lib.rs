//! Driver core for RPC load tests against a ledger node.
//!
//! A [`Sampler`](prelude::Sampler) declares its parameters and resolves the
//! identities it needs once per test plan; the [`TestPlan`](prelude::TestPlan)
//! then fans the bound sampler out over concurrent virtual users, each owning
//! its own RPC connection, and records one [`Sample`](prelude::Sample) per
//! iteration.

mod logic;
mod models;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::logic::*;
    pub use crate::models::*;

    // Third Party Crates
    pub use async_trait::async_trait;
    pub use bon::Builder;
    pub use derive_more::{AsRef, From};
    pub use getset::Getters;
    pub use indexmap::{IndexMap, IndexSet};
    pub use log::{debug, error, info, warn};
    pub use tokio_util::sync::CancellationToken;
    pub use url::Url;
}
