//! Persistence layer: the account entity model, the [`AccountStore`]
//! contract, and its PostgreSQL and in-memory implementations.
//!
//! [`AccountStore`]: store::AccountStore

pub mod models;
pub mod store;
