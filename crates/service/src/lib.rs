//! Credential and authorization core of the account service.
//!
//! Exposes plain async operations over an [`AccountStore`] so a thin
//! transport layer (HTTP, RPC, CLI) can call them directly. Transport
//! concerns -- routing, request marshaling, status-code mapping -- live
//! with the caller.
//!
//! [`AccountStore`]: accountd_db::store::AccountStore

pub mod auth;
pub mod service;

pub use service::{AccountService, AdminUpdate, ListParams};
