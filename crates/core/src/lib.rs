//! Shared leaf crate for the account service.
//!
//! This crate has zero internal dependencies so it can be used by the
//! store layer, the service layer, and any future CLI or transport
//! tooling without import cycles.

pub mod authz;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
