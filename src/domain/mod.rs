//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (authentication types)
//! - `subscription` - Contacts, mailing lists, opt-in reconciliation and errors

pub mod foundation;
pub mod subscription;
