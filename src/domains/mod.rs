//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: tools.

pub mod tools;
