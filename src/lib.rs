//! tradelog — single-user trade journal.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
#[cfg(feature = "sqlite")]
pub mod cli;
