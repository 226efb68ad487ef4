//! Domain vocabulary for the design-template catalog.
//!
//! This crate performs no I/O. It holds the identifiers, error taxonomy,
//! enums, and pure helpers (slugs, validation, pagination, delivery URL
//! parsing) shared by the repository and service layers.

pub mod catalog;
pub mod delivery;
pub mod error;
pub mod moderation;
pub mod pagination;
pub mod slug;
pub mod types;
pub mod validation;
