//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `category`, `user` and `notification` only carry what the catalog's
//! collaborator adapters touch.

pub mod category;
pub mod notification;
pub mod template;
pub mod user;
