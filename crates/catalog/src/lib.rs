//! Design-template catalog services.
//!
//! - [`catalog::CatalogService`]: create, look up, list, update and
//!   soft-delete templates, plus counters and download links.
//! - [`engagement::EngagementCoordinator`]: the like/unlike toggle.
//! - [`moderation::ModerationWorkflow`]: admin status transitions.
//! - [`category_accounting::CategoryAccounting`]: category product counts.
//! - [`download::LinkSigner`]: signed download URLs with unsigned fallback.
//!
//! Persistence goes through the [`store::TemplateStore`] trait; everything
//! outside the catalog is reached through [`collaborators`].
//! [`state::CatalogState`] wires the services together.

pub mod catalog;
pub mod category_accounting;
pub mod collaborators;
pub mod config;
pub mod download;
pub mod engagement;
pub mod error;
pub mod moderation;
pub mod query;
pub mod side_effects;
pub mod signing;
pub mod state;
pub mod store;

pub use catalog::{CatalogService, TemplateView};
pub use engagement::{EngagementCoordinator, LikeToggle};
pub use error::{CatalogError, CatalogResult};
pub use moderation::ModerationWorkflow;
pub use state::CatalogState;
