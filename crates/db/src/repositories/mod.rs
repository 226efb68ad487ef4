//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod notification_repo;
pub mod template_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub use category_repo::CategoryRepo;
pub use notification_repo::NotificationRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
pub use wishlist_repo::WishlistRepo;
