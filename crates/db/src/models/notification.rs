use designhub_core::catalog::TemplateType;
use designhub_core::types::DbId;

/// Notification kind written for template likes.
pub const KIND_LIKE: &str = "like";

/// Insert payload for a like notification.
#[derive(Debug, Clone)]
pub struct NewLikeNotification {
    /// Recipient.
    pub user_id: DbId,
    pub actor_name: String,
    pub product_id: DbId,
    pub product_name: String,
    pub product_type: TemplateType,
}
