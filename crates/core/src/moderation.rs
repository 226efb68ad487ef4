//! Moderation state machine for catalog templates.
//!
//! ```text
//! draft ──► pending ──► approved ◄──► rejected
//! ```
//!
//! Authors create templates as `draft` or `pending`. Only moderators move a
//! template to `approved` or `rejected`, and may move it again later.
//! Approval stamps the publish date; leaving `approved` keeps whatever
//! publish date was set.

use crate::catalog::TemplateStatus;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Statuses a moderator may set.
pub const MODERATION_TARGETS: &[TemplateStatus] =
    &[TemplateStatus::Approved, TemplateStatus::Rejected];

/// Statuses an author may request at creation.
pub const CREATION_STATUSES: &[TemplateStatus] = &[TemplateStatus::Draft, TemplateStatus::Pending];

/// Whether a template with this state appears in the public catalog.
pub fn is_publicly_visible(status: TemplateStatus, is_deleted: bool) -> bool {
    status == TemplateStatus::Approved && !is_deleted
}

/// Validate a moderation target status.
pub fn validate_moderation_target(target: TemplateStatus) -> Result<(), CoreError> {
    if MODERATION_TARGETS.contains(&target) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid moderation status '{target}'. Must be one of: approved, rejected"
        )))
    }
}

/// Resolve the status a new template starts in.
pub fn initial_status(requested: Option<TemplateStatus>) -> Result<TemplateStatus, CoreError> {
    let status = requested.unwrap_or_default();
    if CREATION_STATUSES.contains(&status) {
        Ok(status)
    } else {
        Err(CoreError::Validation(format!(
            "Templates cannot be created as '{status}'. Must be one of: draft, pending"
        )))
    }
}

/// Publish date after moving to `target` at `now`.
pub fn publish_date_after(
    current: Option<Timestamp>,
    target: TemplateStatus,
    now: Timestamp,
) -> Option<Timestamp> {
    if target == TemplateStatus::Approved {
        Some(now)
    } else {
        current
    }
}
