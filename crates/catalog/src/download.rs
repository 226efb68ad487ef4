//! Download link issuance.
//!
//! [`LinkSigner::issue`] turns a stored `download_file` URL into a
//! short-lived signed URL. A URL the storage parser does not recognise is
//! returned as-is, and so is any URL the signing provider fails to sign:
//! a download always resolves to some URL.

use std::sync::Arc;

use chrono::{Duration, Utc};
use designhub_core::delivery::{attachment_name, parse_delivery_url};
use designhub_core::types::{DbId, Timestamp};
use designhub_events::EventBus;
use serde::Serialize;

use crate::collaborators::{LinkSigningProvider, SignOptions};
use crate::side_effects::{effects, record_failure};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub url: String,
    /// `false` when `url` is the stored URL served unchanged.
    pub signed: bool,
    pub expires_at: Option<Timestamp>,
}

impl DownloadLink {
    fn unsigned(url: &str) -> Self {
        Self {
            url: url.to_string(),
            signed: false,
            expires_at: None,
        }
    }
}

pub struct LinkSigner {
    provider: Arc<dyn LinkSigningProvider>,
    ttl: Duration,
    events: Arc<EventBus>,
}

impl LinkSigner {
    pub fn new(
        provider: Arc<dyn LinkSigningProvider>,
        ttl_secs: i64,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            ttl: Duration::seconds(ttl_secs),
            events,
        }
    }

    /// Issue a download link for `download_file`, naming the attachment
    /// after `title`.
    pub async fn issue(&self, template_id: DbId, download_file: &str, title: &str) -> DownloadLink {
        let Some(target) = parse_delivery_url(download_file) else {
            tracing::debug!(template_id, "Unrecognised delivery URL, serving as-is");
            return DownloadLink::unsigned(download_file);
        };

        let expires_at = Utc::now() + self.ttl;
        let options = SignOptions {
            resource_kind: target.resource_kind,
            delivery_mode: target.delivery_mode,
            version: target.version,
            attachment: true,
            attachment_name: attachment_name(title, &target.extension),
            expires_at_epoch_secs: expires_at.timestamp(),
        };

        match self.provider.sign(&target.public_id, &options).await {
            Ok(url) => {
                tracing::info!(
                    template_id,
                    public_id = %target.public_id,
                    "Signed download link issued"
                );
                DownloadLink {
                    url,
                    signed: true,
                    expires_at: Some(expires_at),
                }
            }
            Err(err) => {
                record_failure(&self.events, effects::LINK_SIGNING, template_id, &err);
                DownloadLink::unsigned(download_file)
            }
        }
    }
}
