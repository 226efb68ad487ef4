//! Parsing of stored delivery URLs into signable download targets.
//!
//! Stored `download_file` values are opaque URLs produced by the asset
//! storage service, shaped like
//! `https://<host>/<account>/<kind>/<mode>/v<version>/<public id>.<ext>`.
//! [`parse_delivery_url`] recovers the parts needed to request a signed
//! download; a URL without a recognised delivery-mode segment yields `None`
//! and is served as-is.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Delivery-mode segment for publicly delivered assets.
pub const MODE_UPLOAD: &str = "upload";

/// Delivery-mode segment for assets behind authenticated delivery.
pub const MODE_AUTHENTICATED: &str = "authenticated";

/// Filename stem used when a title has no usable characters.
pub const FALLBACK_ATTACHMENT_STEM: &str = "download";

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z0-9]+)(?:\?.*)?$").expect("valid regex"));

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v([0-9]+)$").expect("valid regex"));

/// Storage resource class of a delivered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Image,
    /// Archives, documents, fonts and anything else.
    Raw,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
        }
    }

    /// Extension assumed when the URL carries none.
    pub fn default_extension(self) -> &'static str {
        match self {
            ResourceKind::Image => "png",
            ResourceKind::Raw => "zip",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signable parts of a stored delivery URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub resource_kind: ResourceKind,
    /// The anchor segment echoed back when signing (`upload` or `authenticated`).
    pub delivery_mode: String,
    /// Digits of a `v<digits>` segment directly after the anchor.
    pub version: Option<String>,
    /// Path after the anchor (and version), without extension or query.
    pub public_id: String,
    pub extension: String,
}

/// Parse a stored delivery URL.
///
/// Returns `None` when the URL has no `upload` or `authenticated` segment,
/// or nothing follows that segment.
pub fn parse_delivery_url(url: &str) -> Option<DeliveryTarget> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').collect();

    let anchor = segments
        .iter()
        .position(|s| *s == MODE_UPLOAD)
        .or_else(|| segments.iter().position(|s| *s == MODE_AUTHENTICATED))?;

    let resource_kind = if url.contains("/image/") {
        ResourceKind::Image
    } else {
        ResourceKind::Raw
    };

    let after_anchor = &segments[anchor + 1..];
    let (version, id_segments) = match after_anchor.first().and_then(|s| VERSION_RE.captures(s)) {
        Some(caps) => (Some(caps[1].to_string()), &after_anchor[1..]),
        None => (None, after_anchor),
    };

    let mut public_id = id_segments.join("/");
    let matched_extension = EXTENSION_RE.captures(url).map(|caps| caps[1].to_string());
    if let Some(ext) = &matched_extension {
        if let Some(stripped) = public_id.strip_suffix(&format!(".{ext}")) {
            public_id = stripped.to_string();
        }
    }
    if public_id.trim_matches('/').is_empty() {
        return None;
    }

    let extension = matched_extension
        .unwrap_or_else(|| resource_kind.default_extension().to_string());

    Some(DeliveryTarget {
        resource_kind,
        delivery_mode: segments[anchor].to_string(),
        version,
        public_id,
        extension,
    })
}

/// Reduce a title to an ASCII filename stem: each run of characters that are
/// not ASCII alphanumeric becomes a single underscore.
pub fn attachment_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut prev_underscore = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            stem.push('_');
            prev_underscore = true;
        }
    }

    if stem.chars().all(|c| c == '_') {
        FALLBACK_ATTACHMENT_STEM.to_string()
    } else {
        stem
    }
}

/// Full attachment filename for a title and extension.
pub fn attachment_name(title: &str, extension: &str) -> String {
    format!("{}.{}", attachment_stem(title), extension)
}
