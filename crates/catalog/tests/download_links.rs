//! Download link issuance and fallback.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::{create_input, drain, failed_effects, Failures, Harness, AUTHOR};
use designhub_catalog::CatalogError;
use designhub_core::delivery::ResourceKind;
use designhub_core::error::CoreError;

const STORED: &str = "https://res.example.com/acme/raw/upload/v12345/folder/file.zip";

async fn with_file(h: &Harness, title: &str, url: Option<&str>) -> i64 {
    let mut input = create_input(title);
    input.download_file = url.map(str::to_string);
    h.publish(input).await.template.id
}

#[tokio::test]
async fn test_storage_url_is_signed_with_parsed_parts() {
    let h = Harness::new();
    let id = with_file(&h, "Modern UI Kit", Some(STORED)).await;
    let before = Utc::now();

    let link = h.catalog.issue_download_link(id).await.unwrap();
    assert!(link.signed);
    assert!(link.url.starts_with("https://signed.example.com/folder/file?"));

    let expires_at = link.expires_at.expect("signed links expire");
    assert!(expires_at >= before + Duration::seconds(3600));
    assert!(expires_at <= Utc::now() + Duration::seconds(3600));

    let requests = h.signer.requests();
    assert_eq!(requests.len(), 1);
    let (public_id, options) = &requests[0];
    assert_eq!(public_id, "folder/file");
    assert_eq!(options.resource_kind, ResourceKind::Raw);
    assert_eq!(options.delivery_mode, "upload");
    assert_eq!(options.version.as_deref(), Some("12345"));
    assert!(options.attachment);
    assert_eq!(options.attachment_name, "Modern_UI_Kit.zip");
    assert_eq!(options.expires_at_epoch_secs, expires_at.timestamp());
}

#[tokio::test]
async fn test_image_url_without_extension_defaults_to_png() {
    let h = Harness::new();
    let id = with_file(
        &h,
        "Hero Shot",
        Some("https://res.example.com/acme/image/authenticated/covers/hero"),
    )
    .await;

    h.catalog.issue_download_link(id).await.unwrap();
    let (public_id, options) = &h.signer.requests()[0];
    assert_eq!(public_id, "covers/hero");
    assert_eq!(options.resource_kind, ResourceKind::Image);
    assert_eq!(options.delivery_mode, "authenticated");
    assert_eq!(options.version, None);
    assert_eq!(options.attachment_name, "Hero_Shot.png");
}

#[tokio::test]
async fn test_unrecognised_url_is_returned_unchanged() {
    let h = Harness::new();
    let url = "https://cdn.example.com/files/kit.zip";
    let id = with_file(&h, "Plain Kit", Some(url)).await;

    let link = h.catalog.issue_download_link(id).await.unwrap();
    assert_eq!(link.url, url);
    assert!(!link.signed);
    assert_eq!(link.expires_at, None);
    assert!(h.signer.requests().is_empty());
}

#[tokio::test]
async fn test_signing_failure_falls_back_to_stored_url() {
    let h = Harness::failing(Failures {
        signer: true,
        ..Default::default()
    });
    let id = with_file(&h, "Fallback Kit", Some(STORED)).await;
    let mut rx = h.events.subscribe();

    let link = h.catalog.issue_download_link(id).await.unwrap();
    assert_eq!(link.url, STORED);
    assert!(!link.signed);
    assert_eq!(
        failed_effects(&drain(&mut rx)),
        vec!["download.sign_link".to_string()]
    );
}

#[tokio::test]
async fn test_download_counts_a_view() {
    let h = Harness::new();
    let id = with_file(&h, "Viewed Kit", Some(STORED)).await;

    h.catalog.issue_download_link(id).await.unwrap();
    h.catalog.issue_download_link(id).await.unwrap();
    let t = h.catalog.get_by_id(id).await.unwrap().template;
    assert_eq!(t.view_count, 2);
}

#[tokio::test]
async fn test_missing_file_or_template() {
    let h = Harness::new();
    let id = with_file(&h, "Empty Kit", None).await;
    let err = h.catalog.issue_download_link(id).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));

    let gone = with_file(&h, "Gone Kit", Some(STORED)).await;
    h.catalog.soft_delete(gone, AUTHOR, false).await.unwrap();
    let err = h.catalog.issue_download_link(gone).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::NotFound { .. }));
}
