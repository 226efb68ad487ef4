//! Create, lookup, update and soft-delete through `CatalogService`.

mod common;

use assert_matches::assert_matches;
use common::{
    create_input, drain, failed_effects, CategoryCall, Failures, Harness, AUTHOR, CATEGORY,
};
use designhub_catalog::CatalogError;
use designhub_core::catalog::TemplateStatus;
use designhub_core::error::CoreError;
use designhub_db::models::template::UpdateTemplate;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_derives_unique_slugs_for_identical_titles() {
    let h = Harness::new();
    let a = h.create("Modern UI Kit").await;
    let b = h.create("Modern UI Kit").await;

    assert!(a.template.slug.starts_with("modern-ui-kit-"));
    assert!(b.template.slug.starts_with("modern-ui-kit-"));
    assert_ne!(a.template.slug, b.template.slug);
}

#[tokio::test]
async fn test_create_defaults_to_pending_without_publish_date() {
    let h = Harness::new();
    let view = h.create("Landing Page").await;

    assert_eq!(view.template.status, TemplateStatus::Pending);
    assert_eq!(view.template.publish_date, None);
    assert_eq!(view.template.author_id, AUTHOR);
    assert_eq!(view.template.like_count, 0);
    assert_eq!(view.category.map(|c| c.id), Some(CATEGORY));
}

#[tokio::test]
async fn test_create_as_draft_and_reject_approved_request() {
    let h = Harness::new();

    let mut draft = create_input("Draft Kit");
    draft.status = Some(TemplateStatus::Draft);
    let view = h.catalog.create(AUTHOR, draft).await.unwrap();
    assert_eq!(view.template.status, TemplateStatus::Draft);

    let mut approved = create_input("Sneaky Kit");
    approved.status = Some(TemplateStatus::Approved);
    let err = h.catalog.create(AUTHOR, approved).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn test_create_with_taken_explicit_slug_is_conflict() {
    let h = Harness::new();
    let mut first = create_input("Icon Set");
    first.slug = Some("icon-set".to_string());
    h.catalog.create(AUTHOR, first).await.unwrap();

    let mut second = create_input("Another Icon Set");
    second.slug = Some("icon-set".to_string());
    let err = h.catalog.create(AUTHOR, second).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Conflict(_)));
    assert_eq!(h.categories.calls(), vec![CategoryCall::Increment(CATEGORY)]);
}

#[tokio::test]
async fn test_create_rejects_negative_amounts_and_bad_slugs() {
    let h = Harness::new();

    let mut negative = create_input("Cheap Kit");
    negative.offer_price = Some(-1.0);
    let err = h.catalog.create(AUTHOR, negative).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));

    let mut bad_slug = create_input("Loud Kit");
    bad_slug.slug = Some("Not A Slug!".to_string());
    let err = h.catalog.create(AUTHOR, bad_slug).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));

    assert_eq!(h.store.len().await, 0);
    assert!(h.categories.calls().is_empty());
}

#[tokio::test]
async fn test_create_increments_category_once() {
    let h = Harness::new();
    h.create("Dashboard").await;
    assert_eq!(h.categories.calls(), vec![CategoryCall::Increment(CATEGORY)]);
}

#[tokio::test]
async fn test_category_failure_does_not_fail_create() {
    let h = Harness::failing(Failures {
        categories: true,
        ..Default::default()
    });
    let mut rx = h.events.subscribe();

    let view = h.create("Resilient Kit").await;
    assert!(view.category.is_none());

    let events = drain(&mut rx);
    assert_eq!(
        failed_effects(&events),
        vec!["category.increment_product_count".to_string()]
    );
    assert!(events.iter().any(|e| e.event_type == "template.created"));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_by_slug_only_finds_published_and_counts_views() {
    let h = Harness::new();
    let pending = h.create("Pending Kit").await;
    let err = h.catalog.get_by_slug(&pending.template.slug).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::SlugNotFound { .. }));

    let published = h.publish(create_input("Live Kit")).await;
    let found = h.catalog.get_by_slug(&published.template.slug).await.unwrap();
    assert_eq!(found.template.id, published.template.id);
    assert_eq!(found.category.map(|c| c.slug), Some(format!("category-{CATEGORY}")));

    let audit = h.catalog.get_by_id(published.template.id).await.unwrap();
    assert_eq!(audit.template.view_count, 1);
}

#[tokio::test]
async fn test_get_by_id_missing_is_not_found() {
    let h = Harness::new();
    let err = h.catalog.get_by_id(404).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::NotFound { id: 404, .. }));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_update_by_stranger_is_forbidden() {
    let h = Harness::new();
    let view = h.create("Owned Kit").await;
    let input = UpdateTemplate {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };

    let err = h
        .catalog
        .update(view.template.id, input, AUTHOR + 1, false)
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Forbidden(_)));

    let unchanged = h.catalog.get_by_id(view.template.id).await.unwrap();
    assert_eq!(unchanged.template.title, "Owned Kit");
}

#[tokio::test]
async fn test_partial_update_by_author_and_admin() {
    let h = Harness::new();
    let view = h.create("Partial Kit").await;
    let id = view.template.id;

    let by_author = h
        .catalog
        .update(
            id,
            UpdateTemplate {
                price: Some(35.0),
                ..Default::default()
            },
            AUTHOR,
            false,
        )
        .await
        .unwrap();
    assert_eq!(by_author.template.price, 35.0);
    assert_eq!(by_author.template.title, "Partial Kit");
    assert!(by_author.template.last_update >= view.template.last_update);

    let by_admin = h
        .catalog
        .update(
            id,
            UpdateTemplate {
                title: Some("Renamed Kit".to_string()),
                ..Default::default()
            },
            999,
            true,
        )
        .await
        .unwrap();
    assert_eq!(by_admin.template.title, "Renamed Kit");
    assert_eq!(by_admin.template.price, 35.0);
}

#[tokio::test]
async fn test_update_category_moves_product_count() {
    let h = Harness::new();
    let view = h.create("Moving Kit").await;

    let moved = h
        .catalog
        .update(
            view.template.id,
            UpdateTemplate {
                category_id: Some(CATEGORY + 1),
                ..Default::default()
            },
            AUTHOR,
            false,
        )
        .await
        .unwrap();
    assert_eq!(moved.category.map(|c| c.id), Some(CATEGORY + 1));
    assert_eq!(
        h.categories.calls(),
        vec![
            CategoryCall::Increment(CATEGORY),
            CategoryCall::Decrement(CATEGORY),
            CategoryCall::Increment(CATEGORY + 1),
        ]
    );
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_soft_delete_decrements_once_and_keeps_record() {
    let h = Harness::new();
    let view = h.publish(create_input("Doomed Kit")).await;
    let id = view.template.id;

    h.catalog.soft_delete(id, AUTHOR, false).await.unwrap();
    let err = h.catalog.soft_delete(id, AUTHOR, false).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::NotFound { .. }));

    let decrements = h
        .categories
        .calls()
        .into_iter()
        .filter(|c| *c == CategoryCall::Decrement(CATEGORY))
        .count();
    assert_eq!(decrements, 1);

    let audit = h.catalog.get_by_id(id).await.unwrap();
    assert!(audit.template.is_deleted);

    let err = h.catalog.get_by_slug(&view.template.slug).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::SlugNotFound { .. }));
}

#[tokio::test]
async fn test_soft_delete_by_stranger_is_forbidden() {
    let h = Harness::new();
    let view = h.create("Guarded Kit").await;
    let err = h
        .catalog
        .soft_delete(view.template.id, AUTHOR + 5, false)
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Forbidden(_)));
    assert!(!h.catalog.get_by_id(view.template.id).await.unwrap().template.is_deleted);
}

// ---------------------------------------------------------------------------
// Counters and editorial flags
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_counters_and_rating() {
    let h = Harness::new();
    let id = h.create("Counted Kit").await.template.id;

    h.catalog.increment_view_count(id).await.unwrap();
    h.catalog.increment_sales_count(id).await.unwrap();
    h.catalog.increment_sales_count(id).await.unwrap();
    h.catalog.set_rating(id, 4.5, 12).await.unwrap();

    let t = h.catalog.get_by_id(id).await.unwrap().template;
    assert_eq!(t.view_count, 1);
    assert_eq!(t.sales_count, 2);
    assert_eq!(t.rating, 4.5);
    assert_eq!(t.review_count, 12);

    let err = h.catalog.set_rating(id, 5.5, 1).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));

    let err = h.catalog.increment_sales_count(404).await.unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_set_featured_is_independent_of_status() {
    let h = Harness::new();
    let id = h.create("Editorial Pick").await.template.id;

    let featured = h.catalog.set_featured(id, true).await.unwrap();
    assert!(featured.template.is_featured);
    assert_eq!(featured.template.status, TemplateStatus::Pending);
}

#[tokio::test]
async fn test_author_payload_cannot_set_featured() {
    let h = Harness::new();
    let id = h.create("Wannabe Pick").await.template.id;

    let payload: UpdateTemplate =
        serde_json::from_value(serde_json::json!({ "title": "Renamed", "is_featured": true }))
            .unwrap();
    let updated = h.catalog.update(id, payload, AUTHOR, false).await.unwrap();
    assert_eq!(updated.template.title, "Renamed");
    assert!(!updated.template.is_featured);
}
