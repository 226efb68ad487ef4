//! Public, featured and admin listings.

mod common;

use assert_matches::assert_matches;
use common::{create_input, Failures, Harness, AUTHOR};
use designhub_catalog::query::{AdminListFilters, ListFilters, ListQuery};
use designhub_catalog::CatalogError;
use designhub_core::catalog::{Platform, TemplateStatus};
use designhub_core::error::CoreError;

fn sorted_by(sort: &str) -> ListQuery {
    ListQuery {
        sort: Some(sort.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_public_listing_hides_unapproved_and_deleted() {
    let h = Harness::new();
    let live = h.publish(create_input("Live Kit")).await;
    let gone = h.publish(create_input("Gone Kit")).await;
    let rejected = h.create("Rejected Kit").await;
    h.catalog
        .set_status(rejected.template.id, TemplateStatus::Rejected)
        .await
        .unwrap();
    h.create("Pending Kit").await;
    h.catalog
        .soft_delete(gone.template.id, AUTHOR, false)
        .await
        .unwrap();

    let page = h
        .catalog
        .list_public(ListFilters::default(), ListQuery::default())
        .await
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|v| v.template.id).collect();
    assert_eq!(ids, vec![live.template.id]);
    assert_eq!(page.total, 1);
    assert!(page
        .items
        .iter()
        .all(|v| v.template.status == TemplateStatus::Approved && !v.template.is_deleted));
}

#[tokio::test]
async fn test_price_range_matches_offer_price_or_price() {
    let h = Harness::new();
    let mut discounted = create_input("Discounted Kit");
    discounted.price = 100.0;
    discounted.offer_price = Some(30.0);
    let discounted = h.publish(discounted).await;

    let mut cheap = create_input("Cheap Kit");
    cheap.price = 5.0;
    h.publish(cheap).await;

    let filters = ListFilters {
        min_price: Some(10.0),
        max_price: Some(50.0),
        ..Default::default()
    };
    let page = h
        .catalog
        .list_public(filters, ListQuery::default())
        .await
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|v| v.template.id).collect();
    assert_eq!(ids, vec![discounted.template.id]);
}

#[tokio::test]
async fn test_pagination_over_twenty_five_records() {
    let h = Harness::new();
    for n in 1..=25 {
        h.publish(create_input(&format!("Kit {n:02}"))).await;
    }

    let query = ListQuery {
        page: Some(3),
        limit: Some(10),
        sort: Some("title:asc".to_string()),
    };
    let page = h
        .catalog
        .list_public(ListFilters::default(), query)
        .await
        .unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 3);
    let titles: Vec<&str> = page.items.iter().map(|v| v.template.title.as_str()).collect();
    assert_eq!(titles, vec!["Kit 21", "Kit 22", "Kit 23", "Kit 24", "Kit 25"]);
}

#[tokio::test]
async fn test_default_page_size_comes_from_config() {
    let h = Harness::new();
    for n in 1..=14 {
        h.publish(create_input(&format!("Kit {n:02}"))).await;
    }
    let page = h
        .catalog
        .list_public(ListFilters::default(), ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.limit, h.catalog.config().pagination.limit);
    assert_eq!(page.items.len(), 12);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_search_and_exact_filters() {
    let h = Harness::new();
    let mut sketch = create_input("Wallet App");
    sketch.platform = Platform::Sketch;
    sketch.features = vec!["Dark mode".to_string()];
    let sketch = h.publish(sketch).await;
    h.publish(create_input("Banking Dashboard")).await;

    let by_feature = ListFilters {
        search: Some("DARK".to_string()),
        ..Default::default()
    };
    let page = h
        .catalog
        .list_public(by_feature, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].template.id, sketch.template.id);

    let by_platform = ListFilters {
        platform: Some(Platform::Figma),
        ..Default::default()
    };
    let page = h
        .catalog
        .list_public(by_platform, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].template.title, "Banking Dashboard");
}

#[tokio::test]
async fn test_sort_by_price_and_unknown_sort_field() {
    let h = Harness::new();
    for (title, price) in [("Mid", 20.0), ("Low", 5.0), ("High", 80.0)] {
        let mut input = create_input(title);
        input.price = price;
        h.publish(input).await;
    }

    let page = h
        .catalog
        .list_public(ListFilters::default(), sorted_by("-price"))
        .await
        .unwrap();
    let titles: Vec<&str> = page.items.iter().map(|v| v.template.title.as_str()).collect();
    assert_eq!(titles, vec!["High", "Mid", "Low"]);

    let err = h
        .catalog
        .list_public(ListFilters::default(), sorted_by("author_id"))
        .await
        .unwrap_err();
    assert_matches!(err, CatalogError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn test_featured_listing_orders_by_sales_and_drops_deleted() {
    let h = Harness::new();
    let mut ids = Vec::new();
    for (title, sales) in [("Steady", 2), ("Hit", 5), ("Niche", 0)] {
        let view = h.publish(create_input(title)).await;
        h.catalog.set_featured(view.template.id, true).await.unwrap();
        for _ in 0..sales {
            h.catalog
                .increment_sales_count(view.template.id)
                .await
                .unwrap();
        }
        ids.push(view.template.id);
    }
    h.publish(create_input("Not Featured")).await;

    let featured = h.catalog.list_featured(None).await.unwrap();
    let titles: Vec<&str> = featured.iter().map(|v| v.template.title.as_str()).collect();
    assert_eq!(titles, vec!["Hit", "Steady", "Niche"]);

    let top = h.catalog.list_featured(Some(1)).await.unwrap();
    assert_eq!(top.len(), 1);

    h.catalog.soft_delete(ids[1], AUTHOR, false).await.unwrap();
    let featured = h.catalog.list_featured(None).await.unwrap();
    assert!(featured.iter().all(|v| v.template.id != ids[1]));
}

#[tokio::test]
async fn test_admin_listing_status_filter_and_deleted_switch() {
    let h = Harness::new();
    let pending = h.create("Pending Kit").await;
    let approved = h.publish(create_input("Approved Kit")).await;
    h.catalog
        .soft_delete(approved.template.id, AUTHOR, false)
        .await
        .unwrap();

    let all_live = h
        .catalog
        .list_admin(AdminListFilters::default(), ListQuery::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all_live.items.iter().map(|v| v.template.id).collect();
    assert_eq!(ids, vec![pending.template.id]);

    let with_deleted = AdminListFilters {
        include_deleted: true,
        ..Default::default()
    };
    let page = h
        .catalog
        .list_admin(with_deleted, ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let only_approved = AdminListFilters {
        status: Some(TemplateStatus::Approved),
        include_deleted: true,
        ..Default::default()
    };
    let page = h
        .catalog
        .list_admin(only_approved, ListQuery::default())
        .await
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|v| v.template.id).collect();
    assert_eq!(ids, vec![approved.template.id]);
}

#[tokio::test]
async fn test_listing_survives_category_lookup_failure() {
    let h = Harness::failing(Failures {
        categories: true,
        ..Default::default()
    });
    h.publish(create_input("Orphan Kit")).await;

    let page = h
        .catalog
        .list_public(ListFilters::default(), ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.items[0].category.is_none());
}
