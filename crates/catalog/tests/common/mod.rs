#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use designhub_catalog::collaborators::{
    CategoryDirectory, CategorySummary, Collaborators, LikeNotification, LinkSigningProvider,
    Notifier, SignOptions, UserDirectory, UserSummary, Wishlist,
};
use designhub_catalog::config::CatalogConfig;
use designhub_catalog::store::InMemoryTemplateStore;
use designhub_catalog::{
    CatalogService, CatalogState, EngagementCoordinator, ModerationWorkflow, TemplateView,
};
use designhub_core::catalog::{Platform, TemplateStatus, TemplateType};
use designhub_core::types::DbId;
use designhub_db::models::template::CreateTemplate;
use designhub_events::{CatalogEvent, EventBus};
use tokio::sync::broadcast;

pub const AUTHOR: DbId = 100;
pub const LIKER: DbId = 200;
pub const CATEGORY: DbId = 7;

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryCall {
    Increment(DbId),
    Decrement(DbId),
}

#[derive(Default)]
pub struct FakeCategories {
    pub calls: Mutex<Vec<CategoryCall>>,
    pub fail: bool,
}

impl FakeCategories {
    pub fn calls(&self) -> Vec<CategoryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CategoryDirectory for FakeCategories {
    async fn increment_product_count(&self, category_id: DbId) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("category service unavailable");
        }
        self.calls.lock().unwrap().push(CategoryCall::Increment(category_id));
        Ok(())
    }

    async fn decrement_product_count(&self, category_id: DbId) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("category service unavailable");
        }
        self.calls.lock().unwrap().push(CategoryCall::Decrement(category_id));
        Ok(())
    }

    async fn find_summaries(&self, ids: &[DbId]) -> anyhow::Result<HashMap<DbId, CategorySummary>> {
        if self.fail {
            anyhow::bail!("category service unavailable");
        }
        Ok(ids
            .iter()
            .map(|id| {
                let summary = CategorySummary {
                    id: *id,
                    name: format!("Category {id}"),
                    slug: format!("category-{id}"),
                };
                (*id, summary)
            })
            .collect())
    }
}

#[derive(Default)]
pub struct FakeUsers {
    pub fail: bool,
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn find_user(&self, user_id: DbId) -> anyhow::Result<Option<UserSummary>> {
        if self.fail {
            anyhow::bail!("user service unavailable");
        }
        Ok((user_id != 0).then(|| UserSummary {
            id: user_id,
            name: format!("User {user_id}"),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistCall {
    Add(DbId, DbId, TemplateType),
    Remove(DbId, DbId),
}

#[derive(Default)]
pub struct FakeWishlist {
    pub calls: Mutex<Vec<WishlistCall>>,
    pub fail: bool,
}

impl FakeWishlist {
    pub fn calls(&self) -> Vec<WishlistCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Wishlist for FakeWishlist {
    async fn add(&self, user_id: DbId, template_id: DbId, kind: TemplateType) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("wishlist unavailable");
        }
        self.calls.lock().unwrap().push(WishlistCall::Add(user_id, template_id, kind));
        Ok(())
    }

    async fn remove(&self, user_id: DbId, template_id: DbId) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("wishlist unavailable");
        }
        self.calls.lock().unwrap().push(WishlistCall::Remove(user_id, template_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<LikeNotification>>,
    pub fail: bool,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<LikeNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn create_like_notification(&self, notification: LikeNotification) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("notifications unavailable");
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSigner {
    pub requests: Mutex<Vec<(String, SignOptions)>>,
    pub fail: bool,
}

impl FakeSigner {
    pub fn requests(&self) -> Vec<(String, SignOptions)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkSigningProvider for FakeSigner {
    async fn sign(&self, public_id: &str, options: &SignOptions) -> anyhow::Result<String> {
        if self.fail {
            anyhow::bail!("signing provider rejected the request");
        }
        self.requests
            .lock()
            .unwrap()
            .push((public_id.to_string(), options.clone()));
        Ok(format!(
            "https://signed.example.com/{public_id}?expires={}",
            options.expires_at_epoch_secs
        ))
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Which fakes should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub categories: bool,
    pub users: bool,
    pub wishlist: bool,
    pub notifier: bool,
    pub signer: bool,
}

pub struct Harness {
    pub store: Arc<InMemoryTemplateStore>,
    pub events: Arc<EventBus>,
    pub categories: Arc<FakeCategories>,
    pub wishlist: Arc<FakeWishlist>,
    pub notifier: Arc<FakeNotifier>,
    pub signer: Arc<FakeSigner>,
    pub catalog: Arc<CatalogService>,
    pub engagement: Arc<EngagementCoordinator>,
    pub moderation: ModerationWorkflow,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(Failures::default(), CatalogConfig::default())
    }

    pub fn failing(failures: Failures) -> Self {
        Self::build(failures, CatalogConfig::default())
    }

    pub fn build(failures: Failures, config: CatalogConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let store = Arc::new(InMemoryTemplateStore::new());
        let events = Arc::new(EventBus::default());
        let categories = Arc::new(FakeCategories {
            fail: failures.categories,
            ..Default::default()
        });
        let wishlist = Arc::new(FakeWishlist {
            fail: failures.wishlist,
            ..Default::default()
        });
        let notifier = Arc::new(FakeNotifier {
            fail: failures.notifier,
            ..Default::default()
        });
        let signer = Arc::new(FakeSigner {
            fail: failures.signer,
            ..Default::default()
        });
        let collaborators = Collaborators {
            categories: categories.clone(),
            users: Arc::new(FakeUsers {
                fail: failures.users,
            }),
            wishlist: wishlist.clone(),
            notifier: notifier.clone(),
            signer: signer.clone(),
        };

        let CatalogState {
            catalog,
            engagement,
            ..
        } = CatalogState::new(store.clone(), &collaborators, events.clone(), config);
        let moderation = ModerationWorkflow::new(store.clone(), events.clone());

        Self {
            store,
            events,
            categories,
            wishlist,
            notifier,
            signer,
            catalog,
            engagement,
            moderation,
        }
    }

    /// Create a pending template by [`AUTHOR`].
    pub async fn create(&self, title: &str) -> TemplateView {
        self.catalog
            .create(AUTHOR, create_input(title))
            .await
            .expect("create should succeed")
    }

    /// Create and approve a template.
    pub async fn publish(&self, input: CreateTemplate) -> TemplateView {
        let created = self
            .catalog
            .create(AUTHOR, input)
            .await
            .expect("create should succeed");
        self.catalog
            .set_status(created.template.id, TemplateStatus::Approved)
            .await
            .expect("approve should succeed")
    }
}

pub fn create_input(title: &str) -> CreateTemplate {
    CreateTemplate {
        title: title.to_string(),
        slug: None,
        category_id: CATEGORY,
        platform: Platform::Figma,
        template_type: TemplateType::UiKit,
        access_type: None,
        price: 20.0,
        offer_price: None,
        license_type: None,
        regular_license_price: None,
        extended_license_price: None,
        description: format!("{title} for product teams"),
        long_description: None,
        features: vec!["Auto layout".to_string()],
        images: vec![],
        preview_url: None,
        download_file: None,
        documentation_url: None,
        status: None,
    }
}

/// Everything published on the bus since `rx` subscribed.
pub fn drain(rx: &mut broadcast::Receiver<CatalogEvent>) -> Vec<CatalogEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn failed_effects(events: &[CatalogEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.is_side_effect_failure())
        .filter_map(|e| e.payload["effect"].as_str().map(str::to_string))
        .collect()
}
