use std::sync::Arc;

use designhub_db::DbPool;
use designhub_events::EventBus;

use crate::catalog::CatalogService;
use crate::collaborators::Collaborators;
use crate::config::CatalogConfig;
use crate::engagement::EngagementCoordinator;
use crate::signing::HmacLinkSigningProvider;
use crate::store::{PgTemplateStore, TemplateStore};

/// The catalog services wired to one store, collaborator set and event bus.
///
/// Cheaply cloneable; a transport layer holds one and hands it to handlers.
#[derive(Clone)]
pub struct CatalogState {
    pub catalog: Arc<CatalogService>,
    pub engagement: Arc<EngagementCoordinator>,
    pub events: Arc<EventBus>,
}

impl CatalogState {
    pub fn new(
        store: Arc<dyn TemplateStore>,
        collaborators: &Collaborators,
        events: Arc<EventBus>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(
                Arc::clone(&store),
                collaborators,
                Arc::clone(&events),
                config,
            )),
            engagement: Arc::new(EngagementCoordinator::new(
                store,
                collaborators,
                Arc::clone(&events),
            )),
            events,
        }
    }

    /// Production wiring: PostgreSQL store and collaborators, HMAC link
    /// signing from `config.signing`.
    pub fn postgres(pool: DbPool, config: CatalogConfig) -> Self {
        let signer = Arc::new(HmacLinkSigningProvider::new(config.signing.clone()));
        let collaborators = Collaborators::postgres(pool.clone(), signer);
        Self::new(
            Arc::new(PgTemplateStore::new(pool)),
            &collaborators,
            Arc::new(EventBus::default()),
            config,
        )
    }
}
