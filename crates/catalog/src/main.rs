use designhub_catalog::config::CatalogConfig;
use designhub_catalog::query::{ListFilters, ListQuery};
use designhub_catalog::CatalogState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prepare the catalog database and bring up the service stack against it:
/// connect, apply migrations, wire the services, report catalog totals.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "designhub_catalog=debug,designhub_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CatalogConfig::from_env()?;
    tracing::info!(
        default_limit = config.pagination.limit,
        max_limit = config.pagination.max_limit,
        featured_limit = config.featured_limit,
        signing_configured = config.signing.api_secret.is_some(),
        "Catalog configuration loaded"
    );

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = designhub_db::create_pool(&database_url).await?;
    designhub_db::run_migrations(&pool).await?;
    designhub_db::health_check(&pool).await?;
    tracing::info!("Catalog database ready");

    let state = CatalogState::postgres(pool, config);

    let public = state
        .catalog
        .list_public(ListFilters::default(), ListQuery::default())
        .await?;
    let featured = state.catalog.list_featured(None).await?;
    tracing::info!(
        public_templates = public.total,
        featured_templates = featured.len(),
        "Catalog services ready"
    );

    Ok(())
}
