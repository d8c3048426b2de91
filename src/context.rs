/// Application context and dependency injection
use crate::{
    config::{ObjectStoreConfig, ServerConfig},
    credentials::CredentialStore,
    db,
    error::{DeskError, DeskResult},
    library::MediaLibrary,
    providers::{
        graph::GraphClient, listing::ListingClient, llm::LlmClient, vision::VisionClient,
    },
    store::{ListingStore, PhotoStore, ReviewStore, SocialStore},
    suggest::SuggestionGenerator,
    sync::SyncService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub credentials: CredentialStore,
    pub listings: ListingStore,
    pub reviews: ReviewStore,
    pub social: SocialStore,
    pub photos: PhotoStore,
    pub library: MediaLibrary,
    pub sync: SyncService,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> DeskResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let pool = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;

        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        let credentials = CredentialStore::new(pool.clone());
        let listings = ListingStore::new(pool.clone());
        let reviews = ReviewStore::new(pool.clone());
        let social = SocialStore::new(pool.clone());
        let photos = PhotoStore::new(pool.clone());

        let library = MediaLibrary::new(
            &config.storage.object_store,
            config.service.public_url.clone(),
        )?;

        let listing_client = Arc::new(ListingClient::new(config.providers.listing.clone())?);
        let graph_client = Arc::new(GraphClient::new(config.providers.graph.clone())?);
        let vision_client = Arc::new(VisionClient::new(config.providers.vision.clone())?);
        let llm_client = Arc::new(LlmClient::new(config.providers.llm.clone())?);
        let suggestions = SuggestionGenerator::new(llm_client);

        let sync = SyncService::new(
            credentials.clone(),
            listing_client,
            graph_client,
            vision_client,
            suggestions,
            listings.clone(),
            reviews.clone(),
            social.clone(),
            photos.clone(),
            library.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            credentials,
            listings,
            reviews,
            social,
            photos,
            library,
            sync,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> DeskResult<()> {
        let data_directory = &config.storage.data_directory;
        if !data_directory.exists() {
            tokio::fs::create_dir_all(data_directory).await.map_err(|e| {
                DeskError::Internal(format!(
                    "Failed to create directory {:?}: {}",
                    data_directory, e
                ))
            })?;
        }

        if let ObjectStoreConfig::Disk { location } = &config.storage.object_store {
            tokio::fs::create_dir_all(location).await?;
        }

        Ok(())
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
