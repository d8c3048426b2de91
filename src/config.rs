/// Configuration management for Orbit Desk
use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub providers: ProvidersConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub version: String,
    /// Public base URL used to build media library URLs
    pub public_url: String,
    pub upload_limit: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
    pub object_store: ObjectStoreConfig,
}

/// Object storage configuration for the media library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectStoreConfig {
    Disk { location: PathBuf },
    S3 { bucket: String, region: String },
}

/// Third-party provider configuration
///
/// All keys and base URLs are read once at startup and passed into each
/// client at construction, never from process-wide state at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub listing: ListingProviderConfig,
    pub graph: GraphProviderConfig,
    pub vision: VisionProviderConfig,
    pub llm: LlmProviderConfig,
}

/// Business-listing provider (Google Business Profile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingProviderConfig {
    /// Base URL of the business-information API (listing + categories)
    pub info_api_url: String,
    /// Base URL of the legacy API that serves reviews
    pub reviews_api_url: String,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
}

/// Social graph provider (Meta Graph API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphProviderConfig {
    pub api_url: String,
}

/// Object-detection aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionProviderConfig {
    pub api_url: String,
    pub api_key: String,
    /// Vision engines the aggregator fans out to
    pub engines: Vec<String>,
}

/// Language-model provider (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    pub api_url: String,
    pub api_key: String,
    /// Model used for the default three-tone review suggestions
    pub suggestion_model: String,
    /// Model used for preference-guided and comment replies
    pub reply_model: String,
    /// Model used for caption generation
    pub caption_model: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> DeskResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("DESK_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("DESK_PORT")
            .unwrap_or_else(|_| "8300".to_string())
            .parse()
            .map_err(|_| DeskError::Validation("Invalid port number".to_string()))?;
        let version = env::var("DESK_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let public_url = env::var("DESK_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", hostname, port));
        let upload_limit = env::var("DESK_UPLOAD_LIMIT")
            .unwrap_or_else(|_| "10485760".to_string())
            .parse()
            .unwrap_or(10485760);

        let data_directory: PathBuf = env::var("DESK_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("DESK_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("desk.sqlite"));

        let object_store = if let Ok(bucket) = env::var("DESK_OBJECT_STORE_S3_BUCKET") {
            ObjectStoreConfig::S3 {
                bucket,
                region: env::var("DESK_OBJECT_STORE_S3_REGION")
                    .unwrap_or_else(|_| "us-east-1".to_string()),
            }
        } else {
            ObjectStoreConfig::Disk {
                location: env::var("DESK_OBJECT_STORE_DISK_LOCATION")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| data_directory.join("media")),
            }
        };

        let listing = ListingProviderConfig {
            info_api_url: env::var("DESK_LISTING_INFO_API_URL").unwrap_or_else(|_| {
                "https://mybusinessbusinessinformation.googleapis.com".to_string()
            }),
            reviews_api_url: env::var("DESK_LISTING_REVIEWS_API_URL")
                .unwrap_or_else(|_| "https://mybusiness.googleapis.com".to_string()),
            oauth_client_id: env::var("DESK_LISTING_OAUTH_CLIENT_ID").unwrap_or_default(),
            oauth_client_secret: env::var("DESK_LISTING_OAUTH_CLIENT_SECRET").unwrap_or_default(),
        };

        let graph = GraphProviderConfig {
            api_url: env::var("DESK_GRAPH_API_URL")
                .unwrap_or_else(|_| "https://graph.facebook.com/v18.0".to_string()),
        };

        let vision = VisionProviderConfig {
            api_url: env::var("DESK_VISION_API_URL")
                .unwrap_or_else(|_| "https://api.edenai.run/v2/image/object_detection".to_string()),
            api_key: env::var("DESK_VISION_API_KEY").unwrap_or_default(),
            engines: env::var("DESK_VISION_ENGINES")
                .unwrap_or_else(|_| "google,amazon,clarifai".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        let llm = LlmProviderConfig {
            api_url: env::var("DESK_LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("DESK_LLM_API_KEY")
                .map_err(|_| DeskError::Validation("LLM API key required".to_string()))?,
            suggestion_model: env::var("DESK_LLM_SUGGESTION_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            reply_model: env::var("DESK_LLM_REPLY_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo-1106".to_string()),
            caption_model: env::var("DESK_LLM_CAPTION_MODEL")
                .unwrap_or_else(|_| "gpt-4".to_string()),
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                version,
                public_url,
                upload_limit,
            },
            storage: StorageConfig {
                data_directory,
                database,
                object_store,
            },
            providers: ProvidersConfig {
                listing,
                graph,
                vision,
                llm,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> DeskResult<()> {
        if self.service.hostname.is_empty() {
            return Err(DeskError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.providers.llm.api_key.is_empty() {
            return Err(DeskError::Validation(
                "LLM API key cannot be empty".to_string(),
            ));
        }

        if self.providers.vision.engines.is_empty() {
            return Err(DeskError::Validation(
                "At least one vision engine must be configured".to_string(),
            ));
        }

        Ok(())
    }
}
