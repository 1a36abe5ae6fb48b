//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and
//! REST API. Services are generic over repository/hasher/provider
//! traits, but AppState pins them to the concrete infra
//! implementations.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::{info, warn};

use ragrelay_core::chat::service::ChatService;
use ragrelay_core::identity::service::AuthService;
use ragrelay_infra::auth::password::Argon2CredentialHasher;
use ragrelay_infra::auth::token::HmacTokenSigner;
use ragrelay_infra::ragflow::RagFlowProvider;
use ragrelay_infra::sqlite::conversation::SqliteConversationRepository;
use ragrelay_infra::sqlite::pool::{default_data_dir, DatabasePool};
use ragrelay_infra::sqlite::user::SqliteUserRepository;
use ragrelay_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteConversationRepository, RagFlowProvider>;

pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2CredentialHasher, HmacTokenSigner>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB,
    /// read secrets from the environment, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = default_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("ragrelay.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Secrets come from the environment, never from config.toml.
        let token_secret = match std::env::var("RAGRELAY_TOKEN_SECRET") {
            Ok(secret) if !secret.is_empty() => SecretString::from(secret),
            _ => {
                // An ephemeral secret invalidates all tokens on restart.
                warn!(
                    "RAGRELAY_TOKEN_SECRET not set; using an ephemeral \
                     signing secret, tokens will not survive a restart"
                );
                SecretString::from(uuid::Uuid::now_v7().to_string())
            }
        };

        let api_key = match std::env::var("RAGRELAY_API_KEY") {
            Ok(key) if !key.is_empty() => SecretString::from(key),
            _ => {
                warn!("RAGRELAY_API_KEY not set; provider requests will be unauthenticated");
                SecretString::from(String::new())
            }
        };

        // Wire auth service
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
            HmacTokenSigner::new(token_secret, config.auth.token_ttl_secs),
        );

        // Wire chat service with its repository and provider client
        let provider = RagFlowProvider::new(&config.provider, api_key);
        let chat_service = ChatService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            provider,
        );

        info!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            chat_service: Arc::new(chat_service),
            auth_service: Arc::new(auth_service),
            config,
            data_dir,
            db_pool,
        })
    }
}

/// Load `config.toml` from the data directory.
///
/// A missing file yields the defaults; a malformed file is an error
/// rather than a silent fallback.
async fn load_config(data_dir: &std::path::Path) -> anyhow::Result<AppConfig> {
    let path = data_dir.join("config.toml");
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => {
            let config = toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(e.into()),
    }
}
