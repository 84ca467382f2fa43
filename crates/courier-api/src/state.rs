//! Application state wiring all services together.
//!
//! AppState holds the orchestrator pinned to its concrete infra
//! implementations, plus the relay configuration shared with the validation
//! layer.

use std::sync::Arc;

use secrecy::SecretString;

use courier_core::history::HistoryAssembler;
use courier_core::orchestrator::ChatOrchestrator;
use courier_core::provider::adapter::ProviderAdapter;
use courier_core::provider::pool::ProviderPool;
use courier_infra::config::{database_url, load_relay_config, resolve_data_dir};
use courier_infra::llm::openai_compat::OpenAiCompatibleProvider;
use courier_infra::sqlite::{DatabasePool, SqliteSessionHistoryStore};
use courier_types::config::RelayConfig;

/// Shared application state holding the orchestrator and config.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator<SqliteSessionHistoryStore>>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire
    /// the provider pool and orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_relay_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = Arc::new(SqliteSessionHistoryStore::new(db_pool));

        let pool = Arc::new(ProviderPool::new(build_provider_roster()));
        if pool.is_empty() {
            tracing::error!(
                "no provider API keys configured; every chat request will be rejected"
            );
        } else {
            tracing::info!(providers = ?pool.names(), "provider roster ready");
        }

        let assembler = HistoryAssembler::new(
            config.system_instruction.clone(),
            config.context.clone(),
        );

        let orchestrator = Arc::new(ChatOrchestrator::new(
            store,
            pool,
            assembler,
            config.history_window,
            config.generation.clone(),
        ));

        Ok(Self {
            orchestrator,
            config: Arc::new(config),
        })
    }
}

/// Build the provider roster from environment API keys.
///
/// Rotation order is fixed: cerebras, nemotron, qwen3. Providers whose key
/// is absent are skipped with a warning.
fn build_provider_roster() -> Vec<Arc<dyn ProviderAdapter>> {
    let mut roster: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

    match std::env::var("CEREBRAS_API_KEY") {
        Ok(key) => roster.push(Arc::new(OpenAiCompatibleProvider::cerebras(
            SecretString::from(key),
        ))),
        Err(_) => tracing::warn!("CEREBRAS_API_KEY not set, skipping cerebras"),
    }
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) => roster.push(Arc::new(OpenAiCompatibleProvider::nemotron(
            SecretString::from(key),
        ))),
        Err(_) => tracing::warn!("OPENROUTER_API_KEY not set, skipping nemotron"),
    }
    match std::env::var("QWEN3_API_KEY") {
        Ok(key) => roster.push(Arc::new(OpenAiCompatibleProvider::qwen3(
            SecretString::from(key),
        ))),
        Err(_) => tracing::warn!("QWEN3_API_KEY not set, skipping qwen3"),
    }

    roster
}
