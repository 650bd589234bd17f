mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, EmailSettings, SmsSettings};
pub use repos::{DueCapsulesQuery, ICapsuleRepo, ReminderCandidatesQuery, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::warn;

/// Explicitly constructed handles to everything the scheduler talks to.
/// Created once at startup and cloned into every request.
#[derive(Clone)]
pub struct CapsuleContext {
    pub repos: Repos,
    pub dispatchers: Dispatchers,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl CapsuleContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let config = Config::new();
        Ok(Self {
            repos,
            dispatchers: Dispatchers::create(&config),
            config,
            sys: Arc::new(RealSys {}),
        })
    }

    /// Inmemory repositories and dispatchers. Used for testing.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            dispatchers: Dispatchers::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment.
///
/// Falls back to an inmemory capsule store if `DATABASE_URL` is not set.
pub async fn setup_context() -> anyhow::Result<CapsuleContext> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(postgres_connection_string) => {
            CapsuleContext::create(ContextParams {
                postgres_connection_string,
            })
            .await
        }
        Err(_) => {
            warn!(
                "{} env var is not present. Capsules will only be stored in memory.",
                PSQL_CONNECTION_STRING
            );
            let config = Config::new();
            Ok(CapsuleContext {
                repos: Repos::create_inmemory(),
                dispatchers: Dispatchers::create(&config),
                config,
                sys: Arc::new(RealSys {}),
            })
        }
    }
}
