mod capsule;
mod shared;

pub use capsule::{ICapsuleRepo, InMemoryCapsuleRepo, PostgresCapsuleRepo};
pub use shared::query_structs::*;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub capsules: Arc<dyn ICapsuleRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        // This is needed to make sure that db is ready when opening server
        info!("DB CHECKING CONNECTION AND MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB CHECKING CONNECTION AND MIGRATIONS ... [done]");

        Ok(Self {
            capsules: Arc::new(PostgresCapsuleRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            capsules: Arc::new(InMemoryCapsuleRepo::new()),
        }
    }
}
