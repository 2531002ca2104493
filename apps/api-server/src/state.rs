//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::PostRepository;
use quill_infra::InMemoryPostRepository;
use quill_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// State backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPostRepository::new()))
    }

    /// Build the application state with the configured store.
    ///
    /// Fails when a database is configured but cannot be reached.
    pub async fn init(db_config: Option<&DatabaseConfig>) -> std::io::Result<Self> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        #[cfg(feature = "postgres")]
        let posts: Arc<dyn PostRepository> = {
            let conn = connect(config).await.map_err(|e| {
                tracing::error!("Failed to connect to database: {}", e);
                std::io::Error::other(e)
            })?;
            Arc::new(PostgresPostRepository::new(conn))
        };

        #[cfg(not(feature = "postgres"))]
        let posts: Arc<dyn PostRepository> = {
            tracing::warn!(
                max_connections = config.max_connections,
                "Built without postgres feature - ignoring DATABASE_URL"
            );
            Arc::new(InMemoryPostRepository::new())
        };

        tracing::info!("Application state initialized");
        Ok(Self::new(posts))
    }
}
