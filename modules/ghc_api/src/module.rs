use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use axum::Router;
use tracing::info;

use crate::api::rest::emitter::Emitter;
use crate::api::rest::routes;
use crate::api::rest::state::ApiState;
use crate::config::GhcApiConfig;
use crate::domain::ports::SessionResolver;
use crate::infra::{
    in_memory_services, seed, InMemoryNotificationQueue, InMemoryStore, LocalFileStorer,
    StaticSessionResolver, TracingAuditCapture,
};

/// The GHC API module: handler state wired to the in-memory collaborators.
pub struct GhcApi {
    state: Arc<ApiState>,
    sessions: Arc<dyn SessionResolver>,
    store: Arc<InMemoryStore>,
    notifications: Arc<InMemoryNotificationQueue>,
}

fn validate(cfg: &GhcApiConfig) -> Result<()> {
    ensure!(
        cfg.base_path.is_empty() || cfg.base_path.starts_with('/'),
        "base_path must start with '/' (got '{}')",
        cfg.base_path
    );
    ensure!(cfg.lock_duration_minutes > 0, "lock_duration_minutes must be positive");
    ensure!(cfg.max_per_page >= 1, "max_per_page must be at least 1");
    ensure!(
        (1..=cfg.max_per_page).contains(&cfg.default_per_page),
        "default_per_page must be between 1 and max_per_page ({})",
        cfg.max_per_page
    );
    Ok(())
}

impl GhcApi {
    pub fn from_config(cfg: GhcApiConfig) -> Result<Self> {
        validate(&cfg).context("invalid ghc_api configuration")?;

        let storer = Arc::new(
            LocalFileStorer::new(
                cfg.storage_base_url.clone(),
                cfg.presign_secret.clone(),
                cfg.presign_ttl_seconds,
            )
            .context("failed to build file storer")?,
        );
        let store = Arc::new(InMemoryStore::new());
        if cfg.seed_demo_data {
            seed::demo_data(&store, &storer);
            info!(locator = seed::DEMO_LOCATOR, "seeded demo move");
        }

        let notifications = Arc::new(InMemoryNotificationQueue::new());
        let emitter = Emitter::new(Arc::new(TracingAuditCapture), notifications.clone());
        let sessions: Arc<dyn SessionResolver> =
            Arc::new(StaticSessionResolver::new(cfg.sessions.clone()));
        info!(
            base_path = %cfg.base_path,
            sessions = cfg.sessions.len(),
            "ghc_api module configured"
        );

        let state = Arc::new(ApiState {
            services: in_memory_services(store.clone()),
            storer,
            emitter,
            config: cfg,
        });
        Ok(Self {
            state,
            sessions,
            store,
            notifications,
        })
    }

    /// Routes mounted under `base_path`, with session resolution attached.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone(), self.sessions.clone())
    }

    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    pub fn notifications(&self) -> &Arc<InMemoryNotificationQueue> {
        &self.notifications
    }
}
