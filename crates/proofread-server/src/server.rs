//! Proofreading server - wires configuration, GitHub and the HTTP API.

use crate::api::{self, AppState};
use crate::branch_cache::CachedBranchSource;
use crate::config::{AppConfig, ConfigHandle};
use crate::error::Result;
use crate::github::GitHubClient;
use axum::Router;
use proofread_core::collaborators::{BranchSource, IssueTracker};
use proofread_core::IssueService;
use std::sync::Arc;

/// A proofreading server instance.
pub struct ProofreadServer {
    config: ConfigHandle,
    state: AppState,
}

impl ProofreadServer {
    /// Create a server talking to GitHub with `config`.
    pub async fn new(config: AppConfig) -> Result<Self> {
        let handle = ConfigHandle::new(config);
        let github = GitHubClient::new(handle.clone()).await?;
        let branches = Arc::new(CachedBranchSource::new(github.clone()));
        Self::with_collaborators(handle, Arc::new(github), branches).await
    }

    /// Create a server over any issue tracker and branch source.
    pub async fn with_collaborators(
        config: ConfigHandle,
        tracker: Arc<dyn IssueTracker>,
        branches: Arc<dyn BranchSource>,
    ) -> Result<Self> {
        let timeout = config.snapshot().await.upstream_timeout;
        let service = IssueService::new(tracker, branches).with_timeout(timeout);
        let state = AppState::new(config.clone(), service);
        Ok(Self { config, state })
    }

    /// The HTTP router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        api::build_router(self.state.clone())
    }

    /// Run the HTTP server until it fails.
    pub async fn run(self) -> Result<()> {
        let config = self.config.snapshot().await;
        tracing::info!("Proofread server starting");
        tracing::info!("  API: http://{}", config.api_addr);
        tracing::info!("  Repository: {:?}", config.repo_path);
        tracing::info!("  GitHub: {} (project {})", config.repo_slug(), config.project_id);
        if config.github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN is not set; issue creation will be rejected");
        }

        let app = self.router();
        let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", config.api_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
