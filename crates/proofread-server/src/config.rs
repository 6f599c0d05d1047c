//! Process-wide configuration.
//!
//! The configuration is an immutable [`AppConfig`] snapshot. Readers take a
//! cheap clone of the current `Arc`; reconfiguration validates a whole new
//! snapshot and swaps it in, so a request never sees a half-applied change.

use crate::error::{Result, ServerError};
use crate::scanner;
use proofread_core::validator::branch_name_problem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Owner of the content repository.
pub const DEFAULT_GITHUB_OWNER: &str = "PlanB-Network";

/// Name of the content repository.
pub const DEFAULT_GITHUB_REPO: &str = "bitcoin-educational-content";

/// Content Translation & Proofreading board of the PlanB Network organization.
pub const DEFAULT_PROJECT_ID: &str = "PVT_kwDOCbV58s4AlOvb";

/// Server settings.
#[derive(Clone)]
pub struct AppConfig {
    /// Local clone of the content repository
    pub repo_path: Option<PathBuf>,

    /// Token passed through to GitHub
    pub github_token: Option<String>,

    /// Node id of the project board new issues join
    pub project_id: String,

    /// Branch suggested when the user has not picked one
    pub default_branch: String,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Bound on every GitHub call
    pub upstream_timeout: Duration,

    pub github_owner: String,
    pub github_repo: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("repo_path", &self.repo_path)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("project_id", &self.project_id)
            .field("default_branch", &self.default_branch)
            .field("api_addr", &self.api_addr)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("github_owner", &self.github_owner)
            .field("github_repo", &self.github_repo)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repo_path: None,
            github_token: None,
            project_id: DEFAULT_PROJECT_ID.to_string(),
            default_branch: "dev".to_string(),
            api_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            upstream_timeout: proofread_core::service::DEFAULT_UPSTREAM_TIMEOUT,
            github_owner: DEFAULT_GITHUB_OWNER.to_string(),
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any variable lookup; unset and blank are the same.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.repo_path = var("PROOFREAD_REPO_PATH").map(PathBuf::from);
        config.github_token = var("GITHUB_TOKEN");
        if let Some(project_id) = var("GITHUB_PROJECT_ID") {
            config.project_id = project_id;
        }
        if let Some(branch) = var("PROOFREAD_DEFAULT_BRANCH") {
            if let Some(problem) = branch_name_problem(&branch) {
                return Err(ServerError::Config(format!(
                    "Invalid PROOFREAD_DEFAULT_BRANCH '{branch}': {problem}"
                )));
            }
            config.default_branch = branch;
        }
        if let Some(addr) = var("PROOFREAD_API_ADDR") {
            config.api_addr = addr.parse().map_err(|e| {
                ServerError::Config(format!("Invalid PROOFREAD_API_ADDR '{addr}': {e}"))
            })?;
        }
        if let Some(secs) = var("PROOFREAD_UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                ServerError::Config(format!("Invalid PROOFREAD_UPSTREAM_TIMEOUT_SECS '{secs}': {e}"))
            })?;
            if secs == 0 {
                return Err(ServerError::Config(
                    "PROOFREAD_UPSTREAM_TIMEOUT_SECS must be positive".to_string(),
                ));
            }
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(owner) = var("GITHUB_OWNER") {
            config.github_owner = owner;
        }
        if let Some(repo) = var("GITHUB_REPO") {
            config.github_repo = repo;
        }
        Ok(config)
    }

    /// `owner/repo` of the content repository.
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.github_owner, self.github_repo)
    }

    /// Repository path, or an error saying it has to be configured.
    pub fn require_repo_path(&self) -> Result<&PathBuf> {
        self.repo_path.as_ref().ok_or_else(|| {
            ServerError::Repository("content repository path is not configured".to_string())
        })
    }

    /// A copy with `update` applied, after checking every changed value.
    pub fn updated(&self, update: &ConfigUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(path) = update.repo_path.as_deref().map(str::trim) {
            let path = PathBuf::from(path);
            scanner::validate_repo_path(&path)?;
            next.repo_path = Some(path);
        }
        if let Some(token) = update.github_token.as_deref().map(str::trim) {
            next.github_token = (!token.is_empty()).then(|| token.to_string());
        }
        if let Some(project_id) = update.project_id.as_deref().map(str::trim) {
            if project_id.is_empty() {
                return Err(ServerError::Config("project id must not be empty".to_string()));
            }
            next.project_id = project_id.to_string();
        }
        if let Some(branch) = update.default_branch.as_deref().map(str::trim) {
            if let Some(problem) = branch_name_problem(branch) {
                return Err(ServerError::Config(format!("default branch: {problem}")));
            }
            next.default_branch = branch.to_string();
        }
        Ok(next)
    }

    /// What the config endpoint shows; never the token itself.
    pub fn view(&self) -> ConfigView {
        ConfigView {
            repo_path: self.repo_path.as_ref().map(|p| p.display().to_string()),
            github_token_set: self.github_token.is_some(),
            project_id: self.project_id.clone(),
            default_branch: self.default_branch.clone(),
            github_repo: self.repo_slug(),
            upstream_timeout_secs: self.upstream_timeout.as_secs(),
        }
    }
}

/// Public part of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigView {
    pub repo_path: Option<String>,
    pub github_token_set: bool,
    pub project_id: String,
    pub default_branch: String,
    pub github_repo: String,
    pub upstream_timeout_secs: u64,
}

/// Fields a client may change at runtime. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub repo_path: Option<String>,
    /// Empty string clears the token
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Shared slot holding the current configuration snapshot.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    current: Arc<RwLock<Arc<AppConfig>>>,
}

impl ConfigHandle {
    pub fn new(config: AppConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// The snapshot in effect right now.
    pub async fn snapshot(&self) -> Arc<AppConfig> {
        Arc::clone(&*self.current.read().await)
    }

    /// Validate `update` against the current snapshot and swap it in.
    pub async fn apply(&self, update: &ConfigUpdate) -> Result<Arc<AppConfig>> {
        let mut slot = self.current.write().await;
        let next = Arc::new(slot.updated(update)?);
        *slot = Arc::clone(&next);
        tracing::info!(
            repo_path = ?next.repo_path,
            default_branch = %next.default_branch,
            token_set = next.github_token.is_some(),
            "configuration updated"
        );
        Ok(next)
    }
}
