//! Issue preview and creation against the collaborators.

use crate::catalog::Catalog;
use crate::collaborators::{BranchSource, CreatedIssue, IssueTracker};
use crate::error::{Error, Result};
use crate::models::{BranchCandidate, ContentKind, IssuePayload};
use crate::registry::TemplateRegistry;
use crate::validator::{self, RawIssueRequest};
use proofread_fuzzy::BranchSuggestOptions;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on every collaborator call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Something the user should know that does not block submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// The branch is not among the remote branches
    UnknownBranch { branch: String },
    /// Remote branches could not be listed, so the branch was not checked
    BranchListUnavailable { detail: String },
    /// The issue exists but its project-board fields were not set
    ProjectFieldsNotSet { detail: String },
}

/// Outcome of checking a branch against the remote list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchStatus {
    Exists,
    Unknown,
    Unverified { detail: String },
}

impl BranchStatus {
    /// `Some(true/false)` when the remote list was available.
    pub fn exists(&self) -> Option<bool> {
        match self {
            BranchStatus::Exists => Some(true),
            BranchStatus::Unknown => Some(false),
            BranchStatus::Unverified { .. } => None,
        }
    }

    fn warning(&self, branch: &str) -> Option<Warning> {
        match self {
            BranchStatus::Exists => None,
            BranchStatus::Unknown => Some(Warning::UnknownBranch {
                branch: branch.to_string(),
            }),
            BranchStatus::Unverified { detail } => Some(Warning::BranchListUnavailable {
                detail: detail.clone(),
            }),
        }
    }
}

/// Payload that would be submitted, with advisory warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub payload: IssuePayload,
    pub warnings: Vec<Warning>,
}

/// An issue that was filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub issue: CreatedIssue,
    /// Exactly what was submitted
    pub payload: IssuePayload,
    pub warnings: Vec<Warning>,
}

/// Orchestrates validation, derivation and submission.
pub struct IssueService {
    registry: TemplateRegistry,
    tracker: Arc<dyn IssueTracker>,
    branches: Arc<dyn BranchSource>,
    timeout: Duration,
    suggest_options: BranchSuggestOptions,
}

impl IssueService {
    /// Service over the built-in templates.
    pub fn new(tracker: Arc<dyn IssueTracker>, branches: Arc<dyn BranchSource>) -> Self {
        Self {
            registry: TemplateRegistry::builtin(),
            tracker,
            branches,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            suggest_options: BranchSuggestOptions::default(),
        }
    }

    /// Builder: Bound collaborator calls by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: Use another template registry.
    pub fn with_registry(mut self, registry: TemplateRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builder: Tune branch suggestion.
    pub fn with_suggest_options(mut self, options: BranchSuggestOptions) -> Self {
        self.suggest_options = options;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::unavailable(
                operation,
                format!("no answer within {}s", self.timeout.as_secs_f64()),
            )),
        }
    }

    /// Validate and derive without touching the tracker.
    pub fn derive(
        &self,
        catalog: &Catalog,
        kind: ContentKind,
        raw: &RawIssueRequest,
    ) -> Result<IssuePayload> {
        let input = validator::validate(kind, raw, catalog)?;
        self.registry.derive(kind, &input)
    }

    /// Compare `branch` with the remote branch list.
    pub async fn check_branch(&self, branch: &str) -> BranchStatus {
        match self
            .bounded("list branches", self.branches.list_remote_branches())
            .await
        {
            Ok(names) if names.iter().any(|n| n == branch) => BranchStatus::Exists,
            Ok(_) => BranchStatus::Unknown,
            Err(e) => {
                tracing::warn!(branch, error = %e, "branch not verified");
                BranchStatus::Unverified {
                    detail: e.to_string(),
                }
            }
        }
    }

    async fn branch_warnings(&self, raw: &RawIssueRequest, kind: ContentKind) -> Vec<Warning> {
        if !kind.requires_branch() {
            return Vec::new();
        }
        let Some(branch) = raw.branch.as_deref().map(str::trim) else {
            return Vec::new();
        };
        self.check_branch(branch)
            .await
            .warning(branch)
            .into_iter()
            .collect()
    }

    /// The payload `create` would submit for the same input.
    pub async fn preview(
        &self,
        catalog: &Catalog,
        kind: ContentKind,
        raw: &RawIssueRequest,
    ) -> Result<Preview> {
        let payload = self.derive(catalog, kind, raw)?;
        let warnings = self.branch_warnings(raw, kind).await;
        Ok(Preview { payload, warnings })
    }

    /// Derive the payload and file it. Not idempotent.
    pub async fn create(
        &self,
        catalog: &Catalog,
        kind: ContentKind,
        raw: &RawIssueRequest,
    ) -> Result<Created> {
        let payload = self.derive(catalog, kind, raw)?;
        let mut warnings = self.branch_warnings(raw, kind).await;

        let labels = payload.label_list();
        let issue = self
            .bounded(
                "create issue",
                self.tracker.create_issue(&payload.title, &payload.body, &labels),
            )
            .await?;
        tracing::info!(number = issue.number, url = %issue.url, title = %payload.title, "issue created");

        if let Err(e) = self
            .bounded(
                "set project fields",
                self.tracker.set_project_fields(&issue, &payload.project_fields),
            )
            .await
        {
            tracing::warn!(number = issue.number, error = %e, "project fields not set");
            warnings.push(Warning::ProjectFieldsNotSet {
                detail: e.to_string(),
            });
        }

        Ok(Created {
            issue,
            payload,
            warnings,
        })
    }

    /// Remote branches ranked for `query`, biased towards `language`.
    ///
    /// A failing branch listing degrades to no suggestions.
    pub async fn suggest_branches(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> Vec<BranchCandidate> {
        let names = match self
            .bounded("list branches", self.branches.list_remote_branches())
            .await
        {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "branch suggestions unavailable");
                return Vec::new();
            }
        };
        proofread_fuzzy::suggest(query, language, &names, self.suggest_options)
            .into_iter()
            .map(|name| BranchCandidate::new(name, language))
            .collect()
    }
}
