//! Seams to the outside world: the issue tracker and the branch list.

use crate::error::Result;
use crate::models::ProjectFields;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Handle to an issue the tracker accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Browser URL of the issue
    pub url: String,
    pub number: u64,
    /// Tracker-global id used to attach the issue to a project
    pub node_id: String,
}

/// Files issues and fills their project-board fields.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open an issue. No deduplication: calling twice opens two issues.
    async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<CreatedIssue>;

    /// Attach `issue` to the project board and set `fields` on it.
    async fn set_project_fields(&self, issue: &CreatedIssue, fields: &ProjectFields) -> Result<()>;
}

/// Lists branches of the content repository.
#[async_trait]
pub trait BranchSource: Send + Sync {
    async fn list_remote_branches(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: IssueTracker + ?Sized> IssueTracker for Arc<T> {
    async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<CreatedIssue> {
        (**self).create_issue(title, body, labels).await
    }

    async fn set_project_fields(&self, issue: &CreatedIssue, fields: &ProjectFields) -> Result<()> {
        (**self).set_project_fields(issue, fields).await
    }
}

#[async_trait]
impl<T: BranchSource + ?Sized> BranchSource for Arc<T> {
    async fn list_remote_branches(&self) -> Result<Vec<String>> {
        (**self).list_remote_branches().await
    }
}

/// Branch source over a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticBranches(pub Vec<String>);

impl StaticBranches {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BranchSource for StaticBranches {
    async fn list_remote_branches(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}
