//! GitHub REST and GraphQL client.
//!
//! Issues are opened through the REST API, then attached to the project
//! board and filled in through GraphQL. Every call reads the current
//! configuration snapshot, so a token or project change applies to the
//! next request.

use crate::config::{AppConfig, ConfigHandle};
use crate::error::Result as ServerResult;
use async_trait::async_trait;
use proofread_core::collaborators::{BranchSource, CreatedIssue, IssueTracker};
use proofread_core::{Error, ProjectField, ProjectFields, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Public GitHub API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

const BRANCHES_PER_PAGE: usize = 100;
const MAX_BRANCH_PAGES: usize = 50;

const ADD_TO_PROJECT: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
    item { id }
  }
}"#;

const PROJECT_FIELDS: &str = r#"
query($projectId: ID!) {
  node(id: $projectId) {
    ... on ProjectV2 {
      fields(first: 50) {
        nodes {
          ... on ProjectV2Field { id name }
          ... on ProjectV2SingleSelectField { id name options { id name } }
        }
      }
    }
  }
}"#;

const UPDATE_FIELD: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $value: ProjectV2FieldValue!) {
  updateProjectV2ItemFieldValue(
    input: {projectId: $projectId, itemId: $itemId, fieldId: $fieldId, value: $value}
  ) {
    projectV2Item { id }
  }
}"#;

const ORG_PROJECTS: &str = r#"
query($login: String!) {
  organization(login: $login) {
    projectsV2(first: 50) {
      nodes { id title number url closed }
    }
  }
}"#;

/// A custom field of a project board. Field kinds the query does not
/// select come back with every member empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BoardField {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Present on single-select fields
    #[serde(default)]
    pub options: Option<Vec<BoardOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardOption {
    pub id: String,
    pub name: String,
}

/// An organization project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub number: u64,
    pub url: String,
    pub closed: bool,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct AddItemData {
    #[serde(rename = "addProjectV2ItemById")]
    added: AddedItem,
}

#[derive(Deserialize)]
struct AddedItem {
    item: ItemId,
}

#[derive(Deserialize)]
struct ItemId {
    id: String,
}

#[derive(Deserialize)]
struct FieldsData {
    node: Option<ProjectNode>,
}

#[derive(Deserialize)]
struct ProjectNode {
    fields: Nodes<BoardField>,
}

#[derive(Deserialize)]
struct OrgData {
    organization: Option<OrgProjects>,
}

#[derive(Deserialize)]
struct OrgProjects {
    #[serde(rename = "projectsV2")]
    projects: Nodes<ProjectSummary>,
}

#[derive(Deserialize)]
struct BranchRef {
    name: String,
}

#[derive(Deserialize)]
struct IssueResponse {
    html_url: String,
    number: u64,
    node_id: String,
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Deserialize)]
struct RepoResponse {
    default_branch: String,
}

/// Board field `field` is stored under: its own name first, then the
/// known alternative spellings.
pub fn resolve_field(board: &[BoardField], field: ProjectField) -> Option<&BoardField> {
    std::iter::once(field.as_str())
        .chain(field.alternatives().iter().copied())
        .find_map(|name| {
            board
                .iter()
                .find(|f| f.id.is_some() && f.name.as_deref() == Some(name))
        })
}

/// GraphQL value setting `value` on `field`: an option id for single-select
/// fields, plain text otherwise. `None` when the option does not exist.
pub fn field_value(field: &BoardField, value: &str) -> Option<serde_json::Value> {
    match &field.options {
        Some(options) => options
            .iter()
            .find(|o| o.name == value)
            .map(|o| json!({ "singleSelectOptionId": o.id })),
        None => Some(json!({ "text": value })),
    }
}

/// Error for a non-success HTTP status. Server-side trouble is worth a
/// retry; anything else is a refusal.
pub fn status_error(operation: &'static str, status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());
    let detail = format!("HTTP {status}: {message}");
    if status >= 500 || status == 429 {
        Error::unavailable(operation, detail)
    } else {
        Error::rejected(operation, detail)
    }
}

fn require_token<'a>(config: &'a AppConfig, operation: &'static str) -> Result<&'a str> {
    config
        .github_token
        .as_deref()
        .ok_or_else(|| Error::rejected(operation, "no GitHub token configured"))
}

/// Client for the content repository and its project board.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: ConfigHandle,
    api_base: String,
}

impl GitHubClient {
    /// Client against the public GitHub API.
    pub async fn new(config: ConfigHandle) -> ServerResult<Self> {
        let timeout = config.snapshot().await.upstream_timeout;
        let http = reqwest::Client::builder()
            .user_agent(concat!("proofread-server/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            api_base: GITHUB_API_URL.to_string(),
        })
    }

    /// Builder: Talk to another API root (GitHub Enterprise, tests).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.api_base, path))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::unavailable(operation, e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(operation, status.as_u16(), &body))
    }

    async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::unavailable(operation, format!("unreadable response: {e}")))
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let config = self.config.snapshot().await;
        let token = require_token(&config, operation)?;
        let request = self
            .request(Method::POST, "/graphql", Some(token))
            .json(&json!({ "query": query, "variables": variables }));
        let response = self.send(operation, request).await?;
        let body: GraphQlResponse<T> = Self::decode(operation, response).await?;
        if !body.errors.is_empty() {
            let messages: Vec<_> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::rejected(operation, messages.join("; ")));
        }
        body.data
            .ok_or_else(|| Error::rejected(operation, "response carried no data"))
    }

    /// Every branch of the content repository, following pagination.
    pub async fn list_branches(&self) -> Result<Vec<String>> {
        const OP: &str = "list branches";
        let config = self.config.snapshot().await;
        let mut names = Vec::new();
        for page in 1..=MAX_BRANCH_PAGES {
            let path = format!(
                "/repos/{}/branches?per_page={BRANCHES_PER_PAGE}&page={page}",
                config.repo_slug()
            );
            let request = self.request(Method::GET, &path, config.github_token.as_deref());
            let batch: Vec<BranchRef> = Self::decode(OP, self.send(OP, request).await?).await?;
            let last = batch.len() < BRANCHES_PER_PAGE;
            names.extend(batch.into_iter().map(|b| b.name));
            if last {
                break;
            }
        }
        tracing::debug!(count = names.len(), "branches listed");
        Ok(names)
    }

    /// Open an issue in the content repository.
    pub async fn open_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<CreatedIssue> {
        const OP: &str = "create issue";
        let config = self.config.snapshot().await;
        let token = require_token(&config, OP)?;
        let request = self
            .request(Method::POST, &format!("/repos/{}/issues", config.repo_slug()), Some(token))
            .json(&json!({ "title": title, "body": body, "labels": labels }));
        let issue: IssueResponse = Self::decode(OP, self.send(OP, request).await?).await?;
        Ok(CreatedIssue {
            url: issue.html_url,
            number: issue.number,
            node_id: issue.node_id,
        })
    }

    /// Add the issue with `node_id` to the board; returns the board item id.
    pub async fn add_to_project(&self, project_id: &str, node_id: &str) -> Result<String> {
        let data: AddItemData = self
            .graphql(
                "add issue to project",
                ADD_TO_PROJECT,
                json!({ "projectId": project_id, "contentId": node_id }),
            )
            .await?;
        Ok(data.added.item.id)
    }

    /// Custom fields of a board.
    pub async fn project_fields(&self, project_id: &str) -> Result<Vec<BoardField>> {
        const OP: &str = "read project fields";
        let data: FieldsData = self
            .graphql(OP, PROJECT_FIELDS, json!({ "projectId": project_id }))
            .await?;
        data.node
            .map(|node| node.fields.nodes)
            .ok_or_else(|| Error::rejected(OP, format!("project {project_id} not found")))
    }

    async fn update_field(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .graphql(
                "update project field",
                UPDATE_FIELD,
                json!({
                    "projectId": project_id,
                    "itemId": item_id,
                    "fieldId": field_id,
                    "value": value,
                }),
            )
            .await?;
        Ok(())
    }

    /// Attach `issue` to the configured board and set every field on it.
    ///
    /// Each field is attempted even after one fails; any field that could
    /// not be set (missing from the board, unknown option, rejected update)
    /// is reported in a single `UpstreamRejected` error.
    pub async fn link_to_project(&self, issue: &CreatedIssue, fields: &ProjectFields) -> Result<()> {
        const OP: &str = "set project fields";
        let project_id = self.config.snapshot().await.project_id.clone();
        let item_id = self.add_to_project(&project_id, &issue.node_id).await?;
        let board = self.project_fields(&project_id).await?;

        let mut failed = Vec::new();
        for (field, value) in fields {
            let Some(board_field) = resolve_field(&board, *field) else {
                tracing::warn!(field = %field, "field not found on project board");
                failed.push(format!("{field}: not on the board"));
                continue;
            };
            let (Some(field_id), Some(name)) = (board_field.id.as_deref(), board_field.name.as_deref()) else {
                continue;
            };
            if name != field.as_str() {
                tracing::debug!(field = %field, board_name = name, "using alternative field name");
            }
            let Some(graphql_value) = field_value(board_field, value) else {
                tracing::warn!(field = %field, value = %value, "option not found on project board");
                failed.push(format!("{field}: no option '{value}'"));
                continue;
            };
            if let Err(e) = self.update_field(&project_id, &item_id, field_id, graphql_value).await {
                tracing::warn!(field = %field, error = %e, "failed to set project field");
                failed.push(format!("{field}: {e}"));
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::rejected(OP, failed.join("; ")))
        }
    }

    /// Login of the token owner.
    pub async fn validate_token(&self) -> Result<String> {
        const OP: &str = "validate token";
        let config = self.config.snapshot().await;
        let token = require_token(&config, OP)?;
        let request = self.request(Method::GET, "/user", Some(token));
        let user: UserResponse = Self::decode(OP, self.send(OP, request).await?).await?;
        Ok(user.login)
    }

    /// Default branch of the content repository.
    pub async fn default_branch(&self) -> Result<String> {
        const OP: &str = "read repository";
        let config = self.config.snapshot().await;
        let request = self.request(
            Method::GET,
            &format!("/repos/{}", config.repo_slug()),
            config.github_token.as_deref(),
        );
        let repo: RepoResponse = Self::decode(OP, self.send(OP, request).await?).await?;
        Ok(repo.default_branch)
    }

    /// Project boards of the repository owner, to find the board id.
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        const OP: &str = "list projects";
        let login = self.config.snapshot().await.github_owner.clone();
        let data: OrgData = self
            .graphql(OP, ORG_PROJECTS, json!({ "login": login }))
            .await?;
        data.organization
            .map(|org| org.projects.nodes)
            .ok_or_else(|| Error::rejected(OP, format!("organization {login} not found")))
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<CreatedIssue> {
        self.open_issue(title, body, labels).await
    }

    async fn set_project_fields(&self, issue: &CreatedIssue, fields: &ProjectFields) -> Result<()> {
        self.link_to_project(issue, fields).await
    }
}

#[async_trait]
impl BranchSource for GitHubClient {
    async fn list_remote_branches(&self) -> Result<Vec<String>> {
        self.list_branches().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn board() -> Vec<BoardField> {
        serde_json::from_value(json!([
            { "id": "F1", "name": "Title" },
            { "id": "F2", "name": "State", "options": [
                { "id": "O1", "name": "Todo" },
                { "id": "O2", "name": "Done" }
            ]},
            { "id": "F3", "name": "Type", "options": [
                { "id": "O3", "name": "Course" }
            ]},
            { "id": "F4", "name": "Lang" },
            {},
            { "id": "F5", "name": "Status" }
        ]))
        .unwrap()
    }

    #[test]
    fn exact_name_wins_over_alternative() {
        let board = board();
        assert_eq!(
            resolve_field(&board, ProjectField::Status).unwrap().id.as_deref(),
            Some("F5")
        );
    }

    #[test]
    fn alternatives_are_tried() {
        let board = board();
        assert_eq!(
            resolve_field(&board, ProjectField::ContentType).unwrap().id.as_deref(),
            Some("F3")
        );
        assert_eq!(
            resolve_field(&board, ProjectField::Language).unwrap().id.as_deref(),
            Some("F4")
        );
        assert!(resolve_field(&board, ProjectField::Urgency).is_none());
    }

    #[test]
    fn values_by_field_type() {
        let board = board();
        let content_type = resolve_field(&board, ProjectField::ContentType).unwrap();
        assert_eq!(
            field_value(content_type, "Course"),
            Some(json!({ "singleSelectOptionId": "O3" }))
        );
        assert_eq!(field_value(content_type, "Weblate"), None);

        let language = resolve_field(&board, ProjectField::Language).unwrap();
        assert_eq!(field_value(language, "es"), Some(json!({ "text": "es" })));
    }

    #[test]
    fn status_errors() {
        let err = status_error("create issue", 401, r#"{"message":"Bad credentials"}"#);
        assert_eq!(err.to_string(), "create issue rejected: HTTP 401: Bad credentials");

        let err = status_error("create issue", 422, "Validation Failed");
        assert!(matches!(err, Error::UpstreamRejected { .. }));

        let err = status_error("list branches", 502, "");
        assert!(err.is_retryable());
    }

    #[test]
    fn graphql_errors_parse() {
        let body: GraphQlResponse<serde_json::Value> = serde_json::from_value(json!({
            "data": null,
            "errors": [{ "message": "Could not resolve to a node" }]
        }))
        .unwrap();
        assert!(body.data.is_none());
        assert_eq!(body.errors[0].message, "Could not resolve to a node");
    }

    /// Fake GraphQL endpoint for one board with Status and Content Type.
    #[derive(Clone)]
    struct Board {
        reject_updates: bool,
        updates: Arc<AtomicUsize>,
    }

    async fn graphql_stub(State(board): State<Board>, Json(request): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let query = request["query"].as_str().unwrap_or_default();
        let reply = if query.contains("addProjectV2ItemById") {
            json!({ "data": { "addProjectV2ItemById": { "item": { "id": "ITEM_1" } } } })
        } else if query.contains("updateProjectV2ItemFieldValue") {
            board.updates.fetch_add(1, Ordering::SeqCst);
            if board.reject_updates {
                json!({ "data": null, "errors": [{ "message": "field-id mismatch" }] })
            } else {
                json!({ "data": { "updateProjectV2ItemFieldValue": { "projectV2Item": { "id": "ITEM_1" } } } })
            }
        } else {
            json!({ "data": { "node": { "fields": { "nodes": [
                { "id": "F_STATUS", "name": "Status", "options": [{ "id": "O_TODO", "name": "Todo" }] },
                { "id": "F_TYPE", "name": "Content Type", "options": [{ "id": "O_COURSE", "name": "Course" }] }
            ] } } } })
        };
        Json(reply)
    }

    async fn client_for(board: Board) -> GitHubClient {
        let app = Router::new().route("/graphql", post(graphql_stub)).with_state(board);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let config = AppConfig {
            github_token: Some("ghp_test".to_string()),
            ..AppConfig::default()
        };
        GitHubClient::new(ConfigHandle::new(config))
            .await
            .unwrap()
            .with_api_base(&format!("http://{addr}"))
    }

    fn issue() -> CreatedIssue {
        CreatedIssue {
            url: "https://github.com/o/r/issues/7".to_string(),
            number: 7,
            node_id: "I_7".to_string(),
        }
    }

    fn fields(content_type: &str) -> ProjectFields {
        ProjectFields::from([
            (ProjectField::Status, "Todo".to_string()),
            (ProjectField::ContentType, content_type.to_string()),
        ])
    }

    #[tokio::test]
    async fn fields_set_on_board() {
        let board = Board { reject_updates: false, updates: Arc::default() };
        let client = client_for(board.clone()).await;
        client.set_project_fields(&issue(), &fields("Course")).await.unwrap();
        assert_eq!(board.updates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_update_is_reported() {
        let board = Board { reject_updates: true, updates: Arc::default() };
        let client = client_for(board.clone()).await;
        let err = client.set_project_fields(&issue(), &fields("Course")).await.unwrap_err();

        assert!(matches!(err, Error::UpstreamRejected { operation: "set project fields", .. }));
        assert!(err.to_string().contains("field-id mismatch"));
        // Every field is still attempted.
        assert_eq!(board.updates.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_option_and_field_are_reported() {
        let board = Board { reject_updates: false, updates: Arc::default() };
        let client = client_for(board.clone()).await;
        let mut wanted = fields("Weblate");
        wanted.insert(ProjectField::Urgency, "urgent".to_string());

        let err = client.set_project_fields(&issue(), &wanted).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Content Type: no option 'Weblate'"));
        assert!(message.contains("Urgency: not on the board"));
        assert_eq!(board.updates.load(Ordering::SeqCst), 1);
    }
}
