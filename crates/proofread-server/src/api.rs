//! HTTP API for the proofreading issue manager.

use crate::config::{ConfigHandle, ConfigUpdate, ConfigView};
use crate::error::{Result, ServerError};
use crate::scanner;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use proofread_core::validator::{branch_name_problem, FieldError, FieldErrorKind, ValidationFailure};
use proofread_core::{
    search_items, search_languages, BranchCandidate, Catalog, ContentItem, ContentKind, Created,
    Error, IssueService, Language, Preview, RawIssueRequest, Scored, SearchOptions,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state of the API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigHandle,
    pub service: Arc<IssueService>,
}

impl AppState {
    pub fn new(config: ConfigHandle, service: IssueService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }

    /// Catalog to resolve `kind` against. Kinds without items need only the
    /// language table, so they work before a repository is configured.
    async fn catalog_for(&self, kind: ContentKind) -> Result<Catalog> {
        if !kind.requires_item() {
            return Ok(Catalog::with_default_languages(Vec::new()));
        }
        let config = self.config.snapshot().await;
        let root = config.require_repo_path()?.clone();
        tokio::task::spawn_blocking(move || scanner::load_catalog(&root))
            .await
            .map_err(|e| ServerError::Repository(format!("repository scan aborted: {e}")))?
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // Configuration
        .route("/api/v1/config", get(get_config).put(put_config))
        // Lookups
        .route("/api/v1/languages", get(list_languages))
        .route("/api/v1/content/:kind", get(list_content))
        .route("/api/v1/content/:kind/*id", get(get_content))
        .route("/api/v1/branches", get(suggest_branches))
        .route("/api/v1/branches/validate/*name", get(validate_branch))
        // Issues
        .route("/api/v1/issues/preview", post(preview_issue))
        .route("/api/v1/issues", post(create_issue))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// --- Errors ---

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    fields: Vec<FieldError>,
}

impl ServerError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Core(e) => match e {
                Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Error::NotFound { .. } => StatusCode::NOT_FOUND,
                Error::UnknownKind(_) | Error::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
                Error::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                Error::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            },
            ServerError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Io(_)
            | ServerError::Yaml(_)
            | ServerError::Serialization(_)
            | ServerError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let fields = match &self {
            ServerError::Core(Error::Validation(failure)) => failure.errors.clone(),
            _ => Vec::new(),
        };
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

fn parse_kind(kind: &str) -> Result<ContentKind> {
    kind.parse().map_err(|reason| {
        let failure = ValidationFailure {
            errors: vec![FieldError {
                field: "kind",
                value: kind.to_string(),
                reason,
                kind: FieldErrorKind::Invalid,
            }],
        };
        ServerError::Core(Error::Validation(failure))
    })
}

// --- Health and configuration ---

async fn health() -> &'static str {
    "OK"
}

async fn get_config(State(state): State<AppState>) -> Json<ConfigView> {
    Json(state.config.snapshot().await.view())
}

async fn put_config(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Result<Json<ConfigView>> {
    let config = state.config.apply(&update).await?;
    Ok(Json(config.view()))
}

// --- Lookups ---

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

impl SearchQuery {
    fn options(&self) -> SearchOptions {
        match self.limit {
            Some(limit) => SearchOptions::default().with_limit(limit),
            None => SearchOptions::default(),
        }
    }

    fn text(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

async fn list_languages(Query(query): Query<SearchQuery>) -> Json<Vec<Scored<Language>>> {
    let catalog = Catalog::with_default_languages(Vec::new());
    Json(search_languages(&catalog, query.text(), query.options()))
}

async fn list_content(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Scored<ContentItem>>>> {
    let kind = parse_kind(&kind)?;
    let catalog = state.catalog_for(kind).await?;
    Ok(Json(search_items(&catalog, kind, query.text(), query.options())))
}

async fn get_content(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ContentItem>> {
    let kind = parse_kind(&kind)?;
    let catalog = state.catalog_for(kind).await?;
    let item = catalog.get(kind, id.trim_start_matches('/'))?;
    Ok(Json(item.clone()))
}

#[derive(Debug, Default, Deserialize)]
struct BranchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

async fn suggest_branches(
    State(state): State<AppState>,
    Query(query): Query<BranchQuery>,
) -> Json<Vec<BranchCandidate>> {
    let language = query.lang.as_deref().filter(|l| !l.trim().is_empty());
    let query = query.q.as_deref().unwrap_or_default();
    Json(state.service.suggest_branches(query, language).await)
}

#[derive(Debug, Serialize)]
struct BranchValidation {
    branch: String,
    valid_name: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    /// `null` when the remote list could not be read
    exists: Option<bool>,
}

async fn validate_branch(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<BranchValidation> {
    let name = name.trim_start_matches('/').to_string();
    let reason = branch_name_problem(&name);
    let exists = match reason {
        Some(_) => Some(false),
        None => state.service.check_branch(&name).await.exists(),
    };
    Json(BranchValidation {
        valid_name: reason.is_none(),
        reason,
        exists,
        branch: name,
    })
}

// --- Issues ---

/// Preview and create request body.
#[derive(Debug, Deserialize)]
pub struct IssueRequestBody {
    pub kind: String,
    #[serde(flatten)]
    pub request: RawIssueRequest,
}

async fn preview_issue(
    State(state): State<AppState>,
    Json(body): Json<IssueRequestBody>,
) -> Result<Json<Preview>> {
    let kind = parse_kind(&body.kind)?;
    let catalog = state.catalog_for(kind).await?;
    let preview = state.service.preview(&catalog, kind, &body.request).await?;
    Ok(Json(preview))
}

async fn create_issue(
    State(state): State<AppState>,
    Json(body): Json<IssueRequestBody>,
) -> Result<(StatusCode, Json<Created>)> {
    let kind = parse_kind(&body.kind)?;
    let catalog = state.catalog_for(kind).await?;
    let created = state.service.create(&catalog, kind, &body.request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
