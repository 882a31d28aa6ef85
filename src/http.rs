//! Admin HTTP transport: the dashboard's pages as JSON endpoints.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health`
//! - `GET /onboarding`, `POST /onboarding`, `DELETE /onboarding/:id`
//! - `POST /onboarding/reorder`, body is a `DragEnd`
//! - `GET /prompt-categories`, `POST /prompt-categories/reorder`
//! - `POST /prompt-categories/:id/options/reorder`
//! - `GET /metrics`
//!
//! Reorder endpoints answer with the serialized `DragOutcome`; a rejected
//! batch is a 500 carrying the same body.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::catalog::{new_id, OnboardingSlide, PromptCategory};
use crate::config::CmsConfig;
use crate::document::{DocumentError, DocumentStore, DocumentsExt};
use crate::metrics::DashboardMetrics;
use crate::ordered::sort_by_order;
use crate::reorder::DragEnd;
use crate::scope::{FlatScope, NestedScope, OrderedScope};
use crate::session::{DragOutcome, ReorderSession};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Document(DocumentError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AdminError::Document(DocumentError::ConcurrencyConflict { .. }) => StatusCode::CONFLICT,
            AdminError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shared state behind every route.
pub struct AdminState<S> {
    pub store: S,
    pub config: CmsConfig,
}

impl<S> AdminState<S> {
    pub fn new(store: S, config: CmsConfig) -> Self {
        Self { store, config }
    }
}

#[derive(Debug, Deserialize)]
struct NewSlide {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    order: Option<u32>,
}

/// Build an axum `Router` over the given store.
pub fn router<S: DocumentStore + 'static>(state: Arc<AdminState<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/onboarding", get(list_slides::<S>).post(create_slide::<S>))
        .route("/onboarding/:id", delete(delete_slide::<S>))
        .route("/onboarding/reorder", post(reorder_slides::<S>))
        .route("/prompt-categories", get(list_prompt_categories::<S>))
        .route("/prompt-categories/reorder", post(reorder_prompt_categories::<S>))
        .route(
            "/prompt-categories/:id/options/reorder",
            post(reorder_prompt_options::<S>),
        )
        .route("/metrics", get(metrics_handler::<S>))
        .with_state(state)
}

/// Serve the admin API at `state.config.http_addr`.
pub async fn serve<S: DocumentStore + 'static>(state: Arc<AdminState<S>>) -> Result<(), std::io::Error> {
    let addr = state.config.http_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "admin api listening");
    axum::serve(listener, router(state)).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn list_slides<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
) -> Result<Json<Vec<OnboardingSlide>>, AdminError> {
    Ok(Json(state.store.documents::<OnboardingSlide>().ordered()?))
}

async fn create_slide<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
    Json(input): Json<NewSlide>,
) -> Result<(StatusCode, Json<OnboardingSlide>), AdminError> {
    let slide = OnboardingSlide {
        id: input.id.unwrap_or_else(new_id),
        title: input.title,
        description: input.description,
        image_url: input.image_url,
        order: 0,
    };
    let created = state.store.documents::<OnboardingSlide>().append(slide, input.order)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_slide<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdminError> {
    if state.store.documents::<OnboardingSlide>().delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AdminError::NotFound(id))
    }
}

async fn reorder_slides<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
    Json(drag): Json<DragEnd>,
) -> Result<Response, AdminError> {
    run_drag(&state, FlatScope::<OnboardingSlide>::new(), &drag)
}

async fn list_prompt_categories<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
) -> Result<Json<Vec<PromptCategory>>, AdminError> {
    let mut categories = state.store.documents::<PromptCategory>().ordered()?;
    for category in &mut categories {
        sort_by_order(&mut category.options);
    }
    Ok(Json(categories))
}

async fn reorder_prompt_categories<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
    Json(drag): Json<DragEnd>,
) -> Result<Response, AdminError> {
    run_drag(&state, FlatScope::<PromptCategory>::new(), &drag)
}

async fn reorder_prompt_options<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
    Path(id): Path<String>,
    Json(drag): Json<DragEnd>,
) -> Result<Response, AdminError> {
    if !state.store.documents::<PromptCategory>().exists(&id)? {
        return Err(AdminError::NotFound(id));
    }
    run_drag(&state, NestedScope::<PromptCategory>::new(id), &drag)
}

async fn metrics_handler<S: DocumentStore + 'static>(
    State(state): State<Arc<AdminState<S>>>,
) -> Result<Json<DashboardMetrics>, AdminError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    Ok(Json(DashboardMetrics::collect(&state.store, now)?))
}

/// One drag, one short-lived session. The response carries the commit
/// sequence; clients pick up the echo through their own listeners.
fn run_drag<S, Sc>(state: &AdminState<S>, scope: Sc, drag: &DragEnd) -> Result<Response, AdminError>
where
    S: DocumentStore,
    Sc: OrderedScope,
{
    let mut session = ReorderSession::open(&state.store, scope)?;
    let outcome = session.drag_end(drag);
    session.close();

    let status = match outcome {
        DragOutcome::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };
    Ok((status, Json(outcome)).into_response())
}
