// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! REST API over the project store.
//!
//! Routes:
//! - `GET /api/projects`
//! - `GET /api/projects/:id`
//! - `PATCH /api/projects/:id` with `{ title?, year? }`

use crate::error::{ApiError, ErrorBody};
use crate::models::project::{Project, ProjectId, ProjectPatch};
use crate::store::ProjectStore;
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ProjectStore>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody { message: self.message() })).into_response()
    }
}

/// Build the API router around `store`.
pub fn build_router(store: Arc<dyn ProjectStore>) -> Router {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id", get(get_project).patch(update_project))
        .layer(middleware::from_fn(log_request))
        .with_state(AppState { store })
}

/// Bind `bind_addr` and serve the API until the process exits.
pub async fn serve(bind_addr: &str, store: Arc<dyn ProjectStore>) -> Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    log::info!("API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(store))
        .await
        .context("API server stopped")?;
    Ok(())
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    log::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.store.list())
}

async fn get_project(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&raw_id)?;
    state.store.get(id).map(Json).ok_or_else(ApiError::project_not_found)
}

async fn update_project(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Project>, ApiError> {
    let id = parse_id(&raw_id)?;
    let patch = validate_patch(&body)?;
    state
        .store
        .update(id, &patch)
        .map(Json)
        .ok_or_else(ApiError::project_not_found)
}

/// Non-integers are bad requests; integers no project can have are unknown.
fn parse_id(raw: &str) -> Result<ProjectId, ApiError> {
    let id: i64 = raw
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid project ID".to_string()))?;
    ProjectId::try_from(id).map_err(|_| ApiError::project_not_found())
}

/// Decode and check a PATCH body.
fn validate_patch(body: &[u8]) -> Result<ProjectPatch, ApiError> {
    let patch: ProjectPatch = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request: {}", e)))?;

    if patch.is_empty() {
        return Err(ApiError::BadRequest("At least one field must be provided".to_string()));
    }
    if let Some(ref title) = patch.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("Title is required".to_string()));
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::client::{ApiClient, ProjectApi};
    use crate::store::MemoryStore;

    async fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let app = build_router(Arc::new(MemoryStore::with_seed()));
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
        format!("http://{}", addr)
    }

    #[test]
    fn test_validate_patch_messages() {
        assert_eq!(
            validate_patch(b"{}").unwrap_err(),
            ApiError::BadRequest("At least one field must be provided".into())
        );
        assert_eq!(
            validate_patch(br#"{"title":"   "}"#).unwrap_err(),
            ApiError::BadRequest("Title is required".into())
        );
        assert!(matches!(validate_patch(br#"{"year":"soon"}"#), Err(ApiError::BadRequest(_))));
        assert!(matches!(validate_patch(b""), Err(ApiError::BadRequest(_))));
        assert_eq!(validate_patch(br#"{"year":2025}"#).unwrap(), ProjectPatch::year(2025));
    }

    #[test]
    fn test_parse_id_rejects_non_integers() {
        assert_eq!(parse_id("3").unwrap(), 3);
        assert_eq!(parse_id("abc"), Err(ApiError::BadRequest("Invalid project ID".into())));
        assert_eq!(parse_id("2.5"), Err(ApiError::BadRequest("Invalid project ID".into())));
        assert_eq!(parse_id("-1"), Err(ApiError::project_not_found()));
        assert_eq!(parse_id("99999999999"), Err(ApiError::project_not_found()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_endpoints_through_client() {
        let base = spawn_server().await;

        let results = tokio::task::spawn_blocking(move || {
            let client = ApiClient::new(&base);
            let listed = client.list_projects().expect("list");
            let first = client.get_project(3).expect("get");
            let missing = client.get_project(42).unwrap_err();
            let updated = client.update_project(3, &ProjectPatch::title("  Explorer  ")).expect("patch");
            let rejected = client.update_project(3, &ProjectPatch::title(" ")).unwrap_err();
            let unknown = client.update_project(42, &ProjectPatch::year(2020)).unwrap_err();
            (listed, first, missing, updated, rejected, unknown)
        })
        .await
        .expect("client thread");

        let (listed, first, missing, updated, rejected, unknown) = results;
        assert_eq!(listed.len(), 6);
        assert_eq!(listed[0].year, 2023);
        assert_eq!(first.title, "Neural Network Explorer");
        assert_eq!(missing, ApiError::project_not_found());
        assert_eq!(updated.title, "Explorer");
        assert_eq!(rejected, ApiError::BadRequest("Title is required".into()));
        assert!(unknown.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_id_and_empty_body_are_bad_requests() {
        let base = spawn_server().await;

        let (bad_id, empty_body) = tokio::task::spawn_blocking(move || {
            let bad_id = ureq::get(&format!("{}/api/projects/abc", base)).call();
            let empty_body = ureq::request("PATCH", &format!("{}/api/projects/1", base))
                .send_json(serde_json::json!({}));
            (bad_id, empty_body)
        })
        .await
        .expect("client thread");

        match bad_id {
            Err(ureq::Error::Status(400, response)) => {
                let body: ErrorBody = response.into_json().expect("error body");
                assert_eq!(body.message, "Invalid project ID");
            }
            other => panic!("expected 400, got {:?}", other.map(|r| r.status())),
        }
        assert!(matches!(empty_body, Err(ureq::Error::Status(400, _))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_negative_id_is_not_found() {
        let base = spawn_server().await;

        let (get, patch) = tokio::task::spawn_blocking(move || {
            let get = ureq::get(&format!("{}/api/projects/-1", base)).call();
            let patch = ureq::request("PATCH", &format!("{}/api/projects/-1", base))
                .send_json(serde_json::json!({ "year": 2020 }));
            (get, patch)
        })
        .await
        .expect("client thread");

        assert!(matches!(get, Err(ureq::Error::Status(404, _))));
        assert!(matches!(patch, Err(ureq::Error::Status(404, _))));
    }
}
