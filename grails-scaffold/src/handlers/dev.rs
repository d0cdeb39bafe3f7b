//! Development scaffolding endpoints
//!
//! - `GET /dev/models` lists registered entities
//! - `POST /dev` scaffolds one entity
//!
//! Scaffold requests are serialized: the whole generate-then-merge sequence
//! runs under one lock, so two concurrent submissions never interleave their
//! reads and writes of the shared artifacts.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::config::ScaffoldConfig;
use crate::error::ScaffoldError;
use crate::scaffold::{EntitySpec, FieldSpec};
use crate::scaffolder::{ScaffoldOptions, Scaffolder};
use crate::store::ArtifactStore;

/// Shared state of the dev router
#[derive(Clone)]
pub struct DevState {
    config: Arc<ScaffoldConfig>,
    store: Arc<dyn ArtifactStore>,
    lock: Arc<Mutex<()>>,
}

impl DevState {
    /// Create state for a project
    #[must_use]
    pub fn new(config: ScaffoldConfig, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Project configuration
    #[must_use]
    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }
}

/// Entity as submitted by the dev UI
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldData {
    /// Table name
    pub table_name: String,
    /// Referenced table; empty means none
    #[serde(default)]
    pub ref_table_name: String,
    /// Ordered field list
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl From<ScaffoldData> for EntitySpec {
    fn from(data: ScaffoldData) -> Self {
        Self::new(data.table_name, data.fields).with_reference(data.ref_table_name)
    }
}

/// `POST /dev` body
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldRequest {
    /// Entity to scaffold
    pub scaffold_data: ScaffoldData,
    /// Regenerate an already registered entity
    #[serde(default)]
    pub replace: bool,
}

/// Errors returned by the dev endpoints
#[derive(Debug)]
pub enum DevError {
    /// Request body could not be decoded
    BadRequest(String),
    /// The scaffold pipeline failed
    Scaffold(ScaffoldError),
    /// The blocking scaffold task did not complete
    Internal(String),
}

impl From<ScaffoldError> for DevError {
    fn from(err: ScaffoldError) -> Self {
        Self::Scaffold(err)
    }
}

impl IntoResponse for DevError {
    fn into_response(self) -> Response {
        let (status, message, rejected) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message, true),
            Self::Scaffold(err) => (
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                err.to_string(),
                err.is_client_error(),
            ),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, false),
        };

        if rejected {
            tracing::warn!(%status, error = %message, "scaffold request rejected");
        } else {
            tracing::error!(%status, error = %message, "scaffold request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the dev router
pub fn router(state: DevState) -> Router {
    Router::new()
        .route("/dev/models", get(list_models))
        .route("/dev", post(scaffold))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the dev router until the process exits
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: DevState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "dev server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// List registered entities
///
/// GET /dev/models
async fn list_models(State(state): State<DevState>) -> Result<Json<serde_json::Value>, DevError> {
    let _guard = state.lock.lock().await;
    let registry = Scaffolder::new(&state.config, state.store.as_ref()).registry()?;
    Ok(Json(json!({ "models": registry.names() })))
}

/// Scaffold one entity
///
/// POST /dev
async fn scaffold(
    State(state): State<DevState>,
    payload: Result<Json<ScaffoldRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, DevError> {
    let Json(request) = payload.map_err(|rejection| DevError::BadRequest(rejection.body_text()))?;
    let options = ScaffoldOptions {
        replace: request.replace,
        dry_run: false,
    };
    let entity = EntitySpec::from(request.scaffold_data);

    let _guard = state.lock.lock().await;
    let config = Arc::clone(&state.config);
    let store = Arc::clone(&state.store);
    let report = tokio::task::spawn_blocking(move || {
        Scaffolder::new(&config, store.as_ref()).scaffold(&entity, options)
    })
    .await
    .map_err(|err| DevError::Internal(format!("scaffold task failed: {err}")))??;

    Ok(Json(json!({
        "message": format!("Scaffolded {} ({} files written)", report.identifier, report.written()),
        "action": "migrate",
        "actionParam": report.table_name,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_scaffold_data_into_entity() {
        let data: ScaffoldData = serde_json::from_str(
            r#"{"tableName":"order_item","refTableName":"","fields":[{"name":"quantity","type":"INT"}]}"#,
        )
        .unwrap();
        let entity = EntitySpec::from(data);

        assert_eq!(entity.table_name, "order_item");
        assert_eq!(entity.reference_table, None);
        assert_eq!(entity.fields, vec![FieldSpec::new("quantity", "INT")]);
    }

    #[test]
    fn test_error_status() {
        let response = DevError::Scaffold(ScaffoldError::DuplicateEntity("Post".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = DevError::BadRequest("missing field".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            DevError::Scaffold(ScaffoldError::malformed("internals/routes.go", "no terminator"))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_state_exposes_config() {
        let state = DevState::new(ScaffoldConfig::default(), Arc::new(MemoryStore::new()));
        assert_eq!(state.config().project_name, "app");
    }
}
