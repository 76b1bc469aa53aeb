//! Request handlers and the router.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | dashboard front page (`index.html` from the assets dir) |
//! | `GET /json/` | registry snapshot as a JSON array |
//! | `GET /config/` | settings the dashboard script needs |
//! | `GET /stats/` | ingestion counters |
//! | `POST /delete/` | delete one datasource (form field `datasourcename`) |
//! | `GET /assets/*` | static files below the assets dir |

use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gn_core::DeleteError;
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::AppState;

const MISSING_INDEX: &str = "<b>Fatal Error</b>: index.html file not found.";

pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.settings.assets_dir);
    Router::new()
        .route("/", get(frontpage))
        .route("/json/", get(json_snapshot))
        .route("/config/", get(client_config))
        .route("/stats/", get(stats))
        .route("/delete/", post(delete))
        .nest_service("/assets", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

async fn frontpage(State(state): State<AppState>) -> Html<String> {
    let index = state.settings.assets_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(body) => Html(body),
        Err(err) => {
            tracing::warn!(path = %index.display(), error = %err, "front page unavailable");
            Html(MISSING_INDEX.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

async fn json_snapshot(State(state): State<AppState>) -> Response {
    // Copy under the read lock, serialise after it is released.
    let snapshot = state.registry.snapshot();
    match serde_json::to_vec(&snapshot) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialise registry snapshot");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ClientConfig {
    json_pull_interval: u64,
    #[serde(rename = "GraphiteURL")]
    graphite_url: String,
    allow_ds_deletes: bool,
    version: &'static str,
}

async fn client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    let s = &state.settings;
    Json(ClientConfig {
        json_pull_interval: s.json_pull_interval_ms,
        graphite_url: s.graphite_url.clone(),
        allow_ds_deletes: s.allow_delete,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (key, value) in state.stats.to_map() {
        map.insert(key.to_string(), value.into());
    }
    map.insert("registry/resident".to_string(), state.registry.len().into());
    Json(serde_json::Value::Object(map))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DeleteForm {
    datasourcename: String,
}

async fn delete(State(state): State<AppState>, Form(form): Form<DeleteForm>) -> Response {
    if !state.settings.allow_delete {
        return (StatusCode::FORBIDDEN, "deleting datasources is disabled").into_response();
    }

    let name = form.datasourcename;
    match gn_core::try_delete(&state.registry, &name).await {
        Ok(path) => {
            tracing::info!(name = %name, path = %path.display(), "deleted datasource");
            (StatusCode::OK, format!("deleted {name}")).into_response()
        }
        Err(err) => {
            tracing::warn!(name = %name, error = %err, "datasource delete failed");
            let status = match err {
                DeleteError::NotRegistered(_)
                | DeleteError::NoBackingFile(_)
                | DeleteError::FileMissing(_) => StatusCode::NOT_FOUND,
                DeleteError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, err.to_string()).into_response()
        }
    }
}
