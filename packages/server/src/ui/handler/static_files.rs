//! Static file handlers for the browser client.

use std::{path::Path, sync::Arc};

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::ui::state::AppState;

/// Files the server is willing to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Index,
    ClientScript,
    Stylesheet,
}

impl Asset {
    pub fn file_name(self) -> &'static str {
        match self {
            Asset::Index => "index.html",
            Asset::ClientScript => "client.js",
            Asset::Stylesheet => "style.css",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Asset::Index => "text/html",
            Asset::ClientScript => "application/javascript",
            Asset::Stylesheet => "text/css",
        }
    }
}

/// Read an asset from `public_dir` and build the response.
///
/// A read failure yields 500 with a plain-text body and no partial content.
pub async fn serve_asset(public_dir: &Path, asset: Asset) -> Response {
    let path = public_dir.join(asset.file_name());
    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, asset.content_type())], body).into_response(),
        Err(e) => {
            tracing::error!("Failed to read '{}': {}", path.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error loading {}", asset.file_name()),
            )
                .into_response()
        }
    }
}

/// `GET /index.html`
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state.public_dir, Asset::Index).await
}

/// `GET /client.js`
pub async fn client_script(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state.public_dir, Asset::ClientScript).await
}

/// `GET /style.css`
pub async fn stylesheet(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state.public_dir, Asset::Stylesheet).await
}

/// Fallback for every other path
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
