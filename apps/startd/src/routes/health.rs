use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus a summary of the current screen.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let screen = state.screen.lock().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "startd",
        "tiles": screen.tiles().len(),
        "pages": screen.layout().page_count(),
        "last_reload": screen.last_reload(),
    }))
}
