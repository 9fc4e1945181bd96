pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::layout::handlers as layout_handlers;
use crate::source::handlers as source_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tiles and layout
        .route("/api/v1/tiles", get(layout_handlers::handle_get_tiles))
        .route("/api/v1/tiles/reload", post(source_handlers::handle_reload))
        .route("/api/v1/tiles/move", post(layout_handlers::handle_move))
        .route(
            "/api/v1/tiles/:id/size",
            patch(layout_handlers::handle_resize),
        )
        .route(
            "/api/v1/tiles/:id/launch",
            post(source_handlers::handle_launch_tile),
        )
        .route(
            "/api/v1/tiles/:id/pin",
            delete(source_handlers::handle_unpin),
        )
        // Drag and drop
        .route(
            "/api/v1/drag/begin",
            post(layout_handlers::handle_begin_drag),
        )
        .route(
            "/api/v1/drag/complete",
            post(layout_handlers::handle_complete_drag),
        )
        .route(
            "/api/v1/drag/cancel",
            post(layout_handlers::handle_cancel_drag),
        )
        .route("/api/v1/hit-test", post(layout_handlers::handle_hit_test))
        // Program catalog
        .route("/api/v1/catalog", get(source_handlers::handle_catalog))
        .route("/api/v1/catalog/pin", post(source_handlers::handle_pin))
        .route(
            "/api/v1/catalog/launch",
            post(source_handlers::handle_launch_catalog),
        )
        .with_state(state)
}
