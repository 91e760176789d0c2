pub mod error;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adapters::http::state::HttpState;

/// Margen para las cabeceras y delimitadores del cuerpo multipart.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: HttpState) -> Router {
    let body_limit = state
        .detection
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(routes::root))
        .route("/detect", post(routes::detect))
        .layer(DefaultBodyLimit::max(body_limit))
        // Cualquier origen, método y cabecera, con credenciales: sólo para desarrollo.
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
