pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::store::NeolightStore;
use handlers::ApiDoc;

/// State shared by all handlers: the one store handle created at startup.
pub struct AppState<S> {
    pub store: Arc<S>,
}

// Manual impl so `S` itself need not be `Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

pub fn router<S: NeolightStore>(store: Arc<S>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/neolight/{name}",
            get(handlers::get_neolight::<S>).put(handlers::put_neolight::<S>),
        )
        .with_state(AppState { store })
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
