// File: services/pushping_backend/src/lib.rs
//! Wiring for the pushping service: state construction and the HTTP router.

pub mod app_state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use app_state::AppState;

/// The full HTTP surface: registration routes, request tracing and, with the
/// `openapi` feature, Swagger UI at `/docs`.
pub fn build_router(state: &AppState) -> Router {
    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = pushping_registry::routes(state.token_store());

    #[cfg(feature = "openapi")]
    {
        use pushping_registry::openapi::RegistryApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "pushping API",
                version = "0.1.0",
                description = "Push token registry"
            ),
            tags((name = "Registry", description = "Device push token registration")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(RegistryApiDoc::openapi());
        tracing::info!("📖 Adding Swagger UI at /docs");

        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}
