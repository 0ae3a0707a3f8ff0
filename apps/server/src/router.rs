use axum::Router;
use catmash::kernel::prelude::ApiState;
use catmash::server::router::{arena_router, system_router};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Catmash", description = "Pick the cuter cat, climb the leaderboard"))]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    let storage = state.config.storage.clone();

    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(system_router())
        .merge(arena_router())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/docs", api_doc);

    // The game client lives next to the API; unknown paths resolve against its directory.
    Router::new()
        .merge(api_routes)
        .merge(scalar_routes)
        .route_service("/", ServeFile::new(storage.index_path()))
        .fallback_service(ServeDir::new(&storage.static_dir))
        .layer(TraceLayer::new_for_http())
}
