use super::health;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Infrastructure endpoints (`/health`), generic over the router state.
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    // Touch the clock so uptime counts from router construction, not the first probe.
    std::sync::LazyLock::force(&health::START_TIME);
    OpenApiRouter::<S>::new().routes(routes!(health::health_handler))
}
