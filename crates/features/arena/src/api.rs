//! HTTP endpoints of the arena.

use crate::{Arena, Cat, MatchRequest, MatchResponse, ReloadResponse};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use catmash_derive::api_handler;
use catmash_kernel::domain::constants::ARENA_TAG;
use catmash_kernel::server::{ApiError, ApiState, ErrorBody};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Game endpoints under `/api`.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(top_handler))
        .routes(routes!(random_handler))
        .routes(routes!(submit_match_handler))
        .routes(routes!(reload_handler))
}

fn arena(state: &ApiState) -> Result<&Arena, ApiError> {
    Ok(state.try_get_slice::<Arena>()?)
}

#[api_handler(
    get,
    path = "/api/top",
    responses((status = OK, description = "Highest rated cats first", body = Vec<Cat>)),
    tag = ARENA_TAG,
)]
pub async fn top_handler(State(state): State<ApiState>) -> Result<Json<Vec<Cat>>, ApiError> {
    Ok(Json(arena(&state)?.leaderboard()))
}

#[api_handler(
    get,
    path = "/api/random",
    responses(
        (status = OK, description = "Two distinct cats", body = [Cat]),
        (status = CONFLICT, description = "Fewer than two cats loaded", body = ErrorBody),
    ),
    tag = ARENA_TAG,
)]
pub async fn random_handler(State(state): State<ApiState>) -> Result<Json<[Cat; 2]>, ApiError> {
    Ok(Json(arena(&state)?.registry.random_pair()?))
}

#[api_handler(
    post,
    path = "/api/match",
    request_body = MatchRequest,
    responses(
        (status = OK, description = "Winner after the update and its next opponent", body = MatchResponse),
        (status = BAD_REQUEST, description = "Malformed body, unknown cat or self match", body = ErrorBody),
    ),
    tag = ARENA_TAG,
)]
pub async fn submit_match_handler(
    State(state): State<ApiState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let Json(request) = payload?;
    let (winner, new_opponent) =
        arena(&state)?.registry.apply_match_result(&request.winner_id, &request.loser_id)?;

    Ok(Json(MatchResponse { winner, new_opponent }))
}

#[api_handler(
    post,
    path = "/api/reload",
    responses(
        (status = OK, description = "Cats reloaded from the content provider", body = ReloadResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Content provider failure", body = ErrorBody),
    ),
    tag = ARENA_TAG,
)]
pub async fn reload_handler(
    State(state): State<ApiState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let report = arena(&state)?.reload().await?;
    info!(kept = report.kept, added = report.added, dropped = report.dropped, "Cats reloaded");

    Ok(Json(ReloadResponse { message: report.to_string() }))
}
