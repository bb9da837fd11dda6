use aide::axum::{routing::get_with, ApiRouter};
use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{models, worker::GameHandle};

type JsonResult<T> = Result<Json<T>, StatusCode>;

pub(crate) fn api_routes(handle: GameHandle) -> ApiRouter {
    ApiRouter::new()
        .api_route("/stats", get_with(stats, docs::stats))
        .with_state(handle)
}

pub(crate) async fn stats(State(handle): State<GameHandle>) -> JsonResult<models::ServerStats> {
    match handle.stats().await {
        Some(stats) => Ok(Json(stats)),
        None => {
            warn!("Game worker did not answer stats request");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

pub mod docs {
    use aide::transform::TransformOperation;

    pub fn stats(op: TransformOperation) -> TransformOperation {
        op.description("Count open rooms, seated players and games in progress.")
    }
}
