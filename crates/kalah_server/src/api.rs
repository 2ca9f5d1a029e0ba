//! REST interface over [`KalahService`].

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use kalah_core::{Game, Player};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

use crate::service::{KalahService, ServiceError};
use crate::store::StoreError;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: KalahService,
    base_url: String,
}

impl AppState {
    /// Creates handler state. `base_url` prefixes every returned game URL.
    pub fn new(service: KalahService, base_url: impl Into<String>) -> Self {
        Self {
            service,
            base_url: base_url.into(),
        }
    }
}

/// JSON rendering of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: String,
    /// Where the game can be fetched.
    pub url: String,
    /// Stone count per 1-based position.
    pub status: BTreeMap<usize, u32>,
    /// Player to move, absent before the first move and after the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_player: Option<Player>,
    /// Winner of a finished game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    /// Result of a finished game, e.g. `PLAYER1 wins` or `Draw`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl GameView {
    /// Renders a game, deriving its URL from `base_url`.
    pub fn from_game(game: &Game, base_url: &str) -> Self {
        Self {
            id: game.id().to_string(),
            url: game_url(base_url, game.id()),
            status: game.describe(),
            next_player: game.next_player(),
            winner: game.winner(),
            outcome: game.outcome().map(|outcome| outcome.to_string()),
        }
    }
}

/// Joins `base_url` and `id` with exactly one `/`.
pub fn game_url(base_url: &str, id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable messages.
    pub errors: Vec<String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Move(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Setup(_) | ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = %status, "Request rejected");
        }
        let body = ErrorResponse {
            errors: vec![self.to_string()],
        };
        (status, Json(body)).into_response()
    }
}

/// Error returned by the handlers.
#[derive(Debug, derive_more::From)]
pub enum ApiError {
    /// The service refused or failed the request.
    Service(ServiceError),
    /// A path segment did not parse.
    Path(PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(e) => e.into_response(),
            ApiError::Path(rejection) => {
                let status = rejection.status();
                let message = rejection.body_text();
                warn!(error = %message, status = %status, "Path rejected");
                let body = ErrorResponse {
                    errors: vec![message],
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Builds the game router with request logging.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{game_id}", get(get_game).delete(delete_game))
        .route("/games/{game_id}/pits/{pit_id}", put(make_move))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Runs blocking store work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Store(StoreError::new(format!("Worker task failed: {}", e))))?
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GameView>), ServiceError> {
    let service = state.service.clone();
    let game = blocking(move || service.create_game()).await?;
    Ok((
        StatusCode::CREATED,
        Json(GameView::from_game(&game, &state.base_url)),
    ))
}

#[instrument(skip(state, path))]
async fn make_move(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> Result<Json<GameView>, ApiError> {
    let Path((game_id, pit_id)) = path?;
    let service = state.service.clone();
    let game = blocking(move || service.make_move(&game_id, pit_id)).await?;
    Ok(Json(GameView::from_game(&game, &state.base_url)))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ServiceError> {
    let service = state.service.clone();
    let game = blocking(move || service.fetch_game(&game_id)).await?;
    Ok(Json(GameView::from_game(&game, &state.base_url)))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    let service = state.service.clone();
    blocking(move || service.delete_game(&game_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kalah_core::{Board, Outcome, create_game};

    #[test]
    fn test_game_url_joins_once() {
        assert_eq!(game_url("http://h/games/", "ab12"), "http://h/games/ab12");
        assert_eq!(game_url("http://h/games", "ab12"), "http://h/games/ab12");
    }

    #[test]
    fn test_view_of_fresh_game_omits_optional_fields() {
        let game = create_game("ab12cd".to_string(), 6).unwrap();
        let json = serde_json::to_value(GameView::from_game(&game, "http://h/games/")).unwrap();
        assert_eq!(json["id"], "ab12cd");
        assert_eq!(json["url"], "http://h/games/ab12cd");
        assert_eq!(json["status"]["1"], 6);
        assert_eq!(json["status"]["7"], 0);
        assert!(json.get("next_player").is_none());
        assert!(json.get("winner").is_none());
        assert!(json.get("outcome").is_none());
    }

    #[test]
    fn test_view_of_finished_game() {
        let game = Game::from_parts(
            "done".to_string(),
            Board::with_stones([0, 0, 0, 0, 0, 0, 40, 0, 0, 0, 0, 0, 0, 32]),
            None,
            Some(Outcome::Winner(Player::Player1)),
        );
        let json = serde_json::to_value(GameView::from_game(&game, "http://h/games/")).unwrap();
        assert_eq!(json["winner"], "PLAYER1");
        assert_eq!(json["outcome"], "PLAYER1 wins");
        assert_eq!(json["status"]["14"], 32);
    }
}
