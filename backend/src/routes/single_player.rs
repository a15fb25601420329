use crate::{
    error::GameError,
    models::{GameModelUi, PreparingModel},
    AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/random_battlefield", post(random_battlefield))
        .route("/game/{game_id}", get(get_game).delete(delete_game))
}

/// Create a game against the bot, or re-roll the battlefield of a known player
pub async fn random_battlefield(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PreparingModel>,
) -> Result<Json<GameModelUi>, GameError> {
    tracing::debug!(
        "Random battlefield requested by {} ({:?})",
        payload.player_name,
        payload.player_id
    );

    let session = state
        .games
        .create_or_update(payload.player_id, &payload.player_name)?;
    Ok(Json(GameModelUi::from(&session)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameModelUi>, GameError> {
    let session = state.games.get_game(game_id)?;
    Ok(Json(GameModelUi::from(&session)))
}

pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<(), GameError> {
    state.games.delete_game(game_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Config, GameConfig, UnknownPlayerPolicy},
        routes::create_routes,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SINGLE_PLAYER_ENDPOINT: &str = "/single_player";

    fn create_test_app(policy: UnknownPlayerPolicy) -> Router {
        let config = Config {
            game: GameConfig {
                unknown_player_policy: policy,
                ..GameConfig::default()
            },
            ..Config::default()
        };
        create_routes().with_state(Arc::new(AppState::new(config)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn read_game(response: Response) -> GameModelUi {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn random_battlefield_request(
        app: &Router,
        player_id: Option<Uuid>,
        player_name: &str,
    ) -> Response {
        send(
            app,
            Method::POST,
            &format!("{}/random_battlefield", SINGLE_PLAYER_ENDPOINT),
            Some(json!({ "playerId": player_id, "playerName": player_name })),
        )
        .await
    }

    #[tokio::test]
    async fn test_random_battlefield_creates_then_regenerates() {
        let app = create_test_app(UnknownPlayerPolicy::Reject);

        let response = random_battlefield_request(&app, None, "Name").await;
        assert_eq!(response.status(), StatusCode::OK);
        let new_model = read_game(response).await;

        assert_eq!(new_model.player_model.player_name, "Name");
        assert_eq!(new_model.player_model.size_of_ships, 10);
        assert_eq!(new_model.enemy_model.player_name, "Bot");
        assert_eq!(new_model.active_player, new_model.player_model.player_id);

        let response =
            random_battlefield_request(&app, Some(new_model.player_model.player_id), "Name").await;
        assert_eq!(response.status(), StatusCode::OK);
        let changed_model = read_game(response).await;

        assert_eq!(new_model.game_id, changed_model.game_id);
        assert_eq!(new_model.enemy_model, changed_model.enemy_model);
        assert_eq!(
            new_model.player_model.player_id,
            changed_model.player_model.player_id
        );
        assert_eq!(
            new_model.player_model.player_name,
            changed_model.player_model.player_name
        );
        assert_ne!(
            new_model.player_model.battle_field,
            changed_model.player_model.battle_field,
            "Battlefield should change when regenerated"
        );
    }

    #[tokio::test]
    async fn test_delete_game() {
        let app = create_test_app(UnknownPlayerPolicy::Reject);

        let response = random_battlefield_request(&app, None, "Name").await;
        let model = read_game(response).await;
        let game_uri = format!("{}/game/{}", SINGLE_PLAYER_ENDPOINT, model.game_id);

        let response = send(&app, Method::DELETE, &game_uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, &game_uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, &game_uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            random_battlefield_request(&app, Some(model.player_model.player_id), "Name").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_game_returns_current_view() {
        let app = create_test_app(UnknownPlayerPolicy::Reject);
        let created = read_game(random_battlefield_request(&app, None, "Name").await).await;

        let response = send(
            &app,
            Method::GET,
            &format!("{}/game/{}", SINGLE_PLAYER_ENDPOINT, created.game_id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_game(response).await, created);
    }

    #[tokio::test]
    async fn test_unknown_player_policy() {
        let rejecting = create_test_app(UnknownPlayerPolicy::Reject);
        let response = random_battlefield_request(&rejecting, Some(Uuid::new_v4()), "Name").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let creating = create_test_app(UnknownPlayerPolicy::Create);
        let unknown = Uuid::new_v4();
        let response = random_battlefield_request(&creating, Some(unknown), "Name").await;
        assert_eq!(response.status(), StatusCode::OK);
        let model = read_game(response).await;
        assert_ne!(model.player_model.player_id, unknown);
    }

    #[tokio::test]
    async fn test_invalid_requests_rejected() {
        let app = create_test_app(UnknownPlayerPolicy::Reject);

        let response = random_battlefield_request(&app, None, "  ").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            &format!("{}/random_battlefield", SINGLE_PLAYER_ENDPOINT),
            Some(json!({ "playerId": "not-a-uuid", "playerName": "Name" })),
        )
        .await;
        assert!(response.status().is_client_error());

        let response = send(
            &app,
            Method::DELETE,
            &format!("{}/game/not-a-uuid", SINGLE_PLAYER_ENDPOINT),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app(UnknownPlayerPolicy::Reject);
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "battleship-backend");
        assert_eq!(body["active_games"], 0);

        random_battlefield_request(&app, None, "Name").await;
        let response = send(&app, Method::GET, "/health", None).await;
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["active_games"], 1);
    }
}
