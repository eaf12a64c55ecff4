use axum::{
    extract::{FromRequest, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use application::{CreateEventRequest, EventSummaryDto};
use domain::EventId;

use crate::{error::ApiError, state::AppState};

/// 与 `Json` 相同，解析失败时返回统一的 `{code, message}` 错误体
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct JsonBody<T>(T);

#[derive(Debug, Deserialize)]
struct CreateEventPayload {
    title: String,
    host: String,
    public_description: String,
    vault_details: String,
    #[serde(default)]
    is_published: bool,
}

#[derive(Debug, Serialize)]
struct CreateEventResponse {
    status: &'static str,
    event_id: i64,
    title: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events/", get(list_events))
        .route("/events", get(list_events))
        .route("/events/create/", post(create_event))
        .route("/events/create", post(create_event))
        .route("/events/{id}", get(get_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn create_event(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEventPayload>,
) -> Result<Json<CreateEventResponse>, ApiError> {
    let created = state
        .event_service
        .create_event(CreateEventRequest {
            title: payload.title,
            host: payload.host,
            public_description: payload.public_description,
            vault_details: payload.vault_details,
            is_published: payload.is_published,
        })
        .await?;

    Ok(Json(CreateEventResponse {
        status: "Success",
        event_id: created.id.value(),
        title: created.title,
    }))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventSummaryDto>>, ApiError> {
    let events = state.event_service.list_events().await?;
    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EventSummaryDto>, ApiError> {
    let event = state.event_service.get_event(EventId::from(id)).await?;
    Ok(Json(event))
}
