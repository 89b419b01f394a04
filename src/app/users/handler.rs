//! 用户处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use super::{
    model::{CreateUserRequest, HealthResponse, RebuildResponse, UpdateUserRequest},
    service::UserService,
};
use crate::core::{
    error::{AppError, AppResult},
    extract::{AppJson, AppQuery},
    response::{created, MessageResponse},
};
use crate::domain::{EventQuery, User, UserEvent};

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

// 无法解析的 ID 不可能匹配任何记录
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::user_not_found())
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Users API"))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        storage: state.user_service.backend().to_string(),
        users: state.user_service.user_count(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.user_service.list_users())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.user_service.get_user(&parse_id(&id)?)?;
    Ok(Json(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.user_service.create_user(payload)?;
    Ok(created(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    let user = state.user_service.update_user(&parse_id(&id)?, payload)?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(&parse_id(&id)?)?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

pub async fn user_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<UserEvent>>> {
    let history = state.user_service.user_history(&parse_id(&id)?)?;
    Ok(Json(history))
}

pub async fn list_events(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<EventQuery>,
) -> AppResult<Json<Vec<UserEvent>>> {
    let events = state.user_service.list_events(&query)?;
    Ok(Json(events))
}

pub async fn rebuild_projection(
    State(state): State<AppState>,
) -> AppResult<Json<RebuildResponse>> {
    let users = state.user_service.rebuild_projection()?;
    Ok(Json(RebuildResponse {
        message: "Projection rebuilt".to_string(),
        users,
    }))
}
