//! 用户路由

use axum::{
    routing::{get, post},
    Router,
};

use super::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users).post(handler::create_user))
        .route(
            "/:id",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user),
        )
        .route("/:id/history", get(handler::user_history))
}

/// 事件日志查询与投影重建，只有事件溯源后端支持
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_events))
        .route("/rebuild", post(handler::rebuild_projection))
}
