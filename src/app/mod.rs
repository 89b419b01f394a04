//! 应用层：HTTP 路由装配

pub mod users;

use axum::{middleware, routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::{build_repository, Config, EventBus};
use users::{handler, AppState, UserService};

/// 按配置构建服务层：存储后端 + 事件总线
pub fn build_state(config: &Config) -> AppState {
    let repository = build_repository(config.storage.backend);
    let events = EventBus::new(config.storage.event_bus_capacity);
    AppState {
        user_service: UserService::new(repository, events),
    }
}

/// 组装完整的路由与中间件
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handler::root))
        .route("/health", get(handler::health_check))
        .nest("/api/users", users::routes::routes())
        .nest("/api/events", users::routes::event_routes())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
