//! 用户资源：处理器、服务与数据模型

pub mod handler;
pub mod model;
pub mod routes;
pub mod service;

pub use handler::AppState;
pub use service::UserService;
