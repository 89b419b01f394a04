//! # 用户 CRUD 的多架构实现
//!
//! 同一个用户资源（创建、读取、更新、删除）只实现一次，分层如下：
//! - `app`：HTTP 处理器与服务层
//! - `core`：错误、响应、提取器与中间件
//! - `domain`：实体、值对象、事件与存储端口
//! - `infrastructure`：内存存储、事件溯源存储、事件总线、配置与日志
//!
//! 存储后端通过配置在 `memory` 与 `event_sourced` 之间切换。

pub mod app;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use app::{build_router, build_state};
pub use crate::core::error::{AppError, AppResult};
