//! 核心响应处理模块
//!
//! 成功响应直接返回资源本身（不做信封包装），这里只放几个公共形状。

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// 只携带一条消息的响应，例如删除成功或根路径欢迎信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 201 Created + JSON 主体
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
