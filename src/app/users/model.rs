//! 用户接口的数据模型

use crate::domain::UserPatch;
use serde::{Deserialize, Serialize};

/// 创建用户请求
///
/// 字段都是可选的，缺失时由校验返回 400，而不是反序列化失败。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 更新用户请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            name: req.name,
            email: req.email,
        }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub users: usize,
    pub timestamp: String,
}

/// 投影重建结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub message: String,
    pub users: usize,
}
