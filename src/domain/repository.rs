//! 存储端口：领域层需要的持久化操作

use super::{
    events::{EventQuery, UserEvent},
    user::{User, UserPatch},
};
use crate::core::error::{AppError, AppResult};
use uuid::Uuid;

/// 用户存储
///
/// 每个操作相对其他操作都是原子的，实现方负责加锁。
/// 校验失败的 `update` 不得修改已存储的记录。
pub trait UserRepository: Send + Sync {
    /// 后端名称，用于健康检查和日志
    fn backend(&self) -> &'static str;

    /// 插入一条已校验的记录，ID 冲突时返回 `DuplicateId`
    fn create(&self, user: User) -> AppResult<User>;

    fn get_by_id(&self, id: &Uuid) -> AppResult<User>;

    /// 当前所有记录的快照
    fn list(&self) -> Vec<User>;

    /// 先查找（不存在返回 `NotFound`），再校验并应用补丁
    fn update(&self, id: &Uuid, patch: &UserPatch) -> AppResult<User>;

    /// 删除并返回被删除的记录
    fn remove(&self, id: &Uuid) -> AppResult<User>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 聚合的事件历史，只有事件溯源后端会记录
    fn history(&self, _id: &Uuid) -> AppResult<Vec<UserEvent>> {
        Err(not_recorded(self.backend()))
    }

    /// 按类型和时间范围查询整个事件日志
    fn events(&self, _query: &EventQuery) -> AppResult<Vec<UserEvent>> {
        Err(not_recorded(self.backend()))
    }

    /// 丢弃读模型并从事件日志重建，返回重建后的用户数
    fn rebuild(&self) -> AppResult<usize> {
        Err(not_recorded(self.backend()))
    }
}

fn not_recorded(backend: &str) -> AppError {
    AppError::NotFound(format!(
        "Event history is not recorded by the {backend} storage backend"
    ))
}
