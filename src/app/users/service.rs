//! 用户业务服务
//!
//! 命令：`create_user` / `update_user` / `delete_user`，成功后在事件总线上发布通知；
//! 查询：`get_user` / `list_users` / `user_history` / `list_events`，不产生副作用。
//!
//! 写操作和通知发布在同一把锁内完成，订阅者看到的通知顺序与存储中的写入顺序一致。

use super::model::{CreateUserRequest, UpdateUserRequest};
use crate::core::error::AppResult;
use crate::domain::{EventQuery, User, UserEvent, UserNotification, UserPatch, UserRepository};
use crate::infrastructure::EventBus;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    events: EventBus,
    writes: Arc<Mutex<()>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, events: EventBus) -> Self {
        Self {
            repository,
            events,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    pub fn user_count(&self) -> usize {
        self.repository.len()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[instrument(skip(self, req))]
    pub fn create_user(&self, req: CreateUserRequest) -> AppResult<User> {
        let user = User::new(
            Uuid::new_v4(),
            req.name.as_deref().unwrap_or_default(),
            req.email.as_deref().unwrap_or_default(),
            Utc::now(),
        )?;

        let _write = self.writes.lock();
        let user = self.repository.create(user)?;
        info!(user_id = %user.id, "用户创建成功");

        self.events.publish(UserNotification::Created(user.clone()));
        Ok(user)
    }

    pub fn get_user(&self, id: &Uuid) -> AppResult<User> {
        self.repository.get_by_id(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.repository.list()
    }

    #[instrument(skip(self, id, req), fields(user_id = %id))]
    pub fn update_user(&self, id: &Uuid, req: UpdateUserRequest) -> AppResult<User> {
        let patch: UserPatch = req.into();
        let _write = self.writes.lock();
        let user = self.repository.update(id, &patch)?;
        info!("用户更新成功");

        self.events.publish(UserNotification::Updated(user.clone()));
        Ok(user)
    }

    #[instrument(skip(self, id), fields(user_id = %id))]
    pub fn delete_user(&self, id: &Uuid) -> AppResult<User> {
        let _write = self.writes.lock();
        let user = self.repository.remove(id)?;
        info!("用户删除成功");

        self.events.publish(UserNotification::Deleted(user.clone()));
        Ok(user)
    }

    pub fn user_history(&self, id: &Uuid) -> AppResult<Vec<UserEvent>> {
        self.repository.history(id)
    }

    pub fn list_events(&self, query: &EventQuery) -> AppResult<Vec<UserEvent>> {
        self.repository.events(query)
    }

    #[instrument(skip(self))]
    pub fn rebuild_projection(&self) -> AppResult<usize> {
        let _write = self.writes.lock();
        self.repository.rebuild()
    }
}
