//! 内存存储：一把互斥锁保护的 HashMap

use crate::core::error::{AppError, AppResult};
use crate::domain::{User, UserPatch, UserRepository};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.lock();
        if users.contains_key(&user.id) {
            return Err(AppError::DuplicateId(user.id));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn get_by_id(&self, id: &Uuid) -> AppResult<User> {
        self.users
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(AppError::user_not_found)
    }

    fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.lock().values().cloned().collect();
        // 按创建时间排序，便于输出稳定
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    fn update(&self, id: &Uuid, patch: &UserPatch) -> AppResult<User> {
        let mut users = self.users.lock();
        let user = users.get_mut(id).ok_or_else(AppError::user_not_found)?;
        let changes = patch.normalize(user)?;
        user.apply(&changes, Utc::now());
        Ok(user.clone())
    }

    fn remove(&self, id: &Uuid) -> AppResult<User> {
        self.users
            .lock()
            .remove(id)
            .ok_or_else(AppError::user_not_found)
    }

    fn len(&self) -> usize {
        self.users.lock().len()
    }
}
