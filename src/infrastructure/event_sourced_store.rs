//! 事件溯源存储：写操作追加事件，读操作走投影

use super::{event_store::InMemoryEventStore, projection::UserProjection};
use crate::core::error::{AppError, AppResult};
use crate::domain::{EventQuery, User, UserEvent, UserEventKind, UserPatch, UserRepository};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct EventSourcedState {
    events: InMemoryEventStore,
    projection: UserProjection,
}

impl EventSourcedState {
    // 追加并立即应用到投影，两步在同一把锁内完成
    fn record(&mut self, aggregate_id: Uuid, kind: UserEventKind) -> UserEvent {
        let event = self.events.append(aggregate_id, kind);
        self.projection.apply(&event);
        debug!(
            aggregate_id = %aggregate_id,
            sequence = event.sequence,
            event_type = %event.event_type(),
            aggregate_events = self.events.event_count(&aggregate_id),
            "事件已追加"
        );
        event
    }

    fn live_user(&self, id: &Uuid) -> AppResult<User> {
        self.projection
            .get(id)
            .cloned()
            .ok_or_else(AppError::user_not_found)
    }
}

/// 生命周期：`Created → {Updated}* → Deleted`，删除后该聚合不再接受任何事件
#[derive(Default)]
pub struct EventSourcedUserStore {
    state: Mutex<EventSourcedState>,
}

impl EventSourcedUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for EventSourcedUserStore {
    fn backend(&self) -> &'static str {
        "event_sourced"
    }

    fn create(&self, user: User) -> AppResult<User> {
        let mut state = self.state.lock();
        // 删除是终态，只要日志里出现过这个 ID 就不能再创建
        if let Some(last) = state.events.latest(&user.id) {
            debug!(user_id = %user.id, last_event = %last.event_type(), "ID 已被占用");
            return Err(AppError::DuplicateId(user.id));
        }

        let id = user.id;
        let event = state.events.append_at(
            id,
            UserEventKind::UserCreated {
                name: user.name,
                email: user.email,
            },
            user.created_at,
        );
        state.projection.apply(&event);
        state.live_user(&id)
    }

    fn get_by_id(&self, id: &Uuid) -> AppResult<User> {
        self.state.lock().live_user(id)
    }

    fn list(&self) -> Vec<User> {
        self.state.lock().projection.users()
    }

    fn update(&self, id: &Uuid, patch: &UserPatch) -> AppResult<User> {
        let mut state = self.state.lock();
        let current = state.live_user(id)?;
        let changes = patch.normalize(&current)?;

        state.record(
            *id,
            UserEventKind::UserUpdated {
                name: changes.name,
                email: changes.email,
            },
        );
        state.live_user(id)
    }

    fn remove(&self, id: &Uuid) -> AppResult<User> {
        let mut state = self.state.lock();
        let user = state.live_user(id)?;
        state.record(*id, UserEventKind::UserDeleted);
        Ok(user)
    }

    fn len(&self) -> usize {
        self.state.lock().projection.len()
    }

    fn history(&self, id: &Uuid) -> AppResult<Vec<UserEvent>> {
        let events = self.state.lock().events.replay(id);
        if events.is_empty() {
            return Err(AppError::user_not_found());
        }
        Ok(events)
    }

    fn events(&self, query: &EventQuery) -> AppResult<Vec<UserEvent>> {
        let state = self.state.lock();
        let events = match (query.event_type, query.from, query.to) {
            (None, None, None) => state.events.all_events().to_vec(),
            (Some(event_type), None, None) => state.events.events_of_type(event_type),
            (event_type, from, to) => state
                .events
                .events_between(
                    from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                    to.unwrap_or(DateTime::<Utc>::MAX_UTC),
                )
                .into_iter()
                .filter(|e| event_type.map_or(true, |t| e.event_type() == t))
                .collect(),
        };
        Ok(events)
    }

    fn rebuild(&self) -> AppResult<usize> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.projection.rebuild(state.events.all_events());
        info!(events = state.events.len(), users = state.projection.len(), "投影已重建");
        Ok(state.projection.len())
    }
}
