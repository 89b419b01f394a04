//! 由事件日志折叠出的当前状态视图

use crate::domain::{User, UserChanges, UserEvent, UserEventKind};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserProjection {
    users: HashMap<Uuid, User>,
}

impl UserProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 `(timestamp, sequence)` 排序后回放，结果只取决于事件集合本身
    pub fn replay<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a UserEvent>,
    {
        let mut ordered: Vec<&UserEvent> = events.into_iter().collect();
        ordered.sort_by_key(|e| e.order_key());

        let mut projection = Self::new();
        for event in ordered {
            projection.apply(event);
        }
        projection
    }

    /// 清空后从头重建
    pub fn rebuild(&mut self, events: &[UserEvent]) {
        *self = Self::replay(events);
    }

    pub fn apply(&mut self, event: &UserEvent) {
        match &event.kind {
            UserEventKind::UserCreated { name, email } => {
                self.users.entry(event.aggregate_id).or_insert_with(|| User {
                    id: event.aggregate_id,
                    name: name.clone(),
                    email: email.clone(),
                    created_at: event.timestamp,
                    updated_at: event.timestamp,
                });
            }
            UserEventKind::UserUpdated { name, email } => {
                if let Some(user) = self.users.get_mut(&event.aggregate_id) {
                    let changes = UserChanges {
                        name: name.clone(),
                        email: email.clone(),
                    };
                    user.apply(&changes, event.timestamp);
                }
            }
            UserEventKind::UserDeleted => {
                self.users.remove(&event.aggregate_id);
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<&User> {
        self.users.get(id)
    }

    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Email;
    use crate::infrastructure::event_store::InMemoryEventStore;

    fn sample_log() -> (InMemoryEventStore, Uuid, Uuid) {
        let mut store = InMemoryEventStore::new();
        let john = Uuid::new_v4();
        let jane = Uuid::new_v4();

        store.append(
            john,
            UserEventKind::UserCreated {
                name: "John Doe".into(),
                email: Email::parse("john@example.com").unwrap(),
            },
        );
        store.append(
            jane,
            UserEventKind::UserCreated {
                name: "Jane Doe".into(),
                email: Email::parse("jane@example.com").unwrap(),
            },
        );
        store.append(
            john,
            UserEventKind::UserUpdated {
                name: Some("John Updated".into()),
                email: None,
            },
        );
        store.append(jane, UserEventKind::UserDeleted);

        (store, john, jane)
    }

    #[test]
    fn test_fold_produces_current_state() {
        let (store, john, jane) = sample_log();
        let projection = UserProjection::replay(store.all_events());

        assert_eq!(projection.len(), 1);
        assert!(projection.get(&jane).is_none());

        let user = projection.get(&john).unwrap();
        assert_eq!(user.name, "John Updated");
        assert_eq!(user.email.as_str(), "john@example.com");
        assert!(user.updated_at > user.created_at);
    }

    #[test]
    fn test_replay_is_deterministic_and_idempotent() {
        let (store, _, _) = sample_log();

        let first = UserProjection::replay(store.all_events());
        let second = UserProjection::replay(store.all_events());
        assert_eq!(first, second);

        // 输入顺序被打乱也得到相同结果
        let mut shuffled = store.all_events().to_vec();
        shuffled.reverse();
        assert_eq!(UserProjection::replay(&shuffled), first);

        let mut rebuilt = first.clone();
        rebuilt.rebuild(store.all_events());
        assert_eq!(rebuilt, first);
    }

    #[test]
    fn test_events_for_unknown_aggregate_are_ignored() {
        let mut projection = UserProjection::new();
        let mut store = InMemoryEventStore::new();
        let ghost = Uuid::new_v4();

        let update = store.append(
            ghost,
            UserEventKind::UserUpdated {
                name: Some("ghost".into()),
                email: None,
            },
        );
        let delete = store.append(ghost, UserEventKind::UserDeleted);

        projection.apply(&update);
        projection.apply(&delete);
        assert!(projection.is_empty());
    }
}
