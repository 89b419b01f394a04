//! 领域事件
//!
//! [`UserEvent`] 是事件溯源存储中不可变的日志记录；
//! [`UserNotification`] 是写操作成功后在事件总线上广播的通知。

use super::{email::Email, user::User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 事件日志中的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    /// 存储内单调递增的序号，时间戳相同时用它排序
    pub sequence: u64,
    pub aggregate_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: UserEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserEventKind {
    UserCreated {
        name: String,
        email: Email,
    },
    UserUpdated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<Email>,
    },
    UserDeleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserEventType {
    #[serde(rename = "UserCreated")]
    Created,
    #[serde(rename = "UserUpdated")]
    Updated,
    #[serde(rename = "UserDeleted")]
    Deleted,
}

/// 事件日志查询条件，全部为空时返回整个日志
///
/// 时间范围两端都包含，只给一端时另一端不设限。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventQuery {
    #[serde(default, rename = "type")]
    pub event_type: Option<UserEventType>,
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl UserEventKind {
    pub fn event_type(&self) -> UserEventType {
        match self {
            UserEventKind::UserCreated { .. } => UserEventType::Created,
            UserEventKind::UserUpdated { .. } => UserEventType::Updated,
            UserEventKind::UserDeleted => UserEventType::Deleted,
        }
    }
}

impl UserEvent {
    pub fn event_type(&self) -> UserEventType {
        self.kind.event_type()
    }

    /// 排序键：先按时间戳，再按序号
    pub fn order_key(&self) -> (DateTime<Utc>, u64) {
        (self.timestamp, self.sequence)
    }
}

impl fmt::Display for UserEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserEventType::Created => "UserCreated",
            UserEventType::Updated => "UserUpdated",
            UserEventType::Deleted => "UserDeleted",
        };
        f.write_str(name)
    }
}

/// 写操作成功后的广播通知，携带操作完成时的用户快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotification {
    Created(User),
    Updated(User),
    Deleted(User),
}

impl UserNotification {
    pub fn user(&self) -> &User {
        match self {
            UserNotification::Created(user)
            | UserNotification::Updated(user)
            | UserNotification::Deleted(user) => user,
        }
    }

    pub fn topic(&self) -> &'static str {
        match self {
            UserNotification::Created(_) => "user.created",
            UserNotification::Updated(_) => "user.updated",
            UserNotification::Deleted(_) => "user.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = UserEvent {
            sequence: 7,
            aggregate_id: Uuid::nil(),
            timestamp: Utc::now(),
            kind: UserEventKind::UserUpdated {
                name: Some("John Updated".into()),
                email: None,
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "UserUpdated");
        assert_eq!(value["sequence"], 7);
        assert_eq!(value["aggregateId"], Uuid::nil().to_string());
        assert_eq!(value["name"], "John Updated");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_deleted_event_has_only_envelope_fields() {
        let event = UserEvent {
            sequence: 1,
            aggregate_id: Uuid::nil(),
            timestamp: Utc::now(),
            kind: UserEventKind::UserDeleted,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "UserDeleted");
        assert_eq!(value.as_object().unwrap().len(), 4);
        assert_eq!(event.event_type().to_string(), "UserDeleted");
    }

    #[test]
    fn test_event_type_names_match_wire_tags() {
        for event_type in [
            UserEventType::Created,
            UserEventType::Updated,
            UserEventType::Deleted,
        ] {
            assert_eq!(serde_json::to_value(event_type).unwrap(), event_type.to_string());
        }
    }
}
