//! 只追加的内存事件存储

use crate::domain::{UserEvent, UserEventKind, UserEventType};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// 事件日志
///
/// 追加是唯一的写操作。每条事件获得单调递增的序号，时间戳被钳制为严格递增，
/// 因此 `(timestamp, sequence)` 的顺序与追加顺序一致。
/// 本身不加锁，由持有者负责互斥。
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Vec<UserEvent>,
    by_aggregate: HashMap<Uuid, Vec<usize>>,
    next_sequence: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, aggregate_id: Uuid, kind: UserEventKind) -> UserEvent {
        self.append_at(aggregate_id, kind, Utc::now())
    }

    /// 以给定时间追加，时间早于上一条事件时会被推后
    pub fn append_at(
        &mut self,
        aggregate_id: Uuid,
        kind: UserEventKind,
        at: DateTime<Utc>,
    ) -> UserEvent {
        let timestamp = match self.last_timestamp {
            Some(last) if at <= last => last + Duration::nanoseconds(1),
            _ => at,
        };
        self.next_sequence += 1;

        let event = UserEvent {
            sequence: self.next_sequence,
            aggregate_id,
            timestamp,
            kind,
        };

        self.by_aggregate
            .entry(aggregate_id)
            .or_default()
            .push(self.events.len());
        self.events.push(event.clone());
        self.last_timestamp = Some(timestamp);

        event
    }

    pub fn all_events(&self) -> &[UserEvent] {
        &self.events
    }

    pub fn events_for(&self, aggregate_id: &Uuid) -> Vec<UserEvent> {
        self.by_aggregate
            .get(aggregate_id)
            .map(|indexes| indexes.iter().map(|&i| self.events[i].clone()).collect())
            .unwrap_or_default()
    }

    /// 按回放顺序返回某个聚合的事件
    pub fn replay(&self, aggregate_id: &Uuid) -> Vec<UserEvent> {
        let mut events = self.events_for(aggregate_id);
        events.sort_by_key(UserEvent::order_key);
        events
    }

    pub fn events_of_type(&self, event_type: UserEventType) -> Vec<UserEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    /// 时间范围查询，两端都包含
    pub fn events_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<UserEvent> {
        self.events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    pub fn latest(&self, aggregate_id: &Uuid) -> Option<UserEvent> {
        self.by_aggregate
            .get(aggregate_id)
            .and_then(|indexes| indexes.last())
            .map(|&i| self.events[i].clone())
    }

    pub fn event_count(&self, aggregate_id: &Uuid) -> usize {
        self.by_aggregate.get(aggregate_id).map_or(0, Vec::len)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
