//! 基础设施层：存储实现、事件总线、配置与日志

pub mod config;
pub mod event_bus;
pub mod event_sourced_store;
pub mod event_store;
pub mod logger;
pub mod memory_store;
pub mod projection;

pub use config::{Config, ConfigError, StorageBackend};
pub use event_bus::{spawn_audit_logger, EventBus};
pub use event_sourced_store::EventSourcedUserStore;
pub use event_store::InMemoryEventStore;
pub use memory_store::InMemoryUserStore;
pub use projection::UserProjection;

use crate::domain::UserRepository;
use std::sync::Arc;

/// 根据配置选择存储后端
pub fn build_repository(backend: StorageBackend) -> Arc<dyn UserRepository> {
    match backend {
        StorageBackend::Memory => Arc::new(InMemoryUserStore::new()),
        StorageBackend::EventSourced => Arc::new(EventSourcedUserStore::new()),
    }
}
