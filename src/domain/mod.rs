//! 领域层：实体、值对象、事件与存储端口

pub mod email;
pub mod events;
pub mod repository;
pub mod user;

pub use email::Email;
pub use events::{EventQuery, UserEvent, UserEventKind, UserEventType, UserNotification};
pub use repository::UserRepository;
pub use user::{validate, User, UserChanges, UserPatch};
