//! 进程内事件总线

use crate::domain::UserNotification;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<UserNotification>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 发布通知；没有订阅者时直接丢弃，不影响请求结果
    pub fn publish(&self, notification: UserNotification) {
        let topic = notification.topic();
        match self.sender.send(notification) {
            Ok(receivers) => debug!(topic, receivers, "事件已发布"),
            Err(_) => debug!(topic, "没有订阅者，事件被丢弃"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UserNotification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// 启动只记录日志的订阅者，总线关闭后任务自行退出
pub fn spawn_audit_logger(bus: &EventBus) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(notification) => {
                    let user = notification.user();
                    info!(
                        topic = notification.topic(),
                        user_id = %user.id,
                        email = %user.email,
                        "用户事件已处理"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "审计订阅者落后，部分事件被跳过");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
