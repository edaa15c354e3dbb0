use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::rabbitmq::{RabbitMQService, get_rabbitmq_connection};
use super::redis_emitter::RedisEmitter;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    GradeRecordCreated,
    EngagementUpdated,
    MilestoneUpdated,
    MilestoneDocumentsChanged,
    GradeComponentsUpdated,
    GradeSubmitted,
    GradeReviewed,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: String,
    pub priority: NotificationPriority,
    pub metadata: Value,
}

pub struct Notifier;

impl Notifier {
    /// Best-effort delivery off the request task. Failures are logged and
    /// never reach the caller; the state change already happened.
    pub fn send(notification: Notification) {
        tokio::spawn(async move {
            if let Err(e) = Self::deliver(&notification).await {
                tracing::error!(
                    "Failed to deliver {:?} notification to {}: {}",
                    notification.kind,
                    notification.recipient,
                    e
                );
            }
        });
    }

    async fn deliver(notification: &Notification) -> anyhow::Result<()> {
        let payload = serde_json::to_string(notification)?;

        let connection = get_rabbitmq_connection().await;
        RabbitMQService::publish_to_notification_queue(connection, &payload).await?;

        RedisEmitter::emit_to_room(&format!("user:{}", notification.recipient), &payload).await?;
        Ok(())
    }
}
