use crate::config::APP_CONFIG;
use lapin::{BasicProperties, Connection, ConnectionProperties, options::*};
use tokio::sync::OnceCell;

/// Queue drained by the external delivery service (mail + in-app inbox).
pub const NOTIFICATION_QUEUE: &str = "notification_service";

pub static RABBITMQ_CONNECTION: OnceCell<Connection> = OnceCell::const_new();

pub async fn get_rabbitmq_connection() -> &'static Connection {
    RABBITMQ_CONNECTION
        .get_or_init(|| async {
            Connection::connect(&APP_CONFIG.rabbitmq_uri, ConnectionProperties::default())
                .await
                .expect("Failed to connect to RabbitMQ")
        })
        .await
}

pub struct RabbitMQService;

impl RabbitMQService {
    pub async fn create_notification_queue(connection: &Connection) -> Result<(), anyhow::Error> {
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ channel: {}", e))?;

        channel
            .queue_declare(
                NOTIFICATION_QUEUE,
                QueueDeclareOptions::default(),
                Default::default(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ queue: {}", e))?;

        Ok(())
    }

    pub async fn publish_to_notification_queue(
        connection: &Connection,
        payload: &str,
    ) -> Result<(), anyhow::Error> {
        let channel = connection.create_channel().await?;

        channel
            .basic_publish(
                "",
                NOTIFICATION_QUEUE,
                BasicPublishOptions::default(),
                payload.as_bytes(),
                BasicProperties::default(),
            )
            .await?;

        Ok(())
    }
}
