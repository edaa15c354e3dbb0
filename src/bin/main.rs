use std::net::SocketAddr;

use internship_service::notification::rabbitmq::{RabbitMQService, get_rabbitmq_connection};
use internship_service::notification::redis_emitter::init_redis_emitter;
use internship_service::static_service::get_database_connection;
use internship_service::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    // Initialize database connection
    get_database_connection().await;

    let rabbitmq = get_rabbitmq_connection().await;
    if let Ok(()) = RabbitMQService::create_notification_queue(rabbitmq).await {
        tracing::info!("Created notification queue successfully");
    }

    tracing::info!("Initializing Redis emitter...");
    if let Err(e) = init_redis_emitter().await {
        tracing::error!("Failed to initialize Redis emitter: {}", e);
        tracing::warn!("Continuing without Redis (socket notifications disabled)...");
    } else {
        tracing::info!("Redis emitter initialized successfully");
    }

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!("HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(http_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
