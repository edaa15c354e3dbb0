use crate::config::APP_CONFIG;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use socketioxide_emitter::{Driver, IoEmitter};
use tokio::sync::OnceCell;

pub struct RedisConnection(MultiplexedConnection);

impl Driver for RedisConnection {
    type Error = redis::RedisError;

    async fn emit(&self, channel: String, data: Vec<u8>) -> Result<(), Self::Error> {
        self.0
            .clone()
            .publish::<_, _, redis::Value>(channel, data)
            .await?;
        Ok(())
    }
}

pub static REDIS_EMITTER: OnceCell<RedisConnection> = OnceCell::const_new();

pub async fn init_redis_emitter() -> anyhow::Result<()> {
    REDIS_EMITTER
        .get_or_try_init(|| async {
            let client = redis::Client::open(APP_CONFIG.redis_url.as_str())?;
            let conn = client.get_multiplexed_tokio_connection().await?;
            Ok::<_, anyhow::Error>(RedisConnection(conn))
        })
        .await?;
    Ok(())
}

pub struct RedisEmitter;

impl RedisEmitter {
    /// Pushes a socket event into the recipient's room.
    pub async fn emit_to_room(room: &str, msg: &str) -> anyhow::Result<()> {
        let Some(redis_emitter) = REDIS_EMITTER.get() else {
            anyhow::bail!("Redis emitter not initialized");
        };
        IoEmitter::new()
            .to(room.to_string())
            .emit("event", msg, redis_emitter)
            .await?;
        Ok(())
    }
}
