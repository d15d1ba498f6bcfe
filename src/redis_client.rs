use redis::{aio::ConnectionManager, Client};
use tracing::info;

/// Reconnecting Redis handle backing the session store.
#[derive(Clone)]
pub struct RedisClient {
    pub conn: ConnectionManager,
}

impl RedisClient {
    pub async fn connect(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Redis connection manager ready");
        Ok(RedisClient { conn })
    }
}
