//! Server-side sessions kept in Redis.
//!
//! The browser only holds a random token. Redis keys are derived from a
//! SHA-256 of that token so a leaked key listing cannot be replayed as a
//! cookie.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::redis_client::RedisClient;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session backend unavailable: {0}")]
    Backend(#[from] redis::RedisError),

    #[error("corrupt session payload: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Info => "flash-info",
            FlashLevel::Error => "flash-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: FlashLevel::Error, text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Option<i32>,
    #[serde(default)]
    pub flash: Vec<FlashMessage>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<SessionData>, SessionError>;

    async fn save(&self, token: &str, data: &SessionData) -> Result<(), SessionError>;

    async fn destroy(&self, token: &str) -> Result<(), SessionError>;
}

/// 244 random bits, hex encoded.
pub fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

pub fn session_key(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("session:{}", URL_SAFE_NO_PAD.encode(digest))
}

#[derive(Clone)]
pub struct RedisSessionStore {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self.redis.conn.clone();
        let raw: Option<String> = conn.get(session_key(token)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, data: &SessionData) -> Result<(), SessionError> {
        let json = serde_json::to_string(data)?;
        let mut conn = self.redis.conn.clone();
        let _: () = conn.set_ex(session_key(token), json, self.ttl_seconds).await?;
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.redis.conn.clone();
        let _: () = conn.del(session_key(token)).await?;
        Ok(())
    }
}
