use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::MultiplexedConnection};
use tokio::sync::Mutex;

use super::{CacheValue, KeyValueCache};
use crate::error::{AppError, AppResult};

/// Redis 缓存客户端，启动时创建一次，之后在所有请求间共享
pub struct RedisClient {
    client: redis::Client,
    // 第一次成功连接后缓存，连接层面出错时清空，下次调用重新连接
    conn: Mutex<Option<MultiplexedConnection>>,
    opened: AtomicU64,
    health_check_timeout: Duration,
}

impl RedisClient {
    /// 只校验地址格式，不建立连接
    pub fn open(redis_url: &str, health_check_timeout: Duration) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)?;

        Ok(Self {
            client,
            conn: Mutex::new(None),
            opened: AtomicU64::new(0),
            health_check_timeout,
        })
    }

    /// 进程启动以来建立过的连接数
    pub fn connections_opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    async fn connection(&self) -> RedisResult<MultiplexedConnection> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self.client.get_multiplexed_async_connection().await?;
        let n = self.opened.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!("Opened Redis connection #{}", n);

        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn discard_connection(&self) {
        self.conn.lock().await.take();
    }

    /// 记录错误；连接层面的错误会丢弃缓存的连接
    async fn failed(&self, op: &str, e: redis::RedisError) -> AppError {
        tracing::error!("Redis client {} failed: {}", op, e);
        if is_connection_error(&e) {
            self.discard_connection().await;
        }
        AppError::from(e)
    }

    async fn ping(&self) -> RedisResult<String> {
        let mut conn = self.connection().await?;
        redis::cmd("PING").query_async(&mut conn).await
    }
}

fn is_connection_error(e: &redis::RedisError) -> bool {
    e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
}

/// 过期时间为 0 的值立即失效，等同于删除；Redis 会拒绝 `SETEX key 0`
fn set_command(key: &str, value: &CacheValue, ttl_secs: u64) -> redis::Cmd {
    if ttl_secs == 0 {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(key);
        return cmd;
    }

    let mut cmd = redis::cmd("SETEX");
    cmd.arg(key).arg(ttl_secs).arg(value.to_string());
    cmd
}

#[async_trait]
impl KeyValueCache for RedisClient {
    async fn is_alive(&self) -> AppResult<bool> {
        match tokio::time::timeout(self.health_check_timeout, self.ping()).await {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) if is_connection_error(&e) => {
                tracing::warn!("Redis is not reachable: {}", e);
                self.discard_connection().await;
                Ok(false)
            }
            Ok(Err(e)) => {
                tracing::error!("Redis health check failed: {}", e);
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!(
                    "Redis health check timed out after {:?}",
                    self.health_check_timeout
                );
                self.discard_connection().await;
                Ok(false)
            }
        }
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => return Err(self.failed("connect", e).await),
        };

        let result: RedisResult<Option<String>> = conn.get(key).await;
        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.failed(&format!("GET {}", key), e).await),
        }
    }

    async fn set(&self, key: &str, value: CacheValue, ttl_secs: u64) -> AppResult<()> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => return Err(self.failed("connect", e).await),
        };

        let result: RedisResult<()> = set_command(key, &value, ttl_secs)
            .query_async(&mut conn)
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.failed(&format!("SETEX {}", key), e).await),
        }
    }

    async fn del(&self, key: &str) -> AppResult<()> {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => return Err(self.failed("connect", e).await),
        };

        let result: RedisResult<()> = conn.del(key).await;
        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.failed(&format!("DEL {}", key), e).await),
        }
    }
}
