// 缓存模块
// 键值缓存的抽象和基于 Redis 的实现

mod redis_client;

use std::fmt;

use async_trait::async_trait;

use crate::error::AppResult;

pub use redis_client::RedisClient;

/// 可写入缓存的值，统一以文本形式存储
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheValue::Text(s) => f.write_str(s),
            CacheValue::Integer(n) => write!(f, "{}", n),
            CacheValue::Float(n) => write!(f, "{}", n),
            CacheValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::Text(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::Text(s)
    }
}

impl From<i64> for CacheValue {
    fn from(n: i64) -> Self {
        CacheValue::Integer(n)
    }
}

impl From<f64> for CacheValue {
    fn from(n: f64) -> Self {
        CacheValue::Float(n)
    }
}

impl From<bool> for CacheValue {
    fn from(b: bool) -> Self {
        CacheValue::Boolean(b)
    }
}

#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// 连接是否可用；连接层面的失败返回 `Ok(false)`
    async fn is_alive(&self) -> AppResult<bool>;

    /// 不存在或已过期时返回 `None`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 写入并设置过期时间（秒），覆盖已有值；`ttl_secs` 为 0 时值立即失效，已有的键被删除
    async fn set(&self, key: &str, value: CacheValue, ttl_secs: u64) -> AppResult<()>;

    /// 删除键，不存在时什么也不做
    async fn del(&self, key: &str) -> AppResult<()>;
}
