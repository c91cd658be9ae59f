//! In-memory backends for driving the router without MongoDB or Redis.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{Router, body::Body};
use files_manager::{
    AppState,
    cache::{CacheValue, KeyValueCache},
    config::Config,
    database::{DocumentStore, UserDocument},
    error::{AppError, AppResult},
    router::create_router,
};
use serde_json::Value;

// == Document store ==

#[derive(Default)]
pub struct MemoryStore {
    pub alive: bool,
    pub broken: bool,
    users: Mutex<Vec<UserDocument>>,
    files: u64,
}

impl MemoryStore {
    pub fn alive() -> Self {
        Self {
            alive: true,
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self::default()
    }

    /// Every call fails as if the driver returned a non-connection error.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    pub fn with_files(mut self, files: u64) -> Self {
        self.files = files;
        self
    }

    fn check(&self) -> AppResult<()> {
        if self.broken {
            return Err(AppError::StoreUnavailable("query failed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn is_alive(&self) -> AppResult<bool> {
        self.check()?;
        Ok(self.alive)
    }

    async fn nb_users(&self) -> AppResult<u64> {
        self.check()?;
        Ok(self.users.lock().unwrap().len() as u64)
    }

    async fn nb_files(&self) -> AppResult<u64> {
        self.check()?;
        Ok(self.files)
    }

    async fn add_user(&self, email: &str, password_hash: &str) -> AppResult<String> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        users.push(UserDocument::new(email, password_hash));
        Ok(format!("{:024x}", users.len()))
    }

    async fn update_user_password(&self, email: &str, new_password_hash: &str) -> AppResult<u64> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = new_password_hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_user(&self, email: &str) -> AppResult<u64> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        match users.iter().position(|u| u.email == email) {
            Some(index) => {
                users.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

// == Cache ==

#[derive(Default)]
pub struct MemoryCache {
    pub alive: bool,
    pub broken: bool,
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn alive() -> Self {
        Self {
            alive: true,
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self::default()
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Default::default()
        }
    }

    fn check(&self) -> AppResult<()> {
        if self.broken {
            return Err(AppError::CacheUnavailable("PING failed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn is_alive(&self) -> AppResult<bool> {
        self.check()?;
        Ok(self.alive)
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check()?;
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: CacheValue, ttl_secs: u64) -> AppResult<()> {
        self.check()?;
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn del(&self, key: &str) -> AppResult<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// == Helpers ==

pub fn create_test_app(store: Arc<MemoryStore>, cache: Arc<MemoryCache>) -> Router {
    create_router(AppState::new(Config::default(), store, cache))
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
