use std::time::Duration;

use async_trait::async_trait;
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc},
    error::ErrorKind,
    options::ClientOptions,
};

use super::{DocumentStore, FILES_COLLECTION, USERS_COLLECTION, UserDocument};
use crate::config::Config;
use crate::error::{AppError, AppResult};

/// MongoDB 客户端，启动时创建一次，之后在所有请求间共享
pub struct DbClient {
    db: Database,
    users: Collection<UserDocument>,
    files: Collection<Document>,
    health_check_timeout: Duration,
}

impl DbClient {
    /// 解析连接串并创建客户端；驱动在第一次操作时才真正建立连接
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let uri = config.mongodb_uri();
        let options = ClientOptions::parse(uri.as_str()).await?;
        let client = Client::with_options(options)?;
        let db = client.database(&config.db_database);

        Ok(Self {
            users: db.collection(USERS_COLLECTION),
            files: db.collection(FILES_COLLECTION),
            db,
            health_check_timeout: config.health_check_timeout(),
        })
    }
}

fn is_connection_error(e: &mongodb::error::Error) -> bool {
    matches!(
        *e.kind,
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
    )
}

fn user_filter(email: &str) -> Document {
    doc! { "email": email }
}

fn password_update(new_password_hash: &str) -> Document {
    doc! { "$set": { "passwordHash": new_password_hash } }
}

fn store_error(op: &str, e: mongodb::error::Error) -> AppError {
    tracing::error!("MongoDB {} failed: {}", op, e);
    AppError::from(e)
}

#[async_trait]
impl DocumentStore for DbClient {
    async fn is_alive(&self) -> AppResult<bool> {
        let ping = self.db.run_command(doc! { "ping": 1 });

        match tokio::time::timeout(self.health_check_timeout, ping).await {
            Ok(Ok(_)) => Ok(true),
            Ok(Err(e)) if is_connection_error(&e) => {
                tracing::warn!("MongoDB is not reachable: {}", e);
                Ok(false)
            }
            Ok(Err(e)) => Err(store_error("ping", e)),
            Err(_) => {
                tracing::warn!(
                    "MongoDB health check timed out after {:?}",
                    self.health_check_timeout
                );
                Ok(false)
            }
        }
    }

    async fn nb_users(&self) -> AppResult<u64> {
        self.users
            .count_documents(doc! {})
            .await
            .map_err(|e| store_error("count users", e))
    }

    async fn nb_files(&self) -> AppResult<u64> {
        self.files
            .count_documents(doc! {})
            .await
            .map_err(|e| store_error("count files", e))
    }

    async fn add_user(&self, email: &str, password_hash: &str) -> AppResult<String> {
        let result = self
            .users
            .insert_one(UserDocument::new(email, password_hash))
            .await
            .map_err(|e| store_error("insert user", e))?;

        tracing::debug!("Inserted user {}", email);

        let id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };
        Ok(id)
    }

    async fn update_user_password(&self, email: &str, new_password_hash: &str) -> AppResult<u64> {
        let result = self
            .users
            .update_one(user_filter(email), password_update(new_password_hash))
            .await
            .map_err(|e| store_error("update user password", e))?;

        Ok(result.modified_count)
    }

    async fn delete_user(&self, email: &str) -> AppResult<u64> {
        let result = self
            .users
            .delete_one(user_filter(email))
            .await
            .map_err(|e| store_error("delete user", e))?;

        Ok(result.deleted_count)
    }
}
