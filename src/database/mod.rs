// 数据库模块
// 文档数据库的抽象和基于 MongoDB 的实现

mod client;
pub mod models;

use async_trait::async_trait;

use crate::error::AppResult;

pub use client::DbClient;
pub use models::UserDocument;

pub const USERS_COLLECTION: &str = "users";
pub const FILES_COLLECTION: &str = "files";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 连接是否可用；连接层面的失败返回 `Ok(false)`
    async fn is_alive(&self) -> AppResult<bool>;

    async fn nb_users(&self) -> AppResult<u64>;

    async fn nb_files(&self) -> AppResult<u64>;

    /// 插入用户并返回新文档的 id，不检查邮箱是否重复
    async fn add_user(&self, email: &str, password_hash: &str) -> AppResult<String>;

    /// 更新第一个匹配用户的密码，返回被修改的文档数
    async fn update_user_password(&self, email: &str, new_password_hash: &str) -> AppResult<u64>;

    /// 删除第一个匹配的用户，返回被删除的文档数
    async fn delete_user(&self, email: &str) -> AppResult<u64>;
}
