use serde::{Deserialize, Serialize};

/// users 集合中的文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub email: String,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

impl UserDocument {
    pub fn new(email: &str, password_hash: &str) -> Self {
        Self {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        }
    }
}
