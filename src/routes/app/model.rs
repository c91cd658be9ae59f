use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub redis: bool,
    pub db: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub users: u64,
    pub files: u64,
}
