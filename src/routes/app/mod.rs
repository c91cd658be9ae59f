mod handler;
mod model;

pub use handler::{get_stats, get_status};
pub use model::{StatsResponse, StatusResponse};
