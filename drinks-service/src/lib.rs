pub mod app_state;
pub mod config;
pub mod drink_handlers;

pub use common_http_errors::{ApiError, ApiResult};
