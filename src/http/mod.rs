//! # HTTP Surface
//!
//! Axum router, handlers, response envelope and error mapping for the
//! tour catalog API.

mod config;
mod errors;
mod response;
mod server;
mod tours;
mod users;

pub use config::HttpConfig;
pub use errors::{ApiError, ApiResult};
pub use response::Envelope;
pub use server::{ApiServer, AppState};
