pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod service;
pub mod source;

pub use config::AppConfig;
pub use error::{ReportError, Result};
pub use service::ReportService;
