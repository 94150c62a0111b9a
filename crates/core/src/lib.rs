//! recap core library
//!
//! Foundational utilities shared by every recap crate:
//! - Error handling (`AppError`, `AppResult`, `ErrorKind`)
//! - Logging infrastructure
//! - Application configuration
//! - Cooperative cancellation

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
