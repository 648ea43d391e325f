//! Core utilities, configuration, errors, and the canonical data model

pub mod caption;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use caption::build_caption;
pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use types::{Author, MediaFormat, MediaLinks, Platform, VideoMetadata};
