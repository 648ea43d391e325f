//! DownloadeX - resolve, caption and download TikTok and YouTube videos
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, validation, the data model and captions
//! - `resolver`: URL validation, short-link expansion and the metadata provider chain
//! - `download`: download strategies over a pluggable download surface
//! - `workflow`: per-request session tying the resolver to the downloader
//! - `cli`: command-line arguments of the `dex` binary

pub mod cli;
pub mod core;
pub mod download;
pub mod resolver;
pub mod workflow;

// Re-export commonly used types for convenience
pub use crate::core::{build_caption, config, AppError, AppResult, MediaFormat, Platform, VideoMetadata};
pub use download::{DownloadOutcome, DownloadRequest, Downloader, LocalSurface, LocalSurfaceOptions};
pub use resolver::Resolver;
pub use workflow::{DownloadOptions, Session};
