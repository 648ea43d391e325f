//! LocalSurface: the download surface for a local machine.
//!
//! - blobs are streamed into memory with a size guard
//! - object URLs are `.part` files staged in the temp directory
//! - saving an object URL copies it into the output directory, never
//!   overwriting an existing file
//! - remote anchors are handed to the system opener (`xdg-open`, `open`,
//!   `cmd /C start`)
//! - the clipboard is a `<stem>.caption.txt` file next to the download

use crate::core::config;
use crate::core::error::AppResult;
use crate::core::validation::sanitize_filename;
use crate::download::instructions::{render_instructions, Affordance};
use crate::download::surface::{AnchorTarget, Blob, DownloadSurface, ObjectUrl, SurfaceError};
use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uuid::Uuid;

/// Upper bound on ` (n)` suffixes tried before giving up.
const MAX_NAME_COLLISIONS: u32 = 1000;

#[derive(Debug, Clone)]
pub struct LocalSurfaceOptions {
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub max_file_size: u64,
    pub open_browser: bool,
}

impl LocalSurfaceOptions {
    /// Options from `DOWNLOAD_FOLDER`, `TEMP_FILES_DIR`, `DEX_MAX_FILE_SIZE`
    /// and `DEX_NO_BROWSER`.
    pub fn from_env() -> Self {
        Self {
            output_dir: PathBuf::from(config::DOWNLOAD_FOLDER.as_str()),
            temp_dir: PathBuf::from(config::TEMP_FILES_DIR.as_str()),
            max_file_size: *config::download::MAX_FILE_SIZE,
            open_browser: !*config::NO_BROWSER,
        }
    }
}

impl Default for LocalSurfaceOptions {
    fn default() -> Self {
        Self::from_env()
    }
}

pub struct LocalSurface {
    client: Client,
    options: LocalSurfaceOptions,
}

impl LocalSurface {
    pub fn new(options: LocalSurfaceOptions) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config::network::USER_AGENT)
            .timeout(config::network::media_timeout())
            .connect_timeout(config::network::connect_timeout())
            .build()?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &LocalSurfaceOptions {
        &self.options
    }

    async fn save_object(&self, url: &ObjectUrl, filename: &str) -> Result<PathBuf, SurfaceError> {
        let staged = url
            .path
            .as_ref()
            .ok_or_else(|| SurfaceError::Unsupported(format!("object URL {} has no staged file", url.id)))?;

        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        let (file, destination) = create_unique(&self.options.output_dir, filename).await?;

        if let Err(e) = copy_staged(staged, file).await {
            remove_quietly(&destination).await;
            return Err(e);
        }

        log::info!("💾 Saved {}", destination.display());
        Ok(destination)
    }

    async fn open_remote(&self, url: &str) -> Result<(), SurfaceError> {
        if !self.options.open_browser {
            return Err(SurfaceError::Unsupported("opening the browser is disabled".to_string()));
        }

        let status = opener_command(url).status().await?;
        if !status.success() {
            return Err(SurfaceError::Unsupported(format!("system opener exited with {}", status)));
        }
        log::info!("🌐 Opened {} in the browser", url);
        Ok(())
    }
}

#[async_trait]
impl DownloadSurface for LocalSurface {
    async fn fetch_blob(&self, url: &str) -> Result<Blob, SurfaceError> {
        log::info!("📥 Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SurfaceError::Network(e.to_string()))?;

        let status = response.status();
        if is_blocking_status(status) {
            return Err(SurfaceError::Blocked(status));
        }
        if !status.is_success() {
            return Err(SurfaceError::Status(status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        if let Some(ct) = content_type.as_deref().filter(|ct| is_page_content_type(ct)) {
            return Err(SurfaceError::NotMedia(ct.to_string()));
        }

        let limit = self.options.max_file_size;
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(SurfaceError::TooLarge { limit });
        }

        let mut data = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SurfaceError::Network(format!("Error reading chunk: {}", e)))?;
            if data.len() as u64 + chunk.len() as u64 > limit {
                return Err(SurfaceError::TooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        log::debug!("Fetched {} bytes from {}", data.len(), url);
        Ok(Blob {
            data: data.freeze(),
            content_type,
        })
    }

    async fn create_object_url(&self, blob: Blob) -> Result<ObjectUrl, SurfaceError> {
        tokio::fs::create_dir_all(&self.options.temp_dir).await?;
        let id = Uuid::new_v4();
        let path = self.options.temp_dir.join(format!("{}.part", id));
        if let Err(e) = tokio::fs::write(&path, &blob.data).await {
            remove_quietly(&path).await;
            return Err(e.into());
        }
        log::debug!("Staged {} bytes at {}", blob.len(), path.display());
        Ok(ObjectUrl { id, path: Some(path) })
    }

    // Runs from `Drop`, so the removal is a blocking call; staging lives on local disk.
    fn revoke_object_url(&self, url: &ObjectUrl) {
        if let Some(path) = &url.path {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to remove staged file {}: {}", path.display(), e);
                }
            }
        }
    }

    async fn click_anchor(&self, target: AnchorTarget<'_>, filename: &str) -> Result<Option<PathBuf>, SurfaceError> {
        match target {
            AnchorTarget::Object(url) => self.save_object(url, filename).await.map(Some),
            AnchorTarget::Remote(url) => self.open_remote(url).await.map(|_| None),
        }
    }

    async fn write_clipboard(&self, text: &str, filename: &str) -> Result<(), SurfaceError> {
        tokio::fs::create_dir_all(&self.options.output_dir).await?;
        let path = self.options.output_dir.join(caption_filename(filename));
        tokio::fs::write(&path, text).await?;
        log::info!("📋 Caption saved to {}", path.display());
        Ok(())
    }

    async fn show_instructions(&self, affordance: &Affordance) -> Result<(), SurfaceError> {
        println!("{}", render_instructions(affordance));
        Ok(())
    }
}

async fn copy_staged(staged: &Path, mut destination: tokio::fs::File) -> Result<(), SurfaceError> {
    let mut source = tokio::fs::File::open(staged).await?;
    tokio::io::copy(&mut source, &mut destination).await?;
    destination.flush().await?;
    Ok(())
}

/// Removes a partially written file, ignoring one that is already gone.
async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("Failed to remove partial file {}: {}", path.display(), e);
        }
    }
}

fn is_blocking_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS
    )
}

fn is_page_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim().to_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// `<stem>.caption.txt` for a download named `filename`.
pub fn caption_filename(filename: &str) -> String {
    let name = sanitize_filename(filename);
    let stem = Path::new(&name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("download");
    format!("{}.caption.txt", stem)
}

/// `name`, then `name (1)`, `name (2)`… for the n-th collision.
fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, attempt, ext),
        None => format!("{} ({})", stem, attempt),
    }
}

/// Creates a new file in `dir`, never replacing an existing one.
async fn create_unique(dir: &Path, filename: &str) -> Result<(tokio::fs::File, PathBuf), SurfaceError> {
    let mut name = sanitize_filename(filename);
    if name.is_empty() {
        name = "download".to_string();
    }

    for attempt in 0..MAX_NAME_COLLISIONS {
        let path = dir.join(candidate_name(&name, attempt));
        match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(SurfaceError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("too many files named like {}", name),
    )))
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
