use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use downloadex::cli::{Cli, Commands};
use downloadex::core::logging::level_for_verbosity;
use downloadex::core::{config, init_logger, MediaFormat};
use downloadex::download::{DownloadOutcome, Downloader, LocalSurface, LocalSurfaceOptions};
use downloadex::resolver::Resolver;
use downloadex::workflow::{DownloadOptions, Session};

/// Entry point of the `dex` CLI
///
/// # Errors
/// Returns an error if initialization fails or the command fails; the
/// message printed for command failures is the user-facing one.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(level_for_verbosity(cli.verbose), config::LOG_FILE_PATH.as_deref())?;

    let resolver = Resolver::from_env()?;

    let result = match cli.command {
        Commands::Info { url, json } => run_info(&resolver, &url, json).await,
        Commands::Caption { url } => run_caption(&resolver, &url).await,
        Commands::Download {
            url,
            format,
            output,
            allow_watermark,
            no_browser,
            filename,
        } => {
            let options = DownloadOptions {
                format,
                allow_watermark,
                filename,
            };
            run_download(&resolver, &url, options, output, no_browser).await
        }
    };

    result.map_err(|e| {
        log::error!("Command failed ({}): {}", e.category(), e);
        anyhow::anyhow!(e.user_message())
    })
}

async fn run_info(resolver: &Resolver, url: &str, json: bool) -> downloadex::AppResult<()> {
    let session = Session::start(resolver, url).await?;
    let meta = &session.metadata;

    if json {
        println!("{}", serde_json::to_string_pretty(meta)?);
        return Ok(());
    }

    println!("🎬 Video Information");
    println!("====================");
    println!("Platform: {}", meta.platform);
    println!("Title: {}", meta.display_title());
    println!("Author: {}", meta.author.label());
    println!("Source: {}", meta.source_url);
    println!("Provider: {}", meta.provider);
    if let Some(url) = &meta.media.no_watermark_url {
        println!("Video (no watermark): {}", url);
    }
    if let Some(url) = &meta.media.watermark_url {
        println!("Video (watermark): {}", url);
    }
    if let Some(url) = &meta.media.audio_url {
        println!("Audio: {}", url);
    }
    if let Some(url) = &meta.media.cover_url {
        println!("Cover: {}", url);
    }
    if let Some(stats) = &meta.stats {
        println!("Stats: {}", stats);
    }
    Ok(())
}

async fn run_caption(resolver: &Resolver, url: &str) -> downloadex::AppResult<()> {
    let session = Session::start(resolver, url).await?;
    println!("{}", session.caption);
    Ok(())
}

async fn run_download(
    resolver: &Resolver,
    url: &str,
    options: DownloadOptions,
    output: Option<String>,
    no_browser: bool,
) -> downloadex::AppResult<()> {
    println!("🎬 DownloadeX");
    println!("=============");
    println!("URL: {}", url);
    println!(
        "Format: {}",
        match options.format {
            MediaFormat::Video => "MP4 video",
            MediaFormat::AudioOnly => "MP3 audio",
        }
    );

    let session = Session::start(resolver, url).await?;
    println!("Title: {}", session.metadata.display_title());
    println!("Author: {}", session.metadata.author.label());

    let mut surface_options = LocalSurfaceOptions::from_env();
    if let Some(dir) = output {
        surface_options.output_dir = PathBuf::from(dir);
    }
    if no_browser {
        surface_options.open_browser = false;
    }
    let surface = LocalSurface::new(surface_options)?;
    let downloader = Downloader::new(Arc::new(surface));

    match session.download(&downloader, &options).await? {
        DownloadOutcome::Completed { saved_to: Some(path) } => {
            println!("\n✅ Saved to {}", path.display())
        }
        DownloadOutcome::Completed { saved_to: None } => println!("\n✅ Download completed"),
        DownloadOutcome::OpenedInNewTab => {
            println!("\n🌐 Opened in your browser. Use \"Save video as…\" if it does not start automatically.")
        }
        DownloadOutcome::InstructionsShown => {}
    }
    Ok(())
}
