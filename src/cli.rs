use crate::core::types::MediaFormat;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dex")]
#[command(author, version, about = "Resolve, caption and download TikTok and YouTube videos", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show video metadata
    Info {
        /// TikTok or YouTube URL
        url: String,

        /// Print the metadata record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the generated caption
    Caption {
        /// TikTok or YouTube URL
        url: String,
    },

    /// Download the video or its audio
    Download {
        /// TikTok or YouTube URL
        url: String,

        /// What to download: video (mp4) or audio (mp3)
        #[arg(short, long, default_value = "video")]
        format: MediaFormat,

        /// Output directory (defaults to DOWNLOAD_FOLDER)
        #[arg(short, long)]
        output: Option<String>,

        /// Accept the watermarked variant when no clean one exists
        #[arg(long)]
        allow_watermark: bool,

        /// Never hand URLs to the system browser
        #[arg(long)]
        no_browser: bool,

        /// Filename to save as (defaults to DownloadeX_<Platform>_<millis>.<ext>)
        #[arg(long)]
        filename: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
