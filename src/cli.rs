use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reframe")]
#[command(author, version, about = "Video conversion front-end driving ffmpeg")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single video file
    Run(RunArgs),

    /// Check that required external tools are available
    CheckTools,

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct RunArgs {
    /// Input video file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file name (defaults to the input file name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Target resolution: 480p, 720p, 1080p, 2k, 4k, or keep
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Aspect-ratio crop: 16:9, 9:16, 1:1, 4:3, 21:9, or keep
    #[arg(short, long)]
    pub aspect: Option<String>,

    /// Output container: mp4, avi, mkv, mov, webm, or keep
    #[arg(short, long)]
    pub format: Option<String>,

    /// Seconds to wait for ffmpeg before giving up on completion
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Terminate ffmpeg if it is still running when the wait expires
    #[arg(long)]
    pub kill_on_timeout: bool,

    /// Show the ffmpeg command without executing it
    #[arg(long)]
    pub dry_run: bool,
}
