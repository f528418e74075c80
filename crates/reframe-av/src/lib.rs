//! # reframe-av
//!
//! Command construction and asynchronous execution for ffmpeg transcodes.
//!
//! This crate provides functionality for:
//! - Mapping transcode options (resolution, aspect-ratio crop, container
//!   format) to a single ffmpeg invocation
//! - Running that invocation without blocking the caller, streaming its
//!   diagnostic output line by line, and signaling completion exactly once
//! - Managing the output directory every transcode lands in
//! - Locating the ffmpeg binary (bundled copy, then search path)
//!
//! ## Example
//!
//! ```no_run
//! use reframe_av::{
//!     CommandBuilder, OutputDir, ProcessRunner, Resolution, TranscodeOptions,
//! };
//!
//! # async fn example() -> reframe_av::Result<()> {
//! let outputs = OutputDir::create("output")?;
//! let ffmpeg = reframe_av::tools::locate_ffmpeg(std::path::Path::new("."), None);
//!
//! let mut options = TranscodeOptions::new("/media/raw.mov", "clip.mp4");
//! options.resolution = Resolution::P720;
//!
//! let invocation = CommandBuilder::new(ffmpeg).build(&options, &outputs)?;
//! let handle = ProcessRunner::new().run(
//!     invocation,
//!     |line| println!("{line}"),
//!     |outcome| println!("done, success: {}", outcome.success()),
//! )?;
//! handle.join().await;
//! # Ok(())
//! # }
//! ```

mod command;
mod error;
mod options;
mod outputs;
mod runner;
pub mod tools;

// Re-exports
pub use command::{CommandBuilder, Invocation};
pub use error::{Error, Result};
pub use options::{AspectRatio, OutputFormat, Resolution, TranscodeOptions};
pub use outputs::OutputDir;
pub use runner::{ExecutionHandle, ProcessRunner, RunOutcome, RunnerSettings};
pub use tools::{check_ffmpeg, locate_ffmpeg, ToolInfo};
