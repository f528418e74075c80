//! Transcode option model: resolution, aspect-ratio crop, container format.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// One transcode request as collected from the user.
///
/// The three choice enums are closed and each carries a `KeepOriginal`
/// sentinel meaning "do not alter this property". `input_path` and
/// `output_name` must be non-empty before a build is attempted; the
/// front-end rejects empties and the builder fails loudly if one slips
/// through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Source media file.
    pub input_path: PathBuf,
    /// Output file name, extension optional; always resolved inside the
    /// output directory.
    pub output_name: String,
    /// Target resolution, or keep the source resolution.
    pub resolution: Resolution,
    /// Aspect-ratio crop, or keep the source framing.
    pub aspect: AspectRatio,
    /// Container format, or keep whatever the output name implies.
    pub format: OutputFormat,
}

impl TranscodeOptions {
    /// Create options that keep every property of the source unchanged.
    pub fn new(input_path: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_name: output_name.into(),
            resolution: Resolution::KeepOriginal,
            aspect: AspectRatio::KeepOriginal,
            format: OutputFormat::KeepOriginal,
        }
    }
}

/// Target resolutions offered by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Keep the source resolution.
    #[default]
    #[serde(rename = "keep")]
    KeepOriginal,
    /// 480p (854x480)
    #[serde(rename = "480p")]
    P480,
    /// 720p (1280x720)
    #[serde(rename = "720p")]
    P720,
    /// 1080p (1920x1080)
    #[serde(rename = "1080p")]
    P1080,
    /// 2K (2560x1440)
    #[serde(rename = "2k")]
    Qhd,
    /// 4K (3840x2160)
    #[serde(rename = "4k")]
    Uhd,
}

impl Resolution {
    /// Fixed `width:height` pair for the scale filter, `None` for
    /// [`Resolution::KeepOriginal`].
    pub fn scale_pair(&self) -> Option<&'static str> {
        match self {
            Resolution::KeepOriginal => None,
            Resolution::P480 => Some("854:480"),
            Resolution::P720 => Some("1280:720"),
            Resolution::P1080 => Some("1920:1080"),
            Resolution::Qhd => Some("2560:1440"),
            Resolution::Uhd => Some("3840:2160"),
        }
    }

    /// The label the front-end shows for this choice.
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::KeepOriginal => "Keep Original",
            Resolution::P480 => "480p (854x480)",
            Resolution::P720 => "720p (1280x720)",
            Resolution::P1080 => "1080p (1920x1080)",
            Resolution::Qhd => "2K (2560x1440)",
            Resolution::Uhd => "4K (3840x2160)",
        }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" | "keep original" | "original" => Ok(Resolution::KeepOriginal),
            "480p" | "480p (854x480)" => Ok(Resolution::P480),
            "720p" | "720p (1280x720)" => Ok(Resolution::P720),
            "1080p" | "1080p (1920x1080)" => Ok(Resolution::P1080),
            "2k" | "1440p" | "2k (2560x1440)" => Ok(Resolution::Qhd),
            "4k" | "2160p" | "4k (3840x2160)" => Ok(Resolution::Uhd),
            _ => Err(Error::invalid_option(format!("unknown resolution: {s}"))),
        }
    }
}

/// Aspect-ratio crops offered by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Keep the source framing.
    #[default]
    #[serde(rename = "keep")]
    KeepOriginal,
    /// 16:9 widescreen
    #[serde(rename = "16:9")]
    Widescreen,
    /// 9:16 vertical
    #[serde(rename = "9:16")]
    Vertical,
    /// 1:1 square
    #[serde(rename = "1:1")]
    Square,
    /// 4:3 standard
    #[serde(rename = "4:3")]
    Standard,
    /// 21:9 ultrawide
    #[serde(rename = "21:9")]
    Ultrawide,
}

impl AspectRatio {
    /// Fixed crop expression for this ratio, `None` for
    /// [`AspectRatio::KeepOriginal`].
    ///
    /// Expressions are written against the input dimensions (`iw`/`ih`)
    /// and are emitted character-for-character.
    pub fn crop_expr(&self) -> Option<&'static str> {
        match self {
            AspectRatio::KeepOriginal => None,
            AspectRatio::Widescreen => Some("iw:iw*9/16"),
            AspectRatio::Vertical => Some("ih*9/16:ih"),
            AspectRatio::Square => Some("min(iw,ih):min(iw,ih)"),
            AspectRatio::Standard => Some("iw:iw*3/4"),
            AspectRatio::Ultrawide => Some("iw:iw*9/21"),
        }
    }

    /// The label the front-end shows for this choice.
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::KeepOriginal => "Keep Original",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Ultrawide => "21:9",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" | "keep original" | "original" => Ok(AspectRatio::KeepOriginal),
            "16:9" | "16x9" | "widescreen" => Ok(AspectRatio::Widescreen),
            "9:16" | "9x16" | "vertical" | "portrait" => Ok(AspectRatio::Vertical),
            "1:1" | "1x1" | "square" => Ok(AspectRatio::Square),
            "4:3" | "4x3" => Ok(AspectRatio::Standard),
            "21:9" | "21x9" | "ultrawide" => Ok(AspectRatio::Ultrawide),
            _ => Err(Error::invalid_option(format!("unknown aspect ratio: {s}"))),
        }
    }
}

/// Output container formats offered by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Keep whatever container the output name implies.
    #[default]
    #[serde(rename = "keep")]
    KeepOriginal,
    /// MPEG-4 Part 14 container
    Mp4,
    /// AVI container
    Avi,
    /// Matroska container
    Mkv,
    /// QuickTime container
    Mov,
    /// WebM container
    Webm,
}

impl OutputFormat {
    /// Lowercase file extension for this container, `None` for
    /// [`OutputFormat::KeepOriginal`].
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::KeepOriginal => None,
            OutputFormat::Mp4 => Some("mp4"),
            OutputFormat::Avi => Some("avi"),
            OutputFormat::Mkv => Some("mkv"),
            OutputFormat::Mov => Some("mov"),
            OutputFormat::Webm => Some("webm"),
        }
    }

    /// The label the front-end shows for this choice.
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::KeepOriginal => "Keep Original",
            OutputFormat::Mp4 => "MP4",
            OutputFormat::Avi => "AVI",
            OutputFormat::Mkv => "MKV",
            OutputFormat::Mov => "MOV",
            OutputFormat::Webm => "WebM",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" | "keep original" | "original" => Ok(OutputFormat::KeepOriginal),
            "mp4" | "m4v" => Ok(OutputFormat::Mp4),
            "avi" => Ok(OutputFormat::Avi),
            "mkv" | "matroska" => Ok(OutputFormat::Mkv),
            "mov" | "quicktime" => Ok(OutputFormat::Mov),
            "webm" => Ok(OutputFormat::Webm),
            _ => Err(Error::invalid_option(format!("unknown output format: {s}"))),
        }
    }
}
