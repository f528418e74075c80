//! Building ffmpeg invocations from transcode options.

use crate::{Error, OutputDir, OutputFormat, Result, TranscodeOptions};
use std::fmt;
use std::path::{Path, PathBuf};

/// A fully assembled tool invocation: executable path plus ordered
/// arguments, ready to launch as a subprocess.
///
/// Immutable once built; produced fresh per request, never cached. The
/// `Display` form is meant for log echoes (whitespace-bearing arguments
/// are quoted), not for shell re-parsing.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    /// Assemble an invocation directly from a program and arguments.
    ///
    /// [`CommandBuilder::build`] is the usual source; this exists for
    /// callers driving the runner with a hand-built command.
    pub fn new(
        program: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the executable path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Get the ordered argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Short tool name for log and error messages.
    pub(crate) fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.chars().any(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Builds [`Invocation`]s for the transcode tool.
///
/// Holds the resolved tool path, injected once at startup. `build` is
/// pure: no I/O, no state, deterministic for a given set of options.
///
/// # Example
///
/// ```no_run
/// use reframe_av::{CommandBuilder, OutputDir, Resolution, TranscodeOptions};
///
/// let outputs = OutputDir::create("output")?;
/// let builder = CommandBuilder::new("/usr/bin/ffmpeg");
/// let mut options = TranscodeOptions::new("/media/raw.mov", "clip");
/// options.resolution = Resolution::P720;
/// let invocation = builder.build(&options, &outputs)?;
/// # Ok::<(), reframe_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    tool_path: PathBuf,
}

impl CommandBuilder {
    /// Create a builder around the resolved tool path.
    pub fn new(tool_path: impl Into<PathBuf>) -> Self {
        Self {
            tool_path: tool_path.into(),
        }
    }

    /// Get the tool path this builder was configured with.
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Map `options` to a single invocation.
    ///
    /// The input path comes first after `-i`; scale and crop compose
    /// into one `-vf` filter chain (scale first, then crop); `-y` and
    /// the resolved output path are always the final two arguments.
    /// Paths travel as single argument tokens, so spaces are safe.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOption`] if the input path or output name is
    /// empty, or the output name has no usable file component.
    pub fn build(&self, options: &TranscodeOptions, outputs: &OutputDir) -> Result<Invocation> {
        if options.input_path.as_os_str().is_empty() {
            return Err(Error::invalid_option("input path is empty"));
        }
        if options.output_name.trim().is_empty() {
            return Err(Error::invalid_option("output name is empty"));
        }

        let mut args = Vec::new();
        args.push("-i".to_string());
        args.push(options.input_path.to_string_lossy().into_owned());

        // Ordered filter chain: the scale sets the target size, the crop
        // then shapes the frame. One -vf argument so neither stage is
        // silently dropped.
        let mut filters = Vec::new();
        if let Some(pair) = options.resolution.scale_pair() {
            filters.push(format!("scale={pair}"));
        }
        if let Some(expr) = options.aspect.crop_expr() {
            filters.push(format!("crop={expr}"));
        }
        if !filters.is_empty() {
            args.push("-vf".to_string());
            args.push(filters.join(","));
        }

        let output_name = normalize_output_name(&options.output_name, options.format);
        let output_path = outputs.resolve(&output_name)?;

        args.push("-y".to_string());
        args.push(output_path.to_string_lossy().into_owned());

        let invocation = Invocation {
            program: self.tool_path.clone(),
            args,
        };
        tracing::debug!("built invocation: {}", invocation);
        Ok(invocation)
    }
}

/// Append the format's extension unless the name already ends with it
/// (case-insensitive).
fn normalize_output_name(name: &str, format: OutputFormat) -> String {
    match format.extension() {
        Some(ext) => {
            let suffix = format!(".{ext}");
            if name.to_lowercase().ends_with(&suffix) {
                name.to_string()
            } else {
                format!("{name}{suffix}")
            }
        }
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AspectRatio, Resolution};
    use tempfile::{tempdir, TempDir};

    fn test_outputs() -> (TempDir, OutputDir) {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("out")).unwrap();
        (temp, outputs)
    }

    fn builder() -> CommandBuilder {
        CommandBuilder::new("/opt/tools/ffmpeg")
    }

    fn filter_arg(invocation: &Invocation) -> Option<&str> {
        let args = invocation.args();
        args.iter()
            .position(|a| a == "-vf")
            .map(|i| args[i + 1].as_str())
    }

    #[test]
    fn scale_filter_uses_fixed_table() {
        let (_temp, outputs) = test_outputs();
        let cases = [
            (Resolution::P480, "scale=854:480"),
            (Resolution::P720, "scale=1280:720"),
            (Resolution::P1080, "scale=1920:1080"),
            (Resolution::Qhd, "scale=2560:1440"),
            (Resolution::Uhd, "scale=3840:2160"),
        ];
        for (resolution, expected) in cases {
            let mut options = TranscodeOptions::new("/media/in.mp4", "clip");
            options.resolution = resolution;
            let invocation = builder().build(&options, &outputs).unwrap();
            assert_eq!(filter_arg(&invocation), Some(expected));
        }
    }

    #[test]
    fn keep_original_resolution_emits_no_scale() {
        let (_temp, outputs) = test_outputs();
        let options = TranscodeOptions::new("/media/in.mp4", "clip");
        let invocation = builder().build(&options, &outputs).unwrap();
        assert_eq!(filter_arg(&invocation), None);
        assert!(!invocation.args().iter().any(|a| a.contains("scale=")));
    }

    #[test]
    fn crop_expressions_pass_through_verbatim() {
        let (_temp, outputs) = test_outputs();
        let cases = [
            (AspectRatio::Widescreen, "crop=iw:iw*9/16"),
            (AspectRatio::Vertical, "crop=ih*9/16:ih"),
            (AspectRatio::Square, "crop=min(iw,ih):min(iw,ih)"),
            (AspectRatio::Standard, "crop=iw:iw*3/4"),
            (AspectRatio::Ultrawide, "crop=iw:iw*9/21"),
        ];
        for (aspect, expected) in cases {
            let mut options = TranscodeOptions::new("/media/in.mp4", "clip");
            options.aspect = aspect;
            let invocation = builder().build(&options, &outputs).unwrap();
            assert_eq!(filter_arg(&invocation), Some(expected));
        }
    }

    #[test]
    fn scale_and_crop_compose_into_one_chain() {
        let (_temp, outputs) = test_outputs();
        let mut options = TranscodeOptions::new("/media/in.mp4", "clip");
        options.resolution = Resolution::P720;
        options.aspect = AspectRatio::Widescreen;
        let invocation = builder().build(&options, &outputs).unwrap();

        let vf_count = invocation.args().iter().filter(|a| *a == "-vf").count();
        assert_eq!(vf_count, 1);
        assert_eq!(
            filter_arg(&invocation),
            Some("scale=1280:720,crop=iw:iw*9/16")
        );
    }

    #[test]
    fn extension_appended_when_missing() {
        let (_temp, outputs) = test_outputs();
        let mut options = TranscodeOptions::new("/media/in.mp4", "clip");
        options.format = OutputFormat::Mp4;
        let invocation = builder().build(&options, &outputs).unwrap();
        let output = invocation.args().last().unwrap();
        assert!(output.ends_with("clip.mp4"), "unexpected output: {output}");
    }

    #[test]
    fn extension_not_duplicated() {
        let (_temp, outputs) = test_outputs();

        let mut options = TranscodeOptions::new("/media/in.mp4", "clip.mp4");
        options.format = OutputFormat::Mp4;
        let invocation = builder().build(&options, &outputs).unwrap();
        let output = invocation.args().last().unwrap();
        assert!(output.ends_with("clip.mp4"));
        assert!(!output.ends_with("clip.mp4.mp4"));

        // Case-insensitive on the existing extension.
        let mut options = TranscodeOptions::new("/media/in.mp4", "CLIP.MP4");
        options.format = OutputFormat::Mp4;
        let invocation = builder().build(&options, &outputs).unwrap();
        assert!(invocation.args().last().unwrap().ends_with("CLIP.MP4"));
    }

    #[test]
    fn keep_original_format_leaves_name_alone() {
        let (_temp, outputs) = test_outputs();
        let options = TranscodeOptions::new("/media/in.mp4", "clip");
        let invocation = builder().build(&options, &outputs).unwrap();
        let output = invocation.args().last().unwrap();
        assert!(output.ends_with("clip"));
    }

    #[test]
    fn token_order_is_stable() {
        let (_temp, outputs) = test_outputs();
        let mut options = TranscodeOptions::new("/media/in.mp4", "clip");
        options.resolution = Resolution::P1080;
        options.format = OutputFormat::Mkv;
        let invocation = builder().build(&options, &outputs).unwrap();

        let args = invocation.args();
        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "/media/in.mp4");
        assert_eq!(args[args.len() - 2], "-y");
        assert!(args[args.len() - 1].ends_with("clip.mkv"));
    }

    #[test]
    fn input_path_with_spaces_stays_one_token() {
        let (_temp, outputs) = test_outputs();
        let options = TranscodeOptions::new("/media/my raw clip.mov", "clip");
        let invocation = builder().build(&options, &outputs).unwrap();
        assert_eq!(invocation.args()[1], "/media/my raw clip.mov");
    }

    #[test]
    fn output_name_with_separators_stays_inside_output_dir() {
        let (_temp, outputs) = test_outputs();
        let mut options = TranscodeOptions::new("/media/in.mp4", "evil/../../clip");
        options.format = OutputFormat::Mp4;
        let invocation = builder().build(&options, &outputs).unwrap();

        let output = PathBuf::from(invocation.args().last().unwrap());
        assert_eq!(output.parent(), Some(outputs.root()));
        assert_eq!(output.file_name().unwrap(), "clip.mp4");
    }

    #[test]
    fn empty_fields_are_invalid() {
        let (_temp, outputs) = test_outputs();

        let options = TranscodeOptions::new("", "clip");
        assert!(matches!(
            builder().build(&options, &outputs),
            Err(Error::InvalidOption(_))
        ));

        let options = TranscodeOptions::new("/media/in.mp4", "   ");
        assert!(matches!(
            builder().build(&options, &outputs),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn seven_twenty_mp4_scenario() {
        let (_temp, outputs) = test_outputs();
        let mut options = TranscodeOptions::new("/media/session.mov", "in");
        options.resolution = "720p (1280x720)".parse().unwrap();
        options.aspect = "Keep Original".parse().unwrap();
        options.format = "MP4".parse().unwrap();
        let invocation = builder().build(&options, &outputs).unwrap();

        assert_eq!(filter_arg(&invocation), Some("scale=1280:720"));
        assert!(!invocation.args().iter().any(|a| a.contains("crop")));
        assert!(invocation.args().last().unwrap().ends_with("in.mp4"));
    }

    #[test]
    fn display_quotes_whitespace_arguments() {
        let (_temp, outputs) = test_outputs();
        let options = TranscodeOptions::new("/media/my raw clip.mov", "clip");
        let invocation = builder().build(&options, &outputs).unwrap();

        let rendered = invocation.to_string();
        assert!(rendered.starts_with("/opt/tools/ffmpeg "));
        assert!(rendered.contains("\"/media/my raw clip.mov\""));
    }

    #[test]
    fn normalize_handles_extensions() {
        assert_eq!(normalize_output_name("clip", OutputFormat::Mp4), "clip.mp4");
        assert_eq!(
            normalize_output_name("clip.mp4", OutputFormat::Mp4),
            "clip.mp4"
        );
        assert_eq!(
            normalize_output_name("CLIP.MP4", OutputFormat::Mp4),
            "CLIP.MP4"
        );
        assert_eq!(
            normalize_output_name("clip.avi", OutputFormat::Mp4),
            "clip.avi.mp4"
        );
        assert_eq!(
            normalize_output_name("clip", OutputFormat::KeepOriginal),
            "clip"
        );
    }
}
