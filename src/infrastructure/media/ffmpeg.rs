//! FFmpeg argument construction and process runner.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{TranscodeError, Transcoder};

/// Output height; width follows the source aspect ratio.
pub const TARGET_HEIGHT: u32 = 720;
pub const WATERMARK_WIDTH: u32 = 200;
pub const WATERMARK_OPACITY: f32 = 0.3;
pub const WATERMARK_MARGIN: u32 = 10;
pub const THUMBNAIL_WIDTH: u32 = 640;
pub const THUMBNAIL_HEIGHT: u32 = 360;

const VIDEO_CODEC: &str = "libx264";
const CRF: u8 = 28;
const PRESET: &str = "fast";

/// Lines of stderr kept in the log when the tool fails.
const STDERR_TAIL_LINES: usize = 10;

/// Argument list for one ffmpeg invocation. Every path stays a discrete
/// argument; nothing here is ever handed to a shell.
#[derive(Debug, Clone)]
pub struct FfmpegArgs {
    inputs: Vec<PathBuf>,
    output_args: Vec<OsString>,
    output: PathBuf,
}

impl FfmpegArgs {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            inputs: vec![input.as_ref().to_path_buf()],
            output_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
        }
    }

    pub fn extra_input(mut self, input: impl AsRef<Path>) -> Self {
        self.inputs.push(input.as_ref().to_path_buf());
        self
    }

    pub fn output_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn video_filter(self, filter: impl Into<OsString>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    pub fn filter_complex(self, filter: impl Into<OsString>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    pub fn threads(self, threads: u16) -> Self {
        self.output_arg("-threads").output_arg(threads.to_string())
    }

    /// The fixed H.264 profile, with the moov atom up front for progressive playback.
    pub fn web_h264(self) -> Self {
        self.output_arg("-vcodec")
            .output_arg(VIDEO_CODEC)
            .output_arg("-crf")
            .output_arg(CRF.to_string())
            .output_arg("-preset")
            .output_arg(PRESET)
            .output_arg("-movflags")
            .output_arg("+faststart")
    }

    pub fn single_frame(self) -> Self {
        self.output_arg("-frames:v").output_arg("1")
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn build(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-nostdin".into(),
        ];

        for input in &self.inputs {
            args.push("-i".into());
            args.push(input.clone().into_os_string());
        }

        args.extend(self.output_args.iter().cloned());
        args.push("-y".into());
        args.push(self.output.clone().into_os_string());
        args
    }
}

pub fn scale_filter() -> String {
    format!("scale=-2:{TARGET_HEIGHT}")
}

/// Scales the watermark (input 1) and the video (input 0), then pins the
/// mark to the bottom-right corner.
pub fn watermark_filter_graph() -> String {
    format!(
        "[1]scale={WATERMARK_WIDTH}:-1,format=rgba,colorchannelmixer=aa={WATERMARK_OPACITY}[wm];\
         [0:v]scale=-2:{TARGET_HEIGHT}[scaled];\
         [scaled][wm]overlay=W-w-{WATERMARK_MARGIN}:H-h-{WATERMARK_MARGIN}"
    )
}

pub fn thumbnail_filter() -> String {
    format!("select=eq(n\\,0),scale={THUMBNAIL_WIDTH}:{THUMBNAIL_HEIGHT}")
}

pub fn transcode_args(
    input: &Path,
    output: &Path,
    watermark: Option<&Path>,
    threads: u16,
) -> FfmpegArgs {
    let args = match watermark {
        Some(mark) => FfmpegArgs::new(input, output)
            .extra_input(mark)
            .filter_complex(watermark_filter_graph()),
        None => FfmpegArgs::new(input, output).video_filter(scale_filter()),
    };

    args.web_h264().threads(threads)
}

pub fn thumbnail_args(input: &Path, output: &Path, threads: u16) -> FfmpegArgs {
    FfmpegArgs::new(input, output)
        .video_filter(thumbnail_filter())
        .single_frame()
        .threads(threads)
}

/// Runs ffmpeg as a child process, one invocation per call.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    threads: u16,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, threads: u16, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            threads: threads.max(1),
            timeout,
        }
    }

    /// Waits for exit; success means status 0 and the output file exists.
    pub async fn run(&self, args: &FfmpegArgs) -> Result<(), TranscodeError> {
        let argv = args.build();
        debug!("Running {} {:?}", self.program.display(), argv);

        let mut command = Command::new(&self.program);
        command
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(TranscodeError::Spawn)?,
            Err(_) => {
                warn!("FFmpeg timed out after {} seconds, process killed", self.timeout.as_secs());
                return Err(TranscodeError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n");
            warn!(status = %output.status, "FFmpeg failed:\n{}", tail);
            return Err(TranscodeError::Exit(output.status));
        }

        if !tokio::fs::try_exists(args.output()).await.unwrap_or(false) {
            return Err(TranscodeError::MissingOutput(args.output().to_path_buf()));
        }

        Ok(())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        watermark: Option<&Path>,
    ) -> Result<(), TranscodeError> {
        if watermark.is_some() {
            info!("Starting video processing with watermark...");
        } else {
            info!("Starting video processing without watermark...");
        }
        self.run(&transcode_args(input, output, watermark, self.threads)).await
    }

    async fn extract_thumbnail(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        info!("Generating thumbnail...");
        self.run(&thumbnail_args(input, output, self.threads)).await
    }
}
