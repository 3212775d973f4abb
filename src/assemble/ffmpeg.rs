use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::assemble::{AudioConverter, Muxer};
use crate::error::{Error, Result};

/// The `ffmpeg` command line tool.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `configured` when given (it must exist), otherwise look `ffmpeg`
    /// up on `PATH`.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            if path.exists() {
                return Ok(Self::with_program(path));
            }
            tracing::error!("Configured ffmpeg {} does not exist", path.display());
            return Err(Error::ToolNotFound {
                tool: path.display().to_string(),
            });
        }

        match which::which("ffmpeg") {
            Ok(path) => Ok(Self::with_program(path)),
            Err(_) => Err(Error::ToolNotFound {
                tool: "ffmpeg".to_string(),
            }),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn base_args() -> Vec<OsString> {
        ["-hide_banner", "-loglevel", "error", "-y"]
            .into_iter()
            .map(OsString::from)
            .collect()
    }

    /// 32-bit float PCM keeps whatever the decoder produced; rate and
    /// channels are left alone.
    fn convert_args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Self::base_args();
        args.push("-i".into());
        args.push(input.into());
        args.extend(["-vn", "-c:a", "pcm_f32le", "-f", "wav"].map(OsString::from));
        args.push(output.into());
        args
    }

    fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args = Self::base_args();
        args.push("-i".into());
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        args.extend(
            ["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac"].map(OsString::from),
        );
        args.push(output.into());
        args
    }

    fn run(&self, step: &'static str, args: Vec<OsString>) -> Result<()> {
        tracing::debug!("Running {} {:?}", self.program.display(), args);

        let output = match Command::new(&self.program).args(&args).output() {
            Ok(output) => output,
            Err(err) => {
                return Err(Error::assembly(
                    step,
                    format!("could not start {}: {}", self.program.display(), err),
                ));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("{} exited with {}", self.program.display(), output.status),
                stderr => format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr
                ),
            };
            return Err(Error::assembly(step, message));
        }

        Ok(())
    }
}

impl AudioConverter for Ffmpeg {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.run("audio conversion", Self::convert_args(input, output))
    }
}

impl Muxer for Ffmpeg {
    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        self.run("muxing", Self::mux_args(video, audio, output))
    }
}
