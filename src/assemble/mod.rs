//! Final assembly: audio to an intermediate WAV, then video + WAV into one
//! container. The actual media work is delegated through [`AudioConverter`]
//! and [`Muxer`].

pub mod ffmpeg;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Decode compressed audio and write it as uncompressed samples, keeping the
/// source sample rate and channel layout.
pub trait AudioConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Combine a video file and an audio file into `output`, copying the video
/// stream and re-encoding the audio.
pub trait Muxer {
    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()>;
}

/// Removes the file at `path` when dropped.
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(_) => tracing::debug!("Removed temporary file {}", self.path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!("Error removing temporary file {}: {}", self.path.display(), err)
            }
        }
    }
}

/// Where the assembler reads from and writes to.
#[derive(Debug, Clone)]
pub struct AssemblyPaths<'a> {
    pub video: &'a Path,
    pub audio: &'a Path,
    pub temp_audio: &'a Path,
    pub output: &'a Path,
}

pub struct MediaAssembler<C, M> {
    pub(crate) converter: C,
    pub(crate) muxer: M,
}

impl<C, M> MediaAssembler<C, M>
where
    C: AudioConverter,
    M: Muxer,
{
    pub fn new(converter: C, muxer: M) -> Self {
        Self { converter, muxer }
    }

    /// Convert the audio to `temp_audio`, mux it with the video into `output`,
    /// and delete `temp_audio` whatever the outcome.
    pub fn assemble(&self, paths: &AssemblyPaths) -> Result<PathBuf> {
        if paths.temp_audio.exists() {
            tracing::debug!("Removing stale {}", paths.temp_audio.display());
            std::fs::remove_file(paths.temp_audio)
                .map_err(|err| Error::io(paths.temp_audio, err))?;
        }

        let _temp = TempFile::new(paths.temp_audio);

        tracing::info!("Converting {} to {}", paths.audio.display(), paths.temp_audio.display());
        if let Err(err) = self.converter.convert(paths.audio, paths.temp_audio) {
            tracing::error!("Error converting audio: {}", err);
            return Err(err);
        }

        tracing::info!(
            "Muxing {} and {} into {}",
            paths.video.display(),
            paths.temp_audio.display(),
            paths.output.display()
        );
        if let Err(err) = self.muxer.mux(paths.video, paths.temp_audio, paths.output) {
            tracing::error!("Error muxing output: {}", err);
            return Err(err);
        }

        Ok(paths.output.to_path_buf())
    }
}
