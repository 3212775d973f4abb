use std::path::PathBuf;

use crate::download::segment::StreamKind;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Options {
    pub layout: Layout,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub ffmpeg: Option<PathBuf>,
    pub wait_for_key: bool,
}

/// Folders and file names used by a run, all relative to one root.
///
/// ```text
/// <root>/Video/{index}.ts
/// <root>/Audio/{index}.aac
/// <root>/Output/combined.ts, combined.aac, temp.wav, output.mp4
/// ```
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn segment_dir(&self, kind: StreamKind) -> PathBuf {
        self.root.join(kind.folder_name())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("Output")
    }

    pub fn combined(&self, kind: StreamKind) -> PathBuf {
        self.output_dir().join(format!("combined{}", kind.extension()))
    }

    pub fn temp_audio(&self) -> PathBuf {
        self.output_dir().join("temp.wav")
    }

    pub fn final_output(&self) -> PathBuf {
        self.output_dir().join("output.mp4")
    }

    /// Create the segment folders and the output folder if missing.
    pub fn create(&self) -> Result<()> {
        let folders = [
            self.segment_dir(StreamKind::Video),
            self.segment_dir(StreamKind::Audio),
            self.output_dir(),
        ];

        for folder in folders {
            if let Err(err) = std::fs::create_dir_all(&folder) {
                tracing::error!("Error creating folder {}: {}", folder.display(), err);
                return Err(Error::io(folder, err));
            }
        }

        Ok(())
    }
}
