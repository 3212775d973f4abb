use std::io::{BufRead, Write};

use crate::download::segment::StreamKind;
use crate::error::Result;

/// Where the base URL for each stream comes from.
pub trait BaseUrlSource {
    fn base_url(&mut self, kind: StreamKind) -> Result<String>;
}

/// Asks on stdin unless the URL was already given on the command line.
pub struct Console {
    video_url: Option<String>,
    audio_url: Option<String>,
}

impl Console {
    pub fn new(video_url: Option<String>, audio_url: Option<String>) -> Self {
        Self {
            video_url,
            audio_url,
        }
    }

    /// Block until the operator presses Enter.
    pub fn wait_for_key() -> Result<()> {
        print!("Press Enter to exit...");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

impl BaseUrlSource for Console {
    fn base_url(&mut self, kind: StreamKind) -> Result<String> {
        let preset = match kind {
            StreamKind::Video => self.video_url.take(),
            StreamKind::Audio => self.audio_url.take(),
        };
        if let Some(url) = preset {
            return Ok(url);
        }

        print!("Enter the base URL for {}: ", kind);
        std::io::stdout().flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}
