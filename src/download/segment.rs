use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use url::Url;

use crate::download::{Response, Transport};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    pub fn extension(&self) -> &'static str {
        match self {
            StreamKind::Video => ".ts",
            StreamKind::Audio => ".aac",
        }
    }

    pub fn folder_name(&self) -> &'static str {
        match self {
            StreamKind::Video => "Video",
            StreamKind::Audio => "Audio",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
        }
    }
}

/// One numbered chunk of a stream. Indices start at 0 and are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: StreamKind,
    pub index: u64,
}

impl Segment {
    pub fn new(kind: StreamKind, index: u64) -> Self {
        Self { kind, index }
    }

    /// `{base}media_{index}{ext}`; `base` already ends with `/`.
    pub fn remote_url(&self, base: &Url) -> Result<Url> {
        let url = format!("{}media_{}{}", base.as_str(), self.index, self.kind.extension());
        Url::parse(&url).map_err(|err| Error::InvalidUrl {
            url,
            reason: err.to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.index, self.kind.extension())
    }

    pub fn local_path(&self, folder: &Path) -> PathBuf {
        folder.join(self.file_name())
    }
}

/// Trim operator input, reject blanks, make sure it ends with `/` and is an
/// http(s) URL.
pub fn normalize_base_url(kind: StreamKind, raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::BlankInput { kind });
    }

    let mut base = trimmed.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    let url = Url::parse(&base).map_err(|err| Error::InvalidUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl {
            url: trimmed.to_string(),
            reason: format!("URL must start with http or https, got {scheme}"),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched {
    /// The body was written; carries the number of bytes.
    Saved(u64),
    EndOfSequence,
}

/// Fetch `url` and write its body to `dest`, which must not exist yet.
///
/// A 404 is reported as [`Fetched::EndOfSequence`]. No file is left behind
/// unless the whole body was written.
pub async fn fetch_segment<T>(transport: &T, url: &Url, dest: &Path) -> Result<Fetched>
where
    T: Transport + ?Sized,
{
    if dest.exists() {
        tracing::error!("Segment file already exists: {}", dest.display());
        return Err(Error::SegmentExists {
            path: dest.to_path_buf(),
        });
    }

    let bytes = match transport.get(url).await? {
        Response::Found(bytes) => bytes,
        Response::NotFound => return Ok(Fetched::EndOfSequence),
    };

    let mut file = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
    {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(Error::SegmentExists {
                path: dest.to_path_buf(),
            });
        }
        Err(err) => {
            tracing::error!("Error creating file {}: {}", dest.display(), err);
            return Err(Error::io(dest, err));
        }
    };

    if let Err(err) = file.write_all(&bytes).and_then(|_| file.flush()) {
        tracing::error!("Error writing to file {}: {}", dest.display(), err);
        drop(file);
        let _ = std::fs::remove_file(dest);
        return Err(Error::io(dest, err));
    }

    Ok(Fetched::Saved(bytes.len() as u64))
}
