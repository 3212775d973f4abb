use std::path::Path;

use futures::stream::{self, BoxStream, StreamExt};
use url::Url;

use crate::download::segment::{fetch_segment, Fetched, Segment, StreamKind};
use crate::download::Transport;
use crate::error::Result;

/// Outcome of probing one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Saved { index: u64, bytes: u64 },
    /// No segment at `index`; the stream holds indices `0..index`.
    EndOfSequence { index: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub kind: StreamKind,
    pub segments: u64,
    pub bytes: u64,
}

/// Downloads `media_0`, `media_1`, ... of one stream into `folder`, one request
/// at a time, until the server answers 404 or something fails.
pub struct SequentialDownloader<'a, T: ?Sized> {
    transport: &'a T,
    kind: StreamKind,
    base: &'a Url,
    folder: &'a Path,
}

impl<'a, T> SequentialDownloader<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T, kind: StreamKind, base: &'a Url, folder: &'a Path) -> Self {
        Self {
            transport,
            kind,
            base,
            folder,
        }
    }

    async fn probe(&self, index: u64) -> Result<Probe> {
        let segment = Segment::new(self.kind, index);
        let url = segment.remote_url(self.base)?;
        let dest = segment.local_path(self.folder);

        tracing::info!("Downloading {}...", url);

        match fetch_segment(self.transport, &url, &dest).await? {
            Fetched::Saved(bytes) => Ok(Probe::Saved { index, bytes }),
            Fetched::EndOfSequence => Ok(Probe::EndOfSequence { index }),
        }
    }

    /// Lazy sequence of probes starting at index 0.
    ///
    /// Yields `Saved` for every stored segment, then exactly one terminal item
    /// (`EndOfSequence` or an error) and ends. Each probe starts only after the
    /// previous one has finished.
    pub fn probes(&self) -> BoxStream<'_, Result<Probe>> {
        stream::unfold(Some(0u64), move |next| async move {
            let index = next?;
            let probe = self.probe(index).await;
            let next = match probe {
                Ok(Probe::Saved { .. }) => Some(index + 1),
                _ => None,
            };
            Some((probe, next))
        })
        .boxed()
    }

    pub async fn download(&self) -> Result<StreamSummary> {
        let mut summary = StreamSummary {
            kind: self.kind,
            segments: 0,
            bytes: 0,
        };

        let mut probes = self.probes();
        while let Some(probe) = probes.next().await {
            match probe {
                Ok(Probe::Saved { index, bytes }) => {
                    tracing::debug!("Saved {} segment {} ({} bytes)", self.kind, index, bytes);
                    summary.segments += 1;
                    summary.bytes += bytes;
                }
                Ok(Probe::EndOfSequence { index }) => {
                    tracing::info!("No more {} files found after {} segments", self.kind, index);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            "Downloaded {} {} segments ({} bytes)",
            summary.segments,
            self.kind,
            summary.bytes
        );

        Ok(summary)
    }
}
