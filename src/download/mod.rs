pub mod segment;
pub mod sequence;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};

/// What a GET for a segment produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Found(Bytes),
    /// HTTP 404, the end-of-sequence signal.
    NotFound,
}

/// Something that can GET a URL. Kept narrow so the download loop can be
/// driven by a fake in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Response>;
}

pub struct DownloadClient {
    client: reqwest::Client,
}

impl DownloadClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; rv:78.0) Gecko/20100101 Firefox/78.0")
            .build()
            .map_err(|err| Error::fetch("<client>", err))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for DownloadClient {
    async fn get(&self, url: &Url) -> Result<Response> {
        let request = self.client.get(url.as_str());

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("Error downloading {}: {}", url, err);
                return Err(Error::fetch(url, err));
            }
        };

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Response::NotFound);
        }

        if let Err(err) = response.error_for_status_ref() {
            tracing::error!("Error downloading {}: {}", url, err);
            return Err(Error::fetch(url, err));
        }

        // 1xx and unfollowed 3xx answers carry no segment body.
        if !response.status().is_success() {
            tracing::error!("Error downloading {}: HTTP status {}", url, response.status());
            return Err(Error::fetch(url, format!("HTTP status {}", response.status())));
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!("Error reading response from {}: {}", url, err);
                return Err(Error::fetch(url, err));
            }
        };

        Ok(Response::Found(bytes))
    }
}
