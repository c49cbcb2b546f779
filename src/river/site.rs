//! The concrete [`RiverSource`]: a manifest plus rivers published on a web
//! site, or mirrored to a local directory.

use std::time::Duration;

use async_trait::async_trait;

use super::manifest::parse_manifest;
use super::{Feed, FetchError, Location, RiverContent, RiverSource};

pub struct SiteSource {
    manifest: Location,
    label: String,
    client: reqwest::Client,
}

impl SiteSource {
    /// Create a source rooted at `manifest`.
    ///
    /// `timeout` bounds each individual request, connection included.
    pub fn new(manifest: Location, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            label: manifest.to_string(),
            manifest,
            client,
        })
    }

    async fn read(&self, location: &Location) -> Result<Vec<u8>, FetchError> {
        match location {
            Location::Remote(url) => {
                tracing::debug!(%url, "GET");
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        location: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            Location::Local(path) => {
                tracing::debug!(path = %path.display(), "read");
                tokio::fs::read(path).await.map_err(|source| FetchError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

#[async_trait]
impl RiverSource for SiteSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_manifest(&self) -> Result<Vec<Feed>, FetchError> {
        let body = self.read(&self.manifest).await?;
        parse_manifest(&body)
    }

    async fn fetch_river(&self, url: &str) -> Result<RiverContent, FetchError> {
        let location = self.manifest.resolve(url)?;
        let body = self.read(&location).await?;
        RiverContent::parse(&body)
    }
}
