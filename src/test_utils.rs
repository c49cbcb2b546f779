//! Shared fixtures for tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::river::{parse_manifest, Feed, FetchError, RiverContent, RiverSource};

/// An in-memory site: one manifest body plus river bodies keyed by url.
pub struct StaticSource {
    manifest: String,
    rivers: HashMap<String, String>,
    delays: HashMap<String, Duration>,
}

impl StaticSource {
    pub fn new(manifest: &str) -> Self {
        Self {
            manifest: manifest.to_string(),
            rivers: HashMap::new(),
            delays: HashMap::new(),
        }
    }

    pub fn with_river(mut self, url: &str, body: &str) -> Self {
        self.rivers.insert(url.to_string(), body.to_string());
        self
    }

    /// Make requests for `url` take at least `delay`.
    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

#[async_trait]
impl RiverSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_manifest(&self) -> Result<Vec<Feed>, FetchError> {
        parse_manifest(self.manifest.as_bytes())
    }

    async fn fetch_river(&self, url: &str) -> Result<RiverContent, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        let body = self.rivers.get(url).ok_or_else(|| FetchError::Status {
            location: url.to_string(),
            status: 404,
        })?;
        RiverContent::parse(body.as_bytes())
    }
}

pub fn feed(name: &str, url: &str) -> Feed {
    Feed {
        name: name.to_string(),
        url: url.to_string(),
    }
}

pub fn content(json: &str) -> RiverContent {
    RiverContent::parse(json.as_bytes()).unwrap()
}
