//! River data layer.
//!
//! This module defines the [`RiverSource`] trait, the manifest and content
//! types, and the one concrete source, [`SiteSource`], which reads a manifest
//! and its rivers from a web site or a local mirror.
//!
//! ## For contributors
//!
//! The view-model never talks to a [`RiverSource`] directly; the fetcher in
//! [`crate::fetch`] does, on a background runtime.  Tests implement the trait
//! over in-memory maps, so keep it small.

mod content;
mod error;
mod location;
mod manifest;
mod site;

pub use content::{River, RiverContent};
pub use error::FetchError;
pub use location::Location;
#[cfg(test)]
pub use manifest::parse_manifest;
pub use manifest::Feed;
pub use site::SiteSource;

use async_trait::async_trait;
use serde_json::Value;

/// Anything that can produce a manifest and the rivers it lists.
#[async_trait]
pub trait RiverSource: Send + Sync {
    /// Label for the status bar (usually the manifest location).
    fn name(&self) -> &str;

    async fn fetch_manifest(&self) -> Result<Vec<Feed>, FetchError>;

    /// Fetch the river behind a manifest entry's `url`.
    async fn fetch_river(&self, url: &str) -> Result<RiverContent, FetchError>;
}

/// Decode a JSON body, unwrapping a JSONP `callback(...)` if present.
pub(crate) fn decode_json(what: &'static str, body: &[u8]) -> Result<Value, FetchError> {
    let text = std::str::from_utf8(body).map_err(|e| FetchError::parse(what, e))?;
    let text = text.trim_start_matches('\u{feff}').trim();

    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) => match strip_callback(text) {
            Some(json) => serde_json::from_str(json).map_err(|e| FetchError::parse(what, e)),
            None => Err(FetchError::parse(what, e)),
        },
    }
}

/// `onGetRiverStream({...});` -> `{...}`
fn strip_callback(text: &str) -> Option<&str> {
    let open = text.find('(')?;
    let close = text.rfind(')')?;
    if close <= open {
        return None;
    }
    let callback = text[..open].trim();
    let is_identifier = !callback.is_empty()
        && callback
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'));
    let tail = text[close + 1..].trim();
    if !is_identifier || !(tail.is_empty() || tail == ";") {
        return None;
    }
    Some(text[open + 1..close].trim())
}
