//! The manifest: the list of rivers a site publishes.

use serde::Deserialize;

use super::{decode_json, FetchError};

/// One entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Display name.
    pub name: String,
    /// Where the river's JSON lives, possibly relative to the manifest.
    pub url: String,
}

/// Wire shape.  The producer writes `title`; hand-written manifests tend to
/// say `name`.
#[derive(Deserialize)]
struct RawFeed {
    name: Option<String>,
    title: Option<String>,
    url: String,
}

/// Decode a manifest body (`manifest.json`, or JSONP `manifest.js`).
pub fn parse_manifest(body: &[u8]) -> Result<Vec<Feed>, FetchError> {
    let value = decode_json("manifest", body)?;
    let raw: Vec<RawFeed> =
        serde_json::from_value(value).map_err(|e| FetchError::parse("manifest", e))?;

    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let name = entry.name.or(entry.title).ok_or_else(|| {
                FetchError::parse("manifest", format!("entry {index} has no name or title"))
            })?;
            Ok(Feed {
                name,
                url: entry.url,
            })
        })
        .collect()
}
