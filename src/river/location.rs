//! Where a manifest or river lives.
//!
//! The river producer publishes to a web bucket, but the same tree is often
//! mirrored to disk, so both remote URLs and local paths are accepted.  Feed
//! urls inside a manifest are usually relative (`rivers/tech.json`) and are
//! resolved against the manifest they came from.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use super::FetchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(Url),
    Local(PathBuf),
}

impl Location {
    /// Interpret a command-line argument or manifest entry on its own.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FetchError::InvalidLocation(raw.to_string()));
        }
        match absolute_url(raw)? {
            Some(location) => Ok(location),
            None => Ok(Self::Local(PathBuf::from(raw))),
        }
    }

    /// Resolve `href` relative to this location.
    ///
    /// Absolute URLs and absolute paths win; anything else is joined onto the
    /// directory containing `self`.
    pub fn resolve(&self, href: &str) -> Result<Self, FetchError> {
        let href = href.trim();
        if href.is_empty() {
            return Err(FetchError::InvalidLocation(href.to_string()));
        }
        if let Some(location) = absolute_url(href)? {
            return Ok(location);
        }

        match self {
            Self::Remote(base) => base
                .join(href)
                .map(Self::Remote)
                .map_err(|_| FetchError::InvalidLocation(href.to_string())),
            Self::Local(base) => {
                let path = Path::new(href);
                if path.is_absolute() {
                    return Ok(Self::Local(path.to_path_buf()));
                }
                let dir = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Self::Local(dir.join(path)))
            }
        }
    }
}

/// `Some` when `raw` carries one of the schemes we know how to fetch.
fn absolute_url(raw: &str) -> Result<Option<Location>, FetchError> {
    let Ok(url) = Url::parse(raw) else {
        return Ok(None);
    };
    match url.scheme() {
        "http" | "https" => Ok(Some(Location::Remote(url))),
        "file" => url
            .to_file_path()
            .map(|path| Some(Location::Local(path)))
            .map_err(|_| FetchError::InvalidLocation(raw.to_string())),
        // Things like `C:` drive prefixes parse as a scheme; treat as paths.
        _ => Ok(None),
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
