//! River content: whatever JSON the selected river's url returns.
//!
//! Most rivers follow the river.js layout, a list of "updated feed" groups
//! each carrying a handful of items.  When the payload has that shape it is
//! decoded into [`River`] so the UI can lay it out; otherwise the raw JSON is
//! kept and shown as-is.
//!
//! ## Dates
//!
//! `pubDate` and `whenLastUpdate` are written as `ddd, DD MMM YYYY HH:mm:ss Z`.
//! Depending on the producer the offset comes with or without a colon
//! (`+00:00` / `+0000`), so both are accepted.  A date that cannot be parsed
//! becomes `None` instead of failing the whole river.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{decode_json, FetchError};

/// The fetched payload of one river.
#[derive(Debug, Clone, PartialEq)]
pub struct RiverContent {
    /// The payload exactly as decoded.
    pub raw: Value,
    /// Typed view, present when `raw` has the river.js layout.
    pub river: Option<River>,
}

impl RiverContent {
    /// Decode a river body (`.json`, or JSONP `.js`).
    pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
        let raw = decode_json("river", body)?;
        let river = River::deserialize(&raw).ok();
        Ok(Self { raw, river })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct River {
    pub updated_feeds: UpdatedFeeds,
    #[serde(default)]
    pub metadata: Metadata,
}

impl River {
    /// Groups in producer order (newest first).
    pub fn updates(&self) -> &[FeedUpdate] {
        &self.updated_feeds.updated_feed
    }

    pub fn item_count(&self) -> usize {
        self.updates().iter().map(|u| u.items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFeeds {
    #[serde(default)]
    pub updated_feed: Vec<FeedUpdate>,
}

/// New items from one source feed, grouped the way they were discovered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUpdate {
    #[serde(default)]
    pub feed_title: String,
    #[serde(default)]
    pub feed_url: String,
    #[serde(default)]
    pub feed_description: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub when_last_update: Option<DateTime<Utc>>,
    #[serde(default, rename = "item")]
    pub items: Vec<RiverItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub perma_link: String,
    #[serde(default, rename = "pubDate", deserialize_with = "lenient_date")]
    pub published: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub docs: String,
    #[serde(default, rename = "whenGMT")]
    pub when_gmt: String,
    #[serde(default)]
    pub when_local: String,
    #[serde(default)]
    pub secs: String,
    #[serde(default)]
    pub version: String,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

/// Parse a river timestamp, tolerating both offset spellings.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %:z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%a, %d %b %Y %H:%M:%S %z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RIVER: &str = r#"{
        "metadata": {
            "docs": "http://riverjs.org/",
            "secs": "1.204",
            "version": "3",
            "whenGMT": "Mon, 01 Jan 2024 12:00:00 +00:00",
            "whenLocal": "Mon, 01 Jan 2024 04:00:00 -08:00"
        },
        "updatedFeeds": {
            "updatedFeed": [
                {
                    "feedDescription": "All the news",
                    "feedTitle": "Example News",
                    "feedUrl": "https://example.com/rss.xml",
                    "websiteUrl": "https://example.com/",
                    "whenLastUpdate": "Mon, 01 Jan 2024 11:59:00 +00:00",
                    "item": [
                        {
                            "body": "Something happened ...",
                            "id": "17",
                            "link": "https://example.com/a",
                            "permaLink": "",
                            "pubDate": "Mon, 01 Jan 2024 11:00:00 +00:00",
                            "title": "Headline A",
                            "comments": "https://example.com/a#comments"
                        },
                        {
                            "body": "",
                            "id": "18",
                            "link": "https://example.com/b",
                            "permaLink": "",
                            "pubDate": "yesterday-ish",
                            "title": "Headline B"
                        }
                    ]
                },
                {
                    "feedTitle": "Other",
                    "item": [{"title": "Lonely", "id": "3"}]
                }
            ]
        }
    }"#;

    #[test]
    fn decodes_river_layout() {
        let content = RiverContent::parse(RIVER.as_bytes()).unwrap();
        let river = content.river.expect("river layout");

        assert_eq!(river.updates().len(), 2);
        assert_eq!(river.item_count(), 3);
        assert_eq!(river.metadata.version, "3");

        let update = &river.updates()[0];
        assert_eq!(update.feed_title, "Example News");
        assert_eq!(update.items[0].title, "Headline A");
        assert_eq!(
            update.items[0].comments.as_deref(),
            Some("https://example.com/a#comments")
        );
        assert_eq!(
            update.items[0].published,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap())
        );
    }

    #[test]
    fn bad_dates_become_none() {
        let content = RiverContent::parse(RIVER.as_bytes()).unwrap();
        let river = content.river.unwrap();
        assert!(river.updates()[0].items[1].published.is_none());
        assert!(river.updates()[1].when_last_update.is_none());
    }

    #[test]
    fn unwraps_river_stream_callback() {
        let body = format!("onGetRiverStream({RIVER})");
        let content = RiverContent::parse(body.as_bytes()).unwrap();
        assert_eq!(content.river.unwrap().item_count(), 3);
    }

    #[test]
    fn keeps_arbitrary_json_without_river_view() {
        let content = RiverContent::parse(br#"{"hello": ["world"]}"#).unwrap();
        assert!(content.river.is_none());
        assert_eq!(content.raw["hello"][0], "world");
    }

    #[test]
    fn keeps_scalar_payloads() {
        for body in ["42", "null", "true", "-1.5", r#""just text""#] {
            let content = RiverContent::parse(body.as_bytes()).unwrap();
            assert!(content.river.is_none(), "{body}");
        }
        assert_eq!(RiverContent::parse(b"42").unwrap().raw, 42);
    }

    #[test]
    fn rejects_non_json() {
        let err = RiverContent::parse(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse { what: "river", .. }));
    }

    #[test]
    fn parse_date_accepts_both_offset_spellings() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_date("Mon, 01 Jan 2024 12:00:00 +0000"), Some(expected));
        assert_eq!(parse_date("Mon, 01 Jan 2024 12:00:00 +00:00"), Some(expected));
        assert_eq!(parse_date("Mon, 01 Jan 2024 07:00:00 -05:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }
}
