pub mod exif;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::classify;
use crate::media::CapturedDate;

/// Tag names tried in order; the first one present decides.
pub const DATE_TAGS: &[&str] = &["DateTimeOriginal", "DateTime", "DateTimeDigitized"];

/// Embedded metadata as tag name -> raw string value.
pub type TagMap = BTreeMap<String, String>;

static EXIF_DATETIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}$").unwrap());

/// Outcome of looking for a capture date in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLookup {
    /// A date tag was present and well formed.
    Found { tag: String, date: CapturedDate },
    /// No date tag present; `available` lists the tags that were.
    Missing { available: Vec<String> },
    /// The first date tag present did not match `YYYY:MM:DD HH:MM:SS`.
    Malformed { tag: String, value: String },
    /// The file is an image but its metadata could not be read.
    Unreadable { reason: String },
    /// Not a decodable image.
    NotMedia,
}

/// Classify `path` and look up its capture date. Read-only.
pub fn inspect(path: &Path) -> DateLookup {
    if !classify::is_media(path) {
        return DateLookup::NotMedia;
    }
    match exif::read_tags(path) {
        Ok(tags) => find_date(&tags),
        Err(e) => DateLookup::Unreadable {
            reason: e.to_string(),
        },
    }
}

/// Capture date of `path`, if it is an image with a usable date tag.
pub fn extract(path: &Path) -> Option<CapturedDate> {
    match inspect(path) {
        DateLookup::Found { date, .. } => Some(date),
        _ => None,
    }
}

/// Search `tags` for the first of [`DATE_TAGS`] and parse it.
pub fn find_date(tags: &TagMap) -> DateLookup {
    let Some((tag, value)) = DATE_TAGS
        .iter()
        .find_map(|&name| tags.get(name).map(|v| (name, v)))
    else {
        return DateLookup::Missing {
            available: tags.keys().cloned().collect(),
        };
    };

    match parse_exif_datetime(value) {
        Some(date) => DateLookup::Found {
            tag: tag.to_string(),
            date,
        },
        None => DateLookup::Malformed {
            tag: tag.to_string(),
            value: value.clone(),
        },
    }
}

/// Parse the exact EXIF form `YYYY:MM:DD HH:MM:SS`.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    if !EXIF_DATETIME_RE.is_match(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S").ok()
}
