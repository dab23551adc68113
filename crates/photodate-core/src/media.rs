use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::date::DateLookup;

/// Civil capture timestamp read from embedded metadata.
/// EXIF datetimes carry no timezone; they are local time as-is.
pub type CapturedDate = NaiveDateTime;

#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Full path in the source directory
    pub path: PathBuf,
    /// File name (last path component)
    pub filename: OsString,
    /// File name with the final extension removed; the sibling grouping key
    pub base_name: OsString,
    /// Final extension without the dot, if any
    pub extension: Option<OsString>,
    /// Result of classification and metadata lookup
    pub lookup: DateLookup,
}

impl MediaFile {
    pub fn new(path: PathBuf) -> Self {
        let filename = path.file_name().map(OsString::from).unwrap_or_default();
        let base_name = base_name(Path::new(&filename));
        let extension = path.extension().map(OsString::from);
        Self {
            path,
            filename,
            base_name,
            extension,
            lookup: DateLookup::NotMedia,
        }
    }

    /// Capture date, when the lookup found a usable one.
    pub fn date(&self) -> Option<CapturedDate> {
        match &self.lookup {
            DateLookup::Found { date, .. } => Some(*date),
            _ => None,
        }
    }
}

/// Name with only the final extension stripped ("a.HEIC.tmp" -> "a.HEIC").
pub fn base_name(name: &Path) -> OsString {
    name.file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| name.as_os_str().to_os_string())
}
