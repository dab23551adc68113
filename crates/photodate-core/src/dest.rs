use std::path::{Path, PathBuf};

use crate::media::CapturedDate;

/// `base/YYYY/MM/YYYY-MM-DD` for the capture date. Pure.
pub fn resolve(base_dir: &Path, date: &CapturedDate) -> PathBuf {
    let year = date.format("%Y").to_string();
    let month = date.format("%m").to_string();
    let day = date.format("%Y-%m-%d").to_string();
    base_dir.join(year).join(month).join(day)
}
