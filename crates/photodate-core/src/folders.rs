use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error, Result};
use crate::mover;
use crate::{readable, Event, EventCallback, Reporter, RunSummary};

fn default_first_year() -> i32 {
    2001
}

fn default_last_year() -> i32 {
    2024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassignOptions {
    /// Directory holding the YYYY folders
    pub root: PathBuf,
    #[serde(default = "default_first_year")]
    pub first_year: i32,
    /// Inclusive
    #[serde(default = "default_last_year")]
    pub last_year: i32,
}

impl ReassignOptions {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            first_year: default_first_year(),
            last_year: default_last_year(),
        }
    }
}

/// `YYYY-MM-*` or `YYYY_MM_*` for exactly this year and month.
pub fn matches_month(name: &str, year: i32, month: u32) -> bool {
    let dash = format!("{year:04}-{month:02}-");
    let underscore = format!("{year:04}_{month:02}_");
    name.starts_with(&dash) || name.starts_with(&underscore)
}

/// Subdirectories of `year_dir` named for `year`/`month`, sorted.
fn matching_subfolders(year_dir: &Path, year: i32, month: u32) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in readable(year_dir, fs::read_dir(year_dir)?) {
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if matches_month(&name, year, month) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Move date-named folders in `root/YYYY` into `root/YYYY/MM`.
///
/// Every month folder in the year range is created up front, whether or not
/// anything lands in it.
pub fn reassign_folders(options: &ReassignOptions, on_event: &EventCallback<'_>) -> Result<RunSummary> {
    if options.first_year > options.last_year {
        return Err(Error::InvalidYearRange {
            first: options.first_year,
            last: options.last_year,
        });
    }
    error::require_dir("root", &options.root)?;

    let mut reporter = Reporter::new(on_event);
    for year in options.first_year..=options.last_year {
        let year_dir = options.root.join(format!("{year:04}"));
        for month in 1..=12u32 {
            let month_dir = year_dir.join(format!("{month:02}"));
            if let Err(source) = fs::create_dir_all(&month_dir) {
                reporter.emit(Event::CreateDirFailed {
                    dir: month_dir,
                    source,
                });
                continue;
            }

            let names = match matching_subfolders(&year_dir, year, month) {
                Ok(names) => names,
                Err(source) => {
                    reporter.emit(Event::ListFailed {
                        dir: year_dir.clone(),
                        source,
                    });
                    continue;
                }
            };

            reporter.summary_mut().scanned += names.len() as u64;
            for name in names {
                reporter.emit(match mover::move_dir(&year_dir.join(&name), &month_dir) {
                    Ok(moved) => Event::Moved(moved),
                    Err(skipped) => Event::Skipped(skipped),
                });
            }
        }
    }
    Ok(reporter.finish())
}
