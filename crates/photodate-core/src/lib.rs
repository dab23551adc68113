pub mod classify;
pub mod companions;
pub mod date;
pub mod dest;
pub mod error;
pub mod folders;
pub mod media;
pub mod mover;
pub mod siblings;

#[cfg(test)]
mod testutil;

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use companions::{relocate_companions, CompanionOptions};
pub use date::DateLookup;
pub use error::{Error, Result};
pub use folders::{reassign_folders, ReassignOptions};
pub use media::{CapturedDate, MediaFile};
pub use mover::{Moved, Skipped};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeOptions {
    /// Directory holding the unsorted files (not recursed into)
    pub source: PathBuf,
    /// Base of the YYYY/MM/YYYY-MM-DD tree
    pub destination: PathBuf,
}

/// One decision made during a run.
#[derive(Debug)]
pub enum Event {
    Moved(Moved),
    Skipped(Skipped),
    /// Image without any of the date tags.
    NoDate { path: PathBuf, available: Vec<String> },
    /// Image whose date tag did not parse.
    MalformedDate {
        path: PathBuf,
        tag: String,
        value: String,
    },
    /// Image whose metadata block could not be read.
    Unreadable { path: PathBuf, reason: String },
    ListFailed { dir: PathBuf, source: io::Error },
    CreateDirFailed { dir: PathBuf, source: io::Error },
    CompanionUnmatched { path: PathBuf, partner: String },
    CompanionAmbiguous {
        path: PathBuf,
        partner: String,
        candidates: Vec<PathBuf>,
    },
    AlreadyInPlace { path: PathBuf },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Moved(m) => write!(f, "Moving {} to {}", m.from.display(), m.to.display()),
            Event::Skipped(s) => write!(f, "Skipped: {s}"),
            Event::NoDate { path, available } => {
                let tags = if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                };
                write!(f, "No capture date in {}; tags found: {}", path.display(), tags)
            }
            Event::MalformedDate { path, tag, value } => write!(
                f,
                "Could not parse capture date for {}: {} = {:?}",
                path.display(),
                tag,
                value
            ),
            Event::Unreadable { path, reason } => {
                write!(f, "Could not read metadata of {}: {}", path.display(), reason)
            }
            Event::ListFailed { dir, source } => {
                write!(f, "Cannot list {}: {}", dir.display(), source)
            }
            Event::CreateDirFailed { dir, source } => {
                write!(f, "Cannot create {}: {}", dir.display(), source)
            }
            Event::CompanionUnmatched { path, partner } => write!(
                f,
                "No directory holds {}.*; leaving {} in place",
                partner,
                path.display()
            ),
            Event::CompanionAmbiguous {
                path,
                partner,
                candidates,
            } => {
                let dirs: Vec<String> = candidates.iter().map(|d| d.display().to_string()).collect();
                write!(
                    f,
                    "{} directories hold {}.* ({}); leaving {} in place",
                    candidates.len(),
                    partner,
                    dirs.join(", "),
                    path.display()
                )
            }
            Event::AlreadyInPlace { path } => {
                write!(f, "{} already sits next to its partner", path.display())
            }
        }
    }
}

/// Callback receiving every decision as it is made.
pub type EventCallback<'a> = dyn Fn(&Event) + Send + Sync + 'a;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Entries considered
    pub scanned: u64,
    /// Entries recognised as images
    pub media: u64,
    pub not_media: u64,
    pub moved: u64,
    /// Left in place by a precondition (occupied, missing, ambiguous...)
    pub skipped: u64,
    /// Images without a usable capture date
    pub undated: u64,
    /// I/O failures
    pub failed: u64,
}

impl RunSummary {
    fn record(&mut self, event: &Event) {
        match event {
            Event::Moved(_) => self.moved += 1,
            Event::Skipped(s) if s.is_failure() => self.failed += 1,
            Event::Skipped(_)
            | Event::CompanionUnmatched { .. }
            | Event::CompanionAmbiguous { .. }
            | Event::AlreadyInPlace { .. } => self.skipped += 1,
            Event::NoDate { .. } | Event::MalformedDate { .. } | Event::Unreadable { .. } => {
                self.undated += 1
            }
            Event::ListFailed { .. } | Event::CreateDirFailed { .. } => self.failed += 1,
        }
    }
}

/// Tallies events and forwards them to the caller.
pub(crate) struct Reporter<'a> {
    summary: RunSummary,
    on_event: &'a EventCallback<'a>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(on_event: &'a EventCallback<'a>) -> Self {
        Self {
            summary: RunSummary::default(),
            on_event,
        }
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.summary.record(&event);
        (self.on_event)(&event);
    }

    pub(crate) fn summary_mut(&mut self) -> &mut RunSummary {
        &mut self.summary
    }

    pub(crate) fn finish(self) -> RunSummary {
        self.summary
    }
}

/// Entries of a directory listing that could be read; each failure is logged.
pub(crate) fn readable<'a, T, I>(dir: &'a Path, entries: I) -> impl Iterator<Item = T> + 'a
where
    I: Iterator<Item = io::Result<T>> + 'a,
    T: 'a,
{
    entries.filter_map(move |entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
            None
        }
    })
}

/// Regular files directly in `dir`, sorted by name.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = readable(dir, entries)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Sort the files directly in `source` into `destination/YYYY/MM/YYYY-MM-DD`.
///
/// Classification and metadata reads run in parallel; moves happen one sibling
/// group at a time in name order. A group is moved as soon as the first of its
/// members is reached, using the date of the first dated member, so companion
/// files without metadata follow their image. Per-file problems are reported
/// through `on_event` and never end the run; only a missing source or
/// destination directory does.
pub fn organize(options: &OrganizeOptions, on_event: &EventCallback<'_>) -> Result<RunSummary> {
    error::require_dir("source", &options.source)?;
    error::require_dir("destination", &options.destination)?;

    let mut media: Vec<MediaFile> = list_files(&options.source)?
        .into_iter()
        .map(MediaFile::new)
        .collect();
    media
        .par_iter_mut()
        .for_each(|m| m.lookup = date::inspect(&m.path));

    let mut reporter = Reporter::new(on_event);
    {
        let summary = reporter.summary_mut();
        summary.scanned = media.len() as u64;
        summary.not_media = media
            .iter()
            .filter(|m| m.lookup == DateLookup::NotMedia)
            .count() as u64;
        summary.media = summary.scanned - summary.not_media;
    }

    // Representative date per base name: first dated member in name order
    let mut group_dates: HashMap<&OsString, CapturedDate> = HashMap::new();
    for m in &media {
        if let Some(date) = m.date() {
            group_dates.entry(&m.base_name).or_insert(date);
        }
    }

    let mut handled: HashSet<OsString> = HashSet::new();
    for m in &media {
        if handled.contains(&m.filename) {
            tracing::debug!(path = %m.path.display(), "already handled with its group");
            continue;
        }

        let Some(date) = group_dates.get(&m.base_name).copied() else {
            report_undated(&mut reporter, m);
            continue;
        };

        let target = dest::resolve(&options.destination, &date);
        let members = match siblings::group(&options.source, &m.base_name) {
            Ok(members) => members,
            Err(source) => {
                reporter.emit(Event::ListFailed {
                    dir: options.source.clone(),
                    source,
                });
                continue;
            }
        };

        for name in members {
            let result = mover::move_file(&options.source.join(&name), &target);
            handled.insert(name);
            reporter.emit(match result {
                Ok(moved) => Event::Moved(moved),
                Err(skipped) => Event::Skipped(skipped),
            });
        }
    }

    Ok(reporter.finish())
}

fn report_undated(reporter: &mut Reporter<'_>, m: &MediaFile) {
    let path = m.path.clone();
    let event = match &m.lookup {
        DateLookup::NotMedia => {
            tracing::debug!(path = %path.display(), "skipping non-image");
            return;
        }
        DateLookup::Found { .. } => return,
        DateLookup::Missing { available } => Event::NoDate {
            path,
            available: available.clone(),
        },
        DateLookup::Malformed { tag, value } => Event::MalformedDate {
            path,
            tag: tag.clone(),
            value: value.clone(),
        },
        DateLookup::Unreadable { reason } => Event::Unreadable {
            path,
            reason: reason.clone(),
        },
    };
    tracing::warn!("{event}");
    reporter.emit(event);
}
