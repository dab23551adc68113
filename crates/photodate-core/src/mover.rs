//! Relocation that never overwrites.
//!
//! Each call checks its preconditions immediately before acting: source
//! present and of the expected kind, target directory created, target name
//! free. Only then is the entry renamed. Any failure is returned as a
//! [`Skipped`] value for that one entry and leaves the source where it was.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A completed relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Why an entry was left in place.
#[derive(thiserror::Error, Debug)]
pub enum Skipped {
    #[error("source missing: {}", .path.display())]
    SourceMissing { path: PathBuf },

    #[error("destination occupied: {} already exists, leaving {} in place", .to.display(), .from.display())]
    DestinationOccupied { from: PathBuf, to: PathBuf },

    #[error("cannot create {} for {}: {source}", .dir.display(), .from.display())]
    CreateDir {
        from: PathBuf,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Skipped {
    /// Source path the skip refers to.
    pub fn source_path(&self) -> &Path {
        match self {
            Skipped::SourceMissing { path } => path,
            Skipped::DestinationOccupied { from, .. }
            | Skipped::CreateDir { from, .. }
            | Skipped::MoveFailed { from, .. } => from,
        }
    }

    /// True for I/O failures, as opposed to precondition skips.
    pub fn is_failure(&self) -> bool {
        matches!(self, Skipped::CreateDir { .. } | Skipped::MoveFailed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Dir,
}

/// Move the regular file `src` into `dest_dir`, keeping its name.
pub fn move_file(src: &Path, dest_dir: &Path) -> Result<Moved, Skipped> {
    relocate(src, dest_dir, Kind::File)
}

/// Move the directory `src` (with everything below it) into `dest_dir`.
pub fn move_dir(src: &Path, dest_dir: &Path) -> Result<Moved, Skipped> {
    relocate(src, dest_dir, Kind::Dir)
}

fn relocate(src: &Path, dest_dir: &Path, kind: Kind) -> Result<Moved, Skipped> {
    let present = match kind {
        Kind::File => src.is_file(),
        Kind::Dir => src.is_dir(),
    };
    let Some(name) = src.file_name().filter(|_| present) else {
        tracing::warn!(path = %src.display(), "source missing");
        return Err(Skipped::SourceMissing {
            path: src.to_path_buf(),
        });
    };

    if let Err(source) = fs::create_dir_all(dest_dir) {
        tracing::warn!(dir = %dest_dir.display(), error = %source, "cannot create destination");
        return Err(Skipped::CreateDir {
            from: src.to_path_buf(),
            dir: dest_dir.to_path_buf(),
            source,
        });
    }

    let dest = dest_dir.join(name);
    // symlink_metadata so a dangling link at the target still counts as occupied
    if fs::symlink_metadata(&dest).is_ok() {
        tracing::warn!(from = %src.display(), to = %dest.display(), "destination occupied");
        return Err(Skipped::DestinationOccupied {
            from: src.to_path_buf(),
            to: dest,
        });
    }

    if let Err(source) = fs::rename(src, &dest) {
        tracing::warn!(from = %src.display(), to = %dest.display(), error = %source, "move failed");
        return Err(Skipped::MoveFailed {
            from: src.to_path_buf(),
            to: dest,
            source,
        });
    }

    tracing::info!(from = %src.display(), to = %dest.display(), "moved");
    Ok(Moved {
        from: src.to_path_buf(),
        to: dest,
    })
}
