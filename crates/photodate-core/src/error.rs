use std::io;
use std::path::PathBuf;

/// Failures that stop a whole run before anything on disk is touched.
///
/// Per-entry problems never surface here; they are reported as
/// [`crate::Event`]s and the batch carries on.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{role} directory {} does not exist", .path.display())]
    NotADirectory { role: &'static str, path: PathBuf },

    #[error("invalid year range: {first} is after {last}")]
    InvalidYearRange { first: i32, last: i32 },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Check that `path` is an existing directory.
pub(crate) fn require_dir(role: &'static str, path: &std::path::Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::NotADirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}
