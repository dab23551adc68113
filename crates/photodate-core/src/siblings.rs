use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

use crate::media::base_name;
use crate::readable;

/// Names of the non-directory entries directly in `source_dir` whose name,
/// minus its final extension, equals `base`. Case-sensitive; includes the
/// file the query came from. Entries that cannot be inspected are logged and
/// left out; only failing to open `source_dir` itself is an error.
pub fn group(source_dir: &Path, base: &OsStr) -> io::Result<BTreeSet<OsString>> {
    let mut members = BTreeSet::new();
    for entry in readable(source_dir, fs::read_dir(source_dir)?) {
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => continue,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        }
        let name = entry.file_name();
        if base_name(Path::new(&name)).as_os_str() == base {
            members.insert(name);
        }
    }
    Ok(members)
}
