use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};
use crate::media::base_name;
use crate::{list_files, mover, readable, Event, EventCallback, Reporter, RunSummary};

fn default_extension() -> String {
    "AAE".to_string()
}

fn default_prefix() -> String {
    "IMG_O".to_string()
}

fn default_replacement() -> String {
    "IMG_".to_string()
}

/// Edit sidecars (e.g. `IMG_O1234.AAE`) left behind after their image
/// (`IMG_1234.HEIC`) was sorted into some subfolder of `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionOptions {
    pub root: PathBuf,
    /// Sidecar extension, without the dot; case-sensitive
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Name prefix identifying a sidecar
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// What `prefix` becomes in the partner's name
    #[serde(default = "default_replacement")]
    pub replacement: String,
}

impl CompanionOptions {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extension: default_extension(),
            prefix: default_prefix(),
            replacement: default_replacement(),
        }
    }

    /// Base name of the partner file for sidecar `name`, if `name` is one.
    pub fn partner_base(&self, name: &str) -> Option<String> {
        let path = Path::new(name);
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        let rest = name.strip_prefix(&self.prefix)?;
        let partner = format!("{}{}", self.replacement, rest);
        base_name(Path::new(&partner)).into_string().ok()
    }
}

/// Map of base name -> directories (anywhere under `root`) holding a file with it.
fn index_tree(root: &Path) -> BTreeMap<OsString, BTreeSet<PathBuf>> {
    let mut index = BTreeMap::new();
    index_tree_recursive(root, &mut index);
    index
}

fn index_tree_recursive(dir: &Path, index: &mut BTreeMap<OsString, BTreeSet<PathBuf>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "cannot list directory");
        return;
    };
    for entry in readable(dir, entries) {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        };
        if file_type.is_dir() {
            index_tree_recursive(&entry.path(), index);
        } else {
            index
                .entry(base_name(Path::new(&entry.file_name())))
                .or_default()
                .insert(dir.to_path_buf());
        }
    }
}

/// Move each sidecar directly in `root` next to its partner file.
///
/// The partner must be found in exactly one directory of the tree; with no
/// match or several, the sidecar stays where it is and a diagnostic is emitted.
pub fn relocate_companions(
    options: &CompanionOptions,
    on_event: &EventCallback<'_>,
) -> Result<RunSummary> {
    error::require_dir("root", &options.root)?;

    let sidecars: Vec<(PathBuf, String)> = list_files(&options.root)?
        .into_iter()
        .filter_map(|path| {
            let partner = options.partner_base(path.file_name()?.to_str()?)?;
            Some((path, partner))
        })
        .collect();
    let index = index_tree(&options.root);

    let mut reporter = Reporter::new(on_event);
    reporter.summary_mut().scanned = sidecars.len() as u64;

    for (path, partner) in sidecars {
        let dirs: Vec<PathBuf> = index
            .get(&OsString::from(&partner))
            .map(|dirs| dirs.iter().cloned().collect())
            .unwrap_or_default();

        let event = match dirs.len() {
            0 => Event::CompanionUnmatched { path, partner },
            1 if dirs[0] == options.root => Event::AlreadyInPlace { path },
            1 => match mover::move_file(&path, &dirs[0]) {
                Ok(moved) => Event::Moved(moved),
                Err(skipped) => Event::Skipped(skipped),
            },
            _ => Event::CompanionAmbiguous {
                path,
                partner,
                candidates: dirs,
            },
        };
        reporter.emit(event);
    }
    Ok(reporter.finish())
}
