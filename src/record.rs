//! Record of the files a build wrote into the output directory.
//!
//! The output directory is reused between builds. Without a record, pages a
//! previous build wrote stay published after their content is gone: with
//! fewer posts, `/blog/4` would still be served while the page strip stops at
//! 2. After each build the list of written files is saved as
//! `.simple-press-build.json` in the output root, and the next build deletes
//! every recorded file it no longer produces. Files the generator never wrote
//! are left alone.
//!
//! A missing or unreadable record is treated as empty, so the first build into
//! an existing directory removes nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Name of the build record within the output directory.
pub const RECORD_FILENAME: &str = ".simple-press-build.json";

/// Bump when the record format changes; older records are then ignored.
const RECORD_VERSION: u32 = 1;

/// Output files of one build, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub version: u32,
    pub files: BTreeSet<PathBuf>,
}

impl BuildRecord {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            version: RECORD_VERSION,
            files: files.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::new([])
    }

    /// Load from the output directory. Returns an empty record if the file
    /// doesn't exist or can't be parsed.
    pub fn load(output_dir: &Path) -> Self {
        let content = match fs::read_to_string(output_dir.join(RECORD_FILENAME)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(record) if record.version == RECORD_VERSION => record,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(output_dir.join(RECORD_FILENAME), json)
    }

    /// Files recorded here that `next` no longer produces.
    pub fn stale_files<'a>(&'a self, next: &'a BuildRecord) -> impl Iterator<Item = &'a PathBuf> {
        self.files.difference(&next.files)
    }
}

/// Delete the files `previous` wrote that `next` does not, then every
/// directory that leaves empty. Returns the number of files removed.
///
/// Recorded paths that are absolute or step outside the output directory are
/// skipped.
pub fn remove_stale(
    output_dir: &Path,
    previous: &BuildRecord,
    next: &BuildRecord,
) -> io::Result<usize> {
    let mut removed = 0;
    for rel in previous.stale_files(next) {
        if !is_plain_relative(rel) {
            continue;
        }
        let path = output_dir.join(rel);
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        prune_empty_parents(&path, output_dir);
    }
    Ok(removed)
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Remove empty directories from `path`'s parent up to, not including, `root`.
fn prune_empty_parents(path: &Path, root: &Path) {
    let mut dir = path.parent();
    while let Some(d) = dir {
        if d == root || !d.starts_with(root) || fs::remove_dir(d).is_err() {
            break;
        }
        dir = d.parent();
    }
}
