//! Local media collection.
//!
//! Note fields reference media by file name only, so every local file a note
//! points at must be bundled under a name that is unique within the package.
//! [`MediaCollector`] hands out those names and remembers which paths have
//! already been added.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::schema::MediaFile;

/// Whether a URL points at a remote resource rather than a local file.
///
/// Anything starting with `http://` or `https://` (any case) is remote.
pub fn is_remote_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Collects local media paths and assigns each a package file name.
#[derive(Debug, Default)]
pub struct MediaCollector {
    by_path: HashMap<PathBuf, String>,
    names: HashSet<String>,
    files: Vec<MediaFile>,
}

impl MediaCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a local path and return the name to reference it by.
    ///
    /// The same path always yields the same name and is bundled once. Two
    /// different paths sharing a basename get distinct names: the later one
    /// is prefixed with a counter.
    pub fn add(&mut self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        if let Some(name) = self.by_path.get(path) {
            return name.clone();
        }

        let base = basename(path);
        let mut name = base.clone();
        let mut n = 1;
        while self.names.contains(&name) {
            name = format!("{}_{}", n, base);
            n += 1;
        }

        self.names.insert(name.clone());
        self.by_path.insert(path.to_path_buf(), name.clone());
        self.files.push(MediaFile {
            name: name.clone(),
            path: path.to_path_buf(),
        });
        name
    }

    /// Number of distinct files collected.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The collected files, in first-seen order.
    pub fn into_files(self) -> Vec<MediaFile> {
        self.files
    }
}

/// Last path component, or the whole string when there is none.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
