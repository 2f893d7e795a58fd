//! Storage for uploaded pictures and recordings.
//!
//! Files land under `<root>/images/` or `<root>/audio/` as
//! `<uuid>_<original name>`. Bytes are written to a temporary file in the
//! destination directory and renamed into place, so a returned path always
//! points at a complete file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::Result;

/// What kind of media a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Pictures.
    Image,
    /// Pronunciation recordings.
    Audio,
}

impl MediaKind {
    fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Audio => "audio",
        }
    }
}

/// A media directory tree.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Use `root` as the media directory. Nothing is created until the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The media directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist `bytes` and return the stored path.
    pub fn store(&self, kind: MediaKind, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.root.join(kind.dir_name());
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        let path = dir.join(format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        ));
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(path = %path.display(), size = bytes.len(), "Stored media file");
        Ok(path)
    }

    /// Copy an existing file into the store.
    pub fn import(&self, kind: MediaKind, source: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        let bytes = std::fs::read(source)?;
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.store(kind, &name, &bytes)
    }

    /// Persist picture bytes under `images/`.
    pub fn store_image(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.store(MediaKind::Image, original_name, bytes)
    }

    /// Persist a recording under `audio/`.
    pub fn store_audio(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.store(MediaKind::Audio, original_name, bytes)
    }

    /// Copy a picture into `images/`.
    pub fn import_image(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        self.import(MediaKind::Image, source)
    }

    /// Copy a recording into `audio/`.
    pub fn import_audio(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        self.import(MediaKind::Audio, source)
    }
}

/// Keep the last path component and replace anything outside
/// `[A-Za-z0-9._-]` (plus non-ASCII letters) with `_`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("gato.jpg"), "gato.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("mi foto (1).png"), "mi_foto__1_.png");
        assert_eq!(sanitize_file_name("pronunciación.mp3"), "pronunciación.mp3");
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name(".."), "file");
    }

    #[test]
    fn test_store_keeps_original_name_as_suffix() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let path = store.store(MediaKind::Image, "gato.jpg", b"jpeg").unwrap();
        assert!(path.starts_with(dir.path().join("images")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_gato.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
    }

    #[test]
    fn test_store_same_name_twice_does_not_collide() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let first = store.store(MediaKind::Audio, "a.mp3", b"one").unwrap();
        let second = store.store(MediaKind::Audio, "a.mp3", b"two").unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
        assert!(first.starts_with(dir.path().join("audio")));
    }

    #[test]
    fn test_store_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        store.store(MediaKind::Image, "x.png", b"png").unwrap();

        let entries = std::fs::read_dir(dir.path().join("images")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_import_missing_source_is_io_error() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let err = store
            .import(MediaKind::Image, dir.path().join("missing.jpg"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
