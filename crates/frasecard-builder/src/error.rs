//! Error types for frasecard-builder.

use thiserror::Error;

/// Result type for frasecard-builder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling or writing a package.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error (output file or media file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A note references a note type the package does not define.
    #[error("unknown note type: {0}")]
    UnknownNoteType(i64),

    /// A note has the wrong number of fields for its note type.
    #[error("note type '{note_type}' expects {expected} fields, got {actual}")]
    FieldCount {
        /// Note type name.
        note_type: String,
        /// Number of fields the note type defines.
        expected: usize,
        /// Number of fields the note carries.
        actual: usize,
    },

    /// A bundled media file does not exist on disk.
    #[error("media file not found: {0}")]
    MediaNotFound(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// ZIP error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
