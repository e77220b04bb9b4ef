//! Sync specification models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Outcome recorded for one matched source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSyncAction {
    /// Destination existed and was overwritten with the source bytes.
    Copied,
    /// Destination did not exist; nothing was written.
    Skipped,
    /// Destination existed but dry-run mode left it untouched.
    Planned,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_selected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSyncOptions {
    /// Write one notice per matched file to the output writer.
    pub if_verbose: bool,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
    /// Carry timestamps and extended attributes over on top of file bytes.
    pub if_preserve_metadata: bool,
}

impl Default for SpecSyncOptions {
    fn default() -> Self {
        Self {
            if_verbose: true,
            if_dry_run: false,
            if_preserve_metadata: false,
        }
    }
}

/// One copy phase: a destination root plus the patterns expanded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSyncPhase {
    /// Short label used in logs and summaries.
    pub name: String,
    /// Glob patterns relative to the SDK root, expanded in order.
    pub patterns: Vec<String>,
    /// Destination root receiving the refreshed files.
    pub path_dir_dst: PathBuf,
}

/// Absolute roots computed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecResolvedPaths {
    /// Canonical SDK checkout; verified to exist.
    pub path_dir_sdk: PathBuf,
    /// Project-local SDK mirror (`simplicity_sdk`).
    pub path_dir_headers: PathBuf,
    /// Blob staging area (`zephyr/blobs/simplicity_sdk`).
    pub path_dir_blobs: PathBuf,
}

/// Per-file copy decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSyncDecision {
    pub path_file_src: PathBuf,
    pub path_file_dst: PathBuf,
    pub action: EnumSyncAction,
}

/// Fatal errors. Any of these aborts the run; files already copied stay copied.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("SDK path does not exist: {}", .path.display())]
    SdkNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("SDK path is not a directory: {}", .0.display())]
    SdkNotDirectory(PathBuf),

    #[error("Failed to resolve {}: {source}", .path.display())]
    ResolveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to read directory {}: {source}", .path.display())]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Destination exists but is not a file: {}", .0.display())]
    DestinationNotFile(PathBuf),

    #[error("Failed to copy {} to {}: {source}", .src.display(), .dst.display())]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source and destination are the same file: {} -> {}", .src.display(), .dst.display())]
    SameFile { src: PathBuf, dst: PathBuf },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
