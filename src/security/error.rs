//! Error types for the shredder.

use std::fmt;
use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for shred operations.
pub type ShredResult<T> = Result<T, ShredError>;

/// Kind of a filesystem entry that was rejected because it is not a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Symlink,
    BlockDevice,
    CharDevice,
    Fifo,
    Socket,
    Unknown,
}

impl FileKind {
    /// Classify a non-regular file type. Never called with a regular file.
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            return FileKind::Directory;
        }
        if file_type.is_symlink() {
            return FileKind::Symlink;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;

            if file_type.is_block_device() {
                return FileKind::BlockDevice;
            }
            if file_type.is_char_device() {
                return FileKind::CharDevice;
            }
            if file_type.is_fifo() {
                return FileKind::Fifo;
            }
            if file_type.is_socket() {
                return FileKind::Socket;
            }
        }

        FileKind::Unknown
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileKind::Directory => "directory",
            FileKind::Symlink => "symbolic link",
            FileKind::BlockDevice => "block device",
            FileKind::CharDevice => "character device",
            FileKind::Fifo => "fifo",
            FileKind::Socket => "socket",
            FileKind::Unknown => "unknown file type",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a single shred invocation.
///
/// Every variant is terminal: nothing is retried and nothing is rolled back.
/// `NotFound` is the soft case callers usually treat as "already deleted".
/// `Close` and `Remove` are partial successes: the content has been fully
/// overwritten but the name may still be present.
#[derive(Debug, Error)]
pub enum ShredError {
    /// The path has no directory entry.
    #[error("{}: no such file", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Metadata lookup failed for a reason other than absence.
    #[error("{}: failed to get file information: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The entry exists but is not a regular file. Nothing was touched.
    #[error("{}: unsupported file type: {kind}", .path.display())]
    UnsupportedType { path: PathBuf, kind: FileKind },

    /// The file could not be opened for writing. Nothing was touched.
    #[error("{}: failed to open file: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Repositioning to offset 0 failed at the start of a pass.
    #[error("{}: failed to seek file on pass {pass}: {source}", .path.display())]
    Seek {
        path: PathBuf,
        pass: u32,
        #[source]
        source: io::Error,
    },

    /// Random data could not be produced or written in full.
    #[error("{}: failed to overwrite file on pass {pass}: {source}", .path.display())]
    Overwrite {
        path: PathBuf,
        pass: u32,
        #[source]
        source: io::Error,
    },

    /// The durability flush after a pass failed.
    #[error("{}: failed to sync file on pass {pass}: {source}", .path.display())]
    Sync {
        path: PathBuf,
        pass: u32,
        #[source]
        source: io::Error,
    },

    /// Closing the handle failed after all passes completed.
    #[error("{}: failed to close file (content overwritten, not deleted): {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unlinking failed after all passes completed.
    #[error("{}: failed to delete file (content overwritten, name still present): {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShredError {
    /// True when the target did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShredError::NotFound { .. })
    }

    /// Path of the target this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ShredError::NotFound { path, .. }
            | ShredError::Metadata { path, .. }
            | ShredError::UnsupportedType { path, .. }
            | ShredError::Open { path, .. }
            | ShredError::Seek { path, .. }
            | ShredError::Overwrite { path, .. }
            | ShredError::Sync { path, .. }
            | ShredError::Close { path, .. }
            | ShredError::Remove { path, .. } => path,
        }
    }

    /// 1-based pass number for failures that happened inside a pass.
    pub fn pass(&self) -> Option<u32> {
        match self {
            ShredError::Seek { pass, .. }
            | ShredError::Overwrite { pass, .. }
            | ShredError::Sync { pass, .. } => Some(*pass),
            _ => None,
        }
    }

    /// True when every pass completed before the failure, so the content is
    /// destroyed even though the operation as a whole failed.
    pub fn content_destroyed(&self) -> bool {
        matches!(self, ShredError::Close { .. } | ShredError::Remove { .. })
    }

    /// Underlying I/O cause, if the variant wraps one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            ShredError::NotFound { source, .. }
            | ShredError::Metadata { source, .. }
            | ShredError::Open { source, .. }
            | ShredError::Seek { source, .. }
            | ShredError::Overwrite { source, .. }
            | ShredError::Sync { source, .. }
            | ShredError::Close { source, .. }
            | ShredError::Remove { source, .. } => Some(source),
            ShredError::UnsupportedType { .. } => None,
        }
    }
}
