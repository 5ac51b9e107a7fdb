/// Secure file deletion: multi-pass random overwrite, sync, close, unlink
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::entropy::{EntropySource, OsEntropy};
use super::error::{FileKind, ShredError, ShredResult};
use crate::config::Config;

/// Number of overwrite passes. More passes buy little on modern media and
/// cost linear wall-clock time.
pub const DEFAULT_PASSES: u32 = 3;

/// Random data is generated and written in chunks of this many bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Securely delete the regular file at `path` with the default settings
/// (3 passes of OS random data).
///
/// Returns `ShredError::NotFound` if there is nothing at `path`; callers
/// doing idempotent deletes usually treat that as success.
///
/// Effectiveness depends on the filesystem and hardware. Journaling,
/// copy-on-write filesystems and SSD wear leveling may keep copies of the
/// old content that no overwrite through the file can reach.
pub fn shred<P: AsRef<Path>>(path: P) -> ShredResult<()> {
    Shredder::new().shred(path)
}

/// Configurable shredder.
///
/// Holds no state besides its settings and random source. Use one per
/// thread. Two shredders working on the same path at once race.
#[derive(Debug, Clone)]
pub struct Shredder<S = OsEntropy> {
    passes: u32,
    chunk_size: usize,
    source: S,
}

impl Shredder<OsEntropy> {
    pub fn new() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            source: OsEntropy,
        }
    }

    /// Build a shredder from a validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .passes(config.passes)
            .chunk_size(config.chunk_size)
    }
}

impl Default for Shredder<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EntropySource> Shredder<S> {
    /// Set the number of passes (at least 1).
    pub fn passes(mut self, passes: u32) -> Self {
        self.passes = passes.max(1);
        self
    }

    /// Set the write chunk size in bytes (at least 1).
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Replace the random source.
    pub fn with_source<T: EntropySource>(self, source: T) -> Shredder<T> {
        Shredder {
            passes: self.passes,
            chunk_size: self.chunk_size,
            source,
        }
    }

    pub fn pass_count(&self) -> u32 {
        self.passes
    }

    /// Overwrite the file at `path`, sync each pass, close it, then unlink it.
    ///
    /// Process:
    /// 1. lstat the path; reject anything that is not a regular file
    /// 2. Open for writing (no create, no truncate)
    /// 3. For each pass: seek to 0, write `size` random bytes, sync data
    /// 4. Close the handle
    /// 5. Remove the directory entry
    ///
    /// The handle is released on every exit path before removal is tried.
    /// A failure in steps 1-3 leaves the name in place. A failure in step 4
    /// or 5 leaves the name in place with its content already destroyed.
    pub fn shred<P: AsRef<Path>>(&mut self, path: P) -> ShredResult<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), passes = self.passes, "shredding");

        // lstat so a symlink is rejected instead of shredding its target
        let metadata = fs::symlink_metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ShredError::NotFound {
                    path: path.to_path_buf(),
                    source,
                }
            } else {
                ShredError::Metadata {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        if !metadata.file_type().is_file() {
            return Err(ShredError::UnsupportedType {
                path: path.to_path_buf(),
                kind: FileKind::of(metadata.file_type()),
            });
        }

        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| ShredError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let mut handle = WriteHandle::new(file);

        // Zero-length files skip straight to removal
        let size = metadata.len();
        self.overwrite_passes(&mut handle, path, size)?;

        handle.close().map_err(|source| {
            warn!(path = %path.display(), error = %source, "close failed after overwrite");
            ShredError::Close {
                path: path.to_path_buf(),
                source,
            }
        })?;

        fs::remove_file(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "content overwritten but entry not removed");
            ShredError::Remove {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(path = %path.display(), bytes = size, passes = self.passes, "file shredded");
        Ok(())
    }

    fn overwrite_passes(&mut self, handle: &mut WriteHandle, path: &Path, size: u64) -> ShredResult<()> {
        let buf_len = usize::try_from(size).map_or(self.chunk_size, |s| s.min(self.chunk_size));
        let mut buf = vec![0u8; buf_len];
        let file = handle.file_mut();

        for pass in 1..=self.passes {
            debug!(path = %path.display(), pass, total = self.passes, "overwriting with random data");

            file.seek(SeekFrom::Start(0))
                .map_err(|source| pass_error(ShredError::Seek { path: path.to_path_buf(), pass, source }))?;

            write_random(&mut self.source, &mut *file, &mut buf, size).map_err(|source| {
                pass_error(ShredError::Overwrite {
                    path: path.to_path_buf(),
                    pass,
                    source,
                })
            })?;

            file.sync_data()
                .map_err(|source| pass_error(ShredError::Sync { path: path.to_path_buf(), pass, source }))?;
        }

        Ok(())
    }
}

fn pass_error(err: ShredError) -> ShredError {
    debug!(error = %err, "pass aborted; file left in place");
    err
}

/// Write exactly `size` random bytes at the current cursor, `buf.len()` at a time.
fn write_random<S, W>(source: &mut S, out: &mut W, buf: &mut [u8], size: u64) -> io::Result<()>
where
    S: EntropySource + ?Sized,
    W: Write + ?Sized,
{
    let mut remaining = size;
    while remaining > 0 {
        let n = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let chunk = &mut buf[..n];
        source.fill(chunk)?;
        out.write_all(chunk)?;
        remaining -= n as u64;
    }
    out.flush()
}

/// Exclusive write handle scoped to one shred call.
///
/// `close()` reports the OS close result. If the handle is dropped without
/// `close()` (any early return) the descriptor is released silently.
/// Either way it is released exactly once.
struct WriteHandle {
    file: Option<File>,
}

impl WriteHandle {
    fn new(file: File) -> Self {
        Self { file: Some(file) }
    }

    fn file_mut(&mut self) -> &mut File {
        self.file
            .as_mut()
            .unwrap_or_else(|| unreachable!("write handle used after close"))
    }

    #[cfg(unix)]
    fn close(mut self) -> io::Result<()> {
        use std::os::unix::io::IntoRawFd;

        let Some(file) = self.file.take() else {
            return Ok(());
        };
        let fd = file.into_raw_fd();
        // No retry on EINTR: on Linux the descriptor is already gone
        let rc = unsafe { libc::close(fd) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn close(mut self) -> io::Result<()> {
        drop(self.file.take());
        Ok(())
    }
}

impl Drop for WriteHandle {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            debug!("write handle released on error path");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::{NamedTempFile, tempdir};

    /// Counts bytes and calls, delegates to the OS source.
    struct CountingEntropy {
        bytes: Rc<Cell<u64>>,
        calls: Rc<Cell<u32>>,
    }

    impl EntropySource for CountingEntropy {
        fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
            self.bytes.set(self.bytes.get() + buf.len() as u64);
            self.calls.set(self.calls.get() + 1);
            OsEntropy.fill(buf)
        }
    }

    /// Succeeds for `ok_calls` fills, then fails.
    struct FailingEntropy {
        ok_calls: u32,
    }

    impl EntropySource for FailingEntropy {
        fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
            if self.ok_calls == 0 {
                return Err(io::Error::other("entropy exhausted"));
            }
            self.ok_calls -= 1;
            buf.fill(0xA5);
            Ok(())
        }
    }

    fn temp_file_with(data: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.bin");
        fs::write(&path, data).unwrap();
        (dir, path)
    }

    #[test]
    fn test_secure_delete_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test data").unwrap();
        temp_file.flush().unwrap();

        let path = temp_file.path().to_path_buf();
        shred(&path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_every_pass_writes_full_length() {
        let (_dir, path) = temp_file_with(&[7u8; 1000]);
        let bytes = Rc::new(Cell::new(0));
        let calls = Rc::new(Cell::new(0));
        let mut shredder = Shredder::new().chunk_size(256).with_source(CountingEntropy {
            bytes: bytes.clone(),
            calls: calls.clone(),
        });

        shredder.shred(&path).unwrap();

        assert_eq!(bytes.get(), 3 * 1000);
        // 256 + 256 + 256 + 232 per pass
        assert_eq!(calls.get(), 3 * 4);
        assert!(!path.exists());
    }

    #[test]
    fn test_configured_pass_count() {
        let (_dir, path) = temp_file_with(b"abc");
        let bytes = Rc::new(Cell::new(0));
        let calls = Rc::new(Cell::new(0));
        let mut shredder = Shredder::new().passes(7).with_source(CountingEntropy {
            bytes: bytes.clone(),
            calls,
        });

        assert_eq!(shredder.pass_count(), 7);
        shredder.shred(&path).unwrap();
        assert_eq!(bytes.get(), 7 * 3);
    }

    #[test]
    fn test_zero_passes_clamped_to_one() {
        assert_eq!(Shredder::new().passes(0).pass_count(), 1);
    }

    #[test]
    fn test_empty_file_draws_no_entropy() {
        let (_dir, path) = temp_file_with(b"");
        let bytes = Rc::new(Cell::new(0));
        let calls = Rc::new(Cell::new(0));
        let mut shredder = Shredder::new().with_source(CountingEntropy {
            bytes: bytes.clone(),
            calls: calls.clone(),
        });

        shredder.shred(&path).unwrap();

        assert_eq!(bytes.get(), 0);
        assert_eq!(calls.get(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_entropy_failure_aborts_without_removal() {
        let original = vec![0x11u8; 4096];
        let (_dir, path) = temp_file_with(&original);

        // First pass completes (one 4096-byte chunk), second pass fails
        let mut shredder = Shredder::new()
            .chunk_size(4096)
            .with_source(FailingEntropy { ok_calls: 1 });

        let err = shredder.shred(&path).unwrap_err();

        assert!(matches!(err, ShredError::Overwrite { pass: 2, .. }));
        assert!(!err.content_destroyed());
        assert!(path.exists());

        // Pass 1 landed before the abort and is not rolled back
        let after = fs::read(&path).unwrap();
        assert_eq!(after.len(), original.len());
        assert!(after.iter().all(|&b| b == 0xA5));
    }

    #[test]
    fn test_handle_released_after_failed_pass() {
        let (_dir, path) = temp_file_with(b"still here");
        let mut shredder = Shredder::new().with_source(FailingEntropy { ok_calls: 0 });

        let err = shredder.shred(&path).unwrap_err();
        assert_eq!(err.pass(), Some(1));

        // A fresh shred succeeds, so nothing is left holding the file
        shred(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_random_exact_length() {
        let mut out = Vec::new();
        let mut buf = vec![0u8; 10];
        write_random(&mut OsEntropy, &mut out, &mut buf, 25).unwrap();
        assert_eq!(out.len(), 25);
    }

    #[test]
    fn test_write_random_short_write_is_error() {
        let mut backing = [0u8; 8];
        let mut out: &mut [u8] = &mut backing;
        let mut buf = vec![0u8; 4];
        let err = write_random(&mut OsEntropy, &mut out, &mut buf, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempdir().unwrap();
        let err = shred(dir.path()).unwrap_err();
        assert!(matches!(err, ShredError::UnsupportedType { kind: FileKind::Directory, .. }));
        assert!(dir.path().is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_rejected_and_target_untouched() {
        let (dir, target) = temp_file_with(b"keep me");
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = shred(&link).unwrap_err();

        assert!(matches!(err, ShredError::UnsupportedType { kind: FileKind::Symlink, .. }));
        assert_eq!(fs::read(&target).unwrap(), b"keep me");
        assert!(fs::symlink_metadata(&link).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            passes: 5,
            chunk_size: 4096,
            ..Config::default()
        };
        let shredder = Shredder::from_config(&config);
        assert_eq!(shredder.pass_count(), 5);
        assert_eq!(shredder.chunk_size, 4096);
    }
}
