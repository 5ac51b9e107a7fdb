//! Secure file deletion.
//!
//! Overwrites a regular file with cryptographically random data over several
//! passes, syncs each pass to stable storage, then unlinks it:
//!
//! ```no_run
//! match kc_shred::shred("sensitive_data.txt") {
//!     Ok(()) => {}
//!     Err(e) if e.is_not_found() => {} // already gone
//!     Err(e) => eprintln!("failed to shred: {}", e),
//! }
//! ```
//!
//! This reduces, but does not guarantee, unrecoverability. Filesystem
//! journals, copy-on-write filesystems and SSD wear leveling can keep old
//! copies of the data out of reach of any overwrite through the file.

pub mod cli;
pub mod config;
pub mod security;

pub use config::{Config, ConfigError};
pub use security::{
    DEFAULT_CHUNK_SIZE, DEFAULT_PASSES, EntropySource, FileKind, OsEntropy, ShredError, ShredResult,
    Shredder, shred,
};
