/// Security module - Secure file deletion
pub mod destruct;
pub mod entropy;
pub mod error;

pub use destruct::{DEFAULT_CHUNK_SIZE, DEFAULT_PASSES, Shredder, shred};
pub use entropy::{EntropySource, OsEntropy};
pub use error::{FileKind, ShredError, ShredResult};
