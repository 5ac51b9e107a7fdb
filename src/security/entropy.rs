/// Random byte sources for overwrite passes
use std::io;

use rand::TryRngCore;
use rand::rngs::OsRng;

/// A cryptographically secure stream of random bytes.
///
/// Each shredder owns its source, so implementations need not be `Sync`.
pub trait EntropySource {
    /// Fill `buf` completely or fail.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Operating system CSPRNG (getrandom / BCryptGenRandom).
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| io::Error::other(format!("OS random source failed: {}", e)))
    }
}

impl<S: EntropySource + ?Sized> EntropySource for &mut S {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).fill(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_entropy_fills_buffer() {
        let mut buf = [0u8; 256];
        OsEntropy.fill(&mut buf).unwrap();

        // 256 zero bytes from a working CSPRNG has probability 2^-2048
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_os_entropy_empty_buffer() {
        let mut buf = [0u8; 0];
        assert!(OsEntropy.fill(&mut buf).is_ok());
    }

    #[test]
    fn test_consecutive_fills_differ() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        let mut source = OsEntropy;
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
