use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of digest bytes carried on the wire.
pub const DIGEST_LEN: usize = 20;

/// A 20-byte digest or identifier.
///
/// Two uses share this type: content checksums (a SHA-256 truncated to 20
/// bytes) and randomly minted identifiers for cases and jobs. Both travel
/// the wire in the same fixed-width slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashDigest([u8; DIGEST_LEN]);

impl HashDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        HashDigest(bytes)
    }

    /// Mints a random identifier.
    pub fn random() -> Self {
        let mut bytes = [0u8; DIGEST_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        HashDigest(bytes)
    }

    /// Checksums `data`.
    pub fn of(data: &[u8]) -> Self {
        let full = Sha256::digest(data);
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&full[..DIGEST_LEN]);
        HashDigest(bytes)
    }

    /// Finalizes a running hasher into the wire-width digest.
    pub fn finalize(hasher: Sha256) -> Self {
        let full = hasher.finalize();
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&full[..DIGEST_LEN]);
        HashDigest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for HashDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
