//! Core types for the snapshot engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Width of a hex-encoded hash: 32 digest bytes, two characters each.
pub const HASH_HEX_LEN: usize = 64;

/// Hash: lowercase hex encoding of a 256-bit digest.
///
/// Internal Merkle nodes hash the concatenation of their children's hex
/// strings, so the hex form is the canonical representation rather than the
/// raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(String);

impl Hash {
    /// Encode a raw digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Accept an already hex-encoded hash, normalizing to lowercase.
    ///
    /// Returns `None` when the input is not 64 hex characters.
    pub fn parse(hex_str: &str) -> Option<Self> {
        if hex_str.len() != HASH_HEX_LEN || !hex_str.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(hex_str.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters, for compact display.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Hash {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// CommitID: identifier minted for a commit, itself a hash.
pub type CommitID = Hash;
