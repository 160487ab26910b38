//! Content addressing using blake3.
//!
//! An asset's output name is derived from its bytes: same bytes, same token,
//! across runs and machines. The token is the first 48 bits of the digest in
//! unpadded base64url, [`TOKEN_LEN`] chars from `[A-Za-z0-9_-]`. The full
//! digest is kept so two contents that happen to share a token are detected
//! instead of silently merged.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Length of the content token used as output filename stem.
pub const TOKEN_LEN: usize = 8;

/// Digest bytes encoded into the token (6 bytes -> 8 base64 chars).
const TOKEN_BYTES: usize = TOKEN_LEN * 3 / 4;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    #[inline]
    pub fn of(content: &[u8]) -> Self {
        Self(*blake3::hash(content).as_bytes())
    }

    /// Short filesystem- and URL-safe token (`[A-Za-z0-9_-]{8}`).
    pub fn token(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.0[..TOKEN_BYTES])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// A referenced file after resolution and hashing.
///
/// `path` is the identity for resolution; `token` is the identity for emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Full digest of the emitted bytes.
    pub hash: ContentHash,
    /// Output filename stem derived from `hash`.
    pub token: String,
    pub byte_len: u64,
    /// Original extension without the dot; empty if the file has none.
    pub extension: String,
}

/// Address `content` that will be emitted for the file at `path`.
///
/// For binary assets `content` is the file itself; for stylesheets it is the
/// rewritten text, so the token reflects what is actually written.
pub fn address(path: &Path, content: &[u8]) -> ResolvedAsset {
    let hash = ContentHash::of(content);
    ResolvedAsset {
        path: path.to_path_buf(),
        token: hash.token(),
        hash,
        byte_len: content.len() as u64,
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string(),
    }
}
