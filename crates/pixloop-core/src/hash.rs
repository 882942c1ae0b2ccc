//! Content hashing for deterministic rendering verification.
//!
//! Produces a SHA-256 hash of canvas data so that two renders of the same
//! scene and seed can be compared bit-for-bit.

use sha2::{Digest, Sha256};

use crate::canvas::Canvas;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn update_with_canvas(hasher: &mut Sha256, canvas: &Canvas) {
    // Dimensions go in first so equal bytes at different sizes differ.
    hasher.update(canvas.width().to_le_bytes());
    hasher.update(canvas.height().to_le_bytes());
    hasher.update(canvas.as_raw());
}

fn finish(hasher: Sha256) -> ContentHash {
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentHash::from_bytes(bytes)
}

/// Compute the content hash of a single canvas.
pub fn hash_canvas(canvas: &Canvas) -> ContentHash {
    let mut hasher = Sha256::new();
    update_with_canvas(&mut hasher, canvas);
    finish(hasher)
}

/// Compute the content hash of an ordered sequence of canvases.
pub fn hash_canvases(canvases: &[Canvas]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update((canvases.len() as u64).to_le_bytes());
    for canvas in canvases {
        update_with_canvas(&mut hasher, canvas);
    }
    finish(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgb;

    #[test]
    fn test_hash_deterministic() {
        let a = Canvas::solid(10, 10, Rgb::RED);
        let b = Canvas::solid(10, 10, Rgb::RED);
        assert_eq!(hash_canvas(&a), hash_canvas(&b));
    }

    #[test]
    fn test_hash_different_content() {
        let a = Canvas::solid(10, 10, Rgb::RED);
        let b = Canvas::solid(10, 10, Rgb::BLUE);
        assert_ne!(hash_canvas(&a), hash_canvas(&b));
    }

    #[test]
    fn test_hash_different_size() {
        let a = Canvas::solid(10, 20, Rgb::RED);
        let b = Canvas::solid(20, 10, Rgb::RED);
        assert_ne!(hash_canvas(&a), hash_canvas(&b));
    }

    #[test]
    fn test_hash_sequence_order_matters() {
        let red = Canvas::solid(4, 4, Rgb::RED);
        let blue = Canvas::solid(4, 4, Rgb::BLUE);
        let forward = hash_canvases(&[red.clone(), blue.clone()]);
        let backward = hash_canvases(&[blue, red]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_hash_hex_format() {
        let hash = hash_canvas(&Canvas::new(2, 2));
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{}", hash), hex);
    }
}
