//! Content hashing for firmware images
//!
//! SHA-256 over the full image, read in bounded chunks so hashing never
//! requires the whole image in memory. Two digests are equal iff the
//! underlying byte sequences are bit-identical; that equivalence is what the
//! validator and the update manager build on.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default chunk size for streaming reads
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// 256-bit content digest of a firmware image
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Digest length in bytes
    pub const LEN: usize = 32;

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, the form used in reports and audit events
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest from its hex rendering
    ///
    /// # Errors
    ///
    /// Fails when the input is not exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Digest(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Digest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash a byte stream in `chunk_size` reads
///
/// Deterministic and order-sensitive; the only failure mode is an I/O error
/// on the stream, which propagates untouched for the caller to attribute.
///
/// # Errors
///
/// Returns the underlying I/O error if a read fails.
pub async fn digest_reader<R>(reader: &mut R, chunk_size: usize) -> std::io::Result<Digest>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let chunk_size = chunk_size.max(1);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size];

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Digest(hasher.finalize().into()))
}

/// Hash an in-memory byte sequence
pub fn digest_bytes(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Digest(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reader_and_bytes_digests_agree() -> std::io::Result<()> {
        let data = vec![0xabu8; 100_000];
        let streamed = digest_reader(&mut data.as_slice(), DEFAULT_CHUNK_SIZE).await?;
        assert_eq!(streamed, digest_bytes(&data));
        Ok(())
    }

    #[tokio::test]
    async fn chunk_size_does_not_change_the_digest() -> std::io::Result<()> {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let small = digest_reader(&mut data.as_slice(), 7).await?;
        let large = digest_reader(&mut data.as_slice(), 64 * 1024).await?;
        assert_eq!(small, large);
        Ok(())
    }

    #[test]
    fn digest_is_order_sensitive() {
        assert_ne!(digest_bytes(b"ab"), digest_bytes(b"ba"));
    }

    #[test]
    fn single_byte_change_changes_the_digest() {
        let mut data = vec![0u8; 4096];
        let before = digest_bytes(&data);
        data[4095] = 1;
        assert_ne!(before, digest_bytes(&data));
    }

    #[test]
    fn hex_round_trip() -> Result<(), hex::FromHexError> {
        let digest = digest_bytes(b"respira");
        let parsed = Digest::from_hex(&digest.to_hex())?;
        assert_eq!(parsed, digest);
        Ok(())
    }

    #[test]
    fn from_hex_rejects_short_input() {
        assert!(Digest::from_hex("abcd").is_err());
    }

    #[test]
    fn serde_uses_hex_strings() -> Result<(), serde_json::Error> {
        let digest = digest_bytes(b"image");
        let json = serde_json::to_string(&digest)?;
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
        let back: Digest = serde_json::from_str(&json)?;
        assert_eq!(back, digest);
        Ok(())
    }
}
