use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize, Serializer, Deserializer};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    #[error(transparent)]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid hash length. 32 bytes expected, got {0}")]
    InvalidHashLength(usize)
}

/// BLAKE3 digest of a block's canonical preimage.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Minimal possible hash value.
    pub const MIN: Hash = Hash([0; 32]);

    /// Maximal possible hash value.
    pub const MAX: Hash = Hash([255; 32]);

    #[inline]
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    #[inline]
    pub fn from_slice(slice: impl AsRef<[u8]>) -> Self {
        blake3::hash(slice.as_ref()).into()
    }

    #[inline]
    /// Lowercase hex representation, 64 characters long.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hash: impl AsRef<[u8]>) -> Result<Self, HashError> {
        let mut hash_slice = [0; 32];

        let hash = hex::decode(hash)?;

        if hash.len() != 32 {
            return Err(HashError::InvalidHashLength(hash.len()));
        }

        hash_slice.copy_from_slice(&hash);

        Ok(Self(hash_slice))
    }
}

impl From<blake3::Hash> for Hash {
    #[inline]
    fn from(value: blake3::Hash) -> Self {
        Self(*value.as_bytes())
    }
}

impl From<[u8; 32]> for Hash {
    #[inline]
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl FromStr for Hash {
    type Err = HashError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hash = String::deserialize(deserializer)?;

        Self::from_hex(hash).map_err(serde::de::Error::custom)
    }
}
