use serde_json::json;

use super::{Block, Hash};

/// Snapshot of the block fields covered by its hash.
///
/// The preimage is compact JSON with lexicographically sorted keys.
/// Stored hash is not part of it:
///
/// ```text
/// {"body":"7b...7d","height":1,"previous_hash":"ab...cd","timestamp":0}
/// ```
struct BlockPreimage<'a> {
    height: u64,
    body: &'a str,
    timestamp: u64,
    previous_hash: Option<Hash>
}

impl<'a> From<&'a Block> for BlockPreimage<'a> {
    #[inline]
    fn from(block: &'a Block) -> Self {
        Self {
            height: block.height,
            body: &block.body,
            timestamp: block.timestamp,
            previous_hash: block.previous_hash
        }
    }
}

impl BlockPreimage<'_> {
    fn to_bytes(&self) -> Vec<u8> {
        json!({
            "body": self.body,
            "height": self.height,
            "previous_hash": self.previous_hash.map(|hash| hash.to_hex()),
            "timestamp": self.timestamp
        }).to_string().into_bytes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidBlock {
    #[error("Block is not sealed")]
    Unsealed,

    #[error("Block hash mismatch: stored {stored}, calculated {calculated}")]
    HashMismatch {
        stored: Hash,
        calculated: Hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockValidationResult {
    /// Block has no stored hash.
    Unsealed {
        calculated: Hash
    },

    /// Invalid hash.
    InvalidHash {
        stored: Hash,
        calculated: Hash
    },

    Valid
}

impl BlockValidationResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self == &Self::Valid
    }

    pub fn into_result(self) -> Result<(), InvalidBlock> {
        match self {
            Self::Valid => Ok(()),
            Self::Unsealed { .. } => Err(InvalidBlock::Unsealed),

            Self::InvalidHash { stored, calculated } => Err(InvalidBlock::HashMismatch {
                stored,
                calculated
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityStatus {
    /// Hash was never calculated.
    Unsealed,

    /// Stored hash matches the block's content.
    Sealed,

    /// Block was changed after sealing.
    Tampered
}

impl Block {
    /// Calculate hash of the block.
    ///
    /// Stored hash doesn't take part in the calculation,
    /// so the result only depends on the block's content.
    pub fn calculate_hash(&self) -> Hash {
        Hash::from_slice(BlockPreimage::from(self).to_bytes())
    }

    /// Calculate block's hash and store it.
    ///
    /// Sealing a block again after changing its content
    /// makes it valid with the new content.
    pub fn seal(&mut self) -> Hash {
        let hash = self.calculate_hash();

        tracing::debug!(height = self.height, %hash, "sealed block");

        self.hash = Some(hash);

        hash
    }

    /// Consume the block and return its sealed version.
    #[inline]
    pub fn sealed(mut self) -> Self {
        self.seal();

        self
    }

    /// Calculate block hash and compare it with stored value.
    ///
    /// Unsealed blocks are never valid.
    pub fn validate(&self) -> BlockValidationResult {
        let calculated = self.calculate_hash();

        match self.hash {
            None => {
                tracing::warn!(height = self.height, "validating unsealed block");

                BlockValidationResult::Unsealed { calculated }
            }

            Some(stored) if stored != calculated => {
                tracing::warn!(height = self.height, %stored, %calculated, "block hash mismatch");

                BlockValidationResult::InvalidHash { stored, calculated }
            }

            Some(_) => {
                tracing::debug!(height = self.height, "block is valid");

                BlockValidationResult::Valid
            }
        }
    }

    pub fn status(&self) -> IntegrityStatus {
        match self.validate() {
            BlockValidationResult::Valid => IntegrityStatus::Sealed,
            BlockValidationResult::Unsealed { .. } => IntegrityStatus::Unsealed,
            BlockValidationResult::InvalidHash { .. } => IntegrityStatus::Tampered
        }
    }
}
