use serde::Serialize;

use crate::time::timestamp;

use super::{Block, Hash, EncodeError, encode};

#[derive(Debug, thiserror::Error)]
pub enum BlockBuildError {
    #[error("Previous block at height {0} is not sealed")]
    UnsealedPrevious(u64),

    #[error("Block height overflow")]
    HeightOverflow,

    #[error("Genesis block can't reference previous block")]
    GenesisWithPrevious,

    #[error("Block at height {0} must reference previous block")]
    MissingPrevious(u64),

    #[error(transparent)]
    Encode(#[from] EncodeError)
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BlockBuilder {
    height: u64,
    previous_hash: Option<Hash>,
    timestamp: u64,
    body: String
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self {
            height: 0,
            previous_hash: None,
            timestamp: timestamp(),
            body: String::new()
        }
    }

    /// Change height of the block.
    pub fn with_height(self, height: u64) -> Self {
        Self {
            height,
            ..self
        }
    }

    /// Set reference to the previous block.
    pub fn with_previous(self, previous_hash: Hash) -> Self {
        Self {
            previous_hash: Some(previous_hash),
            ..self
        }
    }

    /// Change creation timestamp of the block.
    pub fn with_timestamp(self, timestamp: u64) -> Self {
        Self {
            timestamp,
            ..self
        }
    }

    /// Encode block's payload.
    pub fn with_payload<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, EncodeError> {
        Ok(Self {
            body: encode(payload)?,
            ..self
        })
    }

    /// Change block's body without encoding it.
    pub fn with_body(self, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..self
        }
    }

    /// Build unsealed block.
    ///
    /// Only genesis (zero height) block can be built
    /// without previous block reference.
    pub fn build(self) -> Result<Block, BlockBuildError> {
        match (self.height, self.previous_hash) {
            (0, Some(_)) => return Err(BlockBuildError::GenesisWithPrevious),
            (height, None) if height > 0 => return Err(BlockBuildError::MissingPrevious(height)),

            _ => ()
        }

        Ok(Block {
            hash: None,
            height: self.height,
            previous_hash: self.previous_hash,
            timestamp: self.timestamp,
            body: self.body
        })
    }

    /// Build block and calculate its hash.
    pub fn seal(self) -> Result<Block, BlockBuildError> {
        Ok(self.build()?.sealed())
    }

    /// Build new sealed genesis block.
    ///
    /// ```
    /// use sealchain::block::BlockBuilder;
    ///
    /// let block = BlockBuilder::build_genesis("Genesis Block").unwrap();
    ///
    /// assert!(block.is_genesis());
    /// assert!(block.validate().is_valid());
    /// assert!(block.get_data::<String>().is_err());
    /// ```
    pub fn build_genesis<T: Serialize + ?Sized>(payload: &T) -> Result<Block, BlockBuildError> {
        Self::new()
            .with_payload(payload)?
            .seal()
    }

    /// Build new sealed block referencing the given one.
    ///
    /// ```
    /// use sealchain::block::BlockBuilder;
    ///
    /// let genesis = BlockBuilder::build_genesis("Genesis Block").unwrap();
    /// let block = BlockBuilder::build_chained(&genesis, "Chained block").unwrap();
    ///
    /// assert_eq!(block.height(), 1);
    /// assert_eq!(block.previous_hash(), genesis.get_hash());
    /// assert_eq!(block.get_data::<String>().unwrap(), "Chained block");
    /// ```
    pub fn build_chained<T: Serialize + ?Sized>(previous: &Block, payload: &T) -> Result<Block, BlockBuildError> {
        let Some(previous_hash) = previous.get_hash() else {
            return Err(BlockBuildError::UnsealedPrevious(previous.height()));
        };

        let Some(height) = previous.height().checked_add(1) else {
            return Err(BlockBuildError::HeightOverflow);
        };

        Self::new()
            .with_height(height)
            .with_previous(previous_hash)
            .with_payload(payload)?
            .seal()
    }
}
