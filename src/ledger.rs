use serde::de::DeserializeOwned;

use crate::block::{Block, BlockValidationResult, DecodeError};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unknown block height: {0}")]
    UnknownBlock(u64),

    #[error(transparent)]
    Decode(#[from] DecodeError)
}

/// Sequence of blocks owned by an application.
///
/// The ledger assigns blocks' heights, timestamps and
/// previous block references. Each block is validated
/// independently from its neighbors.
#[async_trait::async_trait]
pub trait Ledger: Sync {
    /// Get block by its height.
    async fn get_block(&self, height: u64) -> Option<Block>;

    /// Get ledger's tail (last) block.
    async fn get_tail(&self) -> Option<Block>;

    /// Check if the ledger has no blocks.
    async fn is_empty(&self) -> bool {
        self.get_tail().await.is_none()
    }

    /// Validate hash of the block with given height.
    async fn validate_block(&self, height: u64) -> Result<BlockValidationResult, LedgerError> {
        let Some(block) = self.get_block(height).await else {
            return Err(LedgerError::UnknownBlock(height));
        };

        Ok(block.validate())
    }

    /// Decode payload of the block with given height.
    ///
    /// Genesis block has no payload and will return
    /// `DecodeError::GenesisPayloadUnavailable`.
    async fn get_block_data<T>(&self, height: u64) -> Result<T, LedgerError>
    where
        T: DeserializeOwned + Send
    {
        let Some(block) = self.get_block(height).await else {
            return Err(LedgerError::UnknownBlock(height));
        };

        Ok(block.get_data()?)
    }
}
