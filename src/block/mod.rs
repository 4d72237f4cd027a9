use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as Json};

use crate::json::{AsJson, AsJsonError};

pub(crate) mod hash;
pub(crate) mod codec;
pub(crate) mod integrity;
pub(crate) mod builder;

pub use hash::*;
pub use codec::*;
pub use integrity::*;
pub use builder::*;

pub mod prelude {
    pub use super::{
        Block,
        Hash,
        HashError,
        BlockBuilder,
        BlockBuildError,
        BlockValidationResult,
        IntegrityStatus,
        InvalidBlock,
        EncodeError,
        DecodeError,
        MalformedBody
    };
}

/// Single hash-linked ledger record.
///
/// Height, timestamp and previous hash are assigned by
/// the ledger which owns the block. The block itself only
/// guarantees that its stored hash matches its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    // Header
    pub(crate) hash: Option<Hash>,
    pub(crate) height: u64,
    pub(crate) previous_hash: Option<Hash>,

    // Metadata
    pub(crate) timestamp: u64,

    // Body
    pub(crate) body: String
}

impl Block {
    /// Create new unsealed block with encoded payload.
    ///
    /// Block is created with zero height and timestamp
    /// and without previous block reference.
    pub fn new<T: Serialize + ?Sized>(payload: &T) -> Result<Self, EncodeError> {
        Ok(Self {
            hash: None,
            height: 0,
            previous_hash: None,
            timestamp: 0,
            body: encode(payload)?
        })
    }

    #[inline]
    /// Get hash stored in the block.
    ///
    /// This method will not validate this hash so
    /// you should treat its value as insecure.
    pub fn get_hash(&self) -> Option<Hash> {
        self.hash
    }

    #[inline]
    /// Position of the block in the blockchain.
    pub fn height(&self) -> u64 {
        self.height
    }

    #[inline]
    /// Hash of the previous block.
    pub fn previous_hash(&self) -> Option<Hash> {
        self.previous_hash
    }

    #[inline]
    /// UTC timestamp (amount of seconds) when
    /// this block was made.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    #[inline]
    /// Encoded payload of the block.
    pub fn body(&self) -> &str {
        &self.body
    }

    #[inline]
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    #[inline]
    pub fn set_height(&mut self, height: u64) {
        self.height = height;
    }

    #[inline]
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    #[inline]
    pub fn set_previous_hash(&mut self, previous_hash: Option<Hash>) {
        self.previous_hash = previous_hash;
    }

    #[inline]
    /// Replace encoded body of the block.
    ///
    /// The body is not checked, so it could become
    /// undecodable.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    #[inline]
    /// Decode payload stored in the block.
    pub fn get_data<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        decode(self)
    }
}

impl AsJson for Block {
    fn to_json(&self) -> Result<Json, AsJsonError> {
        Ok(json!({
            "format": 1,
            "block": {
                "hash": self.hash.map(|hash| hash.to_hex()),
                "height": self.height,
                "previous": self.previous_hash.map(|hash| hash.to_hex()),
                "timestamp": self.timestamp,
                "body": self.body
            }
        }))
    }

    fn from_json(json: &Json) -> Result<Self, AsJsonError> where Self: Sized {
        let Some(format) = json.get("format").and_then(Json::as_u64) else {
            return Err(AsJsonError::FieldNotFound("format"));
        };

        match format {
            1 => {
                let Some(block) = json.get("block") else {
                    return Err(AsJsonError::FieldNotFound("block"));
                };

                Ok(Self {
                    hash: optional_hash(block, "hash", "block.hash")?,

                    height: block.get("height")
                        .and_then(Json::as_u64)
                        .ok_or_else(|| AsJsonError::FieldValueInvalid("block.height"))?,

                    previous_hash: optional_hash(block, "previous", "block.previous")?,

                    timestamp: block.get("timestamp")
                        .and_then(Json::as_u64)
                        .ok_or_else(|| AsJsonError::FieldValueInvalid("block.timestamp"))?,

                    body: block.get("body")
                        .and_then(Json::as_str)
                        .map(String::from)
                        .ok_or_else(|| AsJsonError::FieldValueInvalid("block.body"))?
                })
            }

            version => Err(AsJsonError::InvalidStandard(version))
        }
    }
}

/// Parse nullable hex hash field.
fn optional_hash(json: &Json, field: &str, path: &'static str) -> Result<Option<Hash>, AsJsonError> {
    let Some(value) = json.get(field) else {
        return Err(AsJsonError::FieldNotFound(path));
    };

    if value.is_null() {
        return Ok(None);
    }

    value.as_str()
        .and_then(|hash| Hash::from_hex(hash).ok())
        .map(Some)
        .ok_or(AsJsonError::FieldValueInvalid(path))
}
