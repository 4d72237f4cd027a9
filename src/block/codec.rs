//! Payload codec.
//!
//! Block body is the lowercase hex of the payload's compact JSON text:
//!
//! ```text
//! {"amount":10} -> 7b22616d6f756e74223a31307d
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Block;

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize block payload: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

#[derive(Debug, thiserror::Error)]
pub enum MalformedBody {
    #[error("Block body is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Block body is not a valid payload: {0}")]
    Json(#[from] serde_json::Error)
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Genesis block doesn't carry application payload.
    #[error("Genesis block has no payload")]
    GenesisPayloadUnavailable,

    #[error(transparent)]
    MalformedBody(#[from] MalformedBody)
}

impl DecodeError {
    #[inline]
    pub fn is_genesis(&self) -> bool {
        matches!(self, Self::GenesisPayloadUnavailable)
    }
}

/// Encode payload into the block body representation.
///
/// Output is deterministic for a given payload value since
/// `serde_json` emits struct fields in declaration order.
///
/// Non-finite floats (`NaN`, infinities) have no JSON form
/// and are written as `null`. Such payloads encode fine but
/// won't decode back into a float type, so callers must keep
/// them out of block payloads.
pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<String, EncodeError> {
    let text = serde_json::to_vec(payload)?;

    Ok(hex::encode(text))
}

/// Decode raw block body without looking at the block's position.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, MalformedBody> {
    let text = hex::decode(body)?;

    Ok(serde_json::from_slice(&text)?)
}

/// Decode payload stored in the block.
///
/// Genesis blocks are rejected before their body is read.
pub fn decode<T: DeserializeOwned>(block: &Block) -> Result<T, DecodeError> {
    if block.is_genesis() {
        tracing::debug!("payload requested from genesis block");

        return Err(DecodeError::GenesisPayloadUnavailable);
    }

    Ok(decode_body(block.body())?)
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::{json, Value as Json};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Transfer {
        pub sender: String,
        pub receiver: String,
        pub amount: u64
    }

    pub fn get_transfer() -> Transfer {
        Transfer {
            sender: String::from("A"),
            receiver: String::from("B"),
            amount: 5
        }
    }

    #[test]
    fn encode_hex() -> Result<(), EncodeError> {
        assert_eq!(encode(&json!({ "amount": 10 }))?, "7b22616d6f756e74223a31307d");

        Ok(())
    }

    #[test]
    fn encode_deterministic() -> Result<(), EncodeError> {
        assert_eq!(encode(&get_transfer())?, encode(&get_transfer())?);

        Ok(())
    }

    #[test]
    fn encode_unrepresentable() {
        let mut payload = std::collections::HashMap::new();

        payload.insert((1, 2), "tuple keys are not valid JSON keys");

        assert!(encode(&payload).is_err());
    }

    #[test]
    fn decode() -> Result<(), Box<dyn std::error::Error>> {
        let mut block = Block::new(&get_transfer())?;

        block.set_height(1);

        assert_eq!(super::decode::<Transfer>(&block)?, get_transfer());
        assert_eq!(block.get_data::<Json>()?, json!({ "sender": "A", "receiver": "B", "amount": 5 }));

        Ok(())
    }

    #[test]
    fn decode_unicode() -> Result<(), Box<dyn std::error::Error>> {
        let payload = json!({ "memo": "Привет, мир! ✓" });

        let mut block = Block::new(&payload)?;

        block.set_height(7);

        assert_eq!(block.get_data::<Json>()?, payload);

        Ok(())
    }

    #[test]
    fn decode_genesis() -> Result<(), EncodeError> {
        let block = Block::new(&get_transfer())?;

        assert!(super::decode::<Transfer>(&block).is_err_and(|err| err.is_genesis()));

        // Body content is irrelevant for genesis blocks
        let mut block = block;

        block.set_body("not even hex");

        assert!(matches!(
            super::decode::<Json>(&block),
            Err(DecodeError::GenesisPayloadUnavailable)
        ));

        Ok(())
    }

    #[test]
    fn decode_malformed() -> Result<(), EncodeError> {
        let mut block = Block::new(&get_transfer())?;

        block.set_height(1);
        block.set_body("7b2");

        assert!(matches!(
            super::decode::<Json>(&block),
            Err(DecodeError::MalformedBody(MalformedBody::Hex(_)))
        ));

        // Valid hex of `{"amount":`
        block.set_body(hex::encode(b"{\"amount\":"));

        assert!(matches!(
            super::decode::<Json>(&block),
            Err(DecodeError::MalformedBody(MalformedBody::Json(_)))
        ));

        // Valid JSON of the wrong shape
        block.set_body(hex::encode(b"{\"amount\":10}"));

        assert!(matches!(
            super::decode::<Transfer>(&block),
            Err(DecodeError::MalformedBody(MalformedBody::Json(_)))
        ));

        Ok(())
    }

    #[test]
    fn decode_invalid_utf8() {
        assert!(matches!(
            decode_body::<Json>(&hex::encode([0x22, 0xff, 0x22])),
            Err(MalformedBody::Json(_))
        ));
    }

    #[test]
    fn float_exact() -> Result<(), Box<dyn std::error::Error>> {
        let values = [
            1.0715660391465826e-75,
            0.1,
            -2.2250738585072014e-308,
            f64::MIN_POSITIVE,
            f64::MAX,
            std::f64::consts::PI
        ];

        for value in values {
            let mut block = Block::new(&value)?;

            block.set_height(1);

            assert_eq!(block.get_data::<f64>()?.to_bits(), value.to_bits());
        }

        Ok(())
    }

    #[test]
    fn non_finite_float() -> Result<(), EncodeError> {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            // Written as JSON `null`
            assert_eq!(encode(&value)?, "6e756c6c");

            let mut block = Block::new(&value)?;

            block.set_height(1);

            assert!(matches!(
                block.get_data::<f64>(),
                Err(DecodeError::MalformedBody(MalformedBody::Json(_)))
            ));
        }

        Ok(())
    }

    fn json_payload() -> impl Strategy<Value = Json> {
        let leaf = prop_oneof![
            Just(Json::Null),
            any::<bool>().prop_map(Json::from),
            any::<u64>().prop_map(Json::from),
            any::<i64>().prop_map(Json::from),
            any::<f64>()
                .prop_filter("finite", |value| value.is_finite())
                .prop_map(Json::from),
            any::<String>().prop_map(Json::from)
        ];

        leaf.prop_recursive(3, 32, 6, |inner| prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Json::Array),
            prop::collection::btree_map(any::<String>(), inner, 0..6)
                .prop_map(|map| Json::Object(map.into_iter().collect()))
        ])
    }

    proptest! {
        #[test]
        fn text_roundtrip(text in any::<String>(), height in 1..u64::MAX) {
            let mut block = Block::new(&text).unwrap();

            block.set_height(height);

            prop_assert_eq!(block.get_data::<String>().unwrap(), text);
        }

        #[test]
        fn integer_roundtrip(unsigned in any::<u64>(), signed in any::<i64>()) {
            let mut block = Block::new(&(unsigned, signed)).unwrap();

            block.set_height(1);

            prop_assert_eq!(block.get_data::<(u64, i64)>().unwrap(), (unsigned, signed));
        }

        #[test]
        fn float_roundtrip(value in any::<f64>().prop_filter("finite", |value| value.is_finite())) {
            let mut block = Block::new(&value).unwrap();

            block.set_height(1);

            prop_assert_eq!(block.get_data::<f64>().unwrap().to_bits(), value.to_bits());
        }

        #[test]
        fn json_roundtrip(payload in json_payload(), height in 1..u64::MAX) {
            let mut block = Block::new(&payload).unwrap();

            block.set_height(height);

            prop_assert_eq!(block.get_data::<Json>().unwrap(), payload);
        }

        #[test]
        fn transfer_roundtrip(sender in ".*", receiver in ".*", amount in any::<u64>()) {
            let transfer = Transfer { sender, receiver, amount };

            let mut block = Block::new(&transfer).unwrap();

            block.set_height(1);

            prop_assert_eq!(block.get_data::<Transfer>().unwrap(), transfer);
        }
    }
}
