// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde_json::{Value, json};
use txauth_types::{Fee, SignMode, SignerData, Tx};

use super::{SignModeHandler, ensure_messages};
use crate::VerificationError;

/// Handler for [`SignMode::LegacyAminoJson`].
///
/// Sign bytes are a compact JSON document with every object's keys sorted:
///
/// ```text
/// {"account_number":"..","chain_id":"..","fee":{..},"memo":"..","msgs":[..],
///  "sequence":"..","timeout_height":".."}
/// ```
///
/// Integers are rendered as decimal strings. `timeout_height` is omitted when zero, as
/// are an empty fee `payer` and `granter`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyAminoJsonHandler;

impl SignModeHandler for LegacyAminoJsonHandler {
    fn mode(&self) -> SignMode {
        SignMode::LegacyAminoJson
    }

    fn sign_bytes(&self, signer_data: &SignerData, tx: &Tx) -> Result<Vec<u8>, VerificationError> {
        ensure_messages(tx)?;

        let msgs = tx
            .messages
            .iter()
            .map(|msg| -> Result<Value, VerificationError> {
                Ok(json!({
                    "type": msg.amino_name(),
                    "value": msg.to_legacy_json()?,
                }))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut doc = json!({
            "account_number": signer_data.account_number.to_string(),
            "chain_id": signer_data.chain_id,
            "fee": fee_json(&tx.fee),
            "memo": tx.memo,
            "msgs": msgs,
            "sequence": signer_data.sequence.to_string(),
        });
        if tx.timeout_height != 0 {
            doc["timeout_height"] = json!(tx.timeout_height.to_string());
        }

        serde_json::to_vec(&sorted(doc))
            .map_err(|err| VerificationError::Encoding(err.to_string().into()))
    }
}

fn fee_json(fee: &Fee) -> Value {
    let amount: Vec<_> = fee
        .amount
        .iter()
        .map(|coin| json!({ "amount": coin.amount.to_string(), "denom": coin.denom }))
        .collect();

    let mut doc = json!({
        "amount": amount,
        "gas": fee.gas_limit.to_string(),
    });
    if !fee.payer.is_empty() {
        doc["payer"] = json!(fee.payer);
    }
    if !fee.granter.is_empty() {
        doc["granter"] = json!(fee.granter);
    }
    doc
}

/// Rebuilds every object with its keys inserted in sorted order, so the output does not
/// depend on whether `serde_json` maps preserve insertion order.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sorted(value)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sorted).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::Arc;
    use txauth_types::test_utils::{TEST_CHAIN_ID, TestMsg, create_test_tx};
    use txauth_types::{Coin, KeyAlgorithm, Msg, PublicKey, TypesError};

    fn signer_data(sequence: u64) -> SignerData {
        SignerData::new(
            TEST_CHAIN_ID,
            7,
            sequence,
            PublicKey::single(KeyAlgorithm::Secp256k1, vec![2; 33]),
        )
    }

    #[derive(Debug)]
    struct UnorderedMsg;

    impl Msg for UnorderedMsg {
        fn type_url(&self) -> &str {
            "/testpb.UnorderedMsg"
        }

        fn amino_name(&self) -> &str {
            "test/Unordered"
        }

        fn encode_proto(&self) -> Result<Vec<u8>, TypesError> {
            Ok(vec![])
        }

        fn to_legacy_json(&self) -> Result<Value, TypesError> {
            let mut inner = Map::new();
            inner.insert("zeta".into(), json!(1));
            inner.insert("alpha".into(), json!({ "y": 2, "b": [ { "d": 1, "c": 2 } ] }));
            Ok(Value::Object(inner))
        }
    }

    #[derive(Debug)]
    struct BrokenMsg;

    impl Msg for BrokenMsg {
        fn type_url(&self) -> &str {
            "/testpb.BrokenMsg"
        }

        fn amino_name(&self) -> &str {
            "test/Broken"
        }

        fn encode_proto(&self) -> Result<Vec<u8>, TypesError> {
            Err(TypesError::Encoding("unsupported field".into()))
        }

        fn to_legacy_json(&self) -> Result<Value, TypesError> {
            Err(TypesError::Encoding("unsupported field".into()))
        }
    }

    #[test]
    fn test_sign_bytes_layout() {
        let tx = create_test_tx(["signer-a"]);
        let bytes = LegacyAminoJsonHandler
            .sign_bytes(&signer_data(3), &tx)
            .unwrap();

        let expected = concat!(
            r#"{"account_number":"7","chain_id":"test-chain","#,
            r#""fee":{"amount":[{"amount":"150","denom":"atom"}],"gas":"50000"},"#,
            r#""memo":"testmemo","#,
            r#""msgs":[{"type":"cosmos-sdk/Test","value":{"signers":["signer-a"]}}],"#,
            r#""sequence":"3","timeout_height":"10"}"#
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_zero_timeout_and_fee_parties() {
        let mut tx = create_test_tx(["signer-a"]).with_timeout_height(0);
        tx.fee.payer = "payer".into();
        tx.fee.amount.push(Coin::new("stake", u128::MAX));

        let bytes = LegacyAminoJsonHandler
            .sign_bytes(&signer_data(0), &tx)
            .unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();

        assert!(doc.get("timeout_height").is_none());
        assert_eq!(doc["fee"]["payer"], json!("payer"));
        assert!(doc["fee"].get("granter").is_none());
        assert_eq!(
            doc["fee"]["amount"][1]["amount"],
            json!(u128::MAX.to_string())
        );
    }

    #[test]
    fn test_nested_message_keys_are_sorted() {
        let msg: Arc<dyn Msg> = Arc::new(UnorderedMsg);
        let tx = Tx::new(vec![msg], Fee::default(), "");
        let bytes = LegacyAminoJsonHandler
            .sign_bytes(&signer_data(0), &tx)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains(
            r#"{"type":"test/Unordered","value":{"alpha":{"b":[{"c":2,"d":1}],"y":2},"zeta":1}}"#
        ));
    }

    #[test]
    fn test_sequence_changes_bytes() {
        let tx = create_test_tx(["signer-a"]);
        let first = LegacyAminoJsonHandler
            .sign_bytes(&signer_data(0), &tx)
            .unwrap();
        let second = LegacyAminoJsonHandler
            .sign_bytes(&signer_data(1), &tx)
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_unencodable_message() {
        let good: Arc<dyn Msg> = Arc::new(TestMsg::new(["signer-a"]));
        let broken: Arc<dyn Msg> = Arc::new(BrokenMsg);
        let tx = Tx::new(vec![good, broken], Fee::default(), "");
        assert_eq!(
            LegacyAminoJsonHandler.sign_bytes(&signer_data(0), &tx),
            Err(VerificationError::Encoding("unsupported field".into()))
        );
    }
}
