// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use prost::Message;
use txauth_types::proto::{self, mode_info};
use txauth_types::{SignMode, SignerData, Tx};

use super::{SignModeHandler, ensure_messages};
use crate::VerificationError;

/// Handler for [`SignMode::Direct`].
///
/// Sign bytes are the protobuf encoding of a `SignDoc` whose body and auth-info are
/// themselves protobuf-encoded. The auth-info carries a single signer-info for the signer
/// described by the [`SignerData`], so the signer's key, mode and sequence are all bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectHandler;

impl SignModeHandler for DirectHandler {
    fn mode(&self) -> SignMode {
        SignMode::Direct
    }

    fn sign_bytes(&self, signer_data: &SignerData, tx: &Tx) -> Result<Vec<u8>, VerificationError> {
        ensure_messages(tx)?;

        let body = proto::TxBody {
            messages: tx
                .messages
                .iter()
                .map(|msg| msg.to_any())
                .collect::<Result<Vec<_>, _>>()?,
            memo: tx.memo.clone(),
            timeout_height: tx.timeout_height,
        };

        let auth_info = proto::AuthInfo {
            signer_infos: vec![proto::SignerInfo {
                public_key: Some(signer_data.pub_key.to_any()),
                mode_info: Some(proto::ModeInfo {
                    sum: Some(mode_info::Sum::Single(mode_info::Single {
                        mode: SignMode::Direct as i32,
                    })),
                }),
                sequence: signer_data.sequence,
            }],
            fee: Some(tx.fee.to_proto()),
        };

        let doc = proto::SignDoc {
            body_bytes: body.encode_to_vec(),
            auth_info_bytes: auth_info.encode_to_vec(),
            chain_id: signer_data.chain_id.clone(),
            account_number: signer_data.account_number,
        };
        Ok(doc.encode_to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txauth_types::test_utils::{TEST_CHAIN_ID, TEST_MEMO, TEST_TIMEOUT_HEIGHT, create_test_tx};
    use txauth_types::{KeyAlgorithm, PublicKey};

    fn signer_data(account_number: u64, sequence: u64) -> SignerData {
        SignerData::new(
            TEST_CHAIN_ID,
            account_number,
            sequence,
            PublicKey::single(KeyAlgorithm::Ed25519, vec![5; 32]),
        )
    }

    #[test]
    fn test_sign_doc_fields() {
        let signer_data = signer_data(12, 4);
        let tx = create_test_tx(["signer-a", "signer-b"]);
        let bytes = DirectHandler.sign_bytes(&signer_data, &tx).unwrap();

        let doc = proto::SignDoc::decode(bytes.as_slice()).unwrap();
        assert_eq!(doc.chain_id, TEST_CHAIN_ID);
        assert_eq!(doc.account_number, 12);

        let body = proto::TxBody::decode(doc.body_bytes.as_slice()).unwrap();
        assert_eq!(body.memo, TEST_MEMO);
        assert_eq!(body.timeout_height, TEST_TIMEOUT_HEIGHT);
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].type_url, "/testpb.TestMsg");

        let auth_info = proto::AuthInfo::decode(doc.auth_info_bytes.as_slice()).unwrap();
        let fee = auth_info.fee.unwrap();
        assert_eq!(fee.gas_limit, 50_000);
        assert_eq!(fee.amount[0].amount, "150");
        assert_eq!(fee.amount[0].denom, "atom");

        let [signer_info] = auth_info.signer_infos.as_slice() else {
            panic!("expected exactly one signer info");
        };
        assert_eq!(signer_info.sequence, 4);
        assert_eq!(
            signer_info.public_key.as_ref(),
            Some(&signer_data.pub_key.to_any())
        );
        assert_eq!(
            signer_info.mode_info,
            Some(proto::ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single { mode: 1 })),
            })
        );
    }

    #[test]
    fn test_sign_bytes_vector() {
        let tx = create_test_tx(["signer-a"]);
        let bytes = DirectHandler.sign_bytes(&signer_data(7, 3), &tx).unwrap();
        assert_eq!(
            hex::encode(bytes),
            concat!(
                "0a2b0a1d0a0f2f7465737470622e546573744d7367120a0a087369676e65722d61",
                "1208746573746d656d6f180a",
                "12620a4d0a430a1d2f636f736d6f732e63727970746f2e656432353531392e5075",
                "624b657912220a20050505050505050505050505050505050505050505050505",
                "050505050505050512040a020801180312110a0b0a0461746f6d120331353010",
                "d08603",
                "1a0a746573742d636861696e",
                "2007",
            )
        );
    }

    #[test]
    fn test_sign_bytes_are_deterministic() {
        let tx = create_test_tx(["signer-a"]);
        let first = DirectHandler.sign_bytes(&signer_data(1, 1), &tx).unwrap();
        let second = DirectHandler
            .sign_bytes(&signer_data(1, 1), &tx.clone())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_signer_field_is_bound() {
        let tx = create_test_tx(["signer-a"]);
        let base = DirectHandler.sign_bytes(&signer_data(1, 1), &tx).unwrap();

        assert_ne!(
            base,
            DirectHandler.sign_bytes(&signer_data(2, 1), &tx).unwrap()
        );
        assert_ne!(
            base,
            DirectHandler.sign_bytes(&signer_data(1, 2), &tx).unwrap()
        );

        let mut other_chain = signer_data(1, 1);
        other_chain.chain_id = "other-chain".into();
        assert_ne!(base, DirectHandler.sign_bytes(&other_chain, &tx).unwrap());

        let mut other_key = signer_data(1, 1);
        other_key.pub_key = PublicKey::single(KeyAlgorithm::Ed25519, vec![6; 32]);
        assert_ne!(base, DirectHandler.sign_bytes(&other_key, &tx).unwrap());

        let other_memo = {
            let mut tx = tx.clone();
            tx.memo = "othermemo".into();
            tx
        };
        assert_ne!(
            base,
            DirectHandler.sign_bytes(&signer_data(1, 1), &other_memo).unwrap()
        );
    }
}
