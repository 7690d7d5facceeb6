// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use prost::Message;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use strum_macros::Display;

use crate::proto;
use crate::types::{ADDRESS_LENGTH, Address};
use crate::TypesError;

pub const SECP256K1_KEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
pub const ED25519_KEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";
pub const BLS12_381_KEY_TYPE_URL: &str = "/cosmos.crypto.bls12_381.PubKey";
pub const MULTISIG_KEY_TYPE_URL: &str = "/cosmos.crypto.multisig.LegacyAminoPubKey";

/// Signature algorithm of a single key. The algorithm travels with the key; verifiers
/// never assume one.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyAlgorithm {
    /// ECDSA over secp256k1, 33-byte compressed keys
    #[strum(serialize = "secp256k1")]
    Secp256k1,
    /// Ed25519, 32-byte keys
    #[strum(serialize = "ed25519")]
    Ed25519,
    /// BLS over BLS12-381 with G1 public keys and G2 signatures
    #[strum(serialize = "bls12_381")]
    Bls12381,
}

impl KeyAlgorithm {
    pub fn type_url(&self) -> &'static str {
        match self {
            KeyAlgorithm::Secp256k1 => SECP256K1_KEY_TYPE_URL,
            KeyAlgorithm::Ed25519 => ED25519_KEY_TYPE_URL,
            KeyAlgorithm::Bls12381 => BLS12_381_KEY_TYPE_URL,
        }
    }

    fn from_type_url(type_url: &str) -> Option<Self> {
        match type_url {
            SECP256K1_KEY_TYPE_URL => Some(KeyAlgorithm::Secp256k1),
            ED25519_KEY_TYPE_URL => Some(KeyAlgorithm::Ed25519),
            BLS12_381_KEY_TYPE_URL => Some(KeyAlgorithm::Bls12381),
            _ => None,
        }
    }
}

/// A single public key: raw key bytes plus the algorithm that interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SingleKey {
    pub algorithm: KeyAlgorithm,
    pub bytes: Vec<u8>,
}

/// A k-of-n threshold key.
///
/// Member order is part of the key's identity: reordering members yields a different
/// address. Construction enforces `1 <= threshold <= members.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultisigKey {
    threshold: u32,
    members: Vec<PublicKey>,
}

impl MultisigKey {
    pub fn new(threshold: u32, members: Vec<PublicKey>) -> Result<Self, TypesError> {
        if threshold == 0 {
            return Err(TypesError::ZeroThreshold);
        }
        if threshold as usize > members.len() {
            return Err(TypesError::ThresholdTooHigh {
                threshold,
                members: members.len(),
            });
        }
        Ok(Self { threshold, members })
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn members(&self) -> &[PublicKey] {
        &self.members
    }

    /// Index of `member` within this key, by exact key equality.
    pub fn position(&self, member: &PublicKey) -> Option<usize> {
        self.members.iter().position(|m| m == member)
    }
}

/// A public key that can authorize transactions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Single(SingleKey),
    Multisig(MultisigKey),
}

impl PublicKey {
    pub fn single(algorithm: KeyAlgorithm, bytes: impl Into<Vec<u8>>) -> Self {
        PublicKey::Single(SingleKey {
            algorithm,
            bytes: bytes.into(),
        })
    }

    pub fn multisig(threshold: u32, members: Vec<PublicKey>) -> Result<Self, TypesError> {
        MultisigKey::new(threshold, members).map(PublicKey::Multisig)
    }

    /// Short name of the variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            PublicKey::Single(_) => "single",
            PublicKey::Multisig(_) => "multisig",
        }
    }

    /// Derives the account address of this key.
    ///
    /// - secp256k1: `RIPEMD160(SHA256(key))`
    /// - ed25519 and BLS: the first 20 bytes of `SHA256(key)`
    /// - multisig: the first 20 bytes of `SHA256` over the key's protobuf encoding, which
    ///   covers the threshold and the ordered members
    pub fn address(&self) -> Address {
        let mut payload = [0u8; ADDRESS_LENGTH];
        match self {
            PublicKey::Single(SingleKey {
                algorithm: KeyAlgorithm::Secp256k1,
                bytes,
            }) => {
                let sha_hash = Sha256::digest(bytes);
                let ripe_hash = Ripemd160::digest(sha_hash);
                payload.copy_from_slice(&ripe_hash[..]);
            }
            PublicKey::Single(SingleKey { bytes, .. }) => {
                let hash = Sha256::digest(bytes);
                payload.copy_from_slice(&hash[..ADDRESS_LENGTH]);
            }
            PublicKey::Multisig(_) => {
                let hash = Sha256::digest(self.to_any().value);
                payload.copy_from_slice(&hash[..ADDRESS_LENGTH]);
            }
        }
        Address(payload)
    }

    /// Encodes the key as a protobuf `Any`.
    pub fn to_any(&self) -> proto::Any {
        match self {
            PublicKey::Single(key) => proto::Any {
                type_url: key.algorithm.type_url().to_string(),
                value: proto::PubKey {
                    key: key.bytes.clone(),
                }
                .encode_to_vec(),
            },
            PublicKey::Multisig(key) => proto::Any {
                type_url: MULTISIG_KEY_TYPE_URL.to_string(),
                value: proto::LegacyAminoPubKey {
                    threshold: key.threshold,
                    public_keys: key.members.iter().map(PublicKey::to_any).collect(),
                }
                .encode_to_vec(),
            },
        }
    }

    /// Decodes a key from a protobuf `Any`. Unknown type URLs are rejected rather than
    /// treated as any known variant.
    pub fn from_any(any: &proto::Any) -> Result<Self, TypesError> {
        if any.type_url == MULTISIG_KEY_TYPE_URL {
            let wire = proto::LegacyAminoPubKey::decode(any.value.as_slice())?;
            let members = wire
                .public_keys
                .iter()
                .map(PublicKey::from_any)
                .collect::<Result<Vec<_>, _>>()?;
            return PublicKey::multisig(wire.threshold, members);
        }

        let algorithm = KeyAlgorithm::from_type_url(&any.type_url)
            .ok_or_else(|| TypesError::UnknownKeyType(any.type_url.clone()))?;
        let wire = proto::PubKey::decode(any.value.as_slice())?;
        Ok(PublicKey::single(algorithm, wire.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> PublicKey {
        PublicKey::single(KeyAlgorithm::Secp256k1, vec![byte; 33])
    }

    #[test]
    fn test_multisig_threshold_bounds() {
        assert_eq!(
            PublicKey::multisig(0, vec![key(1)]),
            Err(TypesError::ZeroThreshold)
        );
        assert_eq!(
            PublicKey::multisig(3, vec![key(1), key(2)]),
            Err(TypesError::ThresholdTooHigh {
                threshold: 3,
                members: 2
            })
        );
        assert_eq!(
            PublicKey::multisig(1, vec![]),
            Err(TypesError::ThresholdTooHigh {
                threshold: 1,
                members: 0
            })
        );
        assert!(PublicKey::multisig(2, vec![key(1), key(2)]).is_ok());
    }

    #[test]
    fn test_member_order_changes_address() {
        let ab = PublicKey::multisig(1, vec![key(1), key(2)]).unwrap();
        let ba = PublicKey::multisig(1, vec![key(2), key(1)]).unwrap();
        assert_ne!(ab.address(), ba.address());

        let ab_2 = PublicKey::multisig(2, vec![key(1), key(2)]).unwrap();
        assert_ne!(ab.address(), ab_2.address());
    }

    #[test]
    fn test_address_depends_on_algorithm() {
        let secp = PublicKey::single(KeyAlgorithm::Secp256k1, vec![7; 32]);
        let ed = PublicKey::single(KeyAlgorithm::Ed25519, vec![7; 32]);
        assert_ne!(secp.address(), ed.address());
        assert_eq!(ed.address().to_string().len(), 40);
    }

    #[test]
    fn test_any_roundtrip_nested_multisig() {
        let inner = PublicKey::multisig(1, vec![key(3), key(4)]).unwrap();
        let outer = PublicKey::multisig(
            2,
            vec![
                key(1),
                PublicKey::single(KeyAlgorithm::Ed25519, vec![9; 32]),
                inner,
            ],
        )
        .unwrap();

        let decoded = PublicKey::from_any(&outer.to_any()).unwrap();
        assert_eq!(decoded, outer);
        assert_eq!(decoded.address(), outer.address());
    }

    #[test]
    fn test_from_any_unknown_type() {
        let any = proto::Any {
            type_url: "/cosmos.crypto.unknown.PubKey".to_string(),
            value: vec![],
        };
        assert_eq!(
            PublicKey::from_any(&any),
            Err(TypesError::UnknownKeyType(
                "/cosmos.crypto.unknown.PubKey".to_string()
            ))
        );
    }

    #[test]
    fn test_from_any_rejects_invalid_threshold() {
        let any = proto::Any {
            type_url: MULTISIG_KEY_TYPE_URL.to_string(),
            value: proto::LegacyAminoPubKey {
                threshold: 2,
                public_keys: vec![key(1).to_any()],
            }
            .encode_to_vec(),
        };
        assert!(matches!(
            PublicKey::from_any(&any),
            Err(TypesError::ThresholdTooHigh { .. })
        ));
    }
}
