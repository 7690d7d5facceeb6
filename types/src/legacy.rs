// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Conversion between legacy standard signatures and [`SignatureData`].
//!
//! A legacy signature is a bare byte string next to its public key. For a single key the
//! bytes are the signature itself, made in [`SignMode::LegacyAminoJson`]. For a multisig
//! key they are a [`proto::LegacyMultisignature`]: the presence bits plus one nested
//! legacy signature per set bit, in bit-scan order.

use prost::Message;

use crate::{
    MultiSignatureData, PresenceBitSet, PublicKey, SignMode, SignatureData, TypesError, proto,
};

/// A public key and the legacy signature bytes made with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StdSignature {
    pub pub_key: PublicKey,
    pub signature: Vec<u8>,
}

impl StdSignature {
    /// Converts the legacy signature into structured signature data.
    pub fn to_signature_data(&self) -> Result<SignatureData, TypesError> {
        signature_data(&self.pub_key, &self.signature)
    }

    /// Packs structured signature data made in legacy mode into a legacy signature.
    pub fn from_signature_data(
        pub_key: PublicKey,
        data: &SignatureData,
    ) -> Result<Self, TypesError> {
        let signature = signature_bytes(&pub_key, data)?;
        Ok(Self { pub_key, signature })
    }
}

fn signature_data(pub_key: &PublicKey, signature: &[u8]) -> Result<SignatureData, TypesError> {
    let key = match pub_key {
        PublicKey::Single(_) => {
            return Ok(SignatureData::single(SignMode::LegacyAminoJson, signature));
        }
        PublicKey::Multisig(key) => key,
    };

    let wire = proto::LegacyMultisignature::decode(signature)?;
    let bitarray = wire
        .bitarray
        .as_ref()
        .ok_or(TypesError::MissingField("bitarray"))?;
    let bitset = PresenceBitSet::from_compact(bitarray)?;
    if bitset.size() != key.members().len() {
        return Err(TypesError::BitsetSizeMismatch {
            expected: key.members().len(),
            actual: bitset.size(),
        });
    }
    if bitset.count() != wire.sigs.len() {
        return Err(TypesError::SignatureCountMismatch {
            set_bits: bitset.count(),
            signatures: wire.sigs.len(),
        });
    }

    let signatures = bitset
        .iter()
        .zip(wire.sigs.iter())
        .map(|(index, sig)| signature_data(&key.members()[index], sig))
        .collect::<Result<Vec<_>, _>>()?;
    MultiSignatureData::from_parts(bitset, signatures).map(SignatureData::Multi)
}

fn signature_bytes(pub_key: &PublicKey, data: &SignatureData) -> Result<Vec<u8>, TypesError> {
    match (pub_key, data) {
        (PublicKey::Single(_), SignatureData::Single(single)) => {
            if single.mode != SignMode::LegacyAminoJson {
                return Err(TypesError::NotLegacyMode(single.mode));
            }
            Ok(single.signature.clone())
        }
        (PublicKey::Multisig(key), SignatureData::Multi(multi)) => {
            if multi.bitset.size() != key.members().len() {
                return Err(TypesError::BitsetSizeMismatch {
                    expected: key.members().len(),
                    actual: multi.bitset.size(),
                });
            }
            let sigs = multi
                .signatures_by_index()?
                .into_iter()
                .map(|(index, sig)| signature_bytes(&key.members()[index], sig))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(proto::LegacyMultisignature {
                bitarray: Some(multi.bitset.to_compact()),
                sigs,
            }
            .encode_to_vec())
        }
        (key, data) => Err(TypesError::VariantMismatch {
            key: key.variant_name(),
            signature: data.variant_name(),
        }),
    }
}
