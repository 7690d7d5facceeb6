// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use prost::Message;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::proto::{self, signature_descriptor_data as wire};
use crate::{PresenceBitSet, TypesError};

/// Identifies the canonical encoding that produces the sign bytes.
///
/// The numeric values are part of the structured sign bytes and of the wire format.
/// A new layout gets a new mode; existing layouts are never altered in place.
#[repr(i32)]
#[derive(
    Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignMode {
    /// Placeholder for a missing mode. Always rejected
    #[strum(serialize = "SIGN_MODE_UNSPECIFIED")]
    Unspecified = 0,
    /// Protobuf `SignDoc` with embedded signer info
    #[strum(serialize = "SIGN_MODE_DIRECT")]
    Direct = 1,
    /// Sorted, compact JSON document with decimal-string numbers
    #[strum(serialize = "SIGN_MODE_LEGACY_AMINO_JSON")]
    LegacyAminoJson = 127,
}

impl TryFrom<i32> for SignMode {
    type Error = TypesError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignMode::Unspecified),
            1 => Ok(SignMode::Direct),
            127 => Ok(SignMode::LegacyAminoJson),
            other => Err(TypesError::UnknownSignMode(other)),
        }
    }
}

/// A signature from a single key, together with the mode its sign bytes were built in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleSignatureData {
    pub mode: SignMode,
    pub signature: Vec<u8>,
}

/// Signatures contributed towards a multisig key.
///
/// `signatures` holds one entry per set bit of `bitset`, ordered by member index: the
/// `k`-th signature belongs to the `k`-th set bit in bit-scan order.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiSignatureData {
    /// Members that contributed a signature
    pub bitset: PresenceBitSet,
    /// Contributed signatures, in bit-scan order
    pub signatures: Vec<SignatureData>,
}

impl MultiSignatureData {
    /// Creates an empty aggregate for a key with `size` members.
    pub fn new(size: usize) -> Self {
        Self {
            bitset: PresenceBitSet::new(size),
            signatures: Vec::new(),
        }
    }

    /// Creates an aggregate, checking that every set bit has exactly one signature.
    pub fn from_parts(
        bitset: PresenceBitSet,
        signatures: Vec<SignatureData>,
    ) -> Result<Self, TypesError> {
        let data = Self { bitset, signatures };
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.bitset.count() != self.signatures.len() {
            return Err(TypesError::SignatureCountMismatch {
                set_bits: self.bitset.count(),
                signatures: self.signatures.len(),
            });
        }
        Ok(())
    }

    /// Pairs each signature with the member index it was contributed by.
    pub fn signatures_by_index(&self) -> Result<Vec<(usize, &SignatureData)>, TypesError> {
        self.validate()?;
        Ok(self.bitset.iter().zip(self.signatures.iter()).collect())
    }

    /// Returns a new aggregate with `signature` recorded for member `index`.
    ///
    /// `self` is left untouched, so a rejected addition never corrupts an in-progress
    /// aggregate.
    pub fn with_signature(
        &self,
        index: usize,
        signature: SignatureData,
    ) -> Result<Self, TypesError> {
        self.validate()?;
        let mut next = self.clone();
        next.bitset.insert(index)?;
        let position = next.bitset.rank(index);
        next.signatures.insert(position, signature);
        Ok(next)
    }

    /// Unions two partial aggregates for the same key.
    ///
    /// Fails if the aggregates describe keys of different sizes or if any member appears
    /// in both. The result is independent of which side collected which signature.
    pub fn merge(&self, other: &Self) -> Result<Self, TypesError> {
        if self.bitset.size() != other.bitset.size() {
            return Err(TypesError::BitsetSizeMismatch {
                expected: self.bitset.size(),
                actual: other.bitset.size(),
            });
        }
        other
            .signatures_by_index()?
            .into_iter()
            .try_fold(self.clone(), |merged, (index, signature)| {
                merged.with_signature(index, signature.clone())
            })
    }
}

/// Signature material supplied for a public key.
#[derive(Clone, Debug, PartialEq)]
pub enum SignatureData {
    Single(SingleSignatureData),
    Multi(MultiSignatureData),
}

impl SignatureData {
    pub fn single(mode: SignMode, signature: impl Into<Vec<u8>>) -> Self {
        SignatureData::Single(SingleSignatureData {
            mode,
            signature: signature.into(),
        })
    }

    /// Short name of the variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            SignatureData::Single(_) => "single",
            SignatureData::Multi(_) => "multi",
        }
    }

    pub fn to_proto(&self) -> proto::SignatureDescriptorData {
        let sum = match self {
            SignatureData::Single(single) => wire::Sum::Single(wire::Single {
                mode: single.mode as i32,
                signature: single.signature.clone(),
            }),
            SignatureData::Multi(multi) => wire::Sum::Multi(wire::Multi {
                bitarray: Some(multi.bitset.to_compact()),
                signatures: multi.signatures.iter().map(Self::to_proto).collect(),
            }),
        };
        proto::SignatureDescriptorData { sum: Some(sum) }
    }

    pub fn from_proto(data: &proto::SignatureDescriptorData) -> Result<Self, TypesError> {
        match data.sum.as_ref().ok_or(TypesError::MissingField("sum"))? {
            wire::Sum::Single(single) => Ok(SignatureData::Single(SingleSignatureData {
                mode: SignMode::try_from(single.mode)?,
                signature: single.signature.clone(),
            })),
            wire::Sum::Multi(multi) => {
                let bitarray = multi
                    .bitarray
                    .as_ref()
                    .ok_or(TypesError::MissingField("bitarray"))?;
                let signatures = multi
                    .signatures
                    .iter()
                    .map(Self::from_proto)
                    .collect::<Result<Vec<_>, _>>()?;
                MultiSignatureData::from_parts(PresenceBitSet::from_compact(bitarray)?, signatures)
                    .map(SignatureData::Multi)
            }
        }
    }

    /// Serializes the signature data for exchange between co-signers.
    pub fn encode(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TypesError> {
        Self::from_proto(&proto::SignatureDescriptorData::decode(bytes)?)
    }
}
