// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::borrow::Cow;

use thiserror::Error;

use crate::SignMode;

#[derive(Error, Debug, PartialEq)]
pub enum TypesError {
    /// Error when a multisig key is created with a zero threshold.
    #[error("multisig threshold must be at least 1")]
    ZeroThreshold,

    /// Error when a multisig threshold can never be reached.
    #[error("multisig threshold {threshold} exceeds member count {members}")]
    ThresholdTooHigh { threshold: u32, members: usize },

    /// Error when the number of set presence bits disagrees with the number of signatures.
    #[error("presence bitset has {set_bits} set bits but {signatures} signatures are present")]
    SignatureCountMismatch { set_bits: usize, signatures: usize },

    /// Error when a member index falls outside the presence bitset.
    #[error("member index {index} out of range for bitset of size {size}")]
    BitIndexOutOfRange { index: usize, size: usize },

    /// Error when a member's presence bit is already set.
    #[error("member {0} has already contributed a signature")]
    DuplicateSignature(usize),

    /// Error when two bitsets that must describe the same key differ in size.
    #[error("bitset size mismatch: expected {expected}, got {actual}")]
    BitsetSizeMismatch { expected: usize, actual: usize },

    /// Error when key and signature data are not both single or both multisig.
    #[error("{key} public key cannot carry {signature} signature data")]
    VariantMismatch {
        key: &'static str,
        signature: &'static str,
    },

    /// Error when a wire public key carries an unrecognized type URL.
    #[error("unknown public key type: {0}")]
    UnknownKeyType(String),

    /// Error when a wire sign mode is not one of the known identifiers.
    #[error("unknown sign mode: {0}")]
    UnknownSignMode(i32),

    /// Error when a compact bit array is internally inconsistent.
    #[error("malformed compact bit array: {0}")]
    MalformedBitArray(Cow<'static, str>),

    /// Error when a required wire field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Error when protobuf decoding fails.
    #[error("protobuf decoding error: {0}")]
    Decode(String),

    /// Error when a message cannot be canonically serialized.
    #[error("encoding error: {0}")]
    Encoding(Cow<'static, str>),

    /// Error when a legacy signature is requested for non-legacy signature data.
    #[error("legacy signatures require SIGN_MODE_LEGACY_AMINO_JSON, got {0}")]
    NotLegacyMode(SignMode),
}

impl From<prost::DecodeError> for TypesError {
    fn from(err: prost::DecodeError) -> Self {
        TypesError::Decode(err.to_string())
    }
}
