// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::borrow::Cow;

use thiserror::Error;
use txauth_types::{SignMode, TypesError};

#[derive(Error, Debug, PartialEq)]
pub enum VerificationError {
    /// Error when a message or field cannot be canonically serialized.
    #[error("failed to encode sign bytes: {0}")]
    Encoding(Cow<'static, str>),

    /// Error when the transaction cannot be signed at all, e.g. it carries no messages.
    #[error("invalid transaction: {0}")]
    InvalidTx(Cow<'static, str>),

    /// Error when the declared sign mode is not in the registry's allow-list.
    #[error("sign mode {0} is not enabled")]
    UnsupportedMode(SignMode),

    /// Error when key and signature data variants do not pair up.
    #[error("{key} public key cannot be verified against {signature} signature data")]
    UnsupportedKeyVariant {
        key: &'static str,
        signature: &'static str,
    },

    /// Error when the cryptographic check fails, including malformed signature bytes.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// Error when a multisig carries fewer valid signatures than its threshold.
    #[error("multisig threshold not met: {valid} valid signatures, {threshold} required")]
    ThresholdNotMet { threshold: u32, valid: usize },

    /// Error when a signature is added for a key outside the multisig's member set.
    #[error("public key is not a member of the multisig")]
    NotAMember,

    /// Error when a member's signature is added twice.
    #[error("member {0} has already contributed a signature")]
    DuplicateSignature(usize),

    /// Error when the presence bitset does not cover exactly the multisig's members.
    #[error("presence bitset covers {actual} members, multisig key has {expected}")]
    BitsetSizeMismatch { expected: usize, actual: usize },

    /// Error when signature data violates its own structural invariants.
    #[error("malformed signature data: {0}")]
    MalformedSignatureData(TypesError),

    /// Error when the caller cancelled verification.
    #[error("verification cancelled")]
    Cancelled,

    /// Error when a registry is built from an unusable configuration.
    #[error("invalid sign mode configuration: {0}")]
    InvalidConfig(Cow<'static, str>),
}

impl VerificationError {
    /// Only an under-signed multisig may succeed when resubmitted with more signatures.
    /// Every other outcome is deterministic for the same inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerificationError::ThresholdNotMet { .. })
    }
}

impl From<TypesError> for VerificationError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::DuplicateSignature(index) => VerificationError::DuplicateSignature(index),
            TypesError::BitsetSizeMismatch { expected, actual } => {
                VerificationError::BitsetSizeMismatch { expected, actual }
            }
            TypesError::Encoding(reason) => VerificationError::Encoding(reason),
            other => VerificationError::MalformedSignatureData(other),
        }
    }
}
