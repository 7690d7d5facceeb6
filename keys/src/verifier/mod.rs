// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use thiserror::Error;
use txauth_types::api::Verifier;
use txauth_types::{KeyAlgorithm, SingleKey};

use crate::bls::BlsVerifier;
use crate::{ed25519, secp256k1};


#[derive(Error, Debug, PartialEq)]
pub enum KeyError {
    #[error("invalid {algorithm} public key length: expected {expected} bytes, got {actual}")]
    InvalidPublicKeyLength {
        algorithm: KeyAlgorithm,
        expected: usize,
        actual: usize,
    },
    #[error("failed to deserialize {algorithm} public key: {reason}")]
    PublicKeyDeserialization {
        algorithm: KeyAlgorithm,
        reason: String,
    },
    #[error("invalid {algorithm} signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength {
        algorithm: KeyAlgorithm,
        expected: usize,
        actual: usize,
    },
    #[error("failed to deserialize {algorithm} signature: {reason}")]
    SignatureDeserialization {
        algorithm: KeyAlgorithm,
        reason: String,
    },
    #[error("{0} signature is not in low-S form")]
    NonCanonicalSignature(KeyAlgorithm),
    #[error("{0} signature verification failed")]
    SignatureVerificationFailed(KeyAlgorithm),
}

impl KeyError {
    pub(crate) fn public_key(algorithm: KeyAlgorithm, err: impl Display) -> Self {
        KeyError::PublicKeyDeserialization {
            algorithm,
            reason: err.to_string(),
        }
    }

    pub(crate) fn signature(algorithm: KeyAlgorithm, err: impl Display) -> Self {
        KeyError::SignatureDeserialization {
            algorithm,
            reason: err.to_string(),
        }
    }
}

/// Verifier for every supported single-key algorithm.
///
/// The algorithm is taken from the key; nothing is assumed. Verification is safe for
/// concurrent use: the only shared state is the BLS decoded-key cache.
#[derive(Default)]
pub struct KeyVerifier {
    bls: BlsVerifier,
}

impl KeyVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for KeyVerifier {
    type Error = KeyError;

    fn verify(&self, pub_key: &SingleKey, msg: &[u8], sig: &[u8]) -> Result<(), Self::Error> {
        let result = match pub_key.algorithm {
            KeyAlgorithm::Secp256k1 => secp256k1::verify(&pub_key.bytes, msg, sig),
            KeyAlgorithm::Ed25519 => ed25519::verify(&pub_key.bytes, msg, sig),
            KeyAlgorithm::Bls12381 => self.bls.verify(&pub_key.bytes, msg, sig),
        };
        if let Err(err) = &result {
            tracing::trace!(algorithm = %pub_key.algorithm, %err, "invalid signature");
        }
        result
    }
}
