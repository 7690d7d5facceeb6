// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Signature, VerifyingKey};
use txauth_types::KeyAlgorithm;

use crate::KeyError;

/// Verifies an Ed25519 signature, rejecting weak keys and non-canonical encodings.
pub(crate) fn verify(pub_key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), KeyError> {
    let Ok(key_bytes) = <&[u8; PUBLIC_KEY_LENGTH]>::try_from(pub_key) else {
        return Err(KeyError::InvalidPublicKeyLength {
            algorithm: KeyAlgorithm::Ed25519,
            expected: PUBLIC_KEY_LENGTH,
            actual: pub_key.len(),
        });
    };
    let Ok(sig_bytes) = <&[u8; SIGNATURE_LENGTH]>::try_from(sig) else {
        return Err(KeyError::InvalidSignatureLength {
            algorithm: KeyAlgorithm::Ed25519,
            expected: SIGNATURE_LENGTH,
            actual: sig.len(),
        });
    };

    let verifying_key = VerifyingKey::from_bytes(key_bytes)
        .map_err(|err| KeyError::public_key(KeyAlgorithm::Ed25519, err))?;
    let signature = Signature::from_bytes(sig_bytes);

    verifying_key
        .verify_strict(msg, &signature)
        .map_err(|_| KeyError::SignatureVerificationFailed(KeyAlgorithm::Ed25519))
}
