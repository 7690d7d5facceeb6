// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use k256::ecdsa::signature::Verifier as _;
use k256::ecdsa::{Signature, VerifyingKey};
use txauth_types::KeyAlgorithm;

use crate::KeyError;

/// Compressed SEC1 public key length in bytes
pub const SECP256K1_PUBLIC_KEY_LENGTH: usize = 33;

/// Fixed-width `r || s` signature length in bytes
pub const SECP256K1_SIGNATURE_LENGTH: usize = 64;

/// Verifies an ECDSA signature over `SHA256(msg)`.
///
/// High-S signatures are rejected so that a valid signature has exactly one encoding.
pub(crate) fn verify(pub_key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), KeyError> {
    if pub_key.len() != SECP256K1_PUBLIC_KEY_LENGTH {
        return Err(KeyError::InvalidPublicKeyLength {
            algorithm: KeyAlgorithm::Secp256k1,
            expected: SECP256K1_PUBLIC_KEY_LENGTH,
            actual: pub_key.len(),
        });
    }
    if sig.len() != SECP256K1_SIGNATURE_LENGTH {
        return Err(KeyError::InvalidSignatureLength {
            algorithm: KeyAlgorithm::Secp256k1,
            expected: SECP256K1_SIGNATURE_LENGTH,
            actual: sig.len(),
        });
    }

    let verifying_key = VerifyingKey::from_sec1_bytes(pub_key)
        .map_err(|err| KeyError::public_key(KeyAlgorithm::Secp256k1, err))?;
    let signature = Signature::from_slice(sig)
        .map_err(|err| KeyError::signature(KeyAlgorithm::Secp256k1, err))?;

    // `normalize_s` only returns a value when `s` was in the upper half of the order.
    if signature.normalize_s().is_some() {
        return Err(KeyError::NonCanonicalSignature(KeyAlgorithm::Secp256k1));
    }

    verifying_key
        .verify(msg, &signature)
        .map_err(|_| KeyError::SignatureVerificationFailed(KeyAlgorithm::Secp256k1))
}
