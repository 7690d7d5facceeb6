// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use bls_signatures::{PublicKey, Serialize, Signature, verify_messages};
use hashlink::LruCache;
use parking_lot::RwLock;
use txauth_types::KeyAlgorithm;

use crate::KeyError;

/// BLS12-381 public key length in bytes
pub const BLS_PUBLIC_KEY_LENGTH: usize = 48;

/// BLS12-381 signature length in bytes
pub const BLS_SIGNATURE_LENGTH: usize = 96;

/// Maximum number of cached public key points to prevent excessive memory usage
const MAX_POINT_CACHE_SIZE: usize = 10_000;

const ALGORITHM: KeyAlgorithm = KeyAlgorithm::Bls12381;

/// BLS signature verifier
///
/// - BLS12_381 curve
/// - G1 for public keys, G2 for signatures
pub(crate) struct BlsVerifier {
    /// Cache for deserialized public key points to avoid expensive repeated operations
    point_cache: RwLock<LruCache<Vec<u8>, PublicKey>>,
}

impl Default for BlsVerifier {
    fn default() -> Self {
        Self {
            point_cache: RwLock::new(LruCache::new(MAX_POINT_CACHE_SIZE)),
        }
    }
}

impl BlsVerifier {
    /// Verifies a single BLS signature
    pub(crate) fn verify(&self, pub_key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), KeyError> {
        if pub_key.len() != BLS_PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKeyLength {
                algorithm: ALGORITHM,
                expected: BLS_PUBLIC_KEY_LENGTH,
                actual: pub_key.len(),
            });
        }
        if sig.len() != BLS_SIGNATURE_LENGTH {
            return Err(KeyError::InvalidSignatureLength {
                algorithm: ALGORITHM,
                expected: BLS_SIGNATURE_LENGTH,
                actual: sig.len(),
            });
        }

        let pub_key = self.get_or_cache_public_key(pub_key)?;
        let signature = Signature::from_bytes(sig)
            .map_err(|err| KeyError::signature(ALGORITHM, err))?;

        match verify_messages(&signature, &[msg], &[pub_key]) {
            true => Ok(()),
            false => Err(KeyError::SignatureVerificationFailed(ALGORITHM)),
        }
    }

    /// Gets a cached public key or deserializes and caches it
    fn get_or_cache_public_key(&self, pub_key: &[u8]) -> Result<PublicKey, KeyError> {
        if let Some(cached) = self.point_cache.write().get(pub_key) {
            return Ok(*cached);
        }

        let typed_pub_key = PublicKey::from_bytes(pub_key)
            .map_err(|err| KeyError::public_key(ALGORITHM, err))?;
        self.point_cache
            .write()
            .insert(pub_key.to_vec(), typed_pub_key);
        Ok(typed_pub_key)
    }

    #[cfg(test)]
    pub(crate) fn cached_keys(&self) -> usize {
        self.point_cache.read().len()
    }
}
