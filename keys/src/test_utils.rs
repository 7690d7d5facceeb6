// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use bls_signatures::Serialize;
use ed25519_dalek::Signer as _;
use rand::rngs::OsRng;
use txauth_types::{KeyAlgorithm, PublicKey};

/// Signer implementation for testing, one variant per supported algorithm
pub enum TestSigner {
    Secp256k1(k256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
    Bls(bls_signatures::PrivateKey),
}

impl TestSigner {
    /// Generates a fresh random key pair for `algorithm`.
    pub fn generate(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::Secp256k1 => {
                TestSigner::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng))
            }
            KeyAlgorithm::Ed25519 => {
                TestSigner::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
            }
            KeyAlgorithm::Bls12381 => {
                TestSigner::Bls(bls_signatures::PrivateKey::generate(&mut rand::thread_rng()))
            }
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            TestSigner::Secp256k1(_) => KeyAlgorithm::Secp256k1,
            TestSigner::Ed25519(_) => KeyAlgorithm::Ed25519,
            TestSigner::Bls(_) => KeyAlgorithm::Bls12381,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        let bytes = match self {
            TestSigner::Secp256k1(key) => key
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
            TestSigner::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            TestSigner::Bls(key) => key.public_key().as_bytes(),
        };
        PublicKey::single(self.algorithm(), bytes)
    }

    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        match self {
            TestSigner::Secp256k1(key) => {
                let signature: k256::ecdsa::Signature = key.sign(msg);
                signature.to_bytes().to_vec()
            }
            TestSigner::Ed25519(key) => key.sign(msg).to_bytes().to_vec(),
            TestSigner::Bls(key) => key.sign(msg).as_bytes(),
        }
    }
}
