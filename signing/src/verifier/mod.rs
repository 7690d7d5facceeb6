// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod multisig;

use std::fmt::Display;

use txauth_types::api::Verifier;
use txauth_types::{PublicKey, SignatureData, SignerData, SingleKey, SingleSignatureData, Tx};

use crate::VerificationError;
use crate::cancel::CancellationToken;
use crate::config::{MultisigPolicy, VerifierConfig};
use crate::handler::SignModeHandlerRegistry;

/// Verifies signature data against a public key of either variant.
///
/// Cryptography is delegated to `backend`, which sees only single keys. Multisig keys are
/// resolved here by walking the presence bitset and recursing into each member, so
/// nested multisigs are verified the same way as top-level ones.
pub struct PubKeyVerifier<'a, V> {
    backend: &'a V,
    policy: MultisigPolicy,
    parallel: bool,
    cancellation: Option<CancellationToken>,
}

impl<'a, V> PubKeyVerifier<'a, V>
where
    V: Verifier + Sync,
    V::Error: Display,
{
    /// Creates a verifier with the strict multisig policy and sequential evaluation.
    pub fn new(backend: &'a V) -> Self {
        Self {
            backend,
            policy: MultisigPolicy::default(),
            parallel: false,
            cancellation: None,
        }
    }

    pub fn from_config(backend: &'a V, config: &VerifierConfig) -> Self {
        Self::new(backend)
            .with_policy(config.multisig_policy)
            .with_parallel(config.parallel_multisig)
    }

    pub fn with_policy(mut self, policy: MultisigPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Evaluates multisig member signatures on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Aborts verification with [`VerificationError::Cancelled`] once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Checks that `signature_data` authorizes `tx` for `pub_key` in the context of
    /// `signer_data`.
    ///
    /// Sign bytes are rebuilt through `registry`, so a signature whose mode is not enabled
    /// there is rejected with [`VerificationError::UnsupportedMode`].
    pub fn verify(
        &self,
        pub_key: &PublicKey,
        signer_data: &SignerData,
        signature_data: &SignatureData,
        registry: &SignModeHandlerRegistry,
        tx: &Tx,
    ) -> Result<(), VerificationError> {
        self.check_cancelled()?;
        match (pub_key, signature_data) {
            (PublicKey::Single(key), SignatureData::Single(sig)) => {
                self.verify_single(key, sig, signer_data, registry, tx)
            }
            (PublicKey::Multisig(key), SignatureData::Multi(sig)) => {
                self.verify_multisig(key, sig, signer_data, registry, tx)
            }
            (key, sig) => Err(VerificationError::UnsupportedKeyVariant {
                key: key.variant_name(),
                signature: sig.variant_name(),
            }),
        }
    }

    fn verify_single(
        &self,
        key: &SingleKey,
        sig: &SingleSignatureData,
        signer_data: &SignerData,
        registry: &SignModeHandlerRegistry,
        tx: &Tx,
    ) -> Result<(), VerificationError> {
        let sign_bytes = registry.sign_bytes(sig.mode, signer_data, tx)?;
        self.backend
            .verify(key, &sign_bytes, &sig.signature)
            .map_err(|err| {
                tracing::trace!(
                    algorithm = %key.algorithm,
                    mode = %sig.mode,
                    %err,
                    "signature rejected"
                );
                VerificationError::SignatureMismatch
            })
    }

    fn check_cancelled(&self) -> Result<(), VerificationError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(VerificationError::Cancelled),
            _ => Ok(()),
        }
    }
}
