// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Transaction signature verification and multisig aggregation.
//!
//! This crate decides whether signature data authorizes a transaction for an account,
//! given the signer's on-chain context. It provides:
//! - Canonical sign-bytes construction for each sign mode ([`DirectHandler`],
//!   [`LegacyAminoJsonHandler`])
//! - An allow-list of enabled sign modes ([`SignModeHandlerRegistry`])
//! - Verification over single and k-of-n multisig keys ([`PubKeyVerifier`])
//! - Incremental multisig aggregation for independent co-signers
//!   ([`add_signature_from_pub_key`], [`merge_signatures`])
//!
//! Verification performs no I/O. The registry is built once from a [`VerifierConfig`] and
//! shared across threads; every call receives it explicitly.

mod aggregate;
mod cancel;
mod config;
mod error;
mod handler;
mod verifier;

use std::sync::LazyLock;

use txauth_keys::KeyVerifier;
use txauth_types::{PublicKey, SignatureData, SignerData, Tx};

pub use aggregate::{add_signature_from_pub_key, merge_signatures};
pub use cancel::CancellationToken;
pub use config::{MultisigPolicy, VerifierConfig};
pub use error::VerificationError;
pub use handler::{
    DirectHandler, LegacyAminoJsonHandler, SignModeHandler, SignModeHandlerRegistry,
    build_sign_bytes, builtin_handler,
};
pub use verifier::PubKeyVerifier;

static KEY_VERIFIER: LazyLock<KeyVerifier> = LazyLock::new(KeyVerifier::new);

/// Verifies `signature_data` for `pub_key`, building sign bytes through `registry`.
///
/// Multisig keys are checked with the policy and evaluation mode the registry was
/// configured with. Hosts needing cancellation build a [`PubKeyVerifier`] instead.
pub fn verify_transaction_signature(
    pub_key: &PublicKey,
    signer_data: &SignerData,
    signature_data: &SignatureData,
    registry: &SignModeHandlerRegistry,
    tx: &Tx,
) -> Result<(), VerificationError> {
    PubKeyVerifier::new(&*KEY_VERIFIER)
        .with_policy(registry.multisig_policy())
        .with_parallel(registry.parallel_multisig())
        .verify(pub_key, signer_data, signature_data, registry, tx)
        .inspect_err(|err| {
            tracing::debug!(
                address = %signer_data.address,
                account_number = signer_data.account_number,
                sequence = signer_data.sequence,
                %err,
                "signature verification rejected"
            );
        })
}
