// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Sign-bytes construction and the sign-mode handler registry.

mod direct;
mod legacy;

use std::sync::Arc;

use ahash::HashMap;
use txauth_types::{SignMode, SignerData, Tx};

use crate::VerificationError;
use crate::config::{MultisigPolicy, VerifierConfig};

pub use direct::DirectHandler;
pub use legacy::LegacyAminoJsonHandler;

/// Builds the canonical bytes a signature covers, for one sign mode.
///
/// Handlers are stateless pure functions of their inputs: identical inputs always
/// produce identical bytes, on any machine.
pub trait SignModeHandler: Send + Sync {
    /// The mode this handler builds sign bytes for.
    fn mode(&self) -> SignMode;

    /// Builds the sign bytes for `tx` as signed by `signer_data`.
    fn sign_bytes(&self, signer_data: &SignerData, tx: &Tx) -> Result<Vec<u8>, VerificationError>;
}

/// Returns the built-in handler for `mode`, if there is one.
pub fn builtin_handler(mode: SignMode) -> Option<Arc<dyn SignModeHandler>> {
    match mode {
        SignMode::Direct => Some(Arc::new(DirectHandler)),
        SignMode::LegacyAminoJson => Some(Arc::new(LegacyAminoJsonHandler)),
        SignMode::Unspecified => None,
    }
}

/// Builds sign bytes with the built-in handler for `mode`.
///
/// This is what a signer calls; it ignores any allow-list. Verifiers go through a
/// [`SignModeHandlerRegistry`] instead.
pub fn build_sign_bytes(
    mode: SignMode,
    signer_data: &SignerData,
    tx: &Tx,
) -> Result<Vec<u8>, VerificationError> {
    builtin_handler(mode)
        .ok_or(VerificationError::UnsupportedMode(mode))?
        .sign_bytes(signer_data, tx)
}

/// Fails with [`VerificationError::InvalidTx`] when `tx` has nothing to sign.
pub(crate) fn ensure_messages(tx: &Tx) -> Result<(), VerificationError> {
    if tx.messages.is_empty() {
        return Err(VerificationError::InvalidTx(
            "transaction has no messages".into(),
        ));
    }
    Ok(())
}

/// Allow-list of sign modes and the handlers that serve them.
///
/// Built once at start-up and never mutated afterwards, so a single instance can be
/// shared by any number of verifying threads without locking. A signature whose mode
/// is absent here is rejected even when a handler for it exists elsewhere.
///
/// The registry also carries the configured multisig policy and evaluation mode, which
/// [`crate::verify_transaction_signature`] applies.
#[derive(Clone)]
pub struct SignModeHandlerRegistry {
    handlers: HashMap<SignMode, Arc<dyn SignModeHandler>>,
    multisig_policy: MultisigPolicy,
    parallel_multisig: bool,
}

impl SignModeHandlerRegistry {
    /// Creates a registry from explicit handlers, with the strict multisig policy and
    /// sequential evaluation.
    pub fn new(
        handlers: impl IntoIterator<Item = Arc<dyn SignModeHandler>>,
    ) -> Result<Self, VerificationError> {
        let mut registered = HashMap::default();
        for handler in handlers {
            let mode = handler.mode();
            if mode == SignMode::Unspecified {
                return Err(VerificationError::InvalidConfig(
                    format!("{mode} cannot be enabled").into(),
                ));
            }
            if registered.insert(mode, handler).is_some() {
                return Err(VerificationError::InvalidConfig(
                    format!("{mode} registered twice").into(),
                ));
            }
        }

        if registered.is_empty() {
            return Err(VerificationError::InvalidConfig(
                "no sign modes enabled".into(),
            ));
        }
        Ok(Self {
            handlers: registered,
            multisig_policy: MultisigPolicy::default(),
            parallel_multisig: false,
        })
    }

    /// Creates a registry holding the built-in handlers for the configured modes, along
    /// with the configured multisig policy and evaluation mode.
    pub fn from_config(config: &VerifierConfig) -> Result<Self, VerificationError> {
        let handlers = config
            .enabled_sign_modes
            .iter()
            .map(|&mode| {
                builtin_handler(mode).ok_or_else(|| {
                    VerificationError::InvalidConfig(format!("no handler for {mode}").into())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            multisig_policy: config.multisig_policy,
            parallel_multisig: config.parallel_multisig,
            ..Self::new(handlers)?
        })
    }

    pub fn multisig_policy(&self) -> MultisigPolicy {
        self.multisig_policy
    }

    pub fn parallel_multisig(&self) -> bool {
        self.parallel_multisig
    }

    /// Enabled modes, in ascending identifier order.
    pub fn modes(&self) -> Vec<SignMode> {
        let mut modes: Vec<_> = self.handlers.keys().copied().collect();
        modes.sort();
        modes
    }

    pub fn get_handler(&self, mode: SignMode) -> Result<&dyn SignModeHandler, VerificationError> {
        self.handlers
            .get(&mode)
            .map(|handler| handler.as_ref())
            .ok_or(VerificationError::UnsupportedMode(mode))
    }

    /// Builds sign bytes for `mode`, provided the mode is enabled.
    pub fn sign_bytes(
        &self,
        mode: SignMode,
        signer_data: &SignerData,
        tx: &Tx,
    ) -> Result<Vec<u8>, VerificationError> {
        let bytes = self.get_handler(mode)?.sign_bytes(signer_data, tx)?;
        tracing::trace!(%mode, len = bytes.len(), "built sign bytes");
        Ok(bytes)
    }
}

impl Default for SignModeHandlerRegistry {
    fn default() -> Self {
        Self {
            handlers: [SignMode::Direct, SignMode::LegacyAminoJson]
                .into_iter()
                .filter_map(|mode| builtin_handler(mode).map(|handler| (mode, handler)))
                .collect(),
            multisig_policy: MultisigPolicy::default(),
            parallel_multisig: false,
        }
    }
}

impl std::fmt::Debug for SignModeHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignModeHandlerRegistry")
            .field("modes", &self.modes())
            .field("multisig_policy", &self.multisig_policy)
            .field("parallel_multisig", &self.parallel_multisig)
            .finish()
    }
}
