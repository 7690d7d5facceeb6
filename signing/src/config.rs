// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use txauth_types::SignMode;

/// How a multisig treats invalid signatures from members marked present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultisigPolicy {
    /// Any invalid member signature rejects the whole multisig.
    #[default]
    Strict,
    /// Invalid member signatures are skipped; only the count of valid ones must reach
    /// the threshold.
    Tolerant,
}

/// Verification settings, fixed at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// Allow-list of sign modes. Signatures in any other mode are rejected.
    pub enabled_sign_modes: Vec<SignMode>,
    pub multisig_policy: MultisigPolicy,
    /// Verify multisig member signatures on the rayon thread pool.
    pub parallel_multisig: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            enabled_sign_modes: vec![SignMode::Direct, SignMode::LegacyAminoJson],
            multisig_policy: MultisigPolicy::Strict,
            parallel_multisig: false,
        }
    }
}
