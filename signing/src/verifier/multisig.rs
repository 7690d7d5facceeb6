// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt::Display;

use rayon::prelude::*;
use txauth_types::api::Verifier;
use txauth_types::{MultiSignatureData, MultisigKey, SignatureData, SignerData, Tx};

use super::PubKeyVerifier;
use crate::VerificationError;
use crate::config::MultisigPolicy;
use crate::handler::SignModeHandlerRegistry;

impl<V> PubKeyVerifier<'_, V>
where
    V: Verifier + Sync,
    V::Error: Display,
{
    /// Verifies a multisig aggregate against its key.
    ///
    /// Signatures are consumed in bit-scan order: the `k`-th signature is checked against
    /// the member at the `k`-th set bit. Every entry is consumed before the threshold is
    /// compared with the number of valid signatures.
    pub(super) fn verify_multisig(
        &self,
        key: &MultisigKey,
        data: &MultiSignatureData,
        signer_data: &SignerData,
        registry: &SignModeHandlerRegistry,
        tx: &Tx,
    ) -> Result<(), VerificationError> {
        let members = key.members();
        if data.bitset.size() != members.len() {
            return Err(VerificationError::BitsetSizeMismatch {
                expected: members.len(),
                actual: data.bitset.size(),
            });
        }

        let entries = data.signatures_by_index().map_err(|err| {
            tracing::error!(
                %err,
                address = %signer_data.address,
                "malformed multisig signature data"
            );
            VerificationError::MalformedSignatureData(err)
        })?;

        let verify_member = |&(index, signature): &(usize, &SignatureData)| {
            self.check_cancelled()?;
            let result = self.verify(&members[index], signer_data, signature, registry, tx);
            tracing::trace!(
                member = index,
                valid = result.is_ok(),
                "multisig member verified"
            );
            result
        };

        let valid = match self.policy {
            MultisigPolicy::Strict => {
                if self.parallel {
                    entries
                        .par_iter()
                        .try_for_each(|entry| verify_member(entry).map_err(strict_failure))?;
                } else {
                    entries
                        .iter()
                        .try_for_each(|entry| verify_member(entry).map_err(strict_failure))?;
                }
                entries.len()
            }
            MultisigPolicy::Tolerant => {
                let results: Vec<_> = if self.parallel {
                    entries.par_iter().map(verify_member).collect()
                } else {
                    entries.iter().map(verify_member).collect()
                };

                let mut valid = 0;
                for result in results {
                    match result {
                        Ok(()) => valid += 1,
                        Err(err) if is_fatal(&err) => return Err(err),
                        Err(_) => {}
                    }
                }
                valid
            }
        };

        if valid < key.threshold() as usize {
            return Err(VerificationError::ThresholdNotMet {
                threshold: key.threshold(),
                valid,
            });
        }
        Ok(())
    }
}

/// Maps a member failure under the strict policy. Failures that concern the whole
/// verification rather than one member's signature keep their own error.
fn strict_failure(err: VerificationError) -> VerificationError {
    match err {
        VerificationError::Cancelled
        | VerificationError::UnsupportedMode(_)
        | VerificationError::Encoding(_)
        | VerificationError::InvalidTx(_) => err,
        _ => VerificationError::SignatureMismatch,
    }
}

/// Failures that abort verification under the tolerant policy.
fn is_fatal(err: &VerificationError) -> bool {
    matches!(
        err,
        VerificationError::Cancelled
            | VerificationError::Encoding(_)
            | VerificationError::InvalidTx(_)
    )
}
