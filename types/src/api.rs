// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::SingleKey;

/// Verifier trait for single-key signature verification
pub trait Verifier {
    /// Error type describing why a signature was rejected.
    type Error;

    /// Verifies a signature over `msg` for the given public key, using the algorithm
    /// carried on the key.
    ///
    /// This method must be safe for concurrent use.
    ///
    /// # Arguments
    /// * `pub_key` - The public key to verify against
    /// * `msg` - The message that was signed
    /// * `sig` - The signature to verify
    ///
    /// # Returns
    /// A Result indicating success or failure with an error message
    fn verify(&self, pub_key: &SingleKey, msg: &[u8], sig: &[u8]) -> Result<(), Self::Error>;
}
