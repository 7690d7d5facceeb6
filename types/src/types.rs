// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;

use crate::PublicKey;

/// Length in bytes of an account address.
pub const ADDRESS_LENGTH: usize = 20;

/// `Address` is the 20-byte account identity derived from a public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Snapshot of the signer's on-chain context, taken at verification time.
///
/// `account_number` and `sequence` must match the account state at the height being
/// validated. Supplying a fresh snapshot is the caller's responsibility; sign bytes built
/// from stale counters simply fail to verify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerData {
    /// Address of the signing account
    pub address: String,
    /// Chain the transaction is bound to
    pub chain_id: String,
    /// Account number assigned at account creation
    pub account_number: u64,
    /// Number of transactions the account has committed so far
    pub sequence: u64,
    /// Public key registered for the account
    pub pub_key: PublicKey,
}

impl SignerData {
    /// Creates signer data whose address is derived from `pub_key`.
    pub fn new(
        chain_id: impl Into<String>,
        account_number: u64,
        sequence: u64,
        pub_key: PublicKey,
    ) -> Self {
        Self {
            address: pub_key.address().to_string(),
            chain_id: chain_id.into(),
            account_number,
            sequence,
            pub_key,
        }
    }
}
