// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Core types for transaction signature verification.
//!
//! This crate provides the data model shared by signers and verifiers, including:
//! - Public keys, both single keys and k-of-n threshold (multisig) keys
//! - Signature data, both single signatures and multisig aggregates
//! - The presence bitset recording which multisig members signed
//! - Sign modes and the per-verification [`SignerData`] snapshot
//! - The transaction fields covered by a signature ([`Tx`], [`Fee`], [`Msg`])
//!
//! Key components:
//! - [`PublicKey`]: Sum type over [`SingleKey`] and [`MultisigKey`]
//! - [`SignatureData`]: Sum type over [`SingleSignatureData`] and [`MultiSignatureData`]
//! - [`PresenceBitSet`]: Compact record of contributing multisig members
//! - [`api::Verifier`]: The seam behind which per-algorithm cryptography lives
//!
//! The [`proto`] module holds the protobuf wire structures used for the
//! structured sign-bytes layout and for exchanging signature data between
//! co-signers.

pub mod api;
mod bitset;
mod error;
mod keys;
pub mod legacy;
pub mod proto;
mod signature;
#[cfg(feature = "test-utils")]
pub mod test_utils;
mod tx;
mod types;

pub use bitset::PresenceBitSet;
pub use error::TypesError;
pub use keys::{KeyAlgorithm, MultisigKey, PublicKey, SingleKey};
pub use signature::{MultiSignatureData, SignMode, SignatureData, SingleSignatureData};
pub use tx::{Coin, Fee, Msg, Tx};
pub use types::{Address, SignerData};

// re-exports
pub use fvm_ipld_bitfield::BitField;
