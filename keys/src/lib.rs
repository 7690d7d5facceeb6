// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Single-key signature verification.
//!
//! This crate implements [`txauth_types::api::Verifier`] for every single-key algorithm a
//! [`txauth_types::PublicKey`] can carry:
//! - secp256k1 ECDSA over SHA-256 of the message, 33-byte compressed keys, 64-byte
//!   `r || s` signatures in low-S form
//! - Ed25519 with strict verification
//! - BLS over BLS12_381 with G1 public keys and G2 signatures, caching decoded keys

mod bls;
mod ed25519;
mod secp256k1;
#[cfg(feature = "test-utils")]
pub mod test_utils;
mod verifier;

pub use verifier::{KeyError, KeyVerifier};
