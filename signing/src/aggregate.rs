// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Incremental construction of multisig aggregates by independent co-signers.
//!
//! Every operation returns a new aggregate. An aggregate passed in is never modified, so
//! a rejected addition leaves the caller's partial aggregate intact.

use txauth_types::{MultiSignatureData, PublicKey, SignatureData};

use crate::VerificationError;

/// Records `signature` as the contribution of `member` to a multisig over `all_members`.
///
/// The member is located by exact key equality. The signature is inserted so that
/// signature order matches bit-scan order, whatever order co-signers contribute in.
pub fn add_signature_from_pub_key(
    aggregate: &MultiSignatureData,
    signature: SignatureData,
    member: &PublicKey,
    all_members: &[PublicKey],
) -> Result<MultiSignatureData, VerificationError> {
    let index = all_members
        .iter()
        .position(|candidate| candidate == member)
        .ok_or(VerificationError::NotAMember)?;

    if aggregate.bitset.size() != all_members.len() {
        return Err(VerificationError::BitsetSizeMismatch {
            expected: all_members.len(),
            actual: aggregate.bitset.size(),
        });
    }

    let next = aggregate.with_signature(index, signature)?;
    tracing::trace!(
        member = index,
        signatures = next.signatures.len(),
        "added multisig signature"
    );
    Ok(next)
}

/// Unions two partial aggregates collected for the same key.
///
/// Fails with [`VerificationError::DuplicateSignature`] if a member signed in both.
pub fn merge_signatures(
    left: &MultiSignatureData,
    right: &MultiSignatureData,
) -> Result<MultiSignatureData, VerificationError> {
    Ok(left.merge(right)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use txauth_types::{KeyAlgorithm, SignMode};

    fn members() -> Vec<PublicKey> {
        (1..=3)
            .map(|byte| PublicKey::single(KeyAlgorithm::Ed25519, vec![byte; 32]))
            .collect()
    }

    fn sig(byte: u8) -> SignatureData {
        SignatureData::single(SignMode::Direct, vec![byte; 64])
    }

    #[test]
    fn test_add_in_any_order() {
        let members = members();
        let empty = MultiSignatureData::new(members.len());

        let forward = add_signature_from_pub_key(&empty, sig(0), &members[0], &members).unwrap();
        let forward = add_signature_from_pub_key(&forward, sig(2), &members[2], &members).unwrap();

        let reverse = add_signature_from_pub_key(&empty, sig(2), &members[2], &members).unwrap();
        let reverse = add_signature_from_pub_key(&reverse, sig(0), &members[0], &members).unwrap();

        assert_eq!(forward, reverse);
        assert_eq!(forward.signatures, vec![sig(0), sig(2)]);
        assert_eq!(forward.bitset.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_not_a_member() {
        let members = members();
        let outsider = PublicKey::single(KeyAlgorithm::Ed25519, vec![9; 32]);
        let empty = MultiSignatureData::new(members.len());

        assert_eq!(
            add_signature_from_pub_key(&empty, sig(9), &outsider, &members),
            Err(VerificationError::NotAMember)
        );

        // Same bytes under another algorithm are a different key.
        let lookalike = PublicKey::single(KeyAlgorithm::Secp256k1, vec![1; 32]);
        assert_eq!(
            add_signature_from_pub_key(&empty, sig(1), &lookalike, &members),
            Err(VerificationError::NotAMember)
        );
    }

    #[test]
    fn test_duplicate_leaves_aggregate_untouched() {
        let members = members();
        let empty = MultiSignatureData::new(members.len());
        let partial = add_signature_from_pub_key(&empty, sig(1), &members[1], &members).unwrap();
        let before = partial.clone();

        assert_eq!(
            add_signature_from_pub_key(&partial, sig(7), &members[1], &members),
            Err(VerificationError::DuplicateSignature(1))
        );
        assert_eq!(partial, before);
    }

    #[test]
    fn test_size_mismatch() {
        let members = members();
        let wrong_size = MultiSignatureData::new(members.len() + 1);
        assert_eq!(
            add_signature_from_pub_key(&wrong_size, sig(0), &members[0], &members),
            Err(VerificationError::BitsetSizeMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_merge_partial_aggregates() {
        let members = members();
        let empty = MultiSignatureData::new(members.len());
        let left = add_signature_from_pub_key(&empty, sig(2), &members[2], &members).unwrap();
        let right = add_signature_from_pub_key(&empty, sig(0), &members[0], &members).unwrap();

        let merged = merge_signatures(&left, &right).unwrap();
        assert_eq!(merged, merge_signatures(&right, &left).unwrap());
        assert_eq!(merged.signatures, vec![sig(0), sig(2)]);

        assert_eq!(
            merge_signatures(&merged, &left),
            Err(VerificationError::DuplicateSignature(2))
        );
    }
}
