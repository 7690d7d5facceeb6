// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_bitfield::BitField;

use crate::TypesError;
use crate::proto::CompactBitArray;

/// Records which members of a multisig key contributed a signature.
///
/// `size` is the member count of the key the bitset describes; bit `i` refers to member `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct PresenceBitSet {
    size: usize,
    bits: BitField,
}

impl PresenceBitSet {
    /// Creates an empty bitset for a key with `size` members.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            bits: BitField::new(),
        }
    }

    /// Number of members the bitset covers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.bits.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.size && self.bits.get(index as u64)
    }

    /// Sets the bit for member `index`.
    pub fn insert(&mut self, index: usize) -> Result<(), TypesError> {
        if index >= self.size {
            return Err(TypesError::BitIndexOutOfRange {
                index,
                size: self.size,
            });
        }
        if self.bits.get(index as u64) {
            return Err(TypesError::DuplicateSignature(index));
        }
        self.bits.set(index as u64);
        Ok(())
    }

    /// Set bits in ascending member order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().map(|bit| bit as usize)
    }

    /// Number of set bits strictly below `index`, i.e. the position a signature for
    /// member `index` occupies in bit-scan order.
    pub fn rank(&self, index: usize) -> usize {
        self.iter().take_while(|&bit| bit < index).count()
    }

    pub fn to_compact(&self) -> CompactBitArray {
        let mut elems = vec![0u8; self.size.div_ceil(8)];
        for index in self.iter() {
            elems[index / 8] |= 0x80 >> (index % 8);
        }
        CompactBitArray {
            extra_bits_stored: (self.size % 8) as u32,
            elems,
        }
    }

    pub fn from_compact(array: &CompactBitArray) -> Result<Self, TypesError> {
        let extra = array.extra_bits_stored as usize;
        if extra >= 8 {
            return Err(TypesError::MalformedBitArray(
                format!("extra bits stored must be below 8, got {extra}").into(),
            ));
        }
        let size = match extra {
            0 => array.elems.len() * 8,
            _ if array.elems.is_empty() => {
                return Err(TypesError::MalformedBitArray(
                    "extra bits stored without any element bytes".into(),
                ));
            }
            _ => (array.elems.len() - 1) * 8 + extra,
        };

        let mut bitset = Self::new(size);
        for (byte_index, byte) in array.elems.iter().enumerate() {
            for offset in 0..8 {
                if byte & (0x80 >> offset) == 0 {
                    continue;
                }
                let index = byte_index * 8 + offset;
                if index >= size {
                    return Err(TypesError::MalformedBitArray(
                        format!("bit {index} set beyond size {size}").into(),
                    ));
                }
                bitset.bits.set(index as u64);
            }
        }
        Ok(bitset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_rank() {
        let mut bitset = PresenceBitSet::new(5);
        bitset.insert(3).unwrap();
        bitset.insert(0).unwrap();
        bitset.insert(4).unwrap();

        assert_eq!(bitset.count(), 3);
        assert_eq!(bitset.iter().collect::<Vec<_>>(), vec![0, 3, 4]);
        assert_eq!(bitset.rank(0), 0);
        assert_eq!(bitset.rank(2), 1);
        assert_eq!(bitset.rank(4), 2);
        assert!(bitset.contains(3));
        assert!(!bitset.contains(1));
        assert!(!bitset.contains(9));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_out_of_range() {
        let mut bitset = PresenceBitSet::new(2);
        bitset.insert(1).unwrap();
        assert_eq!(bitset.insert(1), Err(TypesError::DuplicateSignature(1)));
        assert_eq!(
            bitset.insert(2),
            Err(TypesError::BitIndexOutOfRange { index: 2, size: 2 })
        );
        assert_eq!(bitset.count(), 1);
    }

    #[test]
    fn test_compact_layout() {
        let mut bitset = PresenceBitSet::new(10);
        bitset.insert(0).unwrap();
        bitset.insert(7).unwrap();
        bitset.insert(9).unwrap();

        let compact = bitset.to_compact();
        assert_eq!(compact.extra_bits_stored, 2);
        assert_eq!(compact.elems, vec![0b1000_0001, 0b0100_0000]);
        assert_eq!(PresenceBitSet::from_compact(&compact).unwrap(), bitset);
    }

    #[test]
    fn test_compact_whole_bytes() {
        let mut bitset = PresenceBitSet::new(8);
        bitset.insert(6).unwrap();
        let compact = bitset.to_compact();
        assert_eq!(compact.extra_bits_stored, 0);
        assert_eq!(compact.elems, vec![0b0000_0010]);
        assert_eq!(PresenceBitSet::from_compact(&compact).unwrap().size(), 8);
    }

    #[test]
    fn test_from_compact_rejects_malformed() {
        let too_many_extra = CompactBitArray {
            extra_bits_stored: 8,
            elems: vec![0],
        };
        assert!(PresenceBitSet::from_compact(&too_many_extra).is_err());

        let extra_without_elems = CompactBitArray {
            extra_bits_stored: 3,
            elems: vec![],
        };
        assert!(PresenceBitSet::from_compact(&extra_without_elems).is_err());

        // size 2, but bit 5 is set
        let bit_beyond_size = CompactBitArray {
            extra_bits_stored: 2,
            elems: vec![0b0000_0100],
        };
        assert!(matches!(
            PresenceBitSet::from_compact(&bit_beyond_size),
            Err(TypesError::MalformedBitArray(_))
        ));
    }
}
