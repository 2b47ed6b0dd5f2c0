//! Thin sequential bit reader/writer over a byte buffer, MSB-first within
//! each byte. This is the concrete choice for the "bit-level reader/writer"
//! capability the codec treats as an external collaborator — both ends of
//! every round trip in this crate agree to this order, so it never leaks
//! into the on-disk format as a explicit flag.

use bitvec::prelude::*;

pub(crate) struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub(crate) fn with_capacity_bits(capacity: usize) -> Self {
        Self {
            bits: BitVec::with_capacity(capacity),
        }
    }

    pub(crate) fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bits.into_vec()
    }
}

pub(crate) struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    cursor: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: BitSlice::from_slice(bytes),
            cursor: 0,
        }
    }

    pub(crate) fn bit_offset(&self) -> usize {
        self.cursor
    }

    /// Reads a single bit, or `None` if the stream is exhausted.
    pub(crate) fn read_bit(&mut self) -> Option<bool> {
        let bit = self.bits.get(self.cursor).map(|b| *b);
        if bit.is_some() {
            self.cursor += 1;
        }
        bit
    }
}
