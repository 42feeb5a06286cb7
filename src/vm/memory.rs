//! This module contains the definition of the interpreter's transient
//! memory.

use std::collections::{BTreeMap, HashSet};

use ethnum::U256;

use crate::constant::WORD_SIZE_BYTES;

/// A representation of the transient memory of the interpreter.
///
/// Memory is byte-addressed and conceptually infinite, with unwritten
/// regions reading as zeroes. The backing store grows in
/// [`WORD_SIZE_BYTES`]-aligned chunks as writes land, so a decoding prologue
/// that scribbles at a distant scratch offset does not force allocation of
/// everything below it.
///
/// Memory carries no provenance tags. The prologues under analysis use it
/// only as opaque scratch space, so tag information flows exclusively
/// through the stack.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Memory {
    chunks: BTreeMap<usize, [u8; WORD_SIZE_BYTES]>,
    boundaries: HashSet<usize>,
}

impl Memory {
    /// Constructs a new memory container that currently stores no data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the provided 256-bit `word` at the provided byte `offset` in
    /// the memory.
    ///
    /// This will overwrite any bytes already present in that range.
    pub fn store(&mut self, offset: usize, word: U256) {
        self.store_slice(offset, &word.to_be_bytes());
    }

    /// Stores the provided `bytes` starting at the provided byte `offset` in
    /// the memory.
    ///
    /// This will overwrite any bytes already present in that range.
    pub fn store_slice(&mut self, offset: usize, bytes: &[u8]) {
        for (i, byte) in bytes.iter().enumerate() {
            let Some(address) = offset.checked_add(i) else {
                break;
            };
            self.write_byte(address, *byte);
        }
        self.boundaries.insert(offset);
    }

    /// Loads the 256-bit word at the given byte `offset` in memory.
    ///
    /// Unwritten bytes read as zero. The returned flag records whether
    /// `offset` is a boundary at which a store was previously made; it is
    /// surfaced in the trace for introspection but carries no other meaning.
    #[must_use]
    pub fn load(&self, offset: usize) -> (U256, bool) {
        let mut bytes = [0u8; WORD_SIZE_BYTES];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let Some(address) = offset.checked_add(i) else {
                break;
            };
            *byte = self.read_byte(address);
        }

        let aligned = self.boundaries.contains(&offset);
        (U256::from_be_bytes(bytes), aligned)
    }

    /// Asks the memory for the number of chunks backing it.
    ///
    /// This has no equivalent operation on the EVM and is primarily useful
    /// for introspection.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.chunks.len()
    }

    /// Checks if the memory has ever been written to.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries() == 0
    }

    fn write_byte(&mut self, address: usize, byte: u8) {
        let base = address & !(WORD_SIZE_BYTES - 1);
        let chunk = self.chunks.entry(base).or_insert([0u8; WORD_SIZE_BYTES]);
        chunk[address - base] = byte;
    }

    fn read_byte(&self, address: usize) -> u8 {
        let base = address & !(WORD_SIZE_BYTES - 1);
        self.chunks
            .get(&base)
            .map_or(0, |chunk| chunk[address - base])
    }
}
