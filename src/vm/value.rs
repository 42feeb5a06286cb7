//! This module contains the definition of the tagged words that flow through
//! the interpreter's stack, and of the provenance lattice attached to them.

use ethnum::U256;

/// The provenance tag carried by every word on the interpreter's stack.
///
/// The tags form a small lattice rooted at [`Tag::Concrete`]. A word is
/// lifted out of `Concrete` when a `CALLDATALOAD` reads an argument head
/// slot, and from there the driver only ever upgrades it along the chain for
/// that argument. The calldata byte offset of the head slot identifies the
/// chain and is preserved by every upgrade.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tag {
    /// A word with no provenance: a `PUSH` immediate, the result of
    /// arithmetic between concretes, or a calldata read of an unknown cell.
    Concrete,

    /// A word that originated from a `CALLDATALOAD` of the argument head
    /// slot at byte `offset` within calldata.
    ///
    /// `dynamic` marks words read out of a dynamic argument's payload area
    /// rather than from the head slot itself.
    Arg { offset: u32, dynamic: bool },

    /// The 32-byte length prefix of the dynamic argument whose head slot
    /// lives at `offset`.
    ArgDynamicLength { offset: u32 },

    /// A cursor into the dynamic payload area of the argument at `offset`,
    /// produced by offset arithmetic on that argument's head slot. The
    /// cursor's numeric position is the word's value.
    ArgDynamic { offset: u32 },

    /// The result of `ISZERO` applied to a word tagged
    /// [`Tag::Arg`] with the same `offset` and `dynamic`.
    IsZeroResult { offset: u32, dynamic: bool },
}

impl Tag {
    /// Gets the calldata offset of the argument chain this tag belongs to,
    /// or [`None`] for concrete words.
    #[must_use]
    pub fn offset(&self) -> Option<u32> {
        match self {
            Tag::Concrete => None,
            Tag::Arg { offset, .. }
            | Tag::ArgDynamicLength { offset }
            | Tag::ArgDynamic { offset }
            | Tag::IsZeroResult { offset, .. } => Some(*offset),
        }
    }
}

/// A 256-bit EVM word together with its provenance tag.
///
/// The numeric value and the tag are deliberately independent: upgrading a
/// tag never has to alter the bytes the bytecode actually computed with, so
/// interpretation stays faithful while the provenance accumulates.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TaggedWord {
    /// The word itself, big-endian at the byte level.
    pub value: U256,

    /// The provenance of the word.
    pub tag: Tag,
}

impl TaggedWord {
    /// Creates a new word with the provided `value` and `tag`.
    #[must_use]
    pub fn new(value: U256, tag: Tag) -> Self {
        Self { value, tag }
    }

    /// Creates a new word with the provided `value` and no provenance.
    #[must_use]
    pub fn concrete(value: U256) -> Self {
        Self::new(value, Tag::Concrete)
    }

    /// Checks whether the word carries no provenance.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        self.tag == Tag::Concrete
    }

    /// Gets the low `N` big-endian bytes of the word's value.
    ///
    /// This is how the dispatcher-comparison check asks whether a word "ends
    /// with" the target selector.
    #[must_use]
    pub fn trailing_bytes<const N: usize>(&self) -> [u8; N] {
        let bytes = self.value.to_be_bytes();
        let mut trailing = [0u8; N];
        trailing.copy_from_slice(&bytes[bytes.len() - N..]);
        trailing
    }
}
