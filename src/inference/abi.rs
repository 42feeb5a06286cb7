//! This module contains the representation of the
//! [ABI types](https://docs.soliditylang.org/en/latest/abi-spec.html) that
//! argument recovery is able to name.

use std::fmt::{Display, Formatter};

/// A concrete ABI type as recovered from a decoding prologue.
///
/// This is deliberately a subset of the full ABI: tuples, structs, and
/// fixed-size arrays never survive the evidence available in a prologue, so
/// they have no representation here.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AbiType {
    /// Unsigned integers of a given `size` in bits, where `8 <= size <= 256
    /// && size % 8 == 0`.
    UInt { size: u16 },

    /// Signed (two's complement) integers of a given `size` in bits, where
    /// `8 <= size <= 256 && size % 8 == 0`.
    Int { size: u16 },

    /// Addresses, assumed equivalent to `UInt { size: 160 }` except for
    /// interpretation.
    Address,

    /// Booleans, assumed equivalent to `UInt { size: 8 }` except for
    /// interpretation.
    Bool,

    /// Byte arrays of a fixed `length`, where `0 < length <= 32`.
    Bytes { length: u8 },

    /// A dynamically-sized byte array, with each element packed.
    DynBytes,

    /// A dynamically-sized array containing elements of a type `tp`.
    DynArray { tp: Box<AbiType> },
}

impl AbiType {
    /// The word-sized unsigned integer that an untyped head slot defaults
    /// to.
    #[must_use]
    pub fn word() -> Self {
        Self::UInt { size: 256 }
    }

    /// Wraps `self` into a dynamically-sized array of itself.
    #[must_use]
    pub fn into_dyn_array(self) -> Self {
        Self::DynArray { tp: Box::new(self) }
    }
}

/// Renders the type as its canonical Solidity token, e.g. `uint256`,
/// `bytes4` or `bool[]`.
impl Display for AbiType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AbiType::UInt { size } => write!(f, "uint{size}"),
            AbiType::Int { size } => write!(f, "int{size}"),
            AbiType::Address => write!(f, "address"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Bytes { length } => write!(f, "bytes{length}"),
            AbiType::DynBytes => write!(f, "bytes"),
            AbiType::DynArray { tp } => write!(f, "{tp}[]"),
        }
    }
}
