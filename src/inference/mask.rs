//! This module contains the recognition of the bit masks that decoding
//! prologues use to truncate a 32-byte calldata word back down to the
//! argument's real width.
//!
//! ABI encoding pads every head-slot value to 32 bytes: numbers and
//! addresses are left-padded (value in the low bytes), fixed byte strings
//! are right-padded (value in the high bytes). The compiler undoes the
//! padding with an `AND` against a contiguous all-ones mask, so the side the
//! ones sit on distinguishes the two families, and the popcount gives the
//! width.

use ethnum::U256;

use crate::inference::abi::AbiType;

/// Recognises the ABI type implied by `AND`-ing an argument word with the
/// provided concrete `mask`.
///
/// A left-padded mask (`0x00…0ff…f`) names an unsigned integer of the
/// mask's width, or an address when that width is 160 bits. A right-padded
/// mask (`0xff…f00…0`) names a fixed byte string of the mask's width. Masks
/// that are not contiguous from one end, or whose width is not a whole
/// number of bytes, reveal nothing.
///
/// The 160-bit case is genuinely ambiguous with `uint160`; `address` is
/// preferred as by far the more common type.
#[must_use]
pub fn type_of_mask(mask: U256) -> Option<AbiType> {
    if mask == U256::ZERO {
        return None;
    }

    // A value `v` with only low bits set satisfies `v & (v + 1) == 0`.
    if mask & mask.wrapping_add(U256::ONE) == U256::ZERO {
        let bits = bit_width(mask);
        if bits % 8 != 0 {
            return None;
        }
        let inferred = if bits == 160 {
            AbiType::Address
        } else {
            AbiType::UInt { size: bits }
        };
        return Some(inferred);
    }

    // Reflect the byte order and retry to catch the right-padded family.
    let reflected = U256::from_le_bytes(mask.to_be_bytes());
    if reflected & reflected.wrapping_add(U256::ONE) == U256::ZERO {
        let bits = bit_width(reflected);
        if bits % 8 == 0 {
            #[allow(clippy::cast_possible_truncation)] // bits <= 256
            return Some(AbiType::Bytes {
                length: (bits / 8) as u8,
            });
        }
    }

    None
}

/// Gets the number of significant bits in the provided `value`.
#[allow(clippy::cast_possible_truncation)] // The width is at most 256
fn bit_width(value: U256) -> u16 {
    (256 - value.leading_zeros()) as u16
}
