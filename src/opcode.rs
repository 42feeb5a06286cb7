//! This module contains the byte values for the EVM
//! [opcodes](https://ethereum.org/en/developers/docs/evm/opcodes/) that the
//! interpreter understands, along with a name lookup to aid in debugging.
//!
//! The numbering follows the Yellow Paper as of the Istanbul hard fork and
//! later. Only the opcodes that appear in compiler-emitted dispatchers and
//! argument-decoding prologues are listed individually; anything else is, by
//! design, reported as unsupported by the interpreter.

pub const ADD: u8 = 0x01;
pub const MUL: u8 = 0x02;
pub const SUB: u8 = 0x03;
pub const DIV: u8 = 0x04;
pub const EXP: u8 = 0x0a;
pub const SIGNEXTEND: u8 = 0x0b;
pub const LT: u8 = 0x10;
pub const GT: u8 = 0x11;
pub const SLT: u8 = 0x12;
pub const SGT: u8 = 0x13;
pub const EQ: u8 = 0x14;
pub const ISZERO: u8 = 0x15;
pub const AND: u8 = 0x16;
pub const OR: u8 = 0x17;
pub const XOR: u8 = 0x18;
pub const NOT: u8 = 0x19;
pub const BYTE: u8 = 0x1a;
pub const SHL: u8 = 0x1b;
pub const SHR: u8 = 0x1c;
pub const ADDRESS: u8 = 0x30;
pub const CALLVALUE: u8 = 0x34;
pub const CALLDATALOAD: u8 = 0x35;
pub const CALLDATASIZE: u8 = 0x36;
pub const CALLDATACOPY: u8 = 0x37;
pub const POP: u8 = 0x50;
pub const MLOAD: u8 = 0x51;
pub const MSTORE: u8 = 0x52;
pub const JUMP: u8 = 0x56;
pub const JUMPI: u8 = 0x57;
pub const JUMPDEST: u8 = 0x5b;

/// The byte value for `PUSH0`.
///
/// This is constructed such that for `PUSHN`, [`PUSH0`] + `N` equals the byte
/// value for the corresponding `PUSH` opcode.
pub const PUSH0: u8 = 0x5f;

/// The byte value for `PUSH32`, the widest `PUSH`.
pub const PUSH32: u8 = 0x7f;

/// The byte value for `DUP1`.
///
/// This is constructed such that for `DUPN`, [`DUP1`] + `N - 1` equals the
/// byte value for the corresponding `DUP` opcode.
pub const DUP1: u8 = 0x80;

/// The byte value for `DUP16`, the deepest `DUP`.
pub const DUP16: u8 = 0x8f;

/// The byte value for `SWAP1`.
///
/// This is constructed such that for `SWAPN`, [`SWAP1`] + `N - 1` equals the
/// byte value for the corresponding `SWAP` opcode.
pub const SWAP1: u8 = 0x90;

/// The byte value for `SWAP16`, the deepest `SWAP`.
pub const SWAP16: u8 = 0x9f;

pub const REVERT: u8 = 0xfd;

/// Gets a textual representation of the provided `opcode` to aid in
/// debugging, or [`None`] if the opcode is outside the supported set and the
/// common prologue terminators.
#[must_use]
pub fn name(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        0x00 => "STOP",
        ADD => "ADD",
        MUL => "MUL",
        SUB => "SUB",
        DIV => "DIV",
        EXP => "EXP",
        SIGNEXTEND => "SIGNEXTEND",
        LT => "LT",
        GT => "GT",
        SLT => "SLT",
        SGT => "SGT",
        EQ => "EQ",
        ISZERO => "ISZERO",
        AND => "AND",
        OR => "OR",
        XOR => "XOR",
        NOT => "NOT",
        BYTE => "BYTE",
        SHL => "SHL",
        SHR => "SHR",
        0x20 => "SHA3",
        ADDRESS => "ADDRESS",
        CALLVALUE => "CALLVALUE",
        CALLDATALOAD => "CALLDATALOAD",
        CALLDATASIZE => "CALLDATASIZE",
        CALLDATACOPY => "CALLDATACOPY",
        POP => "POP",
        MLOAD => "MLOAD",
        MSTORE => "MSTORE",
        0x54 => "SLOAD",
        0x55 => "SSTORE",
        JUMP => "JUMP",
        JUMPI => "JUMPI",
        JUMPDEST => "JUMPDEST",
        PUSH0..=PUSH32 => "PUSH",
        DUP1..=DUP16 => "DUP",
        SWAP1..=SWAP16 => "SWAP",
        0xf1 => "CALL",
        0xf3 => "RETURN",
        REVERT => "REVERT",
        0xfe => "INVALID",
        _ => return None,
    };

    Some(name)
}

/// Renders the provided `opcode` as its name where one is known, and as a
/// hexadecimal byte otherwise.
#[must_use]
pub fn display(opcode: u8) -> String {
    match name(opcode) {
        Some(name) => name.to_string(),
        None => format!("0x{opcode:02x}"),
    }
}

#[cfg(test)]
mod test {
    use crate::opcode;

    #[test]
    fn names_supported_opcodes() {
        assert_eq!(opcode::name(opcode::CALLDATALOAD), Some("CALLDATALOAD"));
        assert_eq!(opcode::name(opcode::PUSH0 + 17), Some("PUSH"));
        assert_eq!(opcode::name(opcode::REVERT), Some("REVERT"));
    }

    #[test]
    fn falls_back_to_hex_for_unknown_opcodes() {
        assert_eq!(opcode::name(0xef), None);
        assert_eq!(opcode::display(0xef), "0xef");
        assert_eq!(opcode::display(opcode::JUMPDEST), "JUMPDEST");
    }
}
