//! This module contains common testing utilities for testing this library.
#![allow(unused)] // Not every test file uses every helper

use argument_layout_analyzer::{contract::Selector, opcode};

/// The byte that a hand-assembled prologue ends on.
///
/// `STOP` is outside the interpreter's supported set, so reaching it ends
/// the analysis the same way a real function body would.
pub const STOP: u8 = 0x00;

/// Assembles the common dispatcher shape emitted by `solc`: load the first
/// calldata word, shift the selector down, and compare it with `EQ` against
/// the target before jumping to the prologue.
///
/// The prologue is expected to immediately follow the dispatcher, starting
/// with its `JUMPDEST`.
pub fn eq_dispatcher(selector: Selector) -> Vec<u8> {
    let mut code = vec![
        0x60,
        0x00,
        opcode::CALLDATALOAD, // The selector word
        0x60,
        0xe0,
        opcode::SHR,  // Shifted down to its low four bytes
        opcode::DUP1, // Keep a copy for further comparisons
        0x63,
    ];
    code.extend_from_slice(selector.as_bytes());
    code.extend_from_slice(&[
        opcode::EQ,
        0x60,
        0x11, // The prologue's JUMPDEST, directly after this dispatcher
        opcode::JUMPI,
        STOP,
    ]);

    debug_assert_eq!(code.len(), 0x11);
    code
}

/// Assembles a dispatcher that compares with `XOR` and falls through into
/// the prologue on a match, jumping away to a trap otherwise.
pub fn xor_dispatcher(selector: Selector, prologue_len: usize) -> Vec<u8> {
    let mut code = vec![
        0x60,
        0x00,
        opcode::CALLDATALOAD,
        0x60,
        0xe0,
        opcode::SHR,
        opcode::DUP1,
        0x63,
    ];
    code.extend_from_slice(selector.as_bytes());

    // A non-zero XOR result jumps past the prologue to a JUMPDEST trap.
    let trap = 0x10 + prologue_len;
    assert!(trap <= 0xff, "prologue too long for a one-byte jump target");
    code.extend_from_slice(&[opcode::XOR, 0x60, trap as u8, opcode::JUMPI]);

    debug_assert_eq!(code.len(), 0x10);
    code
}

/// Assembles a full contract: the `EQ` dispatcher for `selector` followed
/// by the provided `prologue` body.
pub fn contract_with_prologue(selector: Selector, prologue: &[u8]) -> Vec<u8> {
    let mut code = eq_dispatcher(selector);
    code.push(opcode::JUMPDEST);
    code.extend_from_slice(prologue);
    code
}

/// Assembles a full contract around the `XOR` dispatcher, with the trap
/// `JUMPDEST` for non-matching selectors placed after the prologue.
pub fn xor_contract_with_prologue(selector: Selector, prologue: &[u8]) -> Vec<u8> {
    let mut code = xor_dispatcher(selector, prologue.len());
    code.extend_from_slice(prologue);
    code.push(opcode::JUMPDEST);
    code.push(STOP);
    code
}
