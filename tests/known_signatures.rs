//! End-to-end tests that recover the argument layouts of hand-assembled
//! contracts whose prologues mirror the shapes `solc` emits.

mod common;

use argument_layout_analyzer::{
    self as ala,
    contract::{Contract, Selector},
    opcode,
};
use common::{contract_with_prologue, xor_contract_with_prologue, STOP};

#[test]
fn recovers_a_single_word_argument() {
    // fn(uint256), selector 0xcdcd77c0: the prologue loads the head slot
    // and reveals nothing further about it.
    let selector = Selector::new([0xcd, 0xcd, 0x77, 0xc0]);
    let prologue = [0x60, 0x04, opcode::CALLDATALOAD, STOP];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "uint256");
}

#[test]
fn recovers_an_address_and_a_bool() {
    // fn(address,bool), selector 0x9b2ea4bd: the first head slot is masked
    // down to 160 bits, the second is double-ISZERO normalised.
    let selector = Selector::new([0x9b, 0x2e, 0xa4, 0xbd]);
    let mut prologue = vec![0x60, 0x04, opcode::CALLDATALOAD, 0x73];
    prologue.extend_from_slice(&[0xff; 20]);
    prologue.extend_from_slice(&[
        opcode::AND,
        opcode::POP,
        0x60,
        0x24,
        opcode::CALLDATALOAD,
        opcode::ISZERO,
        opcode::ISZERO,
        STOP,
    ]);
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(
        ala::function_arguments(&Contract::new(code), selector),
        "address,bool"
    );
}

#[test]
fn recovers_a_dynamic_byte_array() {
    // fn(bytes), selector 0xda359dc8: the head slot is a pointer, so the
    // prologue adds the selector width to it and loads the length prefix
    // through it.
    let selector = Selector::new([0xda, 0x35, 0x9d, 0xc8]);
    let prologue = [
        0x60,
        0x04,
        opcode::CALLDATALOAD,
        0x60,
        0x04,
        opcode::ADD,
        opcode::CALLDATALOAD,
        STOP,
    ];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "bytes");
}

#[test]
fn recovers_a_word_array() {
    // fn(uint256[]), selector 0x7c70b4db: as for `bytes`, but the length
    // prefix is then scaled by the word size to compute the array extent.
    let selector = Selector::new([0x7c, 0x70, 0xb4, 0xdb]);
    let prologue = [
        0x60,
        0x04,
        opcode::CALLDATALOAD,
        0x60,
        0x04,
        opcode::ADD,
        opcode::CALLDATALOAD,
        0x60,
        0x05,
        opcode::SHL,
        STOP,
    ];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(
        ala::function_arguments(&Contract::new(code), selector),
        "uint256[]"
    );
}

#[test]
fn recovers_fixed_bytes_and_a_signed_integer() {
    // fn(bytes32,int64), selector 0xaa6b8b52: single-byte extraction marks
    // the first slot as bytes32, sign extension from byte width 7 marks the
    // second as int64.
    let selector = Selector::new([0xaa, 0x6b, 0x8b, 0x52]);
    let prologue = [
        0x60,
        0x04,
        opcode::CALLDATALOAD,
        0x60,
        0x00,
        opcode::BYTE,
        opcode::POP,
        0x60,
        0x24,
        opcode::CALLDATALOAD,
        0x60,
        0x07,
        opcode::SIGNEXTEND,
        STOP,
    ];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(
        ala::function_arguments(&Contract::new(code), selector),
        "bytes32,int64"
    );
}

#[test]
fn recovers_arguments_behind_an_xor_dispatcher() {
    let selector = Selector::new([0x12, 0x34, 0x56, 0x78]);
    let prologue = [0x60, 0x04, opcode::CALLDATALOAD, STOP];
    let code = xor_contract_with_prologue(selector, &prologue);

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "uint256");
}

#[test]
fn recovers_arguments_behind_a_sub_dispatcher() {
    // The same fall-through dispatcher shape, comparing with SUB instead.
    let selector = Selector::new([0x12, 0x34, 0x56, 0x78]);
    let prologue = [0x60, 0x04, opcode::CALLDATALOAD, STOP];
    let mut code = xor_contract_with_prologue(selector, &prologue);
    code[12] = opcode::SUB;

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "uint256");
}

#[test]
fn reports_nothing_for_an_argumentless_function() {
    let selector = Selector::new([0xaf, 0xfe, 0x01, 0x02]);
    let code = contract_with_prologue(selector, &[STOP]);

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "");
}

#[test]
fn reports_nothing_when_the_selector_is_not_dispatched() {
    let dispatched = Selector::new([0xcd, 0xcd, 0x77, 0xc0]);
    let queried = Selector::new([0xde, 0xad, 0xbe, 0xef]);
    let prologue = [0x60, 0x04, opcode::CALLDATALOAD, STOP];
    let code = contract_with_prologue(dispatched, &prologue);

    assert_eq!(ala::function_arguments(&Contract::new(code), queried), "");
}

#[test]
fn length_checks_pass_against_the_spoofed_calldata_size() {
    // The prologue only decodes when CALLDATASIZE exceeds 0x24. The real
    // calldata is four bytes, so recovery relies on the reported length
    // being replaced with a large one.
    let selector = Selector::new([0xcd, 0xcd, 0x77, 0xc0]);
    let prologue = [
        opcode::CALLDATASIZE,
        0x60,
        0x24,
        opcode::LT,
        0x60,
        0x1a,
        opcode::JUMPI,
        STOP,
        opcode::JUMPDEST,
        0x60,
        0x04,
        opcode::CALLDATALOAD,
        STOP,
    ];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(ala::function_arguments(&Contract::new(code), selector), "uint256");
}

#[test]
fn recovers_dynamic_element_types() {
    // A prologue that walks into the payload of a dynamic argument and
    // then reveals its element type; the recovered type gains `[]`.
    let selector = Selector::new([0xcd, 0xcd, 0x77, 0xc0]);

    let walk_into_payload = [
        0x60,
        0x04,
        opcode::CALLDATALOAD, // The head slot pointer
        opcode::DUP1,
        0x60,
        0x04,
        opcode::ADD, // Skip the selector: still the head slot
        opcode::CALLDATALOAD, // The length prefix
        opcode::POP,
        0x60,
        0x24,
        opcode::ADD, // A cursor into the payload
        opcode::CALLDATALOAD, // An element
    ];

    let with_suffix = |suffix: &[u8]| {
        let mut prologue = walk_into_payload.to_vec();
        prologue.extend_from_slice(suffix);
        prologue.push(STOP);
        Contract::new(contract_with_prologue(selector, &prologue))
    };

    let signed = with_suffix(&[0x60, 0x07, opcode::SIGNEXTEND]);
    assert_eq!(ala::function_arguments(&signed, selector), "int64[]");

    let boolean = with_suffix(&[opcode::ISZERO, opcode::ISZERO]);
    assert_eq!(ala::function_arguments(&boolean, selector), "bool[]");

    let masked = with_suffix(&[0x63, 0xff, 0xff, 0xff, 0xff, opcode::AND]);
    assert_eq!(ala::function_arguments(&masked, selector), "uint32[]");
}

#[test]
fn array_evidence_overrides_the_bytes_guess() {
    // Loading through a head slot first looks like `bytes`; multiplying
    // the length prefix by 32 afterwards proves a word array.
    let selector = Selector::new([0xcd, 0xcd, 0x77, 0xc0]);
    let prologue = [
        0x60,
        0x04,
        opcode::CALLDATALOAD,
        0x60,
        0x04,
        opcode::ADD,
        opcode::CALLDATALOAD,
        0x60,
        0x20,
        opcode::MUL,
        STOP,
    ];
    let code = contract_with_prologue(selector, &prologue);

    assert_eq!(
        ala::function_arguments(&Contract::new(code), selector),
        "uint256[]"
    );
}
