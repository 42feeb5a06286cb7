//! This module contains constants that are needed throughout the codebase.

/// The maximum size that a contract can have when being deployed on the
/// blockchain.
///
/// This is specified in [EIP-170](https://eips.ethereum.org/EIPS/eip-170).
pub const CONTRACT_MAXIMUM_SIZE_BYTES: usize = 24576;

/// The maximum stack depth for the EVM.
pub const MAXIMUM_STACK_DEPTH: usize = 1024;

/// The width of a word on the EVM in bytes.
pub const WORD_SIZE_BYTES: usize = 32;

/// The number of bytes in a function selector.
///
/// A selector is the first four bytes of the Keccak-256 hash of the canonical
/// function signature, and is what the contract's dispatcher compares the
/// incoming calldata against.
pub const SELECTOR_SIZE_BYTES: usize = 4;

/// The lowest calldata offset at which an argument head slot can live.
///
/// The first [`SELECTOR_SIZE_BYTES`] bytes of calldata are the selector, so
/// any argument data starts after them.
pub const ARGUMENT_OFFSET_MIN: u32 = SELECTOR_SIZE_BYTES as u32;

/// The default amount of gas that argument recovery may consume before it is
/// cut off.
///
/// Compiler-emitted decoding prologues are small, so this bounds analysis
/// time on adversarial bytecode without cutting legitimate prologues short.
pub const DEFAULT_GAS_LIMIT: usize = 10_000;

/// The calldata length reported to the bytecode once execution has entered
/// the target function.
///
/// The analysis runs with calldata containing only the four selector bytes,
/// so the prologue's minimum-length checks would fail and bail out before
/// revealing anything. Reporting this length instead convinces those checks
/// to pass. The specific value is not significant; any length large enough
/// to satisfy a prologue without overflowing its offset arithmetic works.
pub const SPOOFED_CALLDATA_SIZE: usize = 8192;

/// The maximum number of bytes that a single `CALLDATACOPY` is allowed to
/// move during analysis.
///
/// A decoding prologue copies head slots and short payloads; a copy larger
/// than this indicates execution has left the prologue.
pub const CALLDATACOPY_MAXIMUM_SIZE_BYTES: usize = 256;
