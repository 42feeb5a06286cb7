//! This library recovers the ABI argument layout of a single function in
//! deployed [EVM](https://ethereum.org/en/developers/docs/evm/) bytecode,
//! given only the contract's runtime bytecode and the function's 4-byte
//! selector. It needs no source code, debug information, or metadata, and it
//! is a _best effort_ analysis.
//!
//! # How it Works
//!
//! From a very high level, argument recovery is performed as follows:
//!
//! 1. A [`vm::Vm`] is created over the bytecode, with calldata holding only
//!    the selector bytes. The machine understands just the opcodes that
//!    compiler-emitted dispatchers and argument-decoding prologues use, and
//!    halts on anything else.
//! 2. The [`inference::ArgumentInference`] driver steps the machine and
//!    watches its trace records until a dispatcher comparison succeeds for
//!    the target selector.
//! 3. From then on the driver tags calldata-derived words on the stack with
//!    their provenance (see [`vm::value::Tag`]), and interprets the
//!    prologue's masks, sign extensions, zero checks, and offset arithmetic
//!    as evidence of each argument's [`inference::abi::AbiType`].
//! 4. When the machine leaves the prologue, errors, or exhausts its gas
//!    budget, the offsets-to-types map is rendered as a comma-separated
//!    list of canonical Solidity type tokens.
//!
//! Note that this library is not intended to be nor expected to evolve into
//! a full decompiler for EVM bytecode. It never executes function bodies,
//! and it deliberately does not attempt tuples or structs.
//!
//! # Basic Usage
//!
//! ```
//! use argument_layout_analyzer as ala;
//! use argument_layout_analyzer::contract::{Contract, Selector};
//!
//! // A dispatcher comparing against the selector of `fn(uint256)`,
//! // followed by a prologue that loads the single head slot.
//! let contract = Contract::from_hex(
//!     "0x6000357c0100000000000000000000000000000000000000000000000000000000\
//!      900463cdcd77c014602d57fe5b60043500",
//! )
//! .expect("bytecode is valid hex");
//! let selector = Selector::from_hex("0xcdcd77c0").expect("selector is valid hex");
//!
//! assert_eq!(ala::function_arguments(&contract, selector), "uint256");
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod constant;
pub mod contract;
pub mod error;
pub mod inference;
pub mod opcode;
pub mod vm;

use crate::{
    contract::{Contract, Selector},
    inference::{ArgumentInference, Config},
};

/// Recovers the argument layout of the function identified by `selector`
/// within the provided `contract`, using the default configuration.
///
/// The result is a comma-separated list of canonical ABI type tokens in
/// ascending head-slot order, e.g. `"address,uint256[]"`. An empty string
/// means the function takes no arguments, or that nothing could be
/// recovered; the analysis itself never fails.
#[must_use]
pub fn function_arguments(contract: &Contract, selector: Selector) -> String {
    function_arguments_with_config(contract, selector, &Config::default())
}

/// Recovers the argument layout of the function identified by `selector`
/// within the provided `contract`, using the provided `config`.
///
/// See [`function_arguments`] for the shape of the result.
#[must_use]
pub fn function_arguments_with_config(
    contract: &Contract,
    selector: Selector,
    config: &Config,
) -> String {
    ArgumentInference::new(contract, selector, config.clone()).run()
}
