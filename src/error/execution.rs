//! This module contains errors pertaining to the interpretation of the
//! bytecode.
//!
//! Most of these are not failures from the point of view of argument
//! recovery. The interpreter deliberately understands only the opcodes that
//! appear in decoding prologues, so hitting an unsupported one is how the
//! analysis learns that the prologue has ended.

use thiserror::Error;

use crate::{error::container, opcode};

/// Errors that occur while the [`crate::vm::Vm`] interprets the bytecode.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error(
        "instruction pointer {requested:?} is out of bounds in bytecode of length {available:?}"
    )]
    InstructionPointerOutOfBounds { requested: usize, available: usize },

    #[error("maximum stack depth exceeded with request for {requested:?} frames")]
    StackDepthExceeded { requested: usize },

    #[error("{requested:?} stack frames were requested but only {available:?} are on the stack")]
    StackUnderflow { requested: usize, available: usize },

    #[error("the opcode {} is not supported", opcode::display(*opcode))]
    UnsupportedOpcode { opcode: u8 },

    #[error("the byte at {target:?} is not a JUMPDEST")]
    InvalidJumpTarget { target: usize },

    #[error("the jump destination {target:?} does not exist in the bytecode")]
    NonExistentJumpTarget { target: usize },

    #[error("a CALLDATACOPY of {size} bytes exceeds the analysis copy limit")]
    OversizedCallDataCopy { size: ethnum::U256 },
}

/// An execution error with an associated location in the bytecode.
pub type LocatedError = container::Located<Error>;

/// The result type for methods that may have execution errors.
pub type Result<T> = std::result::Result<T, LocatedError>;

/// Make it possible to attach locations to these errors.
impl container::Locatable for Error {
    type Located = LocatedError;

    fn locate(self, instruction_pointer: u32) -> Self::Located {
        container::Located {
            location: instruction_pointer,
            payload:  self,
        }
    }
}
