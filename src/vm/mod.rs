//! This module contains the micro-interpreter used to execute a contract's
//! dispatcher and argument-decoding prologue.
//!
//! It is deliberately not a full EVM. Storage, message calls, logging,
//! precompiles, and the block and transaction context are all absent, and
//! execution stops the moment an opcode outside the supported set is
//! reached. That stopping point is not a failure: decoding prologues are
//! built exclusively from the supported set, so an unsupported opcode is the
//! natural signal that the prologue is over.

pub mod calldata;
pub mod memory;
pub mod stack;
pub mod trace;
pub mod value;

use ethnum::U256;

use crate::{
    constant::CALLDATACOPY_MAXIMUM_SIZE_BYTES,
    error::{
        container::Locatable,
        execution::{Error, Result},
    },
    opcode,
    vm::{
        calldata::CallData,
        memory::Memory,
        stack::Stack,
        trace::{Observed, TraceRecord},
    },
};

/// The interpreter used to execute the dispatcher and prologue of the
/// contract bytecode.
///
/// One machine is constructed per `(bytecode, selector)` pair and consumed
/// when it halts or errors; it is never reused.
///
/// # Stack Borrowing
///
/// The machine owns its stack, but between steps the driver borrows it
/// through [`Self::stack_mut`] to rewrite the freshly pushed result with a
/// provenance upgrade. The trace record says what happened; the stack is
/// where the driver records what it learned.
#[derive(Clone, Debug)]
pub struct Vm {
    /// The bytecode being executed. Immutable for the life of the machine.
    code: Vec<u8>,

    /// The program counter, as a byte index into `code`.
    pc: usize,

    /// The machine's stack of tagged words.
    stack: Stack,

    /// The machine's scratch memory.
    memory: Memory,

    /// The machine's input buffer.
    calldata: CallData,

    /// Whether the machine has halted.
    ///
    /// Set when the program counter leaves the bytecode or a `REVERT` is
    /// executed. A stopped machine should not be stepped again.
    stopped: bool,
}

impl Vm {
    /// Constructs a new machine that executes `code` against the provided
    /// `calldata`.
    #[must_use]
    pub fn new(code: Vec<u8>, calldata: CallData) -> Self {
        let stopped = code.is_empty();
        Self {
            code,
            pc: 0,
            stack: Stack::new(),
            memory: Memory::new(),
            calldata,
            stopped,
        }
    }

    /// Executes the instruction at the current program counter, returning
    /// the trace record for it.
    ///
    /// After the step the program counter has advanced past the instruction
    /// (or to the jump target), and [`Self::stopped`] reports whether the
    /// machine ran off the end of the bytecode.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the instruction is outside the supported set, if
    /// it jumps outside the bytecode or to a byte that is not a `JUMPDEST`,
    /// if it copies more calldata than the analysis cap allows, or if the
    /// stack over- or underflows. All of these end the analysis; none are
    /// recoverable by stepping further.
    pub fn step(&mut self) -> Result<TraceRecord> {
        let location = location(self.pc);
        let executed = self.current_opcode().locate(location)?;
        let record = self.execute(executed).locate(location)?;

        if executed != opcode::JUMP && executed != opcode::JUMPI {
            self.pc += 1;
        }
        if self.pc >= self.code.len() {
            self.stopped = true;
        }

        Ok(record)
    }

    /// Gets the opcode at the current program counter.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the program counter is outside the bytecode.
    pub fn current_opcode(&self) -> std::result::Result<u8, Error> {
        self.code
            .get(self.pc)
            .copied()
            .ok_or(Error::InstructionPointerOutOfBounds {
                requested: self.pc,
                available: self.code.len(),
            })
    }

    /// Checks whether the machine has halted.
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Gets the current value of the program counter.
    #[must_use]
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Gets the machine's stack for inspection.
    #[must_use]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Gets the machine's stack for inspection or modification.
    ///
    /// This is the seam through which the driver imprints provenance
    /// upgrades between steps.
    #[must_use]
    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Gets the machine's input buffer.
    #[must_use]
    pub fn calldata(&self) -> &CallData {
        &self.calldata
    }

    /// Gets the machine's scratch memory for inspection.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Executes a single opcode against the machine state, leaving the
    /// program-counter bump for [`Self::step`] except where the opcode sets
    /// the counter itself.
    #[allow(clippy::too_many_lines)] // The dispatch table reads best in one place
    fn execute(&mut self, executed: u8) -> std::result::Result<TraceRecord, Error> {
        match executed {
            opcode::PUSH0..=opcode::PUSH32 => {
                let count = usize::from(executed - opcode::PUSH0);
                let value = self.read_push_immediate(count);
                self.stack.push_uint(value)?;
                self.pc += count;
                let gas_cost = if count == 0 { 2 } else { 3 };
                Ok(TraceRecord::new(executed, gas_cost, Observed::Nothing))
            }

            opcode::JUMP | opcode::JUMPI => {
                let target = self.stack.pop_uint()?;
                if executed == opcode::JUMPI {
                    let condition = self.stack.pop_uint()?;
                    if condition == U256::ZERO {
                        self.pc += 1;
                        return Ok(TraceRecord::new(executed, 10, Observed::Nothing));
                    }
                }

                let destination = to_usize_saturating(target);
                if destination >= self.code.len() {
                    return Err(Error::NonExistentJumpTarget {
                        target: destination,
                    });
                }
                if self.code[destination] != opcode::JUMPDEST {
                    return Err(Error::InvalidJumpTarget {
                        target: destination,
                    });
                }

                self.pc = destination;
                let gas_cost = if executed == opcode::JUMP { 8 } else { 10 };
                Ok(TraceRecord::new(executed, gas_cost, Observed::Nothing))
            }

            opcode::DUP1..=opcode::DUP16 => {
                self.stack.dup(usize::from(executed - opcode::DUP1) + 1)?;
                Ok(TraceRecord::new(executed, 3, Observed::Nothing))
            }

            opcode::SWAP1..=opcode::SWAP16 => {
                self.stack.swap(usize::from(executed - opcode::SWAP1) + 1)?;
                Ok(TraceRecord::new(executed, 3, Observed::Nothing))
            }

            opcode::JUMPDEST => Ok(TraceRecord::new(executed, 1, Observed::Nothing)),

            opcode::REVERT => {
                // The reason and length operands stay on the stack. The
                // machine never steps again, so the depth mismatch is
                // unobservable.
                self.stopped = true;
                Ok(TraceRecord::new(executed, 4, Observed::Nothing))
            }

            opcode::ADD
            | opcode::MUL
            | opcode::SUB
            | opcode::DIV
            | opcode::EXP
            | opcode::EQ
            | opcode::LT
            | opcode::GT
            | opcode::XOR
            | opcode::AND
            | opcode::OR
            | opcode::SHL
            | opcode::SHR
            | opcode::BYTE => {
                let first = self.stack.pop()?;
                let second = self.stack.pop()?;
                let a = first.value;
                let b = second.value;

                let (result, gas_cost) = match executed {
                    opcode::ADD => (a.wrapping_add(b), 3),
                    opcode::MUL => (a.wrapping_mul(b), 5),
                    opcode::SUB => (a.wrapping_sub(b), 3),
                    opcode::DIV => {
                        let quotient = if b == U256::ZERO { U256::ZERO } else { a / b };
                        (quotient, 5)
                    }
                    opcode::EXP => (modular_exp(a, b), 50 * (1 + bit_length(b) / 8)),
                    opcode::EQ => (bool_word(a == b), 3),
                    opcode::LT => (bool_word(a < b), 3),
                    opcode::GT => (bool_word(a > b), 3),
                    opcode::XOR => (a ^ b, 3),
                    opcode::AND => (a & b, 3),
                    opcode::OR => (a | b, 3),
                    opcode::SHL => {
                        let shifted = if a >= U256::from(256_u32) {
                            U256::ZERO
                        } else {
                            b << a.as_u32()
                        };
                        (shifted, 3)
                    }
                    opcode::SHR => {
                        let shifted = if a >= U256::from(256_u32) {
                            U256::ZERO
                        } else {
                            b >> a.as_u32()
                        };
                        (shifted, 3)
                    }
                    opcode::BYTE => {
                        let byte = if a >= U256::from(32_u32) {
                            U256::ZERO
                        } else {
                            U256::from(second.value.to_be_bytes()[a.as_usize()])
                        };
                        (byte, 3)
                    }
                    _ => unreachable!("opcode {executed} is not in the two-operand group"),
                };

                self.stack.push_uint(result)?;
                Ok(TraceRecord::new(
                    executed,
                    gas_cost,
                    Observed::Words(first, second),
                ))
            }

            opcode::SLT | opcode::SGT => {
                let first = self.stack.pop_uint()?;
                let second = self.stack.pop_uint()?;
                let (a, b) = (flip_sign(first), flip_sign(second));
                let result = if executed == opcode::SLT { a < b } else { a > b };
                self.stack.push_uint(bool_word(result))?;
                Ok(TraceRecord::new(executed, 3, Observed::Nothing))
            }

            opcode::ISZERO => {
                let word = self.stack.pop()?;
                self.stack.push_uint(bool_word(word.value == U256::ZERO))?;
                Ok(TraceRecord::new(executed, 3, Observed::Word(word)))
            }

            opcode::NOT => {
                let value = self.stack.pop_uint()?;
                self.stack.push_uint(!value)?;
                Ok(TraceRecord::new(executed, 3, Observed::Nothing))
            }

            opcode::SIGNEXTEND => {
                let width = self.stack.pop_uint()?;
                let word = self.stack.pop()?;
                let value = word.value;

                let result = if width <= U256::from(31_u32) {
                    let sign_bit = U256::ONE << (width.as_u32() * 8 + 7);
                    if value & sign_bit == U256::ZERO {
                        value & (sign_bit - 1)
                    } else {
                        value | U256::ZERO.wrapping_sub(sign_bit)
                    }
                } else {
                    value
                };

                self.stack.push_uint(result)?;
                Ok(TraceRecord::new(
                    executed,
                    5,
                    Observed::WidthAndWord { width, word },
                ))
            }

            opcode::POP => {
                self.stack.pop()?;
                Ok(TraceRecord::new(executed, 2, Observed::Nothing))
            }

            opcode::ADDRESS => {
                self.stack.push_uint(U256::ONE)?;
                Ok(TraceRecord::new(executed, 2, Observed::Nothing))
            }

            opcode::CALLVALUE => {
                self.stack.push_uint(U256::ZERO)?;
                Ok(TraceRecord::new(executed, 2, Observed::Nothing))
            }

            opcode::CALLDATALOAD => {
                let offset = self.stack.pop()?;
                let value = self.calldata.load_word(to_usize_saturating(offset.value));
                self.stack.push_uint(value)?;
                Ok(TraceRecord::new(executed, 3, Observed::Word(offset)))
            }

            opcode::CALLDATASIZE => {
                self.stack.push_uint(U256::from(self.calldata.len() as u128))?;
                Ok(TraceRecord::new(executed, 2, Observed::Nothing))
            }

            opcode::CALLDATACOPY => {
                let memory_offset = self.stack.pop_uint()?;
                let source_offset = self.stack.pop_uint()?;
                let size = self.stack.pop_uint()?;
                if size > U256::from(CALLDATACOPY_MAXIMUM_SIZE_BYTES as u128) {
                    return Err(Error::OversizedCallDataCopy { size });
                }

                let bytes = self
                    .calldata
                    .load(to_usize_saturating(source_offset), size.as_usize());
                self.memory
                    .store_slice(to_usize_saturating(memory_offset), &bytes);
                Ok(TraceRecord::new(executed, 4, Observed::Nothing))
            }

            opcode::MLOAD => {
                let offset = self.stack.pop_uint()?;
                let (value, aligned) = self.memory.load(to_usize_saturating(offset));
                self.stack.push_uint(value)?;
                Ok(TraceRecord::new(executed, 4, Observed::Alignment { aligned }))
            }

            opcode::MSTORE => {
                let offset = self.stack.pop_uint()?;
                let word = self.stack.pop()?;
                self.memory.store(to_usize_saturating(offset), word.value);
                Ok(TraceRecord::new(executed, 3, Observed::Nothing))
            }

            _ => Err(Error::UnsupportedOpcode { opcode: executed }),
        }
    }

    /// Reads the `count`-byte immediate following the `PUSH` opcode at the
    /// current program counter, left-padded to a full word.
    ///
    /// A push whose immediate is cut off by the end of the bytecode reads
    /// the bytes that exist; the program counter still advances past where
    /// the immediate would have ended, which halts the machine.
    fn read_push_immediate(&self, count: usize) -> U256 {
        let start = (self.pc + 1).min(self.code.len());
        let end = (self.pc + 1 + count).min(self.code.len());
        let available = &self.code[start..end];

        let mut bytes = [0u8; 32];
        bytes[32 - available.len()..].copy_from_slice(available);
        U256::from_be_bytes(bytes)
    }
}

/// Converts a byte offset in the bytecode to the location representation
/// used on errors.
fn location(pc: usize) -> u32 {
    u32::try_from(pc).unwrap_or(u32::MAX)
}

/// Converts a word to a host-sized offset, saturating for values that no
/// real buffer can reach.
fn to_usize_saturating(value: U256) -> usize {
    if value > U256::from(usize::MAX as u128) {
        usize::MAX
    } else {
        value.as_usize()
    }
}

/// Renders a boolean as the word the EVM's comparison opcodes produce.
fn bool_word(condition: bool) -> U256 {
    if condition {
        U256::ONE
    } else {
        U256::ZERO
    }
}

/// Maps a word to one whose unsigned order matches the signed order of the
/// original, so that `SLT`/`SGT` reduce to unsigned comparison.
fn flip_sign(value: U256) -> U256 {
    value ^ (U256::ONE << 255_u32)
}

/// Computes `base` raised to `exponent`, modulo 2^256.
fn modular_exp(mut base: U256, mut exponent: U256) -> U256 {
    let mut result = U256::ONE;
    while exponent != U256::ZERO {
        if exponent & U256::ONE == U256::ONE {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent = exponent >> 1_u32;
    }
    result
}

/// Gets the number of significant bits in the provided `value`.
fn bit_length(value: U256) -> usize {
    (256 - value.leading_zeros()) as usize
}
