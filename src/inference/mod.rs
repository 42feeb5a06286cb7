//! This module contains the driver that recovers a function's argument
//! layout by watching the interpreter decode it.
//!
//! The driver steps the [`Vm`] one instruction at a time and never looks at
//! the bytecode itself. Everything it learns comes from the trace records:
//! first it watches the dispatcher compare selectors until the target
//! function is entered, then it watches the prologue's calldata reads,
//! offset arithmetic, masks, and extensions, imprinting provenance upgrades
//! onto the stack so that later instructions reveal which argument they are
//! working on.

pub mod abi;
pub mod mask;

use std::collections::BTreeMap;

use ethnum::U256;
use itertools::Itertools;
use tracing::debug;

use crate::{
    constant::{ARGUMENT_OFFSET_MIN, DEFAULT_GAS_LIMIT, SELECTOR_SIZE_BYTES, SPOOFED_CALLDATA_SIZE},
    contract::{Contract, Selector},
    error::execution::Error,
    inference::abi::AbiType,
    opcode,
    vm::{
        calldata::CallData,
        trace::{Observed, TraceRecord},
        value::{Tag, TaggedWord},
        Vm,
    },
};

/// The configuration for argument recovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The maximum amount of gas that the analysis may consume.
    ///
    /// The per-instruction costs are the interpreter's approximations, so
    /// this is a budget for bounding the analysis rather than a faithful
    /// EVM gas account.
    ///
    /// Defaults to [`DEFAULT_GAS_LIMIT`].
    pub gas_limit: usize,
}

impl Config {
    /// Sets the `gas_limit` config parameter to `value`.
    #[must_use]
    pub fn with_gas_limit(mut self, value: usize) -> Self {
        self.gas_limit = value;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        let gas_limit = DEFAULT_GAS_LIMIT;
        Self { gas_limit }
    }
}

/// The analysis that recovers the argument layout of a single function from
/// the contract's bytecode and the function's selector.
///
/// One analysis owns one [`Vm`]; running it consumes both.
#[derive(Clone, Debug)]
pub struct ArgumentInference {
    /// The machine executing the dispatcher and prologue.
    vm: Vm,

    /// The selector of the function whose arguments are being recovered.
    selector: Selector,

    /// The configuration of the analysis.
    config: Config,

    /// What is known so far, keyed by the calldata byte offset of each
    /// argument's head slot. [`None`] marks a head slot whose existence is
    /// known but whose type is not yet.
    arguments: BTreeMap<u32, Option<AbiType>>,

    /// Whether execution has passed the dispatcher comparison for the
    /// target selector. Latches on and never resets.
    inside_function: bool,

    /// The gas consumed so far.
    gas_used: usize,
}

impl ArgumentInference {
    /// Constructs a new analysis of the function identified by `selector`
    /// within the provided `contract`.
    ///
    /// The machine starts with calldata holding only the selector bytes;
    /// the analysis lies about the calldata length later to keep the
    /// prologue's sanity checks happy.
    #[must_use]
    pub fn new(contract: &Contract, selector: Selector, config: Config) -> Self {
        let calldata = CallData::new(selector.as_bytes().to_vec());
        let vm = Vm::new(contract.bytecode().to_vec(), calldata);
        Self {
            vm,
            selector,
            config,
            arguments: BTreeMap::new(),
            inside_function: false,
            gas_used: 0,
        }
    }

    /// Runs the analysis to completion and renders the recovered layout as
    /// a comma-separated list of canonical ABI type tokens, ordered by head
    /// slot offset.
    ///
    /// The analysis never fails: the interpreter halting, erroring, or
    /// running out of gas all simply end it, and whatever has been inferred
    /// by then is returned. An empty string means a function without
    /// arguments, or one whose prologue revealed nothing.
    #[must_use]
    pub fn run(mut self) -> String {
        debug!(
            selector = %hex::encode(self.selector.as_bytes()),
            "starting argument recovery"
        );

        while !self.vm.stopped() {
            let record = match self.vm.step() {
                Ok(record) => record,
                Err(error) => {
                    debug!(%error, "analysis ended by the interpreter");
                    break;
                }
            };

            self.gas_used += record.gas_cost;
            if self.gas_used > self.config.gas_limit {
                debug!(gas_used = self.gas_used, "gas limit exceeded");
                break;
            }

            if !self.inside_function {
                self.check_for_function_entry(&record);
                continue;
            }

            if self.apply_rules(&record).is_err() {
                break;
            }
        }

        self.render()
    }

    /// Watches a dispatcher comparison for the target selector.
    ///
    /// Dispatchers branch on `EQ`, or on `XOR`/`SUB` against zero. The
    /// function has been entered when such a comparison succeeded and the
    /// word compared against ends with the selector bytes.
    fn check_for_function_entry(&mut self, record: &TraceRecord) {
        let expected = match record.opcode {
            opcode::EQ => U256::ONE,
            opcode::XOR | opcode::SUB => U256::ZERO,
            _ => return,
        };
        let Observed::Words(first, _) = &record.observed else {
            return;
        };
        let Ok(result) = self.vm.stack().peek() else {
            return;
        };

        if result.value == expected
            && first.trailing_bytes::<SELECTOR_SIZE_BYTES>() == *self.selector.as_bytes()
        {
            self.inside_function = true;
            debug!(pc = self.vm.pc(), "entered the target function");
        }
    }

    /// Applies the inference rules to a single trace record, upgrading
    /// provenance tags on the stack and recording any types the record
    /// reveals.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if a stack rewrite fails, which ends the analysis.
    fn apply_rules(&mut self, record: &TraceRecord) -> Result<(), Error> {
        match (record.opcode, &record.observed) {
            // The true calldata is only the selector. Reporting a large
            // length instead persuades the prologue's bounds checks to let
            // decoding proceed.
            (opcode::CALLDATASIZE, _) => {
                self.vm.stack_mut().pop()?;
                self.vm
                    .stack_mut()
                    .push_uint(U256::from(SPOOFED_CALLDATA_SIZE as u128))?;
            }

            (opcode::CALLDATALOAD, Observed::Word(offset)) => match offset.tag {
                // Loading through a head slot means the slot held a pointer
                // and the word just read is a length prefix. Only `bytes`
                // starts this way; array evidence can overwrite it later.
                Tag::Arg { offset: head, .. } => {
                    self.arguments.insert(head, Some(AbiType::DynBytes));
                    self.retag(TaggedWord::new(
                        U256::ONE,
                        Tag::ArgDynamicLength { offset: head },
                    ))?;
                }

                // Loading through a payload cursor reads an element of the
                // dynamic argument.
                Tag::ArgDynamic { offset: head } => {
                    self.retag(TaggedWord::new(
                        U256::ZERO,
                        Tag::Arg {
                            offset:  head,
                            dynamic: true,
                        },
                    ))?;
                }

                // A concrete offset in the argument region registers a new
                // head slot of as-yet-unknown type.
                _ => {
                    let value = offset.value;
                    if value >= U256::from(ARGUMENT_OFFSET_MIN) && value < U256::from(1_u64 << 32) {
                        let head = value.as_u32();
                        self.retag(TaggedWord::new(
                            U256::ZERO,
                            Tag::Arg {
                                offset:  head,
                                dynamic: false,
                            },
                        ))?;
                        self.arguments.entry(head).or_insert(None);
                    }
                }
            },

            (opcode::ADD, Observed::Words(first, second)) => {
                if let Some((head, dynamic, other)) = argument_operand(first, second) {
                    // Adding exactly the selector width is the compiler
                    // skipping the selector; the word is still the same head
                    // slot. Any other addend turns it into a payload cursor.
                    let sum = self.vm.stack_mut().pop()?;
                    let tag = if other.value == U256::from(ARGUMENT_OFFSET_MIN) {
                        Tag::Arg {
                            offset: head,
                            dynamic,
                        }
                    } else {
                        Tag::ArgDynamic { offset: head }
                    };
                    self.vm.stack_mut().push(TaggedWord::new(sum.value, tag))?;
                } else if let Some(head) = dynamic_pointer_operand(first, second) {
                    // Arithmetic on a cursor advances it within the payload.
                    let sum = self.vm.stack_mut().pop()?;
                    self.vm
                        .stack_mut()
                        .push(TaggedWord::new(sum.value, Tag::ArgDynamic { offset: head }))?;
                }
            }

            // Scaling a length prefix by the word size is how array access
            // code computes its extent: shifting left by five or
            // multiplying by 32.
            (opcode::SHL, Observed::Words(shift, value)) => {
                if let Tag::ArgDynamicLength { offset } = value.tag {
                    if shift.value == U256::from(5_u32) {
                        self.arguments
                            .insert(offset, Some(AbiType::word().into_dyn_array()));
                    }
                }
            }

            (opcode::MUL, Observed::Words(first, second)) => {
                let scaled = match (first.tag, second.tag) {
                    (Tag::ArgDynamicLength { offset }, _) => Some((offset, second.value)),
                    (_, Tag::ArgDynamicLength { offset }) => Some((offset, first.value)),
                    _ => None,
                };
                if let Some((offset, factor)) = scaled {
                    if factor == U256::from(32_u32) {
                        self.arguments
                            .insert(offset, Some(AbiType::word().into_dyn_array()));
                    }
                }
            }

            // Masking an argument word undoes its ABI padding, and the mask
            // shape names the type.
            (opcode::AND, Observed::Words(first, second)) => {
                if let Some((head, dynamic, other)) = argument_operand(first, second) {
                    if let Some(inferred) = mask::type_of_mask(other.value) {
                        let inferred = if dynamic {
                            inferred.into_dyn_array()
                        } else {
                            inferred
                        };
                        self.arguments.insert(head, Some(inferred));
                    }
                }
            }

            // Booleans are normalised with a double ISZERO; the first one
            // is remembered so the second can prove the type.
            (opcode::ISZERO, Observed::Word(word)) => match word.tag {
                Tag::Arg { offset, dynamic } => {
                    let result = self.vm.stack_mut().pop()?;
                    self.vm.stack_mut().push(TaggedWord::new(
                        result.value,
                        Tag::IsZeroResult { offset, dynamic },
                    ))?;
                }
                Tag::IsZeroResult { offset, dynamic } => {
                    let inferred = if dynamic {
                        AbiType::Bool.into_dyn_array()
                    } else {
                        AbiType::Bool
                    };
                    self.arguments.insert(offset, Some(inferred));
                }
                _ => {}
            },

            // Sign extension only ever targets signed integers, and the
            // width operand says how wide.
            (opcode::SIGNEXTEND, Observed::WidthAndWord { width, word }) => {
                if let Tag::Arg { offset, dynamic } = word.tag {
                    if *width < U256::from(32_u32) {
                        let size = (width.as_u16() + 1) * 8;
                        let inferred = AbiType::Int { size };
                        let inferred = if dynamic {
                            inferred.into_dyn_array()
                        } else {
                            inferred
                        };
                        self.arguments.insert(offset, Some(inferred));
                    }
                }
            }

            // Single-byte extraction is the signature of `bytes32`
            // handling, but only counts when nothing better is known.
            (opcode::BYTE, Observed::Words(_, value)) => {
                if let Tag::Arg { offset, .. } = value.tag {
                    if let Some(slot @ None) = self.arguments.get_mut(&offset) {
                        *slot = Some(AbiType::Bytes { length: 32 });
                    }
                }
            }

            _ => {}
        }

        Ok(())
    }

    /// Replaces the word on top of the stack, which the rules use to
    /// upgrade the provenance of an instruction's freshly pushed result.
    fn retag(&mut self, word: TaggedWord) -> Result<(), Error> {
        self.vm.stack_mut().pop()?;
        self.vm.stack_mut().push(word)
    }

    /// Renders the recovered layout, ordered by ascending head slot offset,
    /// with untyped head slots defaulting to the plain word type.
    fn render(&self) -> String {
        self.arguments
            .values()
            .map(|inferred| {
                inferred
                    .clone()
                    .unwrap_or_else(AbiType::word)
                    .to_string()
            })
            .join(",")
    }
}

/// Finds a [`Tag::Arg`]-tagged operand among the two reported ones,
/// returning its head slot offset and dynamic flag together with the other
/// operand. The first-popped operand wins if both qualify.
fn argument_operand(first: &TaggedWord, second: &TaggedWord) -> Option<(u32, bool, TaggedWord)> {
    match (first.tag, second.tag) {
        (Tag::Arg { offset, dynamic }, _) => Some((offset, dynamic, *second)),
        (_, Tag::Arg { offset, dynamic }) => Some((offset, dynamic, *first)),
        _ => None,
    }
}

/// Finds a [`Tag::ArgDynamic`]-tagged operand among the two reported ones,
/// returning its head slot offset. The first-popped operand wins if both
/// qualify.
fn dynamic_pointer_operand(first: &TaggedWord, second: &TaggedWord) -> Option<u32> {
    match (first.tag, second.tag) {
        (Tag::ArgDynamic { offset }, _) | (_, Tag::ArgDynamic { offset }) => Some(offset),
        _ => None,
    }
}
