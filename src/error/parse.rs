//! This module contains errors that arise while ingesting the caller's input
//! before any analysis begins.

use thiserror::Error;

use crate::constant::SELECTOR_SIZE_BYTES;

/// Errors that occur when parsing bytecode or selector input.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// The provided string was not valid, even-length hexadecimal.
    #[error("invalid hexadecimal input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The provided selector did not contain exactly
    /// [`SELECTOR_SIZE_BYTES`] bytes.
    #[error("a selector is {SELECTOR_SIZE_BYTES} bytes but {actual} were provided")]
    InvalidSelectorLength { actual: usize },
}

/// The result type for input parsing.
pub type Result<T> = std::result::Result<T, Error>;
