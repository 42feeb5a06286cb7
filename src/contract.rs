//! This module contains types useful for dealing with the concrete contract
//! and function that you want to analyze.

use crate::{
    constant::SELECTOR_SIZE_BYTES,
    error::{parse, Result},
};

/// A representation of a contract's runtime bytecode as passed to the
/// library.
///
/// This must be the _deployed_ (runtime) bytecode, not the deployment
/// (creation) bytecode, as argument recovery walks the dispatcher that only
/// exists in the former.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contract {
    bytecode: Vec<u8>,
}

impl Contract {
    /// Creates a new contract from the provided raw `bytecode`.
    #[must_use]
    pub fn new(bytecode: Vec<u8>) -> Self {
        Self { bytecode }
    }

    /// Creates a new contract from hexadecimal-encoded bytecode, with or
    /// without the leading `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `code` is not valid, even-length hexadecimal.
    pub fn from_hex(code: impl AsRef<str>) -> Result<Self> {
        let bytecode = decode_hex(code.as_ref())?;
        Ok(Self::new(bytecode))
    }

    /// Gets a reference to the bytecode of the contract.
    #[must_use]
    pub fn bytecode(&self) -> &[u8] {
        self.bytecode.as_slice()
    }
}

/// The 4-byte selector of the function whose arguments are being recovered.
///
/// It is the first four bytes of the Keccak-256 hash of the canonical
/// function signature. Computing it is the caller's job; the library only
/// needs the bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Selector([u8; SELECTOR_SIZE_BYTES]);

impl Selector {
    /// Creates a new selector from the provided `bytes`.
    #[must_use]
    pub fn new(bytes: [u8; SELECTOR_SIZE_BYTES]) -> Self {
        Self(bytes)
    }

    /// Creates a new selector from a hexadecimal string, with or without the
    /// leading `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `selector` is not valid hexadecimal or does not
    /// describe exactly [`SELECTOR_SIZE_BYTES`] bytes.
    pub fn from_hex(selector: impl AsRef<str>) -> Result<Self> {
        let bytes = decode_hex(selector.as_ref())?;
        Self::try_from(bytes.as_slice())
    }

    /// Gets the bytes of the selector.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SELECTOR_SIZE_BYTES] {
        &self.0
    }
}

impl From<[u8; SELECTOR_SIZE_BYTES]> for Selector {
    fn from(bytes: [u8; SELECTOR_SIZE_BYTES]) -> Self {
        Self::new(bytes)
    }
}

impl TryFrom<&[u8]> for Selector {
    type Error = crate::error::Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SELECTOR_SIZE_BYTES] = bytes.try_into().map_err(|_| {
            parse::Error::InvalidSelectorLength {
                actual: bytes.len(),
            }
        })?;
        Ok(Self::new(bytes))
    }
}

/// Decodes the provided hexadecimal `input`, tolerating a leading `0x`.
fn decode_hex(input: &str) -> parse::Result<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    Ok(hex::decode(digits)?)
}
