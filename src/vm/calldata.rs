//! This module contains the calldata buffer that the interpreter reads
//! arguments from.

use ethnum::U256;

use crate::constant::WORD_SIZE_BYTES;

/// The immutable input byte array of a call: the selector followed by the
/// ABI-encoded arguments.
///
/// During argument recovery the buffer holds only the four selector bytes,
/// so every read beyond them yields zeroes; the driver makes the bytecode
/// believe the buffer is much longer than it is.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallData {
    data: Vec<u8>,
}

impl CallData {
    /// Creates a new calldata buffer holding the provided `data`.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Reads `size` bytes starting at the provided byte `offset`,
    /// right-padding with zeroes where the read extends past the end of the
    /// buffer.
    #[must_use]
    pub fn load(&self, offset: usize, size: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; size];
        if offset < self.data.len() {
            let available = &self.data[offset..];
            let count = available.len().min(size);
            bytes[..count].copy_from_slice(&available[..count]);
        }
        bytes
    }

    /// Reads the 256-bit word starting at the provided byte `offset`,
    /// right-padding with zeroes where the read extends past the end of the
    /// buffer.
    #[must_use]
    pub fn load_word(&self, offset: usize) -> U256 {
        let bytes = self.load(offset, WORD_SIZE_BYTES);
        let mut word = [0u8; WORD_SIZE_BYTES];
        word.copy_from_slice(&bytes);
        U256::from_be_bytes(word)
    }

    /// Gets the actual byte length of the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether the buffer contains no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod test {
    use ethnum::U256;

    use crate::vm::calldata::CallData;

    #[test]
    fn loads_are_right_padded_with_zeroes() {
        let calldata = CallData::new(vec![0xcd, 0xcd, 0x77, 0xc0]);

        let bytes = calldata.load(2, 4);
        assert_eq!(bytes, vec![0x77, 0xc0, 0x00, 0x00]);

        let word = calldata.load_word(0);
        let mut expected = [0u8; 32];
        expected[..4].copy_from_slice(&[0xcd, 0xcd, 0x77, 0xc0]);
        assert_eq!(word, U256::from_be_bytes(expected));
    }

    #[test]
    fn loads_past_the_end_are_zero() {
        let calldata = CallData::new(vec![0xcd, 0xcd, 0x77, 0xc0]);
        assert_eq!(calldata.load_word(4), U256::ZERO);
        assert_eq!(calldata.load_word(usize::MAX), U256::ZERO);
    }

    #[test]
    fn reports_its_true_length() {
        let calldata = CallData::new(vec![0xcd, 0xcd, 0x77, 0xc0]);
        assert_eq!(calldata.len(), 4);
        assert!(!calldata.is_empty());
    }
}
