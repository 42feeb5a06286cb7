use std::fmt::Formatter;

use thiserror::Error;

/// An error that is localised to a particular byte-offset location in the
/// bytecode.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct Located<E>
where
    E: Clone,
{
    /// The byte offset in the bytecode where the error occurred.
    pub location: u32,

    /// The error data
    pub payload: E,
}

/// Displays the error associated with the hexadecimal-encoded byte offset in
/// the bytecode where the error occurred.
impl<E> std::fmt::Display for Located<E>
where
    E: std::fmt::Display + Clone,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[0x{:04x}]: {}", self.location, self.payload)
    }
}

/// A trait for types that can have a byte-offset location attached to them.
pub trait Locatable
where
    Self: Sized,
{
    /// The return type with the attached byte-offset location.
    type Located;

    /// Attach the location described by `instruction_pointer` (a byte offset
    /// in the bytecode) to the error.
    fn locate(self, instruction_pointer: u32) -> Self::Located;
}

/// A blanket implementation that allows for attaching a location to any
/// result.
impl<T, E> Locatable for Result<T, E>
where
    E: std::error::Error + Clone,
{
    type Located = Result<T, Located<E>>;

    fn locate(self, instruction_pointer: u32) -> Self::Located {
        self.map_err(|e| Located {
            location: instruction_pointer,
            payload:  e,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::error::{
        container::{Locatable, Located},
        execution,
    };

    #[test]
    fn can_attach_a_location_to_an_error() {
        let result: Result<(), execution::Error> =
            Err(execution::Error::UnsupportedOpcode { opcode: 0x54 });
        let located = result.locate(0x2a).expect_err("Error was lost");

        assert_eq!(located.location, 0x2a);
        assert_eq!(
            located.payload,
            execution::Error::UnsupportedOpcode { opcode: 0x54 }
        );
    }

    #[test]
    fn displays_the_location_alongside_the_payload() {
        let located = Located {
            location: 0x11,
            payload:  execution::Error::UnsupportedOpcode { opcode: 0x54 },
        };

        assert_eq!(
            located.to_string(),
            "[0x0011]: the opcode SLOAD is not supported"
        );
    }
}
