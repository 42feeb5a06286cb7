//! This module contains the primary error type for the library's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.
//!
//! Note that argument recovery itself never returns an error: every
//! exceptional interpreter condition simply ends the analysis, and whatever
//! has been inferred by that point is returned. The only errors a caller can
//! observe come from the explicit input-parsing constructors.

pub mod container;
pub mod execution;
pub mod parse;

use thiserror::Error;

/// The interface result type for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by
/// the clients of the library) are members of this enum.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Errors from parsing caller-provided bytecode or selectors.
    #[error(transparent)]
    Parse(#[from] parse::Error),

    /// Errors from the interpreter subsystem of the library.
    ///
    /// These are only observable when driving the [`crate::vm::Vm`] directly;
    /// argument recovery swallows them as its termination signal.
    #[error(transparent)]
    Execution(#[from] execution::LocatedError),
}
