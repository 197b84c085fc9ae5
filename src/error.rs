//! Error types for lanewise operations.
//!
//! Every condition reported here is a programming error detected eagerly at the
//! offending call. Nothing is retried and no partial result is ever produced.

use std::fmt;

/// Errors that can occur during vector operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanewiseError {
    /// Operands bound to different species were combined.
    SpeciesMismatch {
        /// Species of the receiver.
        expected: String,
        /// Species of the offending operand.
        found: String,
    },
    /// A lane index, slice origin, part number, memory offset or dereferenced
    /// exceptional shuffle index fell outside its permitted range.
    IndexOutOfBounds {
        /// The offending index.
        index: i64,
        /// The exclusive upper bound that was violated.
        length: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A conversion named an element kind outside the six supported kinds.
    UnsupportedElementKind {
        /// The name that failed to resolve.
        name: String,
    },
    /// The operation is not defined for the element kind (e.g. bitwise AND on
    /// floating lanes).
    UnsupportedOperation {
        /// Human-readable error message.
        message: String,
    },
    /// An argument violated the contract of the call (lane count mismatch,
    /// negative lane shift, ...).
    IllegalArgument {
        /// Human-readable error message.
        message: String,
    },
    /// Integral division by zero in an active lane.
    Arithmetic {
        /// Human-readable error message.
        message: String,
    },
    /// A byte buffer was in the wrong byte order or was read-only.
    BufferContract {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for LanewiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanewiseError::SpeciesMismatch { expected, found } => {
                write!(f, "Species mismatch: expected {expected}, found {found}")
            }
            LanewiseError::IndexOutOfBounds {
                index,
                length,
                message,
            } => write!(
                f,
                "Index out of bounds: {message} (index {index}, length {length})"
            ),
            LanewiseError::UnsupportedElementKind { name } => {
                write!(f, "Unsupported element kind: {name}")
            }
            LanewiseError::UnsupportedOperation { message } => {
                write!(f, "Unsupported operation: {message}")
            }
            LanewiseError::IllegalArgument { message } => {
                write!(f, "Illegal argument: {message}")
            }
            LanewiseError::Arithmetic { message } => write!(f, "Arithmetic error: {message}"),
            LanewiseError::BufferContract { message } => {
                write!(f, "Buffer contract violation: {message}")
            }
        }
    }
}

impl std::error::Error for LanewiseError {}

/// Result type alias for lanewise operations.
pub type Result<T> = std::result::Result<T, LanewiseError>;

/// Creates a species mismatch error.
pub fn species_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> LanewiseError {
    LanewiseError::SpeciesMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Creates an index out of bounds error.
pub fn index_out_of_bounds(index: i64, length: usize, message: impl Into<String>) -> LanewiseError {
    LanewiseError::IndexOutOfBounds {
        index,
        length,
        message: message.into(),
    }
}

/// Creates an unsupported element kind error.
pub fn unsupported_element_kind(name: impl Into<String>) -> LanewiseError {
    LanewiseError::UnsupportedElementKind { name: name.into() }
}

/// Creates an unsupported operation error.
pub fn unsupported_operation(message: impl Into<String>) -> LanewiseError {
    LanewiseError::UnsupportedOperation {
        message: message.into(),
    }
}

/// Creates an illegal argument error.
pub fn illegal_argument(message: impl Into<String>) -> LanewiseError {
    LanewiseError::IllegalArgument {
        message: message.into(),
    }
}

/// Creates an arithmetic error.
pub fn arithmetic_error(message: impl Into<String>) -> LanewiseError {
    LanewiseError::Arithmetic {
        message: message.into(),
    }
}

/// Creates a buffer contract error.
pub fn buffer_contract(message: impl Into<String>) -> LanewiseError {
    LanewiseError::BufferContract {
        message: message.into(),
    }
}

/// Checks `index` against `[0, length)`.
pub(crate) fn check_index(index: i64, length: usize, what: &str) -> Result<usize> {
    if index < 0 || index as u64 >= length as u64 {
        return Err(index_out_of_bounds(
            index,
            length,
            format!("{what} out of range"),
        ));
    }
    Ok(index as usize)
}
