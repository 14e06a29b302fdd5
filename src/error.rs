//! Implements the custom `PolycrysError` class for the library.

use std::{error, fmt, result};

#[derive(Debug, Clone, PartialEq)]
/// A class for input or generation errors.
pub enum PolycrysError {
    /// Geometry input was malformed: a non-positive box, an empty basis,
    /// a zero rotation axis or a non-finite coordinate.
    InvalidInput(String),
    /// An internal invariant did not hold while generating the structure,
    /// eg. a grain which ended up without any atoms.
    GenerationFailure(String),
}

/// Shorthand for our `Result` class.
pub type Result<T> = result::Result<T, PolycrysError>;

impl PolycrysError {
    /// Construct an `InvalidInput` error from anything printable.
    pub fn invalid<T: fmt::Display>(msg: T) -> PolycrysError {
        PolycrysError::InvalidInput(msg.to_string())
    }

    /// Construct a `GenerationFailure` error from anything printable.
    pub fn failure<T: fmt::Display>(msg: T) -> PolycrysError {
        PolycrysError::GenerationFailure(msg.to_string())
    }
}

impl fmt::Display for PolycrysError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PolycrysError::InvalidInput(ref err) => write!(f, "invalid input: {}", err),
            PolycrysError::GenerationFailure(ref err) => write!(f, "generation failed: {}", err),
        }
    }
}

impl error::Error for PolycrysError {
    fn description(&self) -> &str {
        match *self {
            PolycrysError::InvalidInput(ref err) => &err,
            PolycrysError::GenerationFailure(ref err) => &err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_error_kind() {
        let err = PolycrysError::invalid("empty basis");
        assert_eq!("invalid input: empty basis", format!("{}", err));

        let err = PolycrysError::failure("grain 3 is empty");
        assert_eq!("generation failed: grain 3 is empty", format!("{}", err));
    }
}
