//! Errors when executing the binary.

use polycrys::error::PolycrysError;

use colored::*;
use serde_json;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::io;
use std::result;

/// Shorthand for our `Result` class.
pub type Result<T> = result::Result<T, PolycrysCliError>;

#[derive(Debug)]
/// A class for configuration or runtime errors.
pub enum PolycrysCliError {
    /// Something went wrong when reading or writing.
    IoError(io::Error),
    /// The run configuration could not be read or was inconsistent.
    ConfigError(String),
    /// Something went wrong when creating the system.
    RunError(PolycrysError),
}

impl Error for PolycrysCliError {
    fn description(&self) -> &str {
        match *self {
            PolycrysCliError::IoError(ref err) => err.description(),
            PolycrysCliError::ConfigError(ref err) => err,
            PolycrysCliError::RunError(ref err) => err.description(),
        }
    }
}

impl Display for PolycrysCliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let red_error = "error:".color("red");

        match *self {
            PolycrysCliError::IoError(ref err) => {
                write!(f, "{} {}", red_error, err)
            },
            PolycrysCliError::ConfigError(ref err) => {
                write!(f, "{} {}", red_error, err.as_str().color("yellow"))
            },
            PolycrysCliError::RunError(ref err) => {
                write!(f, "{} {}", red_error, err)
            },
        }
    }
}

impl From<io::Error> for PolycrysCliError {
    fn from(err: io::Error) -> PolycrysCliError {
        PolycrysCliError::IoError(err)
    }
}

impl From<serde_json::Error> for PolycrysCliError {
    fn from(err: serde_json::Error) -> PolycrysCliError {
        PolycrysCliError::ConfigError(format!("could not parse configuration: {}", err))
    }
}

impl From<PolycrysError> for PolycrysCliError {
    fn from(err: PolycrysError) -> PolycrysCliError {
        PolycrysCliError::RunError(err)
    }
}
