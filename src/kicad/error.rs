//! Error types for KiCad symbol library reading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for KiCad library operations.
pub type KicadResult<T> = Result<T, KicadError>;

/// Errors that can occur while reading a `.kicad_sym` file.
#[derive(Debug, Error)]
pub enum KicadError {
    /// Failed to open or read the file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Malformed S-expression text.
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where the error occurred.
        offset: usize,
        /// Description of what's wrong.
        message: String,
    },

    /// A symbol entry is missing required data.
    #[error("Invalid symbol: {message}")]
    InvalidSymbol {
        /// Description of what's wrong.
        message: String,
    },

    /// The document is not a symbol library.
    #[error("Wrong file type: expected {expected}, got {actual}")]
    WrongFileType {
        /// Expected root expression.
        expected: String,
        /// Root expression actually found.
        actual: String,
    },
}

impl KicadError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse_error(offset: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Creates an invalid symbol error.
    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            message: message.into(),
        }
    }

    /// Creates a wrong file type error.
    pub fn wrong_file_type(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::WrongFileType {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = KicadError::parse_error(42, "unbalanced parenthesis");
        assert_eq!(
            err.to_string(),
            "Parse error at offset 42: unbalanced parenthesis"
        );
    }

    #[test]
    fn wrong_file_type_error_display() {
        let err = KicadError::wrong_file_type("kicad_symbol_lib", "kicad_pcb");
        assert_eq!(
            err.to_string(),
            "Wrong file type: expected kicad_symbol_lib, got kicad_pcb"
        );
    }
}
