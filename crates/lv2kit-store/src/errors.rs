use std::io;
use thiserror::Error;

/// Errors that can occur while reading statements into a model
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Turtle syntax error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid base IRI <{base}>: {message}")]
    InvalidBase { base: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = StoreError::Parse {
            line: 3,
            column: 7,
            message: "expected '.'".to_string(),
        };
        assert_eq!(err.to_string(), "Turtle syntax error at 3:7: expected '.'");
    }
}
