use thiserror::Error;

/// Everything that can go wrong while scanning a story file.
///
/// Scanning is fail-fast: the first error aborts the parse and no partial
/// document is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Unrecognized directive `@{name}` on line {line}")]
    UnrecognizedDirective { name: String, line: usize },

    #[error("Missing required value for `@{directive}` on line {line}")]
    MissingRequiredValue { directive: &'static str, line: usize },

    #[error("Invalid value `{value}` for `@{directive}` on line {line}")]
    InvalidEnumValue {
        directive: &'static str,
        value: String,
        line: usize,
    },

    #[error("Malformed directive syntax at `{found}` on line {line}")]
    MalformedDirectiveSyntax { found: String, line: usize },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: &'static str },
}
