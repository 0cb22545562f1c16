//! Import extraction error types.

use thiserror::Error;

/// Errors raised while extracting and emitting import descriptors.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A non-`func` import was found outside an annotated record.
    #[error("import kind `{kind}` on `{function}` requires an enclosing annotated record")]
    MissingClassName { kind: String, function: String },
    /// Writing to the output sink failed.
    #[error("failed to write import descriptor: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization of a descriptor failed.
    #[error("failed to serialize import descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a declaration frontend.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source of a translation unit is not valid syntax.
    #[error("syntax error in {file}: {message}")]
    Syntax { file: String, message: String },
}
