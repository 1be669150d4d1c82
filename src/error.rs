//! Errors surfaced by archive generation.
//!
//! Parsing has no error type: its problems are `Diagnostic`s in the IR.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The IR handed to the generator is missing required structure.
    #[error("invalid parsed code: {0}")]
    InvalidInput(String),

    /// An extension payload could not be read.
    #[error("failed to add extension file {file}: {source}")]
    ExtensionPayload {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("blocks serialisation failed: {0}")]
    Xml(#[from] xmltree::Error),

    #[error("form serialisation failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GenerateError {
    /// `true` for problems with the caller's input, `false` for failures
    /// while packaging.
    pub fn is_input_error(&self) -> bool {
        matches!(self, GenerateError::InvalidInput(_))
    }
}

pub type GenerateResult<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_errors_name_the_file() {
        let err = GenerateError::ExtensionPayload {
            file: "Gestures.aix".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to add extension file Gestures.aix: gone");
        assert!(!err.is_input_error());
        assert!(GenerateError::InvalidInput("no events".into()).is_input_error());
    }
}
