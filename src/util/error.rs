//! Error types for capture reduction.

use thiserror::Error;

/// Main error type for capture parsing and reduction.
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer than three keyframes, nothing can be reduced
    #[error("There must be at least 3 capture frames (found {found})")]
    TooFewFrames { found: usize },

    /// Text is not an array of keyframe rows
    #[error("Malformed capture data: {0}")]
    MalformedInput(String),

    /// A row or vector has the wrong number of elements
    #[error("Wrong shape at row {row}, {field}: expected {expected} elements, got {actual}")]
    WrongShape {
        row: usize,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A slot holds a value of the wrong JSON type
    #[error("Wrong type at row {row}, {field}: expected {expected}")]
    WrongType {
        row: usize,
        field: &'static str,
        expected: &'static str,
    },

    /// Threshold text is not a usable number
    #[error("Invalid threshold: {0:?}")]
    InvalidThreshold(String),

    /// Reduction settings failed to load or validate
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// The sweep lost track of a frame. Always an engine bug, never bad input.
    #[error("Internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed input error from any displayable cause.
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        Self::MalformedInput(msg.to_string())
    }

    /// True for errors caused by the capture text itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::TooFewFrames { .. }
                | Self::MalformedInput(_)
                | Self::WrongShape { .. }
                | Self::WrongType { .. }
        )
    }

    /// Create an internal invariant violation error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalInvariantViolation(msg.into())
    }

    /// True for engine bugs that should be reported apart from user errors.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalInvariantViolation(_))
    }

    /// Short message suitable for showing to whoever submitted the capture.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedInput(_) | Self::WrongShape { .. } | Self::WrongType { .. } => {
                "Invalid UnitCapture Output".to_string()
            }
            Self::InvalidThreshold(_) => "Invalid error threshold".to_string(),
            Self::InternalInvariantViolation(_) => format!("internal error: {}", self),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::TooFewFrames { found: 2 };
        assert!(e.to_string().contains("at least 3"));
        assert!(e.to_string().contains('2'));

        let e = Error::WrongShape { row: 4, field: "row", expected: 5, actual: 4 };
        assert!(e.to_string().contains("row 4"));
        assert!(e.to_string().contains("expected 5"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::malformed("eof").is_input_error());
        assert!(Error::TooFewFrames { found: 0 }.is_input_error());

        let internal = Error::internal("window start is frame 4, expected frame 3");
        assert!(internal.is_internal());
        assert!(!internal.is_input_error());
        assert!(internal.user_message().starts_with("internal error"));
    }

    #[test]
    fn test_user_messages() {
        let shape = Error::WrongType { row: 0, field: "time", expected: "number" };
        assert_eq!(shape.user_message(), "Invalid UnitCapture Output");
        assert_eq!(
            Error::InvalidThreshold("abc".into()).user_message(),
            "Invalid error threshold"
        );
        let few = Error::TooFewFrames { found: 1 };
        assert_eq!(few.user_message(), few.to_string());
    }
}
