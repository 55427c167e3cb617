use thiserror::Error;

/// Errors produced while turning a [`Value`](crate::Value) into a point definition.
///
/// Parsing is all-or-nothing: when any of these is returned no definition exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed point definition at keyframe {index}: {reason}")]
    MalformedShape { index: usize, reason: String },
    #[error("point definition contains no keyframes")]
    Empty,
    #[error("point definition json parse error: {0}")]
    InvalidJson(String),
}

impl ParseError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedShape {
            index,
            reason: reason.into(),
        }
    }
}
