//! Error types for order link extraction

use crate::types::MessageId;
use thiserror::Error;

/// Step of the fixed mixed → alternative → html descent that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeStep {
    /// The root part was not `multipart/mixed`
    MixedRoot,
    /// No `multipart/alternative` child under the root
    Alternative,
    /// No `text/html` child inside the alternative part
    Html,
}

impl ShapeStep {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MixedRoot => "expected multipart/mixed at root",
            Self::Alternative => "no multipart/alternative child",
            Self::Html => "no text/html child in alternative part",
        }
    }
}

/// Errors that can occur while extracting order links
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The MIME tree does not have the expected shape
    #[error("{}: expected {}, found [{}]", .step.describe(), .expected, .found.join(", "))]
    Shape {
        step: ShapeStep,
        expected: &'static str,
        found: Vec<String>,
    },

    /// The body payload could not be decoded
    #[error("Failed to decode body: {0}")]
    Decode(String),

    /// A search or fetch call failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The search service handed back a cursor it was already given
    #[error("Search service repeated cursor {0:?}")]
    RepeatedCursor(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A failure tied to a specific message
    #[error("message {id}: {source}")]
    Message {
        id: MessageId,
        #[source]
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    /// Attach the id of the message being processed
    #[must_use]
    pub fn for_message(self, id: &MessageId) -> Self {
        match self {
            Self::Message { .. } => self,
            other => Self::Message {
                id: id.clone(),
                source: Box::new(other),
            },
        }
    }

    /// The shape step that failed, if this is a shape error
    #[must_use]
    pub fn shape_step(&self) -> Option<ShapeStep> {
        match self {
            Self::Shape { step, .. } => Some(*step),
            Self::Message { source, .. } => source.shape_step(),
            _ => None,
        }
    }
}

/// Result type for order link extraction
pub type Result<T> = std::result::Result<T, ExtractError>;
