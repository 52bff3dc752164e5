/*!
 * Error types for captionkit.
 *
 * Recoverable markup problems never show up here: readers repair them and
 * log what they did. These errors cover input that is not a caption file at
 * all, documents that break their own invariants, and configuration issues.
 */

use thiserror::Error;

use crate::formats::CaptionFormat;

/// Errors produced by caption readers, writers and configuration loading
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The input does not have the structure of the expected format
    #[error("Malformed {format} document: {reason}")]
    MalformedDocument {
        /// Format the reader expected
        format: CaptionFormat,
        /// Which structural expectation was not met
        reason: String,
    },

    /// A document handed to a writer violates the model invariants
    #[error("Invalid document for {format} output: {reason}")]
    InvalidDocument {
        /// Format the writer was producing
        format: CaptionFormat,
        /// Which invariant was broken
        reason: String,
    },

    /// No reader exists for the requested input format
    #[error("Reading {0} is not supported")]
    UnsupportedReader(CaptionFormat),

    /// XML serialization failed
    #[error("XML error: {0}")]
    Xml(String),

    /// Configuration could not be parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptionError {
    /// Shorthand for a `MalformedDocument` error
    pub fn malformed(format: CaptionFormat, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            format,
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvalidDocument` error
    pub fn invalid(format: CaptionFormat, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            format,
            reason: reason.into(),
        }
    }

    /// Format involved in the failure, when there is one
    pub fn format(&self) -> Option<CaptionFormat> {
        match self {
            Self::MalformedDocument { format, .. } | Self::InvalidDocument { format, .. } => {
                Some(*format)
            }
            Self::UnsupportedReader(format) => Some(*format),
            Self::Xml(_) => Some(CaptionFormat::Dfxp),
            Self::Config(_) => None,
        }
    }
}

impl From<anyhow::Error> for CaptionError {
    fn from(error: anyhow::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<serde_json::Error> for CaptionError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CaptionError>;
