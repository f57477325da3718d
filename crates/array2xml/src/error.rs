//! Error types for tree/XML conversion.

use thiserror::Error;

/// Errors that can occur when converting between node trees and XML.
#[derive(Debug, Error)]
pub enum Error {
    /// An element name failed the XML name legality check.
    #[error("illegal character in tag name `{name}` inside element `{parent}`")]
    IllegalTagName { name: String, parent: String },

    /// An attribute name failed the XML name legality check.
    #[error("illegal character in attribute name `{name}` of element `{element}`")]
    IllegalAttributeName { name: String, element: String },

    /// Input text could not be parsed as a well-formed XML document.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// XML output could not be produced.
    #[error("XML write error: {0}")]
    Write(String),

    /// A configuration override record did not resolve.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
