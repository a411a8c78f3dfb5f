// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for sdfcodec.
//!
//! Every failure aborts the current encode or decode call:
//! - Encoding values the codec cannot represent
//! - Malformed or truncated input
//! - Registry conflicts
//! - Failures reported by user marshal hooks

use std::fmt;

/// Errors that can occur while encoding, decoding or registering types.
#[derive(Debug, Clone, PartialEq)]
pub enum SdfError {
    /// No codec applies to the value at this position
    UnsupportedType {
        /// Kind of the offending value
        type_name: String,
        /// Why it cannot be encoded here
        reason: String,
    },

    /// Tag byte is not valid at this position
    UnknownTag {
        /// The tag that was read
        tag: u8,
        /// Position of the tag in the input
        position: usize,
    },

    /// A length or count claims more bytes than remain
    Truncated {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        position: usize,
    },

    /// Registered type name is unknown to the registry
    UnknownType {
        /// Type name, or `#<id>` when a cache id could not be resolved
        name: String,
    },

    /// Name is already registered with a different shape
    NameTaken {
        /// Conflicting name
        name: String,
    },

    /// Marshal hook of a registered type failed
    MarshalFailed {
        /// Registered type name
        type_name: String,
        /// Underlying error
        cause: String,
    },

    /// Unmarshal hook of a registered type failed
    UnmarshalFailed {
        /// Registered type name
        type_name: String,
        /// Underlying error
        cause: String,
    },

    /// Nesting exceeded the configured depth limit
    TooDeep {
        /// Configured limit
        limit: usize,
    },

    /// Input is well-formed at the tag level but its payload is invalid
    InvalidData {
        /// What was being decoded
        context: String,
        /// Error message
        message: String,
    },

    /// Other error
    Other(String),
}

impl SdfError {
    /// Create an unsupported type error.
    pub fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SdfError::UnsupportedType {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown tag error.
    pub fn unknown_tag(tag: u8, position: usize) -> Self {
        SdfError::UnknownTag { tag, position }
    }

    /// Create a truncated input error.
    pub fn truncated(requested: usize, available: usize, position: usize) -> Self {
        SdfError::Truncated {
            requested,
            available,
            position,
        }
    }

    /// Create an unknown registered type error.
    pub fn unknown_type(name: impl Into<String>) -> Self {
        SdfError::UnknownType { name: name.into() }
    }

    /// Create a name taken error.
    pub fn name_taken(name: impl Into<String>) -> Self {
        SdfError::NameTaken { name: name.into() }
    }

    /// Wrap a marshal hook failure.
    pub fn marshal_failed(type_name: impl Into<String>, cause: impl fmt::Display) -> Self {
        SdfError::MarshalFailed {
            type_name: type_name.into(),
            cause: cause.to_string(),
        }
    }

    /// Wrap an unmarshal hook failure.
    pub fn unmarshal_failed(type_name: impl Into<String>, cause: impl fmt::Display) -> Self {
        SdfError::UnmarshalFailed {
            type_name: type_name.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a depth limit error.
    pub fn too_deep(limit: usize) -> Self {
        SdfError::TooDeep { limit }
    }

    /// Create an invalid payload error.
    pub fn invalid_data(context: impl Into<String>, message: impl Into<String>) -> Self {
        SdfError::InvalidData {
            context: context.into(),
            message: message.into(),
        }
    }

    /// True for errors caused by malformed or incomplete input.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            SdfError::UnknownTag { .. }
                | SdfError::Truncated { .. }
                | SdfError::UnknownType { .. }
                | SdfError::UnmarshalFailed { .. }
                | SdfError::TooDeep { .. }
                | SdfError::InvalidData { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            SdfError::UnsupportedType { type_name, reason } => {
                vec![("type", type_name.clone()), ("reason", reason.clone())]
            }
            SdfError::UnknownTag { tag, position } => vec![
                ("tag", tag.to_string()),
                ("position", position.to_string()),
            ],
            SdfError::Truncated {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            SdfError::UnknownType { name } => vec![("type", name.clone())],
            SdfError::NameTaken { name } => vec![("name", name.clone())],
            SdfError::MarshalFailed { type_name, cause }
            | SdfError::UnmarshalFailed { type_name, cause } => {
                vec![("type", type_name.clone()), ("cause", cause.clone())]
            }
            SdfError::TooDeep { limit } => vec![("limit", limit.to_string())],
            SdfError::InvalidData { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            SdfError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl fmt::Display for SdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdfError::UnsupportedType { type_name, reason } => {
                write!(f, "Unsupported type '{type_name}': {reason}")
            }
            SdfError::UnknownTag { tag, position } => {
                write!(f, "Unknown tag {tag} at position {position}")
            }
            SdfError::Truncated {
                requested,
                available,
                position,
            } => write!(
                f,
                "Truncated input: requested {requested} bytes at position {position}, but only {available} bytes available"
            ),
            SdfError::UnknownType { name } => write!(f, "Unknown registered type: '{name}'"),
            SdfError::NameTaken { name } => {
                write!(f, "Name '{name}' is already registered with a different shape")
            }
            SdfError::MarshalFailed { type_name, cause } => {
                write!(f, "Marshal hook of '{type_name}' failed: {cause}")
            }
            SdfError::UnmarshalFailed { type_name, cause } => {
                write!(f, "Unmarshal hook of '{type_name}' failed: {cause}")
            }
            SdfError::TooDeep { limit } => {
                write!(f, "Nesting depth exceeds the limit of {limit}")
            }
            SdfError::InvalidData { context, message } => {
                write!(f, "Invalid {context}: {message}")
            }
            SdfError::Other(msg) => write!(f, "Other error: {msg}"),
        }
    }
}

impl std::error::Error for SdfError {}

impl From<std::io::Error> for SdfError {
    fn from(err: std::io::Error) -> Self {
        SdfError::Other(format!("I/O: {err}"))
    }
}

/// Result type for sdfcodec operations.
pub type Result<T> = std::result::Result<T, SdfError>;
