//! Error handling for LayerKit
//!
//! Most editor outcomes are policy results (`Option`/`bool`): a rectangle that
//! is too small, an unknown tool, an undo past the end of history. Errors are
//! reserved for inputs that violate the layer-set invariants and for JSON
//! that cannot be parsed.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Layer-set invariant violations detected when a layer array is loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    /// Two layers share an id
    #[error("Duplicate layer id: {id}")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },

    /// A group references a child id that is not in the layer set
    #[error("Group {group} references unknown layer {child}")]
    UnknownChild {
        /// The group layer id.
        group: String,
        /// The missing child id.
        child: String,
    },

    /// Group membership loops back on itself
    #[error("Group membership cycle through layer {id}")]
    GroupCycle {
        /// A layer id on the cycle.
        id: String,
    },

    /// A layer carries geometry the engine cannot represent
    #[error("Invalid geometry on layer {id}: {reason}")]
    InvalidGeometry {
        /// The offending layer id.
        id: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Main error type for LayerKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Layer-set invariant violation
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is a layer invariant error
    pub fn is_layer_error(&self) -> bool {
        matches!(self, Error::Layer(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialization(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
