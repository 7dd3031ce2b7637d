//! # LayerKit Core
//!
//! Core types, error taxonomy and engine constants shared by the LayerKit
//! crates.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, LayerError, Result};

pub use types::{shared, Shared, SharedVec};
