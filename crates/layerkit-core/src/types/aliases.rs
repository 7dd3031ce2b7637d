//! Type aliases for commonly used complex types.
//!
//! The editor is single-threaded, so shared state between an editor instance
//! and its host collaborators (status lines, painters, test recorders) is
//! `Rc<RefCell<T>>` rather than a lock.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerkit_core::types::*;
//!
//! let zooms: SharedVec<u32> = shared(Vec::new());
//! zooms.borrow_mut().push(100);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

/// Create a new `Shared<T>` from a value.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
