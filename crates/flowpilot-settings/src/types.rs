//! Type aliases for single-threaded shared UI state.
//!
//! The settings surface runs on the UI thread only, so shared state uses
//! `Rc<RefCell<T>>` rather than locks.

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] cell.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
