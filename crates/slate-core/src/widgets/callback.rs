//! Value-change callbacks
//!
//! Widgets take an optional [`Callback`] at creation time (or later through a
//! setter). It is invoked with the owning element's id and the new value, at
//! most once per committed change, and never by programmatic setters.

extern crate alloc;
use alloc::boxed::Box;

use core::fmt;

use crate::ui::core::ElementId;

/// Boxed `FnMut(ElementId, T)` supplied by the application
pub struct Callback<T> {
    func: Box<dyn FnMut(ElementId, T)>,
}

impl<T> Callback<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: FnMut(ElementId, T) + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }

    pub(crate) fn call(&mut self, id: ElementId, value: T) {
        (self.func)(id, value)
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}
