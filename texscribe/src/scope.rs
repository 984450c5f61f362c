//! Scope handles
//!
//! A [`ScopeHandle`] pairs a mutable borrow of a target with the action that
//! closes whatever region was opened on it. The action runs exactly once:
//! either when the caller calls [`ScopeHandle::close`], or when the handle is
//! dropped, whichever happens first. Dropping also happens while unwinding, so
//! a region opened through a handle is closed on every exit path.
//!
//! The handle dereferences to its target, which is how nested writes reach the
//! writer while the region is open.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// An open region on `T` that is closed by `F`
#[must_use = "dropping the handle closes the region immediately"]
pub struct ScopeHandle<'a, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    target: &'a mut T,
    on_close: Option<F>,
}

impl<'a, T, F> ScopeHandle<'a, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    /// Bind a closing action to `target`
    ///
    /// # Parameters
    /// * `target` - The value the region was opened on
    /// * `on_close` - Action run once when the region ends
    pub fn new(target: &'a mut T, on_close: F) -> Self {
        Self {
            target,
            on_close: Some(on_close),
        }
    }

    /// Close the region now
    ///
    /// Calling this more than once is a no-op, and the handle will not close
    /// again when dropped.
    pub fn close(&mut self) {
        if let Some(action) = self.on_close.take() {
            action(&mut *self.target);
        }
    }

    /// Whether the closing action has already run
    pub fn is_closed(&self) -> bool {
        self.on_close.is_none()
    }
}

impl<T, F> Deref for ScopeHandle<'_, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T, F> DerefMut for ScopeHandle<'_, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T, F> Drop for ScopeHandle<'_, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    fn drop(&mut self) {
        self.close();
    }
}

impl<T, F> fmt::Debug for ScopeHandle<'_, T, F>
where
    T: ?Sized,
    F: FnOnce(&mut T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeHandle")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
