use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Opaque correlation payload carried by an event.
///
/// The dispatcher never looks inside: it moves the context along with the
/// event and hands it back in the [`EventResult`](super::EventResult).
/// Cloning is cheap and shares the same payload.
pub struct EventContext<T = ()> {
    inner: Arc<T>,
}

impl<T> EventContext<T> {
    /// Wraps `value` into a new context.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Returns a reference to the payload.
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Returns `true` if both contexts share the same payload.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

impl<T> Clone for EventContext<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deref for EventContext<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<Arc<T>> for EventContext<T> {
    fn from(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl<T: Default> Default for EventContext<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for EventContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventContext").field(&self.inner).finish()
    }
}
