//! A cloneable, lock-guarded interpreter handle.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::interpreter::Interpreter;

/// An [`Interpreter`] behind `Arc<Mutex<_>>`.
///
/// For presentation layers that hand the session to several callbacks.
/// Each call to [`with`](Self::with) is one transition under the lock.
#[derive(Clone, Default)]
pub struct SharedInterpreter {
    inner: Arc<Mutex<Interpreter>>,
}

impl SharedInterpreter {
    /// Wrap an interpreter.
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(interpreter)),
        }
    }

    /// Lock the interpreter.
    ///
    /// A poisoned lock is recovered: transitions leave the interpreter in a
    /// consistent state even if a caller panicked while holding it.
    pub fn lock(&self) -> MutexGuard<'_, Interpreter> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("interpreter lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Run `f` with exclusive access to the interpreter.
    pub fn with<R>(&self, f: impl FnOnce(&mut Interpreter) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<Interpreter> for SharedInterpreter {
    fn from(interpreter: Interpreter) -> Self {
        Self::new(interpreter)
    }
}
