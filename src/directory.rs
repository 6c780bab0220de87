//! The backend directory: registered backends plus the round-robin cursor.
//!
//! [`Directory`] is shared between the control listener (which registers
//! and deregisters backends) and every in-flight broker request (which
//! selects the next backend). All three operations take the same lock, so
//! the cursor read-then-advance and any structural change are a single
//! critical section. The lock is a `std::sync::Mutex` and is never held
//! across an `.await`.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// A backend as advertised over the control protocol.
///
/// Identity is the full `(address, port, id, mount_path)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendDescriptor {
    pub address: String,
    pub port: u16,
    pub id: u32,
    pub mount_path: String,
}

impl BackendDescriptor {
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16, id: u32, mount_path: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port,
            id,
            mount_path: mount_path.into(),
        }
    }

    /// First component of the mount path, the URL segment requests are
    /// matched against. `/media/videos` serves `/media/...`.
    #[must_use]
    pub fn mount_segment(&self) -> &str {
        self.mount_path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for BackendDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}{}",
            self.id, self.address, self.port, self.mount_path
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Added,
    Duplicate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub backends: Vec<BackendDescriptor>,
    pub cursor: usize,
}

#[derive(Debug, Default)]
struct Inner {
    backends: Vec<BackendDescriptor>,
    cursor: usize,
}

#[derive(Debug, Default)]
pub struct Directory {
    inner: Mutex<Inner>,
}

impl Directory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded data is only ever mutated by complete, non-panicking
    // operations, so a poisoned lock still holds a consistent directory.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a backend unless an identical tuple is already registered.
    pub fn register(&self, backend: BackendDescriptor) -> RegisterOutcome {
        let mut inner = self.lock();
        if inner.backends.contains(&backend) {
            return RegisterOutcome::Duplicate;
        }
        inner.backends.push(backend);
        RegisterOutcome::Added
    }

    /// Remove the backend whose full tuple matches. Returns `false` when
    /// nothing matched.
    pub fn deregister(&self, backend: &BackendDescriptor) -> bool {
        let mut inner = self.lock();
        let Some(idx) = inner.backends.iter().position(|b| b == backend) else {
            return false;
        };
        inner.backends.remove(idx);

        // Keep the rotation order of the remaining backends.
        if idx < inner.cursor {
            inner.cursor -= 1;
        }
        let len = inner.backends.len();
        inner.cursor = if len == 0 { 0 } else { inner.cursor % len };
        true
    }

    /// Return the backend at the cursor and advance it, wrapping at the end.
    #[must_use]
    pub fn select_next(&self) -> Option<BackendDescriptor> {
        let mut inner = self.lock();
        let len = inner.backends.len();
        if len == 0 {
            return None;
        }
        let idx = inner.cursor % len;
        inner.cursor = (idx + 1) % len;
        Some(inner.backends[idx].clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().backends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().backends.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> DirectorySnapshot {
        let inner = self.lock();
        DirectorySnapshot {
            backends: inner.backends.clone(),
            cursor: inner.cursor,
        }
    }
}
