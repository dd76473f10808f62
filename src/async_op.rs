//! Single-flight wrapper around one externally triggered async action
//!
//! Each invocation captures a generation number when it starts. Starting
//! another invocation or resetting bumps the generation, and a completion
//! only lands if its generation is still current. In-flight futures are
//! never cancelled; a superseded result is simply dropped.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::error::{Error, Result};

/// Observable state of an [`AsyncOperation`]
#[derive(Debug)]
pub enum AsyncProperty<T> {
    Inactive,
    Pending,
    Resolved(T),
    Rejected(Arc<Error>),
}

impl<T> AsyncProperty<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, AsyncProperty::Pending)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncProperty::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            AsyncProperty::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

impl<T: Clone> Clone for AsyncProperty<T> {
    fn clone(&self) -> Self {
        match self {
            AsyncProperty::Inactive => AsyncProperty::Inactive,
            AsyncProperty::Pending => AsyncProperty::Pending,
            AsyncProperty::Resolved(value) => AsyncProperty::Resolved(value.clone()),
            AsyncProperty::Rejected(err) => AsyncProperty::Rejected(Arc::clone(err)),
        }
    }
}

/// What subscribers observe: the current property and the invocation it belongs to
#[derive(Debug)]
pub struct Snapshot<T> {
    pub generation: u64,
    pub property: AsyncProperty<T>,
}

type ErrorCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Holds the current [`AsyncProperty`] of one operation slot.
///
/// Clones share the slot.
pub struct AsyncOperation<T> {
    slot: Arc<watch::Sender<Snapshot<T>>>,
    on_error: Option<ErrorCallback>,
}

impl<T> Clone for AsyncOperation<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> fmt::Debug for AsyncOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("generation", &self.slot.borrow().generation)
            .finish_non_exhaustive()
    }
}

impl<T> Default for AsyncOperation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AsyncOperation<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Snapshot {
            generation: 0,
            property: AsyncProperty::Inactive,
        });
        Self {
            slot: Arc::new(slot),
            on_error: None,
        }
    }

    /// Called with the error of every rejection that becomes current
    pub fn with_error_callback(mut self, callback: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Marks the slot pending and returns the new invocation's generation
    fn begin(&self) -> u64 {
        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.property = AsyncProperty::Pending;
            generation = slot.generation;
        });
        generation
    }

    /// Stores `property` if `generation` is still current
    fn settle(&self, generation: u64, property: AsyncProperty<T>) -> bool {
        self.slot.send_if_modified(|slot| {
            if slot.generation != generation {
                return false;
            }
            slot.property = property;
            true
        })
    }

    /// Returns the slot to `Inactive`, discarding any in-flight result
    pub fn reset(&self) {
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.property = AsyncProperty::Inactive;
        });
    }

    pub fn generation(&self) -> u64 {
        self.slot.borrow().generation
    }

    /// Notified whenever a property becomes current
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.slot.subscribe()
    }
}

impl<T: Clone> AsyncOperation<T> {
    pub fn current(&self) -> AsyncProperty<T> {
        self.slot.borrow().property.clone()
    }

    /// Runs `fut` as the newest invocation.
    ///
    /// Returns the stored outcome, or `None` when a later invocation or a
    /// reset superseded this one before it completed.
    pub async fn run<F>(&self, fut: F) -> Option<AsyncProperty<T>>
    where
        F: Future<Output = Result<T>>,
    {
        let generation = self.begin();

        let property = match fut.await {
            Ok(value) => AsyncProperty::Resolved(value),
            Err(err) => AsyncProperty::Rejected(Arc::new(err)),
        };

        if !self.settle(generation, property.clone()) {
            trace!(generation, "discarding superseded result");
            return None;
        }

        if let (AsyncProperty::Rejected(err), Some(on_error)) = (&property, &self.on_error) {
            on_error(err);
        }
        Some(property)
    }
}
