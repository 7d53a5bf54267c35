//! Process-wide handle caching
//!
//! A [`ClientSingleton`] is the per-process owner of a handle: it is meant to
//! live in a `static`, constructs the handle on first use and hands out the
//! same one afterwards, in every environment. A [`GlobalSlot`] is the
//! reload-surviving copy: outside production the singleton writes the handle
//! there, and a fresh owner over the same slot (after a reload, a rebuilt app
//! state, a second test harness) picks it up instead of opening another.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use wirestack_core::Environment;

/// Process-global storage for a cached handle
pub struct GlobalSlot<T> {
    value: RwLock<Option<T>>,
    writes: AtomicUsize,
}

impl<T: Clone> GlobalSlot<T> {
    pub const fn new() -> Self {
        Self {
            value: RwLock::new(None),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn get(&self) -> Option<T> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store(&self, handle: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    /// Empty the slot, returning what it held
    pub fn clear(&self) -> Option<T> {
        self.value
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Number of times [`store`](Self::store) has been called
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<T: Clone> Default for GlobalSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle handed out by [`ClientSingleton`], tagged with the generation it
/// belongs to so a stale release cannot evict a newer handle
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub handle: T,
    pub generation: u64,
}

struct State<T> {
    current: Option<Cached<T>>,
    next_generation: u64,
}

/// Per-process owner of a lazily constructed handle
pub struct ClientSingleton<T: 'static> {
    slot: &'static GlobalSlot<T>,
    state: Mutex<State<T>>,
}

impl<T: Clone + 'static> ClientSingleton<T> {
    pub const fn new(slot: &'static GlobalSlot<T>) -> Self {
        Self {
            slot,
            state: Mutex::new(State {
                current: None,
                next_generation: 0,
            }),
        }
    }

    /// Return the handle, constructing it on first use.
    ///
    /// Prefers a handle already parked in the slot. Outside production the
    /// handle is written back to the slot; in production the slot is never
    /// written. Construction errors are returned unchanged and cache nothing.
    pub fn get_or_try_init<E, F>(&self, environment: &Environment, construct: F) -> Result<Cached<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = &state.current {
            return Ok(cached.clone());
        }

        let handle = match self.slot.get() {
            Some(parked) => {
                tracing::debug!(env = %environment, "reusing cached handle");
                parked
            }
            None => construct()?,
        };

        if !environment.is_production() {
            self.slot.store(handle.clone());
        }

        let cached = Cached {
            handle,
            generation: state.next_generation,
        };
        state.next_generation += 1;
        state.current = Some(cached.clone());
        Ok(cached)
    }

    /// Forget the handle of `generation`, emptying the slot with it.
    ///
    /// Returns `None` and leaves everything alone when `generation` is not
    /// the current one.
    pub fn release(&self, generation: u64) -> Option<T> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &state.current {
            Some(cached) if cached.generation == generation => {
                self.slot.clear();
                state.current.take().map(|cached| cached.handle)
            }
            _ => None,
        }
    }
}
