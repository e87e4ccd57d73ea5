//! # Keep-alive hold guard.
//!
//! A [`HoldGuard`] is one reason for the host reactor to stay alive.
//! Construction (via [`Bridge::hold`](super::Bridge::hold)) increments the
//! bridge's hold count, arming the wake mechanism on the 0→1 transition;
//! dropping the guard decrements, disarming on 1→0.
//!
//! The guard replaces manual take/release call pairs: accounting stays
//! balanced through every early-return and error path, and releasing more
//! than was taken is unrepresentable.

use std::marker::PhantomData;
use std::sync::Arc;

use super::core::Shared;

/// RAII keep-alive reference on the host reactor.
///
/// `!Send`: it is created on the loop thread and must be dropped there,
/// which keeps hold-count mutation loop-thread-only without a lock.
pub struct HoldGuard {
    shared: Arc<Shared>,
    _not_send: PhantomData<*const ()>,
}

impl HoldGuard {
    /// The count was already incremented by [`Bridge::hold`]; the guard only
    /// owns the matching decrement.
    ///
    /// [`Bridge::hold`]: super::Bridge::hold
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            _not_send: PhantomData,
        }
    }
}

impl Drop for HoldGuard {
    fn drop(&mut self) {
        self.shared.hold_released();
    }
}
