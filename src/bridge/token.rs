//! # Loop-thread capability token.
//!
//! A [`LoopToken`] is a zero-sized value that proves the holder is running
//! on the loop thread. Exactly one token exists per [`Bridge`](super::Bridge);
//! it is created by [`Bridge::new`](super::Bridge::new) on the loop thread
//! and is `!Send`, so it can never migrate off it.
//!
//! Every operation restricted to the loop thread takes `&LoopToken` instead
//! of comparing thread ids at runtime. The restriction shows up in the
//! signature, and token-taking code can be tested on any thread that owns a
//! bridge of its own.

use std::marker::PhantomData;

/// Capability proving "we are on the loop thread".
///
/// Obtained once from [`Bridge::new`](super::Bridge::new). Closures executed
/// by [`Bridge::drain`](super::Bridge::drain) receive a borrow of it, which
/// is how code reached via `invoke` regains loop-thread rights.
#[derive(Debug)]
pub struct LoopToken {
    // Raw pointer member keeps the token !Send and !Sync.
    _not_send: PhantomData<*const ()>,
}

impl LoopToken {
    pub(crate) fn new() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}
