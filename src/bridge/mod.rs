//! Cross-thread call bridge: synchronous calls onto the loop thread.
//!
//! This module is the leaf component of the crate. It depends only on OS
//! threading primitives plus a [`Wake`] mechanism supplied by the host
//! reactor, and it is the *only* place where control crosses from an
//! arbitrary caller thread to the loop thread.
//!
//! ## Contents
//! - [`Bridge`] the call queue, `invoke` and `drain`
//! - [`LoopToken`] `!Send` capability proving loop-thread context
//! - [`HoldGuard`] RAII keep-alive reference for the host reactor
//! - [`Wake`] host-reactor wake-up contract
//!
//! ## Quick reference
//! - **Callers**: any thread except the loop thread calls [`Bridge::invoke`]
//!   and blocks for the full round trip.
//! - **Loop thread**: runs [`Bridge::drain`] each time the wake mechanism
//!   fires, executing queued calls in FIFO order.

mod core;
mod hold;
mod token;
mod wake;

pub use self::core::Bridge;
pub use hold::HoldGuard;
pub use token::LoopToken;
pub use wake::Wake;
