//! Reference loop: a thread-backed reactor for tests and standalone use.
//!
//! The bridge is designed to ride an existing reactor through the [`Wake`]
//! seam. When there is none — unit tests, small tools, examples — this
//! module supplies one: [`ThreadLoop`] owns a dedicated loop thread that
//! constructs the [`Bridge`] and drains it on every wake signal, and
//! [`ChannelWake`] is the matching `Wake` over an unbounded channel.
//!
//! ## Shape
//! ```text
//! any thread: wake.signal() ──► channel ──► loop thread: bridge.drain(&token)
//!             shutdown()    ──►         ──► loop thread: final drain, exit
//! ```
//!
//! The loop performs one last drain before exiting so no caller that
//! enqueued ahead of shutdown is left blocked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::bridge::{Bridge, Wake};

/// Messages driving the loop thread.
#[derive(Debug)]
enum LoopMsg {
    /// Run a drain pass.
    Wake,
    /// Final drain, then exit.
    Shutdown,
}

/// [`Wake`] implementation over an unbounded channel to the loop thread.
///
/// `signal` never blocks; signals sent before the loop wakes coalesce into
/// consecutive drain passes (extra passes over an empty queue are no-ops).
/// The armed flag is bookkeeping only: a plain thread loop has no idle-exit
/// behavior to suppress, but hosts and tests can observe the keep-alive
/// state through [`ChannelWake::is_armed`].
pub struct ChannelWake {
    tx: UnboundedSender<LoopMsg>,
    armed: AtomicBool,
}

impl ChannelWake {
    /// Whether the bridge currently counts as a keep-alive reference.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl Wake for ChannelWake {
    fn signal(&self) {
        // Fails only after shutdown; late signals have nothing to wake.
        let _ = self.tx.send(LoopMsg::Wake);
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

/// A dedicated loop thread hosting one [`Bridge`].
///
/// Spawns the thread, builds the bridge *on* it (the constructor records
/// the loop-thread identity), and services drain passes until shutdown.
/// The [`LoopToken`](crate::LoopToken) never leaves the loop thread; reach
/// it through [`Bridge::invoke`] closures.
///
/// ## Example
/// ```rust
/// use eventfan::ThreadLoop;
///
/// let rt = ThreadLoop::spawn();
/// let doubled = rt.bridge().invoke(|_token| 21 * 2);
/// assert_eq!(doubled, 42);
/// rt.shutdown();
/// ```
pub struct ThreadLoop {
    bridge: Bridge,
    wake: Arc<ChannelWake>,
    tx: UnboundedSender<LoopMsg>,
    join: Option<JoinHandle<()>>,
}

impl ThreadLoop {
    /// Spawns the loop thread and waits for its bridge to come up.
    #[must_use]
    pub fn spawn() -> Self {
        let (tx, mut rx) = unbounded_channel::<LoopMsg>();
        let wake = Arc::new(ChannelWake {
            tx: tx.clone(),
            armed: AtomicBool::new(false),
        });

        let (ready_tx, ready_rx) = mpsc::channel();
        let loop_wake = Arc::clone(&wake);
        let join = thread::spawn(move || {
            let (bridge, token) = Bridge::new(loop_wake as Arc<dyn Wake>);
            // The spawner is blocked on this handoff; it cannot be gone.
            ready_tx
                .send(bridge.clone())
                .expect("ThreadLoop spawner went away during startup");

            while let Some(msg) = rx.blocking_recv() {
                match msg {
                    LoopMsg::Wake => bridge.drain(&token),
                    LoopMsg::Shutdown => break,
                }
            }
            // Callers racing shutdown must not be left blocked forever.
            bridge.drain(&token);
        });

        let bridge = ready_rx.recv().expect("loop thread failed to start");
        Self {
            bridge,
            wake,
            tx,
            join: Some(join),
        }
    }

    /// The bridge hosted by this loop. Clone it to invoke from any thread.
    #[must_use]
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Keep-alive state of the loop's wake mechanism.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.wake.is_armed()
    }

    /// Stops the loop thread and joins it. Equivalent to dropping, but
    /// explicit at call sites that care about when the loop ends.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.tx.send(LoopMsg::Shutdown);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ThreadLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_invoke_round_trip_through_thread_loop() {
        let rt = ThreadLoop::spawn();
        let main = thread::current().id();
        let (ran_on, value) = rt.bridge().invoke(|_| (thread::current().id(), 99));
        assert_ne!(ran_on, main);
        assert_eq!(value, 99);
        rt.shutdown();
    }

    #[test]
    fn test_starts_disarmed() {
        let rt = ThreadLoop::spawn();
        assert!(!rt.is_armed());
        rt.shutdown();
    }

    #[test]
    fn test_hold_arms_channel_wake() {
        // Current thread plays the loop thread; no ThreadLoop needed.
        let (tx, _rx) = unbounded_channel();
        let wake = Arc::new(ChannelWake {
            tx,
            armed: AtomicBool::new(false),
        });
        let (bridge, token) = Bridge::new(Arc::clone(&wake) as Arc<dyn Wake>);

        assert!(!wake.is_armed());
        let guard = bridge.hold(&token);
        assert!(wake.is_armed());
        drop(guard);
        assert!(!wake.is_armed());
    }

    #[test]
    fn test_shutdown_drains_stragglers() {
        let rt = ThreadLoop::spawn();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..4 {
            let hits = Arc::clone(&hits);
            rt.bridge().invoke(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        rt.shutdown();
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_drop_joins_the_loop_thread() {
        let rt = ThreadLoop::spawn();
        rt.bridge().invoke(|_| ());
        drop(rt);
    }
}
