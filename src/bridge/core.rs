//! # The bridge proper: call queue, `invoke`, `drain`.
//!
//! ## Call lifecycle
//! ```text
//! caller thread                      loop thread
//! ─────────────                      ───────────
//! invoke(f)
//!   box f + oneshot sender
//!   lock queue, push_back ──────┐
//!   wake.signal()               │    drain(&token)
//!   blocking_recv() ... zzz     └──►   lock queue, pop_front
//!                                      f(&token)
//!   ◄──────────────────────────────── oneshot send(result)
//!   return result                      repeat until queue empty
//! ```
//!
//! ## Rules
//! - The queue mutex is held only for the O(1) push/pop, never while a call
//!   runs or a caller waits.
//! - Completion is a `tokio::sync::oneshot` per call: the single-shot,
//!   one-time-writable result channel makes exactly-once completion
//!   structural rather than a flag to police.
//! - Wrong-thread use, a poisoned queue mutex, or a call dropped without
//!   completion are contract violations and panic. This mechanism underlies
//!   correctness-critical signaling; it must not limp along in a known-bad
//!   state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use tokio::sync::oneshot;

use super::hold::HoldGuard;
use super::token::LoopToken;
use super::wake::Wake;

/// One queued cross-thread call, erased to a boxed closure.
///
/// The closure owns the caller's oneshot sender and fulfils it after running
/// the caller's function, so completion cannot happen twice or be forgotten
/// on the success path.
type QueuedCall = Box<dyn FnOnce(&LoopToken) + Send>;

/// State shared between the `Bridge` handles and every `HoldGuard`.
pub(crate) struct Shared {
    /// FIFO of pending calls. The only lock shared between caller threads
    /// and the loop thread.
    queue: Mutex<VecDeque<QueuedCall>>,
    /// Host-reactor wake-up mechanism.
    wake: Arc<dyn Wake>,
    /// Identity of the loop thread, recorded at construction.
    loop_thread: ThreadId,
    /// Keep-alive reference count. Mutated only on the loop thread (all
    /// mutators hold a `LoopToken` or are `!Send`), so plain load/store
    /// suffices; the atomic exists to keep `Shared: Sync`.
    holds: AtomicUsize,
}

impl Shared {
    /// 0→1 arms the wake mechanism as a keep-alive reference.
    ///
    /// Loop thread only (callers hold a `LoopToken`).
    pub(crate) fn hold_acquired(&self) {
        let prev = self.holds.load(Ordering::Relaxed);
        self.holds.store(prev + 1, Ordering::Relaxed);
        if prev == 0 {
            self.wake.arm();
        }
    }

    /// 1→0 disarms the wake mechanism.
    ///
    /// Loop thread only (`HoldGuard` is `!Send`, so its drop runs there).
    pub(crate) fn hold_released(&self) {
        let prev = self.holds.load(Ordering::Relaxed);
        debug_assert!(prev >= 1, "hold released with no hold outstanding");
        self.holds.store(prev - 1, Ordering::Relaxed);
        if prev == 1 {
            self.wake.disarm();
        }
    }
}

/// Synchronous call bridge onto one loop thread.
///
/// A `Bridge` is an explicitly constructed context object; there is no
/// process-global state. It is a cheap `Arc`-backed handle: clone it freely
/// and hand clones to any thread that needs to [`invoke`](Bridge::invoke).
///
/// ### Construction
/// [`Bridge::new`] must run on the loop thread. It records that thread's
/// identity and returns the bridge together with the one [`LoopToken`] for
/// this loop, which stays behind on the loop thread.
#[derive(Clone)]
pub struct Bridge {
    shared: Arc<Shared>,
}

impl Bridge {
    /// Creates a bridge bound to the calling thread as its loop thread.
    ///
    /// The wake mechanism starts disarmed: an idle bridge must not keep the
    /// host reactor alive. Arming is driven by [`Bridge::hold`].
    pub fn new(wake: Arc<dyn Wake>) -> (Self, LoopToken) {
        wake.disarm();
        let shared = Arc::new(Shared {
            queue: Mutex::new(VecDeque::new()),
            wake,
            loop_thread: thread::current().id(),
            holds: AtomicUsize::new(0),
        });
        (Self { shared }, LoopToken::new())
    }

    /// Runs `func` on the loop thread and blocks until it has completed.
    ///
    /// Callable from any thread **except** the loop thread; calling it there
    /// would deadlock the one thread able to service the queue, so it panics
    /// before any side effect instead.
    ///
    /// The closure receives the loop's [`LoopToken`], giving it loop-thread
    /// rights for the duration of the call. Its return value is passed back
    /// to this caller through a single-shot channel. This is a full
    /// synchronous round trip, not fire-and-forget: when `invoke` returns,
    /// every side effect of `func` is visible.
    ///
    /// There is no cancellation or timeout; a caller that enters `invoke`
    /// commits to waiting until the loop thread services it.
    ///
    /// # Panics
    /// - If called from the loop thread.
    /// - If the loop thread drops the call without completing it (the loop
    ///   went away mid-call; an unrecoverable host failure).
    pub fn invoke<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&LoopToken) -> R + Send + 'static,
        R: Send + 'static,
    {
        assert_ne!(
            thread::current().id(),
            self.shared.loop_thread,
            "Bridge::invoke called from the loop thread; this would deadlock"
        );

        let (done_tx, done_rx) = oneshot::channel::<R>();
        let call: QueuedCall = Box::new(move |token| {
            let out = func(token);
            // Fails only if the caller is gone (it panicked out of
            // blocking_recv); nothing is waiting for the result then.
            let _ = done_tx.send(out);
        });

        self.shared
            .queue
            .lock()
            .expect("call queue mutex poisoned")
            .push_back(call);
        self.shared.wake.signal();

        done_rx
            .blocking_recv()
            .expect("loop thread dropped a pending call without completing it")
    }

    /// Drains the call queue. The loop thread's wake-up handler.
    ///
    /// Pops and runs calls in FIFO order until the queue is empty, then
    /// returns to the host's normal readiness processing. Does not busy-wait;
    /// the next [`Wake::signal`] triggers the next pass. The queue lock is
    /// released around each call, so callers enqueueing concurrently line up
    /// behind the pass in progress.
    pub fn drain(&self, token: &LoopToken) {
        // The token already proves loop-thread context; this guards against
        // a token from a different bridge's loop.
        assert_eq!(
            thread::current().id(),
            self.shared.loop_thread,
            "Bridge::drain called with a foreign LoopToken"
        );

        loop {
            let next = self
                .shared
                .queue
                .lock()
                .expect("call queue mutex poisoned")
                .pop_front();
            match next {
                Some(call) => call(token),
                None => return,
            }
        }
    }

    /// Takes a keep-alive reference on the host reactor.
    ///
    /// The 0→1 transition arms the wake mechanism; dropping the returned
    /// guard reverses it on 1→0. Balanced accounting is guaranteed by the
    /// guard even under early-return paths, and the count can never go
    /// negative because guards are the only decrement.
    ///
    /// Loop thread only. The guard is `!Send` and must be dropped there too.
    #[must_use]
    pub fn hold(&self, _token: &LoopToken) -> HoldGuard {
        self.shared.hold_acquired();
        HoldGuard::new(Arc::clone(&self.shared))
    }

    /// Current keep-alive reference count. Loop thread only.
    #[must_use]
    pub fn holds(&self, _token: &LoopToken) -> usize {
        self.shared.holds.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.shared.queue.lock().expect("call queue mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testwake::RecordingWake;
    use super::*;

    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;

    /// Runs `scenario` on a dedicated thread acting as the loop thread.
    fn on_loop_thread<F, R>(scenario: F) -> R
    where
        F: FnOnce(Bridge, LoopToken) -> R + Send + 'static,
        R: Send + 'static,
    {
        thread::spawn(move || {
            let (bridge, token) = Bridge::new(Arc::new(RecordingWake::default()));
            scenario(bridge, token)
        })
        .join()
        .expect("loop-thread scenario panicked")
    }

    #[test]
    fn test_invoke_runs_on_loop_thread_and_returns_result() {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let loop_thread = thread::spawn(move || {
            let (bridge, token) = Bridge::new(Arc::new(RecordingWake::default()));
            tx.send((bridge.clone(), thread::current().id())).unwrap();
            while stop_rx.try_recv().is_err() {
                bridge.drain(&token);
                thread::yield_now();
            }
            bridge.drain(&token);
        });

        let (bridge, loop_id) = rx.recv().unwrap();
        let ran_on = bridge.invoke(|_token| thread::current().id());
        assert_eq!(ran_on, loop_id);
        assert_ne!(ran_on, thread::current().id());

        stop_tx.send(()).unwrap();
        loop_thread.join().unwrap();
    }

    #[test]
    fn test_invoke_from_loop_thread_panics_before_any_side_effect() {
        on_loop_thread(|bridge, _token| {
            let b = bridge.clone();
            let result = catch_unwind(AssertUnwindSafe(move || {
                b.invoke(|_| ());
            }));
            assert!(result.is_err(), "loop-thread invoke must be rejected");
            assert_eq!(bridge.pending(), 0, "rejected call must not be enqueued");
        });
    }

    #[test]
    fn test_drain_executes_fifo_order() {
        on_loop_thread(|bridge, token| {
            let order = Arc::new(std::sync::Mutex::new(Vec::new()));

            // Enqueue three calls in a known order before the first drain
            // pass, gating each caller thread on observed queue depth.
            let mut callers = Vec::new();
            for n in 1u32..=3 {
                let b = bridge.clone();
                let order = Arc::clone(&order);
                while bridge.pending() < (n - 1) as usize {
                    thread::yield_now();
                }
                callers.push(thread::spawn(move || {
                    b.invoke(move |_| order.lock().unwrap().push(n));
                }));
                while bridge.pending() < n as usize {
                    thread::yield_now();
                }
            }

            bridge.drain(&token);
            for caller in callers {
                caller.join().unwrap();
            }
            assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
        });
    }

    #[test]
    fn test_drain_on_empty_queue_is_a_no_op() {
        on_loop_thread(|bridge, token| {
            bridge.drain(&token);
            assert_eq!(bridge.pending(), 0);
        });
    }

    #[test]
    fn test_concurrent_invokes_each_run_exactly_once() {
        const THREADS: usize = 10;
        const CALLS: usize = 25;

        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let loop_thread = thread::spawn(move || {
            let (bridge, token) = Bridge::new(Arc::new(RecordingWake::default()));
            tx.send(bridge.clone()).unwrap();
            while stop_rx.try_recv().is_err() {
                bridge.drain(&token);
                thread::yield_now();
            }
            bridge.drain(&token);
        });

        let bridge = rx.recv().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let callers: Vec<_> = (0..THREADS)
            .map(|_| {
                let b = bridge.clone();
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..CALLS {
                        let counter = Arc::clone(&counter);
                        b.invoke(move |_| {
                            counter.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for caller in callers {
            caller.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), THREADS * CALLS);

        stop_tx.send(()).unwrap();
        loop_thread.join().unwrap();
    }

    #[test]
    fn test_hold_guards_are_exact_duals() {
        thread::spawn(|| {
            let wake = Arc::new(RecordingWake::default());
            let (bridge, token) = Bridge::new(Arc::clone(&wake) as Arc<dyn Wake>);
            assert!(!wake.is_armed());

            let first = bridge.hold(&token);
            assert!(wake.is_armed(), "0→1 must arm the wake mechanism");
            assert_eq!(bridge.holds(&token), 1);

            let second = bridge.hold(&token);
            assert!(wake.is_armed());
            assert_eq!(bridge.holds(&token), 2);

            drop(second);
            assert!(wake.is_armed(), "1 hold left; must stay armed");

            drop(first);
            assert!(!wake.is_armed(), "1→0 must disarm");
            assert_eq!(bridge.holds(&token), 0);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_invoke_signals_wake_mechanism() {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let loop_thread = thread::spawn(move || {
            let wake = Arc::new(RecordingWake::default());
            let (bridge, token) = Bridge::new(Arc::clone(&wake) as Arc<dyn Wake>);
            tx.send((bridge.clone(), Arc::clone(&wake))).unwrap();
            while stop_rx.try_recv().is_err() {
                bridge.drain(&token);
                thread::yield_now();
            }
        });

        let (bridge, wake) = rx.recv().unwrap();
        bridge.invoke(|_| ());
        assert!(wake.signals() >= 1);

        stop_tx.send(()).unwrap();
        loop_thread.join().unwrap();
    }
}
