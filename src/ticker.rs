//! Tick sources for the timing wheel.
//!
//! The wheel owns no clock of its own: it advances one slot each time a
//! message arrives on its ticker's channel. Production wheels use
//! [`RealTicker`]; tests drive the wheel deterministically with a
//! [`FakeTicker`].

use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use thiserror::Error;

/// A stream of wheel ticks.
pub trait Ticker {
    /// The channel the wheel listens on. One message = one slot advance.
    fn chan(&self) -> &Receiver<Instant>;

    /// Releases the tick source. Called once by the wheel when it stops.
    fn stop(&self);
}

// ---------------------------------------------------------------------------
// RealTicker
// ---------------------------------------------------------------------------

/// Wall-clock ticker backed by [`crossbeam_channel::tick`].
pub struct RealTicker {
    rx: Receiver<Instant>,
}

impl RealTicker {
    pub fn new(interval: Duration) -> Self {
        RealTicker {
            rx: crossbeam_channel::tick(interval),
        }
    }
}

impl Ticker for RealTicker {
    fn chan(&self) -> &Receiver<Instant> {
        &self.rx
    }

    /// The tick channel holds no thread or timer resource; dropping the
    /// receiver is the release.
    fn stop(&self) {}
}

// ---------------------------------------------------------------------------
// FakeTicker
// ---------------------------------------------------------------------------

/// Returned by [`FakeTicker::wait`] when no completion signal arrives in time.
#[derive(Debug, Error)]
#[error("timed out waiting for completion signal")]
pub struct WaitTimeout;

/// Manually advanced ticker for deterministic scheduling tests.
///
/// [`tick`](FakeTicker::tick) hands the wheel exactly one tick over a
/// rendezvous channel, so when it returns the wheel has accepted the tick
/// and finished everything that came before it. Callbacks under test signal
/// back through [`done`](FakeTicker::done) and the test blocks on
/// [`wait`](FakeTicker::wait). Clones share the same channels: hand one
/// clone to the wheel and keep another to drive it.
#[derive(Clone)]
pub struct FakeTicker {
    tick_tx: Sender<Instant>,
    tick_rx: Receiver<Instant>,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
}

impl FakeTicker {
    pub fn new() -> Self {
        let (tick_tx, tick_rx) = bounded(0);
        let (done_tx, done_rx) = bounded(1);
        FakeTicker {
            tick_tx,
            tick_rx,
            done_tx,
            done_rx,
        }
    }

    /// Fires one tick, blocking until the wheel takes it. Do not call after
    /// the wheel has stopped; a stopped wheel no longer listens.
    pub fn tick(&self) {
        let _ = self.tick_tx.send(Instant::now());
    }

    /// Signals completion from inside a callback under test. Signals beyond
    /// the channel's capacity are dropped rather than blocking the dispatch
    /// thread.
    pub fn done(&self) {
        let _ = self.done_tx.try_send(());
    }

    /// Blocks until [`done`](FakeTicker::done) is signalled or `timeout`
    /// elapses.
    pub fn wait(&self, timeout: Duration) -> Result<(), WaitTimeout> {
        self.done_rx.recv_timeout(timeout).map_err(|_| WaitTimeout)
    }
}

impl Ticker for FakeTicker {
    fn chan(&self) -> &Receiver<Instant> {
        &self.tick_rx
    }

    /// The test owns the channels; there is nothing to release.
    fn stop(&self) {}
}

impl Default for FakeTicker {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
