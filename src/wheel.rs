//! Single-level timing wheel with a channel-owned scheduling thread.
//!
//! ## Algorithm
//!
//! The wheel is a fixed ring of `num_slots` slots. A cursor advances one
//! slot per tick, and an entry due in `delay` lands `steps = delay /
//! interval` slots ahead of the cursor. Each entry carries:
//!
//! | Field     | Meaning                                               |
//! |-----------|-------------------------------------------------------|
//! | `circle`  | full rotations remaining before the entry is due      |
//! | `diff`    | pending relocation, in slots ahead of the next scan   |
//! | `removed` | tombstone; the entry is dead and reaped on next scan  |
//!
//! Scanning a slot walks its entries once, in insertion order: tombstones
//! are reaped, `circle > 0` entries sit out one more rotation, `diff > 0`
//! entries are relocated, and whatever remains is due now and dispatched as
//! one batch.
//!
//! Rescheduling therefore never searches the ring. It rewrites the entry's
//! `circle` and `diff` in place, except when the target slot was already
//! passed this rotation with no rotations to spare; then the old entry is
//! tombstoned and the key restarts in a fresh entry at the target slot.
//!
//! ## Ownership
//!
//! All mutable wheel state belongs to one thread. `set_timer`, `move_timer`
//! and `remove_timer` hand that thread a message over a rendezvous channel,
//! so the caller blocks exactly until the owner accepts and every operation
//! is serialized with tick processing. Due entries execute on a separate
//! dispatch thread per tick, one task at a time, each panic-isolated; a slow
//! or panicking callback never stalls the ring.
//!
//! ## References
//! - Varghese & Lauck (1987). *Hashed and Hierarchical Timing Wheels.*

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ahash::AHashMap;
use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::error::ConfigError;
use crate::exec::run_isolated;
use crate::ticker::{RealTicker, Ticker};

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Requests travelling from handles to the owner thread.
enum Op<K, V> {
    Set { key: K, value: V, delay: Duration },
    Move { key: K, delay: Duration },
    Remove { key: K },
}

/// Handle to a timing wheel scheduling one deferred callback per key.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use carousel::TimingWheel;
///
/// let wheel = TimingWheel::new(Duration::from_millis(100), 60, |key: String, value: u64| {
///     println!("{key} expired carrying {value}");
/// })
/// .unwrap();
///
/// wheel.set_timer("session-42".to_string(), 7, Duration::from_secs(3));
/// wheel.stop();
/// ```
pub struct TimingWheel<K, V> {
    op_tx: Sender<Op<K, V>>,
    stop_tx: Sender<()>,
    stopped: AtomicBool,
}

impl<K, V> TimingWheel<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Creates a wheel ticking every `interval` across `num_slots` slots,
    /// invoking `execute` with each (key, value) whose delay has elapsed.
    pub fn new<F>(interval: Duration, num_slots: usize, execute: F) -> Result<Self, ConfigError>
    where
        F: Fn(K, V) + Send + Sync + 'static,
    {
        Self::with_ticker(interval, num_slots, execute, RealTicker::new(interval))
    }

    /// Like [`TimingWheel::new`], but advancing on `ticker` instead of wall
    /// time. Pass a [`FakeTicker`](crate::ticker::FakeTicker) to drive the
    /// wheel deterministically in tests.
    pub fn with_ticker<F, T>(
        interval: Duration,
        num_slots: usize,
        execute: F,
        ticker: T,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(K, V) + Send + Sync + 'static,
        T: Ticker + Send + 'static,
    {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if num_slots == 0 {
            return Err(ConfigError::ZeroSlots);
        }

        let (op_tx, op_rx) = bounded(0);
        let (stop_tx, stop_rx) = bounded(1);
        let core = WheelCore {
            interval,
            num_slots,
            ticker,
            op_rx,
            stop_rx,
            execute: Arc::new(execute),
            slots: vec![Vec::new(); num_slots],
            entries: Vec::new(),
            free: Vec::new(),
            timers: AHashMap::new(),
            // One slot before zero, so the first tick scans slot 0.
            ticked_pos: num_slots - 1,
        };
        thread::Builder::new()
            .name("carousel-wheel".into())
            .spawn(move || core.run())?;

        Ok(TimingWheel {
            op_tx,
            stop_tx,
            stopped: AtomicBool::new(false),
        })
    }
}

impl<K, V> TimingWheel<K, V> {
    /// Schedules `execute` for `key` after `delay`, storing `value` with it.
    ///
    /// Re-setting a pending key replaces its value and reschedules it. A
    /// zero delay is ignored; a delay below the tick interval rounds up to
    /// one tick. Calls after [`stop`](TimingWheel::stop) are ignored.
    pub fn set_timer(&self, key: K, value: V, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        let _ = self.op_tx.send(Op::Set { key, value, delay });
    }

    /// Reschedules the pending entry for `key` to fire after `delay`.
    ///
    /// Unknown keys and zero delays are ignored. A delay shorter than one
    /// tick cannot be represented on the ring; the entry's callback is
    /// dispatched immediately instead, and the entry keeps its place.
    pub fn move_timer(&self, key: K, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        let _ = self.op_tx.send(Op::Move { key, delay });
    }

    /// Cancels the pending entry for `key`, if any. The slot entry itself
    /// is reaped lazily the next time its slot is scanned.
    pub fn remove_timer(&self, key: K) {
        let _ = self.op_tx.send(Op::Remove { key });
    }

    /// Stops the owner thread. Entries still pending are dropped without
    /// executing; already-dispatched batches run to completion. Idempotent,
    /// and scheduling calls made afterwards return without effect.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.stop_tx.send(());
    }
}

impl<K, V> Drop for TimingWheel<K, V> {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Owner thread
// ---------------------------------------------------------------------------

/// One scheduled expiration, arena-allocated.
struct TimerEntry<K, V> {
    key: K,
    value: V,
    /// Slot currently holding this entry's id.
    slot: usize,
    /// Full rotations remaining before the entry is due.
    circle: usize,
    /// Pending relocation, in slots ahead of the owning slot's next scan.
    diff: usize,
    /// Tombstone. A tombstoned entry is never indexed in `timers`.
    removed: bool,
}

/// Exclusive wheel state, owned by the `carousel-wheel` thread.
struct WheelCore<K, V, T> {
    interval: Duration,
    num_slots: usize,
    ticker: T,
    op_rx: Receiver<Op<K, V>>,
    stop_rx: Receiver<()>,
    execute: Arc<dyn Fn(K, V) + Send + Sync>,
    /// `slots[s]` holds arena ids of the entries parked in slot `s`, in
    /// insertion order.
    slots: Vec<Vec<usize>>,
    /// Entry arena; `None` marks a reusable slot (tracked in `free`).
    entries: Vec<Option<TimerEntry<K, V>>>,
    /// Indices of freed arena slots.
    free: Vec<usize>,
    /// Maps a key to its live entry's arena id.
    timers: AHashMap<K, usize>,
    /// Slot scanned by the most recent tick.
    ticked_pos: usize,
}

impl<K, V, T> WheelCore<K, V, T>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
    T: Ticker,
{
    fn run(mut self) {
        let tick_rx = self.ticker.chan().clone();
        let op_rx = self.op_rx.clone();
        let stop_rx = self.stop_rx.clone();

        loop {
            select! {
                recv(tick_rx) -> tick => match tick {
                    Ok(_) => self.on_tick(),
                    // Tick source gone; the wheel can no longer advance.
                    Err(_) => break,
                },
                recv(op_rx) -> op => match op {
                    Ok(Op::Set { key, value, delay }) => self.set_task(key, value, delay),
                    Ok(Op::Move { key, delay }) => self.move_task(key, delay),
                    Ok(Op::Remove { key }) => self.remove_task(&key),
                    // Every handle is gone; nothing can be scheduled again.
                    Err(_) => break,
                },
                recv(stop_rx) -> _ => break,
            }
        }
        self.ticker.stop();
    }

    fn on_tick(&mut self) {
        self.ticked_pos = (self.ticked_pos + 1) % self.num_slots;
        self.scan_slot(self.ticked_pos);
    }

    /// Walks the slot once: reaps tombstones, counts down rotations, applies
    /// deferred relocations, and collects whatever remains as the due batch.
    fn scan_slot(&mut self, pos: usize) {
        let ids = std::mem::take(&mut self.slots[pos]);
        let mut due: Vec<(K, V)> = Vec::new();

        for id in ids {
            let Some(mut entry) = self.entries[id].take() else {
                continue;
            };

            if entry.removed {
                // The index was detached when the tombstone was laid; only
                // the arena slot is left to reclaim.
                self.free.push(id);
                continue;
            }

            if entry.circle > 0 {
                entry.circle -= 1;
                self.entries[id] = Some(entry);
                self.slots[pos].push(id);
                continue;
            }

            if entry.diff > 0 {
                // `diff` is in [1, num_slots), so the target is never the
                // slot being scanned.
                let target = (pos + entry.diff) % self.num_slots;
                entry.diff = 0;
                entry.slot = target;
                self.entries[id] = Some(entry);
                self.slots[target].push(id);
                continue;
            }

            self.timers.remove(&entry.key);
            due.push((entry.key, entry.value));
            self.free.push(id);
        }

        self.run_tasks(due);
    }

    /// Dispatches the due batch on its own thread. Tasks run one at a time,
    /// each panic-isolated; the owner never waits on them.
    fn run_tasks(&self, tasks: Vec<(K, V)>) {
        if tasks.is_empty() {
            return;
        }
        let execute = Arc::clone(&self.execute);
        thread::spawn(move || {
            for (key, value) in tasks {
                run_isolated(|| execute(key, value));
            }
        });
    }

    fn set_task(&mut self, key: K, value: V, mut delay: Duration) {
        if delay < self.interval {
            delay = self.interval;
        }

        if let Some(&id) = self.timers.get(&key) {
            if let Some(entry) = self.entries[id].as_mut() {
                entry.value = value;
            }
            self.move_task(key, delay);
        } else {
            let (pos, circle) = self.position_and_circle(delay);
            let id = self.insert_entry(key.clone(), value, pos, circle);
            self.timers.insert(key, id);
        }
    }

    fn move_task(&mut self, key: K, delay: Duration) {
        let Some(&id) = self.timers.get(&key) else {
            return;
        };

        if delay < self.interval {
            // Below one tick of resolution: fire now instead of
            // rescheduling. The entry keeps its place on the ring.
            if let Some(entry) = self.entries[id].as_ref() {
                let execute = Arc::clone(&self.execute);
                let (k, v) = (entry.key.clone(), entry.value.clone());
                thread::spawn(move || run_isolated(|| execute(k, v)));
            }
            return;
        }

        let (pos, circle) = self.position_and_circle(delay);
        let num_slots = self.num_slots;
        let ticked_pos = self.ticked_pos;

        let fresh_value = {
            let Some(entry) = self.entries[id].as_mut() else {
                return;
            };
            let old_steps = (num_slots + entry.slot - ticked_pos) % num_slots;
            let new_steps = (num_slots + pos - ticked_pos) % num_slots;

            if new_steps < old_steps && circle == 0 {
                // The target slot was already passed this rotation and no
                // rotations remain; the entry cannot be walked backwards.
                // Tombstone it and restart the key at the target slot.
                entry.removed = true;
                Some(entry.value.clone())
            } else {
                entry.circle = if new_steps < old_steps {
                    // Wrapped relocation: reaching the old slot and walking
                    // `diff` forward consumes one full rotation.
                    circle - 1
                } else {
                    circle
                };
                entry.diff = (num_slots + pos - entry.slot) % num_slots;
                None
            }
        };

        if let Some(value) = fresh_value {
            let fresh = self.insert_entry(key.clone(), value, pos, 0);
            self.timers.insert(key, fresh);
        }
    }

    /// Detaches `key` from the index and lays a tombstone; the slot entry
    /// is reaped when its slot is next scanned.
    fn remove_task(&mut self, key: &K) {
        let Some(id) = self.timers.remove(key) else {
            return;
        };
        if let Some(entry) = self.entries[id].as_mut() {
            entry.removed = true;
        }
    }

    /// Slot and rotation count for an entry due in `delay` from now.
    /// A quotient past `usize::MAX` saturates, parking the entry in the
    /// farthest rotation instead of wrapping back into range.
    fn position_and_circle(&self, delay: Duration) -> (usize, usize) {
        let steps = usize::try_from(delay.as_nanos() / self.interval.as_nanos())
            .unwrap_or(usize::MAX);
        (
            (self.ticked_pos + steps % self.num_slots) % self.num_slots,
            steps / self.num_slots,
        )
    }

    /// Arena-allocates an entry and parks its id in `slot`. Does not touch
    /// the `timers` index.
    fn insert_entry(&mut self, key: K, value: V, slot: usize, circle: usize) -> usize {
        let entry = TimerEntry {
            key,
            value,
            slot,
            circle,
            diff: 0,
            removed: false,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.entries[id] = Some(entry);
                id
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        };
        self.slots[slot].push(id);
        id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticker::FakeTicker;
    use crossbeam_channel::unbounded;

    const INTERVAL: Duration = Duration::from_millis(10);
    /// Generous bound for "the fire must arrive" assertions.
    const FIRE: Duration = Duration::from_secs(2);
    /// Settle window for "nothing must fire" assertions.
    const QUIET: Duration = Duration::from_millis(50);

    type Fired = Receiver<(String, u32)>;

    fn fake_wheel(num_slots: usize) -> (TimingWheel<String, u32>, FakeTicker, Fired) {
        let ticker = FakeTicker::new();
        let (tx, rx) = unbounded();
        let wheel = TimingWheel::with_ticker(
            INTERVAL,
            num_slots,
            move |key, value| {
                let _ = tx.send((key, value));
            },
            ticker.clone(),
        )
        .unwrap();
        (wheel, ticker, rx)
    }

    fn ticks(ticker: &FakeTicker, n: usize) {
        for _ in 0..n {
            ticker.tick();
        }
    }

    fn assert_fires(rx: &Fired, expect: (&str, u32)) {
        match rx.recv_timeout(FIRE) {
            Ok((key, value)) => assert_eq!((key.as_str(), value), expect),
            Err(_) => panic!("expected {:?} to fire", expect),
        }
    }

    fn assert_quiet(rx: &Fired) {
        if let Ok(got) = rx.recv_timeout(QUIET) {
            panic!("unexpected fire: {:?}", got);
        }
    }

    // -- construction -------------------------------------------------------

    #[test]
    fn rejects_zero_interval() {
        let result: Result<TimingWheel<String, u32>, _> =
            TimingWheel::new(Duration::ZERO, 16, |_, _| {});
        assert!(matches!(result, Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn rejects_zero_slots() {
        let result: Result<TimingWheel<String, u32>, _> =
            TimingWheel::new(INTERVAL, 0, |_, _| {});
        assert!(matches!(result, Err(ConfigError::ZeroSlots)));
    }

    // -- slot placement -----------------------------------------------------

    #[test]
    fn fires_on_the_exact_tick() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL * 3);

        ticks(&ticker, 2);
        assert_quiet(&rx);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn sub_interval_delay_rounds_up_to_one_tick() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL / 2);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn zero_delay_is_ignored() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, Duration::ZERO);

        ticks(&ticker, 8);
        assert_quiet(&rx);
    }

    #[test]
    fn waits_out_a_full_rotation() {
        let (wheel, ticker, rx) = fake_wheel(4);
        wheel.set_timer("a".into(), 1, INTERVAL * 6);

        ticks(&ticker, 5);
        assert_quiet(&rx);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn waits_out_multiple_rotations() {
        let (wheel, ticker, rx) = fake_wheel(4);
        wheel.set_timer("a".into(), 1, INTERVAL * 9);

        ticks(&ticker, 8);
        assert_quiet(&rx);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn whole_rotation_delay_fires_on_the_second_pass() {
        let (wheel, ticker, rx) = fake_wheel(4);
        // Four steps on a four-slot ring lands on the cursor's own slot
        // with one rotation remaining; the first pass only counts it down.
        wheel.set_timer("a".into(), 1, INTERVAL * 4);

        ticks(&ticker, 7);
        assert_quiet(&rx);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn far_future_delay_does_not_fire_early() {
        let ticker = FakeTicker::new();
        let (tx, rx) = unbounded();
        let wheel = TimingWheel::with_ticker(
            Duration::from_nanos(1),
            4,
            move |key: String, value: u32| {
                let _ = tx.send((key, value));
            },
            ticker.clone(),
        )
        .unwrap();

        // 2^64 nanoseconds at one-nanosecond resolution; the step count
        // saturates instead of wrapping back onto the ring.
        wheel.set_timer("a".into(), 1, Duration::new(18_446_744_073, 709_551_616));

        ticks(&ticker, 6);
        assert_quiet(&rx);
    }

    // -- set on an existing key ---------------------------------------------

    #[test]
    fn second_set_replaces_value_and_reschedules() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL * 2);
        wheel.set_timer("a".into(), 2, INTERVAL * 4);

        ticks(&ticker, 3);
        assert_quiet(&rx);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 2));
        assert_quiet(&rx); // exactly one entry fired
    }

    // -- move ---------------------------------------------------------------

    #[test]
    fn move_extends_a_deadline_mid_flight() {
        let (wheel, ticker, rx) = fake_wheel(16);
        wheel.set_timer("a".into(), 1, INTERVAL * 5);

        ticks(&ticker, 2);
        wheel.move_timer("a".into(), INTERVAL * 10);

        // The original deadline (tick 5) passes without a fire.
        ticks(&ticker, 3);
        assert_quiet(&rx);

        // Ten ticks after the move it fires.
        ticks(&ticker, 7);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn move_closer_fires_early_and_only_once() {
        let (wheel, ticker, rx) = fake_wheel(16);
        wheel.set_timer("a".into(), 1, INTERVAL * 5);
        wheel.move_timer("a".into(), INTERVAL * 2);

        ticks(&ticker, 2);
        assert_fires(&rx, ("a", 1));

        // Scanning the original slot reaps the tombstone silently.
        ticks(&ticker, 3);
        assert_quiet(&rx);
    }

    #[test]
    fn move_below_interval_dispatches_immediately() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 7, INTERVAL * 5);
        wheel.move_timer("a".into(), INTERVAL / 2);

        // Fires without any tick.
        assert_fires(&rx, ("a", 7));

        // The entry kept its place and fires again at its old deadline.
        ticks(&ticker, 5);
        assert_fires(&rx, ("a", 7));
    }

    #[test]
    fn move_unknown_key_is_a_noop() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.move_timer("ghost".into(), INTERVAL * 3);

        ticks(&ticker, 4);
        assert_quiet(&rx);
    }

    // -- remove -------------------------------------------------------------

    #[test]
    fn removed_entry_never_fires() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL * 2);
        wheel.remove_timer("a".into());

        ticks(&ticker, 3);
        assert_quiet(&rx);
    }

    #[test]
    fn remove_unknown_key_is_a_noop() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.remove_timer("ghost".into());

        wheel.set_timer("a".into(), 1, INTERVAL);
        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
    }

    #[test]
    fn reset_after_remove_starts_fresh() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL * 3);
        wheel.remove_timer("a".into());
        wheel.set_timer("a".into(), 2, INTERVAL);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 2));

        // The tombstoned first entry is reaped, not fired.
        ticks(&ticker, 2);
        assert_quiet(&rx);
    }

    // -- dispatch -----------------------------------------------------------

    #[test]
    fn batch_fires_in_insertion_order() {
        let (wheel, ticker, rx) = fake_wheel(8);
        wheel.set_timer("a".into(), 1, INTERVAL);
        wheel.set_timer("b".into(), 2, INTERVAL);
        wheel.set_timer("c".into(), 3, INTERVAL);

        ticks(&ticker, 1);
        assert_fires(&rx, ("a", 1));
        assert_fires(&rx, ("b", 2));
        assert_fires(&rx, ("c", 3));
    }

    #[test]
    fn wait_observes_a_callback_through_done() {
        let ticker = FakeTicker::new();
        let signal = ticker.clone();
        let wheel = TimingWheel::with_ticker(
            INTERVAL,
            8,
            move |_: String, _: u32| signal.done(),
            ticker.clone(),
        )
        .unwrap();

        wheel.set_timer("a".into(), 1, INTERVAL);
        ticker.tick();
        ticker
            .wait(FIRE)
            .expect("callback should signal completion");
    }

    #[test]
    fn panicking_callback_does_not_poison_the_batch() {
        let ticker = FakeTicker::new();
        let (tx, rx) = unbounded();
        let wheel = TimingWheel::with_ticker(
            INTERVAL,
            8,
            move |key: String, value: u32| {
                if key == "boom" {
                    panic!("callback failure under test");
                }
                let _ = tx.send((key, value));
            },
            ticker.clone(),
        )
        .unwrap();

        wheel.set_timer("boom".into(), 0, INTERVAL);
        wheel.set_timer("ok".into(), 1, INTERVAL);
        ticks(&ticker, 1);
        assert_fires(&rx, ("ok", 1));

        // The wheel itself is unaffected and keeps scheduling.
        wheel.set_timer("later".into(), 2, INTERVAL);
        ticks(&ticker, 1);
        assert_fires(&rx, ("later", 2));
    }

    // -- lifecycle ----------------------------------------------------------

    #[test]
    fn stop_drops_pending_entries() {
        let (tx, rx) = unbounded();
        let wheel = TimingWheel::new(Duration::from_millis(20), 8, move |key: String, value: u32| {
            let _ = tx.send((key, value));
        })
        .unwrap();

        wheel.set_timer("a".into(), 1, Duration::from_millis(60));
        wheel.stop();
        wheel.stop(); // idempotent

        // Scheduling after stop returns without blocking and without effect.
        wheel.set_timer("b".into(), 2, Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(150));
        assert!(rx.try_recv().is_err(), "no entry may fire after stop");
    }

    #[test]
    fn dropping_the_handle_stops_the_wheel() {
        let (tx, rx) = unbounded();
        let wheel = TimingWheel::new(Duration::from_millis(20), 8, move |key: String, value: u32| {
            let _ = tx.send((key, value));
        })
        .unwrap();

        wheel.set_timer("a".into(), 1, Duration::from_millis(40));
        drop(wheel);

        std::thread::sleep(Duration::from_millis(150));
        assert!(rx.try_recv().is_err(), "no entry may fire after drop");
    }
}
