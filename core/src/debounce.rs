//! Call debouncing.
//!
//! [`Debounced`] wraps a callback so that a burst of [`trigger`](Debounced::trigger)
//! calls runs it once, `delay` after the last call of the burst. Typical uses
//! are resize handlers and delayed form submission, where events should settle
//! before anything expensive happens.
//!
//! Timeouts come from a host [`Timer`]: `setTimeout` in the browser, or
//! [`ManualTimer`] with a virtual clock.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::error::Error;

/// Delay used by [`Debounced::with_default_delay`].
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// One-shot timeouts provided by the host.
pub trait Timer {
    /// Identifies a scheduled timeout so it can be cancelled.
    type Handle;

    /// Runs `callback` once after `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Host`] if the host refuses the timeout.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<Self::Handle, Error>;

    /// Cancels a timeout. Cancelling one that already fired is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

struct Inner<Tm: Timer> {
    timer: Tm,
    callback: Rc<dyn Fn()>,
    delay: Duration,
    pending: RefCell<Option<Tm::Handle>>,
}

/// A debounced callback. Clones share the same pending timeout.
pub struct Debounced<Tm: Timer> {
    inner: Rc<Inner<Tm>>,
}

impl<Tm: Timer> Clone for Debounced<Tm> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<Tm: Timer> fmt::Debug for Debounced<Tm> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.inner.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<Tm: Timer> Debounced<Tm> {
    /// Wraps `callback`, running it `delay` after the last trigger of a burst.
    pub fn new(timer: Tm, callback: impl Fn() + 'static, delay: Duration) -> Self {
        Self {
            inner: Rc::new(Inner {
                timer,
                callback: Rc::new(callback),
                delay,
                pending: RefCell::new(None),
            }),
        }
    }

    /// Like [`new`](Self::new) with [`DEFAULT_DEBOUNCE_DELAY`].
    pub fn with_default_delay(timer: Tm, callback: impl Fn() + 'static) -> Self {
        Self::new(timer, callback, DEFAULT_DEBOUNCE_DELAY)
    }

    /// The settle delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Restarts the settle delay. The callback runs once the delay elapses
    /// without another trigger.
    ///
    /// A run that is still pending when the last clone is dropped still
    /// happens.
    ///
    /// # Errors
    ///
    /// Returns an error if the host timer cannot schedule the timeout; any
    /// previously pending run is cancelled either way.
    pub fn trigger(&self) -> Result<(), Error>
    where
        Tm: 'static,
    {
        self.cancel();
        let callback = Rc::clone(&self.inner.callback);
        let inner = Rc::downgrade(&self.inner);
        let fire = move || {
            if let Some(inner) = inner.upgrade() {
                inner.pending.borrow_mut().take();
            }
            callback();
        };
        let handle = self.inner.timer.schedule(self.inner.delay, Box::new(fire))?;
        *self.inner.pending.borrow_mut() = Some(handle);
        Ok(())
    }

    /// Whether a run is waiting for its timeout.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// Drops the pending run, if any. Returns whether a timeout was cleared.
    pub fn cancel(&self) -> bool {
        let handle = self.inner.pending.borrow_mut().take();
        handle.is_some_and(|handle| {
            self.inner.timer.cancel(handle);
            true
        })
    }
}

// ============================================================================
// Manual timer
// ============================================================================

type Timeout = (Duration, u64, Box<dyn FnOnce()>);

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    queue: Vec<Timeout>,
}

/// A [`Timer`] on a virtual clock that only moves with [`advance`](Self::advance).
///
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Rc<RefCell<Clock>>,
}

impl fmt::Debug for ManualTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimer")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualTimer {
    /// Creates a timer at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Number of timeouts waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    /// Moves the clock forward by `by`, firing due timeouts in deadline order.
    /// Returns the number of timeouts fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;
        while let Some(callback) = self.pop_due(target) {
            callback();
            fired += 1;
        }
        self.clock.borrow_mut().now = target;
        fired
    }

    fn pop_due(&self, target: Duration) -> Option<Box<dyn FnOnce()>> {
        let mut clock = self.clock.borrow_mut();
        let index = clock
            .queue
            .iter()
            .enumerate()
            .filter(|(_, (due, _, _))| *due <= target)
            .min_by_key(|(_, (due, id, _))| (*due, *id))
            .map(|(index, _)| index)?;
        let (due, _, callback) = clock.queue.swap_remove(index);
        clock.now = due;
        Some(callback)
    }
}

impl Timer for ManualTimer {
    type Handle = u64;

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<u64, Error> {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due = clock.now + delay;
        clock.queue.push((due, id, callback));
        Ok(id)
    }

    fn cancel(&self, handle: u64) {
        self.clock
            .borrow_mut()
            .queue
            .retain(|(_, id, _)| *id != handle);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        (count, move || sink.set(sink.get() + 1))
    }

    #[test]
    fn burst_runs_once_after_last_trigger() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::with_default_delay(timer.clone(), callback);

        for _ in 0..5 {
            debounced.trigger().unwrap();
            timer.advance(Duration::from_millis(100));
        }
        assert_eq!(count.get(), 0);

        timer.advance(Duration::from_millis(199));
        assert_eq!(count.get(), 0);
        timer.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn separate_bursts_run_separately() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::new(timer.clone(), callback, Duration::from_millis(50));

        debounced.trigger().unwrap();
        timer.advance(Duration::from_millis(60));
        debounced.trigger().unwrap();
        timer.advance(Duration::from_millis(60));

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn cancel_drops_pending_run() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::new(timer.clone(), callback, Duration::from_millis(10));

        debounced.trigger().unwrap();
        assert!(debounced.cancel());
        assert!(!debounced.cancel());
        timer.advance(Duration::from_secs(1));

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn fired_run_is_no_longer_pending() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::new(timer.clone(), callback, Duration::from_millis(10));

        debounced.trigger().unwrap();
        assert!(debounced.is_pending());
        timer.advance(Duration::from_millis(10));

        assert_eq!(count.get(), 1);
        assert!(!debounced.is_pending());
        assert!(!debounced.cancel());
        assert!(format!("{debounced:?}").contains("pending: false"));
    }

    #[test]
    fn callback_may_trigger_again() {
        let timer = ManualTimer::new();
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Debounced<ManualTimer>>>> = Rc::new(RefCell::new(None));
        let (sink, handle) = (Rc::clone(&count), Rc::clone(&slot));
        let debounced = Debounced::new(
            timer.clone(),
            move || {
                sink.set(sink.get() + 1);
                if sink.get() < 3 {
                    if let Some(again) = handle.borrow().as_ref() {
                        again.trigger().unwrap();
                    }
                }
            },
            Duration::from_millis(10),
        );
        *slot.borrow_mut() = Some(debounced.clone());

        debounced.trigger().unwrap();
        timer.advance(Duration::from_millis(100));

        assert_eq!(count.get(), 3);
        assert!(!debounced.is_pending());
        slot.borrow_mut().take();
    }

    #[test]
    fn pending_run_survives_dropping_the_debouncer() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::new(timer.clone(), callback, Duration::from_millis(10));

        debounced.trigger().unwrap();
        drop(debounced);
        timer.advance(Duration::from_millis(10));

        assert_eq!(count.get(), 1);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn clones_share_the_pending_timeout() {
        let timer = ManualTimer::new();
        let (count, callback) = counter();
        let debounced = Debounced::new(timer.clone(), callback, Duration::from_millis(10));
        let other = debounced.clone();

        debounced.trigger().unwrap();
        other.trigger().unwrap();
        assert_eq!(timer.pending(), 1);
        timer.advance(Duration::from_millis(10));

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn manual_timer_fires_in_deadline_order() {
        let timer = ManualTimer::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (label, millis) in [("late", 30), ("early", 10), ("middle", 20)] {
            let order = Rc::clone(&order);
            timer
                .schedule(
                    Duration::from_millis(millis),
                    Box::new(move || order.borrow_mut().push(label)),
                )
                .unwrap();
        }

        assert_eq!(timer.advance(Duration::from_millis(25)), 2);
        assert_eq!(order.borrow().as_slice(), &["early", "middle"]);
        assert_eq!(timer.now(), Duration::from_millis(25));
        timer.advance(Duration::from_millis(5));
        assert_eq!(order.borrow().as_slice(), &["early", "middle", "late"]);
    }

    #[test]
    fn default_delay_is_300ms() {
        let (_, callback) = counter();
        let debounced = Debounced::with_default_delay(ManualTimer::new(), callback);
        assert_eq!(debounced.delay(), Duration::from_millis(300));
    }
}
