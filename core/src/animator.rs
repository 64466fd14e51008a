//! Named animation loops driven by a single host frame scheduler.
//!
//! An [`Animator`] owns a set of entries, each made of a name, a [`Group`] of
//! subjects, a callback and a data payload. On every frame the host hands the
//! animator a timestamp and every entry with a callback and a non-empty group is
//! called with `(group, timestamp, data)`.
//!
//! Entries are keyed by name: [`Animator::animate`] replaces an existing entry
//! of the same name and [`Animator::stop`] removes it. Both may be called from
//! inside a running callback through a cloned handle.
//!
//! ```
//! use std::rc::Rc;
//! use std::cell::Cell;
//! use lightdom_core::{Animator, FrameData, ManualFrameScheduler};
//!
//! let scheduler = Rc::new(ManualFrameScheduler::new());
//! let animator: Animator<&str> = Animator::new(Rc::clone(&scheduler));
//! let frames = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&frames);
//! animator.animate("pulse", ["circle"], move |_: &[&str], _, _: &FrameData| {
//!     counter.set(counter.get() + 1);
//! });
//!
//! scheduler.advance(0.0);
//! scheduler.advance(16.0);
//! animator.stop("pulse");
//! scheduler.advance(33.0);
//! assert_eq!(frames.get(), 2);
//! ```

use core::fmt;
use core::ops::Deref;
use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::config::{AnimatorConfig, FrameData};
use crate::error::{AnimationError, BoxError, ErrorHook, FrameOutcome};
use crate::scheduler::FrameScheduler;

/// Boxed animation callback: `(group, timestamp, data)`.
pub type AnimationCallback<T, D> = Box<dyn FnMut(&[T], f64, &D) -> Result<(), BoxError>>;

fn boxed_callback<T, D, F, R>(mut callback: F) -> AnimationCallback<T, D>
where
    F: FnMut(&[T], f64, &D) -> R + 'static,
    R: FrameOutcome,
{
    Box::new(move |group: &[T], timestamp: f64, data: &D| {
        callback(group, timestamp, data).into_outcome()
    })
}

// ============================================================================
// Group
// ============================================================================

/// The ordered subjects an animation operates on.
///
/// A single subject is normalized to a one-element group with
/// [`Group::single`]; sequences convert with [`From`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T>(Vec<T>);

impl<T> Group<T> {
    /// A group holding exactly one subject.
    pub fn single(subject: T) -> Self {
        Self(vec![subject])
    }

    /// A group with no subjects. Entries with an empty group are skipped.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the subjects as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Consumes the group, returning its subjects.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for Group<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for Group<T> {
    fn from(subjects: Vec<T>) -> Self {
        Self(subjects)
    }
}

impl<T, const N: usize> From<[T; N]> for Group<T> {
    fn from(subjects: [T; N]) -> Self {
        Self(subjects.into())
    }
}

impl<T: Clone> From<&[T]> for Group<T> {
    fn from(subjects: &[T]) -> Self {
        Self(subjects.to_vec())
    }
}

impl<T> FromIterator<T> for Group<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Animation
// ============================================================================

/// A registration waiting to be handed to [`Animator::insert`].
///
/// Both the callback and the data are optional. Without a callback the entry
/// stays registered but is never called; without data the animator's default
/// [`FrameData`] is used.
pub struct Animation<T, D = FrameData> {
    group: Group<T>,
    callback: Option<AnimationCallback<T, D>>,
    data: Option<D>,
}

impl<T, D> Animation<T, D> {
    /// Starts a registration for the given subjects.
    pub fn new(group: impl Into<Group<T>>) -> Self {
        Self {
            group: group.into(),
            callback: None,
            data: None,
        }
    }

    /// Sets the per-frame callback.
    #[must_use]
    pub fn on_frame<F, R>(mut self, callback: F) -> Self
    where
        F: FnMut(&[T], f64, &D) -> R + 'static,
        R: FrameOutcome,
    {
        self.callback = Some(boxed_callback(callback));
        self
    }

    /// Sets the payload passed to the callback on every frame.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }
}

impl<T: fmt::Debug, D: fmt::Debug> fmt::Debug for Animation<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("group", &self.group)
            .field("has_callback", &self.callback.is_some())
            .field("data", &self.data)
            .finish()
    }
}

struct Entry<T, D> {
    group: Group<T>,
    callback: Option<RefCell<AnimationCallback<T, D>>>,
    data: D,
}

impl<T, D> Entry<T, D> {
    fn dispatch(&self, name: &str, timestamp: f64) -> Result<(), AnimationError> {
        let Some(callback) = &self.callback else {
            return Ok(());
        };
        if self.group.is_empty() {
            return Ok(());
        }
        // Already running further up the stack: a callback drove a nested tick.
        let Ok(mut guard) = callback.try_borrow_mut() else {
            tracing::trace!(target: "lightdom::animator", animation = name, "skipping re-entrant dispatch");
            return Ok(());
        };
        let callback = &mut *guard;
        let group = self.group.as_slice();
        match panic::catch_unwind(AssertUnwindSafe(|| callback(group, timestamp, &self.data))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(AnimationError::Failed {
                name: name.to_owned(),
                source,
            }),
            Err(payload) => Err(AnimationError::Panicked {
                name: name.to_owned(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

// ============================================================================
// Frame statistics
// ============================================================================

/// Running frame interval statistics. Purely diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    frames: u64,
    delta_sum: f64,
    last_timestamp: Option<f64>,
    next_report: f64,
}

impl FrameStats {
    /// Number of measured frame intervals. The first tick has no interval.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Sum of all measured intervals, in milliseconds.
    #[must_use]
    pub const fn total_interval(&self) -> f64 {
        self.delta_sum
    }

    /// Timestamp of the most recent tick.
    #[must_use]
    pub const fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Mean interval between ticks, in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_interval(&self) -> Option<f64> {
        (self.frames > 0).then(|| self.delta_sum / self.frames as f64)
    }

    /// Observed frames per second, derived from [`average_interval`](Self::average_interval).
    #[must_use]
    pub fn average_frame_rate(&self) -> Option<f64> {
        self.average_interval()
            .filter(|interval| *interval > 0.0)
            .map(|interval| 1000.0 / interval)
    }

    /// Records a tick. Returns the average interval when a report is due.
    fn record(&mut self, timestamp: f64, report_interval: f64) -> Option<f64> {
        let previous = self.last_timestamp.replace(timestamp)?;
        self.delta_sum += timestamp - previous;
        self.frames += 1;
        if timestamp > self.next_report {
            self.next_report = timestamp + report_interval;
            return self.average_interval();
        }
        None
    }
}

// ============================================================================
// Animator
// ============================================================================

struct Registry<T, D> {
    entries: BTreeMap<Rc<str>, Rc<Entry<T, D>>>,
    stats: FrameStats,
}

struct Shared<T, D> {
    config: AnimatorConfig,
    scheduler: Box<dyn FrameScheduler>,
    on_error: ErrorHook,
    registry: RefCell<Registry<T, D>>,
}

impl<T, D> Shared<T, D> {
    fn tick(&self, timestamp: f64) {
        let names: Vec<Rc<str>> = {
            let mut registry = self.registry.borrow_mut();
            if let Some(average) = registry
                .stats
                .record(timestamp, self.config.report_interval_ms)
            {
                tracing::debug!(
                    target: "lightdom::animator",
                    average_interval_ms = average,
                    frames = registry.stats.frames(),
                    "frame statistics"
                );
            }
            registry.entries.keys().cloned().collect()
        };

        for name in names {
            // Look the entry up again: earlier callbacks may have replaced or
            // stopped it during this tick.
            let entry = self.registry.borrow().entries.get(&name).cloned();
            let Some(entry) = entry else { continue };
            if let Err(error) = entry.dispatch(&name, timestamp) {
                (self.on_error)(&error);
            }
        }
    }
}

impl<T: 'static, D: 'static> Shared<T, D> {
    /// Asks the host for one more frame. The pending callback only holds a
    /// weak reference, so the loop ends once every [`Animator`] is dropped.
    fn request_frame(self: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.request_frame(Box::new(move |timestamp| {
            if let Some(shared) = weak.upgrade() {
                shared.tick(timestamp);
                shared.request_frame();
            }
        }));
    }
}

fn log_error(error: &AnimationError) {
    tracing::error!(target: "lightdom::animator", animation = error.name(), "{error}");
}

/// A registry of named animation loops.
///
/// `T` is the subject type (typically a DOM element handle) and `D` the
/// per-entry payload. Cloning an `Animator` yields another handle to the same
/// registry; separately constructed animators are fully independent.
pub struct Animator<T, D = FrameData> {
    shared: Rc<Shared<T, D>>,
}

impl<T, D> Clone for Animator<T, D> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T, D> fmt::Debug for Animator<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("Animator")
            .field("config", &self.shared.config)
            .field("entries", &registry.entries.keys().collect::<Vec<_>>())
            .field("stats", &registry.stats)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, D: 'static> Animator<T, D> {
    /// Creates an animator with the default configuration and starts its
    /// frame loop on `scheduler`.
    pub fn new(scheduler: impl FrameScheduler + 'static) -> Self {
        Self::with_config(AnimatorConfig::default(), scheduler)
    }

    /// Creates an animator with an explicit configuration.
    pub fn with_config(config: AnimatorConfig, scheduler: impl FrameScheduler + 'static) -> Self {
        AnimatorBuilder::new().config(config).build(scheduler)
    }
}

impl<T, D> Animator<T, D> {
    /// Registers `callback` under `name` with the default [`FrameData`]
    /// payload, replacing any entry of the same name.
    pub fn animate<F, R>(&self, name: impl AsRef<str>, group: impl Into<Group<T>>, callback: F)
    where
        F: FnMut(&[T], f64, &D) -> R + 'static,
        R: FrameOutcome,
        D: From<FrameData>,
    {
        let data = D::from(self.shared.config.frame_data());
        self.animate_with_data(name, group, callback, data);
    }

    /// Registers `callback` under `name` with an explicit payload, replacing
    /// any entry of the same name.
    pub fn animate_with_data<F, R>(
        &self,
        name: impl AsRef<str>,
        group: impl Into<Group<T>>,
        callback: F,
        data: D,
    ) where
        F: FnMut(&[T], f64, &D) -> R + 'static,
        R: FrameOutcome,
    {
        self.register(
            name.as_ref(),
            Entry {
                group: group.into(),
                callback: Some(RefCell::new(boxed_callback(callback))),
                data,
            },
        );
    }

    /// Registers a prepared [`Animation`] under `name`, replacing any entry of
    /// the same name.
    pub fn insert(&self, name: impl AsRef<str>, animation: Animation<T, D>)
    where
        D: From<FrameData>,
    {
        let Animation {
            group,
            callback,
            data,
        } = animation;
        let data = data.unwrap_or_else(|| D::from(self.shared.config.frame_data()));
        self.register(
            name.as_ref(),
            Entry {
                group,
                callback: callback.map(RefCell::new),
                data,
            },
        );
    }

    fn register(&self, name: &str, entry: Entry<T, D>) {
        let replaced = self
            .shared
            .registry
            .borrow_mut()
            .entries
            .insert(Rc::from(name), Rc::new(entry));
        tracing::trace!(
            target: "lightdom::animator",
            animation = name,
            replaced = replaced.is_some(),
            "registered animation"
        );
        // The displaced entry is dropped here, outside the registry borrow, so
        // its captures may touch the animator from their destructors.
        drop(replaced);
    }

    /// Removes the entry registered under `name`.
    ///
    /// Returns `false` if there was none. A callback already running is not
    /// interrupted, but will not be called again.
    pub fn stop(&self, name: &str) -> bool {
        let removed = self.shared.registry.borrow_mut().entries.remove(name);
        let stopped = removed.is_some();
        drop(removed);
        if stopped {
            tracing::trace!(target: "lightdom::animator", animation = name, "stopped animation");
        }
        stopped
    }

    /// Runs one tick at `timestamp`.
    ///
    /// The frame loop calls this on every host frame; hosts that own their own
    /// loop may call it directly.
    pub fn tick(&self, timestamp: f64) {
        self.shared.tick(timestamp);
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.registry.borrow().entries.len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.shared.registry.borrow().entries.contains_key(name)
    }

    /// Registered names, in dispatch order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.shared
            .registry
            .borrow()
            .entries
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    /// Snapshot of the frame statistics.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.shared.registry.borrow().stats
    }

    /// The configuration this animator was built with.
    #[must_use]
    pub fn config(&self) -> AnimatorConfig {
        self.shared.config
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Animator`].
pub struct AnimatorBuilder {
    config: AnimatorConfig,
    on_error: Option<ErrorHook>,
}

impl fmt::Debug for AnimatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatorBuilder")
            .field("config", &self.config)
            .field("custom_error_hook", &self.on_error.is_some())
            .finish()
    }
}

impl Default for AnimatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: AnimatorConfig {
                frame_rate: crate::config::DEFAULT_FRAME_RATE,
                report_interval_ms: crate::config::DEFAULT_REPORT_INTERVAL_MS,
            },
            on_error: None,
        }
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub const fn config(mut self, config: AnimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the nominal frame rate used for default payloads.
    #[must_use]
    pub const fn frame_rate(mut self, frame_rate: u32) -> Self {
        self.config.frame_rate = frame_rate;
        self
    }

    /// Sets the interval between statistics reports, in milliseconds.
    #[must_use]
    pub const fn report_interval(mut self, millis: f64) -> Self {
        self.config.report_interval_ms = millis;
        self
    }

    /// Installs a hook receiving every callback failure. Without one,
    /// failures are logged through `tracing`.
    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&AnimationError) + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Finalises the builder and starts the frame loop on `scheduler`.
    pub fn build<T: 'static, D: 'static>(
        self,
        scheduler: impl FrameScheduler + 'static,
    ) -> Animator<T, D> {
        let shared = Rc::new(Shared {
            config: self.config,
            scheduler: Box::new(scheduler),
            on_error: self.on_error.unwrap_or_else(|| Box::new(log_error)),
            registry: RefCell::new(Registry {
                entries: BTreeMap::new(),
                stats: FrameStats::default(),
            }),
        });
        shared.request_frame();
        Animator { shared }
    }
}
