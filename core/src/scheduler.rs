//! Host frame scheduling.
//!
//! The animation loop never drives itself: it asks a [`FrameScheduler`] for the
//! next display refresh, does one tick of work when called back, and asks
//! again. In a browser this is `requestAnimationFrame`; elsewhere the
//! [`ManualFrameScheduler`] lets the caller decide when frames happen.

use core::fmt;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Callback run once by the host on the next frame, with the frame timestamp
/// in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64) + 'static>;

/// Schedules frame callbacks on behalf of an animation loop.
///
/// Each request is honored at most once; a loop that wants another frame must
/// request it again from inside its callback. Timestamps passed to callbacks
/// must be monotonically increasing.
pub trait FrameScheduler {
    /// Request that the host invoke `callback` on the next frame.
    fn request_frame(&self, callback: FrameCallback);
}

/// A [`FrameScheduler`] driven by explicit calls to [`advance`](Self::advance).
#[derive(Default)]
pub struct ManualFrameScheduler {
    pending: RefCell<VecDeque<FrameCallback>>,
}

impl fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrameScheduler")
            .field("pending", &self.pending_frames())
            .finish()
    }
}

impl ManualFrameScheduler {
    /// Creates a scheduler with no pending frame requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Runs every callback that was pending when this frame started.
    ///
    /// Callbacks requested while the frame runs wait for the next call.
    /// Returns the number of callbacks run.
    pub fn advance(&self, timestamp: f64) -> usize {
        let frame: Vec<FrameCallback> = self.pending.borrow_mut().drain(..).collect();
        let count = frame.len();
        for callback in frame {
            callback(timestamp);
        }
        count
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.pending.borrow_mut().push_back(callback);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for std::rc::Rc<S> {
    fn request_frame(&self, callback: FrameCallback) {
        (**self).request_frame(callback);
    }
}
