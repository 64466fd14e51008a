//! Browser implementations of the core host primitives.
//!
//! [`AnimationFrameScheduler`] drives an [`Animator`] from
//! `requestAnimationFrame`; [`WindowTimer`] backs [`Debounced`] with
//! `setTimeout`.

use std::time::Duration;

use js_sys::Function;
use lightdom_core::{
    Animator, AnimatorConfig, Debounced, FrameCallback, FrameScheduler, Timer,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::error::WebError;

fn window() -> Result<Window, WebError> {
    web_sys::window().ok_or(WebError::DomUnavailable)
}

/// Schedules frames with `window.requestAnimationFrame`.
#[derive(Debug, Clone)]
pub struct AnimationFrameScheduler {
    window: Window,
}

impl AnimationFrameScheduler {
    /// Binds to the current browser window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside of a browser.
    pub fn new() -> Result<Self, WebError> {
        Ok(Self::from_window(window()?))
    }

    /// Binds to an explicit window.
    #[must_use]
    pub const fn from_window(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        // Frees itself after the single invocation.
        let frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        if let Err(err) = self.window.request_animation_frame(frame.unchecked_ref::<Function>()) {
            tracing::error!(
                target: "lightdom::web",
                "requestAnimationFrame failed, animation loop halted: {}",
                WebError::from(err)
            );
        }
    }
}

/// Schedules one-shot timeouts with `window.setTimeout`.
#[derive(Debug, Clone)]
pub struct WindowTimer {
    window: Window,
}

impl WindowTimer {
    /// Binds to the current browser window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside of a browser.
    pub fn new() -> Result<Self, WebError> {
        Ok(Self::from_window(window()?))
    }

    /// Binds to an explicit window.
    #[must_use]
    pub const fn from_window(window: Window) -> Self {
        Self { window }
    }
}

/// A pending `setTimeout`.
///
/// The JavaScript closure frees itself when the timeout fires, so dropping the
/// handle leaves the timeout running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutHandle {
    id: i32,
}

impl TimeoutHandle {
    /// The id returned by `setTimeout`.
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }
}

impl Timer for WindowTimer {
    type Handle = TimeoutHandle;

    fn schedule(
        &self,
        delay: Duration,
        callback: Box<dyn FnOnce()>,
    ) -> Result<TimeoutHandle, lightdom_core::Error> {
        // A cleared timeout never runs, so its closure is not reclaimed.
        let closure = Closure::once_into_js(move || callback());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref::<Function>(),
                millis,
            )
            .map_err(WebError::from)?;
        Ok(TimeoutHandle { id })
    }

    fn cancel(&self, handle: TimeoutHandle) {
        self.window.clear_timeout_with_handle(handle.id);
    }
}

/// Creates an [`Animator`] driven by `requestAnimationFrame` with the default
/// configuration.
///
/// # Errors
///
/// Returns [`WebError::DomUnavailable`] outside of a browser.
pub fn animator<T: 'static>() -> Result<Animator<T>, WebError> {
    animator_with_config(AnimatorConfig::default())
}

/// Creates an [`Animator`] driven by `requestAnimationFrame`.
///
/// # Errors
///
/// Returns [`WebError::DomUnavailable`] outside of a browser.
pub fn animator_with_config<T: 'static, D: 'static>(
    config: AnimatorConfig,
) -> Result<Animator<T, D>, WebError> {
    Ok(Animator::with_config(config, AnimationFrameScheduler::new()?))
}

/// Debounces `callback` on `setTimeout`.
///
/// ```no_run
/// # use std::time::Duration;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let on_resize = lightdom_web::debounce(|| tracing::info!("settled"), Duration::from_millis(300))?;
/// on_resize.trigger()?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`WebError::DomUnavailable`] outside of a browser.
pub fn debounce(
    callback: impl Fn() + 'static,
    delay: Duration,
) -> Result<Debounced<WindowTimer>, WebError> {
    Ok(Debounced::new(WindowTimer::new()?, callback, delay))
}
