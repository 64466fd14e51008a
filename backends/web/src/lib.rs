#![allow(clippy::module_name_repetitions)]

//! Browser backend for `lightdom`.
//!
//! This crate binds the platform independent pieces of `lightdom-core` to the
//! browser and adds the DOM helpers that only make sense there:
//!
//! - [`Dom`] creates HTML and SVG elements with attributes applied,
//! - [`empty`] clears a container and hands it back for chaining,
//! - [`AnimationFrameScheduler`] and [`animator`] run an
//!   [`Animator`](lightdom_core::Animator) on `requestAnimationFrame`,
//! - [`WindowTimer`] and [`debounce`] debounce callbacks with `setTimeout`,
//! - [`logging::install`] routes `tracing` events and panics to the console.
//!
//! Everything here targets `wasm32-unknown-unknown`. On other targets the
//! crate compiles, but constructors that need a window return
//! [`WebError::DomUnavailable`].

mod dom;
mod error;
mod host;
pub mod logging;
pub mod svg;

pub use dom::{Dom, NO_ATTRIBUTES, apply, empty};
pub use error::WebError;
pub use host::{
    AnimationFrameScheduler, TimeoutHandle, WindowTimer, animator, animator_with_config, debounce,
};
pub use logging::LogConfig;
pub use svg::{SVG_NAMESPACE, ViewBox};
