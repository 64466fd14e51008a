#![doc = include_str!("../README.md")]
#![allow(clippy::module_name_repetitions)]

pub mod animator;
pub mod config;
pub mod debounce;
mod error;
pub mod scheduler;
pub mod template;

pub use animator::{Animation, AnimationCallback, Animator, AnimatorBuilder, FrameStats, Group};
pub use config::{AnimatorConfig, FrameData};
pub use debounce::{DEFAULT_DEBOUNCE_DELAY, Debounced, ManualTimer, Timer};
pub use error::{AnimationError, BoxError, Error, ErrorHook, FrameOutcome};
pub use scheduler::{FrameCallback, FrameScheduler, ManualFrameScheduler};
pub use template::{TemplateVars, expand};
