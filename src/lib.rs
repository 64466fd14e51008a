#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

#[doc(inline)]
pub use lightdom_core::{
    Animation, AnimationCallback, AnimationError, Animator, AnimatorBuilder, AnimatorConfig,
    BoxError, DEFAULT_DEBOUNCE_DELAY, Debounced, Error, ErrorHook, FrameCallback, FrameData,
    FrameOutcome, FrameScheduler, FrameStats, Group, ManualFrameScheduler, ManualTimer,
    TemplateVars, Timer, expand,
};
pub use lightdom_core::{animator, config, debounce, scheduler, template};

/// Browser host: element creation, `requestAnimationFrame` and `setTimeout`
/// bindings, console logging.
pub mod web {
    #[doc(inline)]
    pub use lightdom_web::*;
}

pub mod prelude {
    //! The types most programs need, for glob importing.
    //!
    //! ```rust
    //! use lightdom::prelude::*;
    //!
    //! let greeting = expand("Hello {{name}}", &[("name", "world")]);
    //! assert_eq!(greeting, "Hello world");
    //! ```
    pub use lightdom_core::{
        Animation, Animator, AnimatorBuilder, AnimatorConfig, Debounced, FrameData,
        FrameScheduler, Group, Timer, expand,
    };
    pub use lightdom_web::{Dom, LogConfig, NO_ATTRIBUTES, ViewBox, WebError, apply, empty};
}
