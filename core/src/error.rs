/// A boxed error returned by an animation callback.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Errors raised by host primitives such as timers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The host rejected or failed a request.
    #[error("host primitive failed: {0}")]
    Host(String),
}

impl Error {
    /// Builds a [`Error::Host`] from anything printable.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

/// A failure raised by one animation callback during a tick.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The callback returned an error.
    #[error("animation `{name}` failed: {source}")]
    Failed {
        /// Name of the entry whose callback failed.
        name: String,
        /// The error returned by the callback.
        source: BoxError,
    },
    /// The callback panicked.
    #[error("animation `{name}` panicked: {message}")]
    Panicked {
        /// Name of the entry whose callback panicked.
        name: String,
        /// The panic payload, when it was a string.
        message: String,
    },
}

impl AnimationError {
    /// Name of the animation entry that produced this error.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Failed { name, .. } | Self::Panicked { name, .. } => name,
        }
    }
}

/// Receives every [`AnimationError`] raised while dispatching a tick.
pub type ErrorHook = Box<dyn Fn(&AnimationError)>;

/// Values an animation callback may return.
///
/// Callbacks returning `()` always succeed. Callbacks returning a `Result`
/// have their error forwarded to the animator's [`ErrorHook`].
pub trait FrameOutcome {
    /// Converts the callback's return value into a uniform result.
    ///
    /// # Errors
    ///
    /// Returns the callback's own error, boxed.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl FrameOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> FrameOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display() {
        let error = Error::host("setTimeout unavailable");
        assert_eq!(error.to_string(), "host primitive failed: setTimeout unavailable");
    }

    #[test]
    fn unit_outcome_is_ok() {
        assert!(().into_outcome().is_ok());
    }

    #[test]
    fn result_outcome_keeps_message() {
        let outcome: Result<(), &str> = Err("subject detached");
        let error = outcome.into_outcome().unwrap_err();
        assert_eq!(error.to_string(), "subject detached");
    }

    #[test]
    fn animation_error_reports_name() {
        let error = AnimationError::Panicked {
            name: "spin".into(),
            message: "boom".into(),
        };
        assert_eq!(error.name(), "spin");
        assert_eq!(error.to_string(), "animation `spin` panicked: boom");
    }
}
