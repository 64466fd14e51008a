/// Error type produced by the web backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g., when executed outside of a browser).
    #[error("DOM is not available")]
    DomUnavailable,
    /// No element carries the requested id.
    #[error("Failed to find DOM element with id `{0}`")]
    ElementNotFound(String),
    /// A configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        match value {
            WebError::Js(msg) => Self::from(msg),
            other => Self::from(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WebError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}

impl From<WebError> for lightdom_core::Error {
    fn from(value: WebError) -> Self {
        Self::host(value.to_string())
    }
}
