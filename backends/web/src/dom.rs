//! HTML element creation and container helpers.

use core::fmt::Display;

use web_sys::{Document, Element, HtmlElement, Node, Window};

use crate::error::WebError;

/// Pass as the attribute list when an element needs none.
pub const NO_ATTRIBUTES: [(&str, &str); 0] = [];

/// Element factory bound to a [`Document`].
#[derive(Debug, Clone)]
pub struct Dom {
    document: Document,
}

impl Dom {
    /// Binds to the document of the current browser window.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside of a browser.
    pub fn new() -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self { document })
    }

    /// Binds to an explicit document.
    #[must_use]
    pub const fn from_document(document: Document) -> Self {
        Self { document }
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the document body.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] if the document has no body yet.
    pub fn body(&self) -> Result<HtmlElement, WebError> {
        self.document.body().ok_or(WebError::DomUnavailable)
    }

    /// Creates an HTML element and applies `attributes` to it.
    ///
    /// ```no_run
    /// # use lightdom_web::{Dom, WebError};
    /// # fn main() -> Result<(), WebError> {
    /// let dom = Dom::new()?;
    /// let list = dom.el("ul", [("class", "events")])?;
    /// let logo = dom.el("img", [("width", 100), ("height", 100)])?;
    /// # let _ = (list, logo);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the tag name or an attribute name is invalid.
    pub fn el<I, K, V>(&self, tag: &str, attributes: I) -> Result<Element, WebError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let element = self.document.create_element(tag)?;
        apply(&element, attributes)?;
        Ok(element)
    }

    /// Creates a `<div>` with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute name is invalid.
    pub fn div<I, K, V>(&self, attributes: I) -> Result<Element, WebError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        self.el("div", attributes)
    }

    /// Looks up an element by id.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::ElementNotFound`] if no element carries `id`.
    pub fn id(&self, id: &str) -> Result<Element, WebError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| WebError::ElementNotFound(id.to_string()))
    }
}

/// Sets every `(name, value)` pair as an attribute of `element`, returning the
/// element for chaining.
///
/// # Errors
///
/// Returns an error if an attribute name is invalid.
pub fn apply<I, K, V>(element: &Element, attributes: I) -> Result<&Element, WebError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    for (name, value) in attributes {
        element.set_attribute(name.as_ref(), &value.to_string())?;
    }
    Ok(element)
}

/// Removes every child of `node`, returning the node for chaining.
///
/// # Errors
///
/// Returns an error if the DOM refuses to detach a child.
pub fn empty<N: AsRef<Node>>(node: &N) -> Result<&N, WebError> {
    let parent = node.as_ref();
    while let Some(child) = parent.first_child() {
        parent.remove_child(&child)?;
    }
    Ok(node)
}
