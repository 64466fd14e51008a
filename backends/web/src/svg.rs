//! SVG element creation.
//!
//! SVG nodes must be created in the SVG namespace; these helpers do that and
//! otherwise behave like [`Dom::el`].

use core::fmt::{self, Display};

use web_sys::{Element, Node};

use crate::dom::{Dom, apply};
use crate::error::WebError;

/// Namespace URI of SVG elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The `viewBox` of an `<svg>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width of the visible area.
    pub width: f64,
    /// Height of the visible area.
    pub height: f64,
}

impl ViewBox {
    /// A view box anchored at the origin.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Builds a view box from one (`size`), two (`width height`) or four
    /// (`x y width height`) numbers.
    ///
    /// Returns `None` for any other count, or when the width or height is zero
    /// or not a number.
    #[must_use]
    pub fn from_dims(dims: &[f64]) -> Option<Self> {
        let view_box = match *dims {
            [size] => Self::sized(size, size),
            [width, height] => Self::sized(width, height),
            [x, y, width, height] => Self {
                x,
                y,
                width,
                height,
            },
            _ => return None,
        };
        let usable = |v: f64| v != 0.0 && !v.is_nan();
        (usable(view_box.width) && usable(view_box.height)).then_some(view_box)
    }
}

impl Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

impl Dom {
    /// Creates an `<svg>` container holding `shapes`.
    ///
    /// The optional `view_box` is written before `attributes`, so an explicit
    /// `viewBox` attribute wins.
    ///
    /// # Errors
    ///
    /// Returns an error if a shape cannot be appended or an attribute name is
    /// invalid.
    pub fn svg<S, I, K, V>(
        &self,
        shapes: S,
        attributes: I,
        view_box: Option<ViewBox>,
    ) -> Result<Element, WebError>
    where
        S: IntoIterator,
        S::Item: AsRef<Node>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let svg = self.svg_element("svg")?;
        append_all(&svg, shapes)?;
        if let Some(view_box) = view_box {
            svg.set_attribute("viewBox", &view_box.to_string())?;
        }
        apply(&svg, attributes)?;
        Ok(svg)
    }

    /// Creates an SVG shape such as `circle` or `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag or an attribute name is invalid.
    pub fn shape<I, K, V>(&self, tag: &str, attributes: I) -> Result<Element, WebError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let shape = self.svg_element(tag)?;
        apply(&shape, attributes)?;
        Ok(shape)
    }

    /// Creates a `<rect>`, the default shape.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute name is invalid.
    pub fn rect<I, K, V>(&self, attributes: I) -> Result<Element, WebError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        self.shape("rect", attributes)
    }

    /// Creates a `<g>` group holding `shapes`.
    ///
    /// # Errors
    ///
    /// Returns an error if a shape cannot be appended or an attribute name is
    /// invalid.
    pub fn group<S, I, K, V>(&self, shapes: S, attributes: I) -> Result<Element, WebError>
    where
        S: IntoIterator,
        S::Item: AsRef<Node>,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let group = self.svg_element("g")?;
        append_all(&group, shapes)?;
        apply(&group, attributes)?;
        Ok(group)
    }

    fn svg_element(&self, tag: &str) -> Result<Element, WebError> {
        self.document()
            .create_element_ns(Some(SVG_NAMESPACE), tag)
            .map_err(WebError::from)
    }
}

fn append_all<S>(parent: &Element, children: S) -> Result<(), WebError>
where
    S: IntoIterator,
    S::Item: AsRef<Node>,
{
    for child in children {
        parent.append_child(child.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_value_is_a_square() {
        let view_box = ViewBox::from_dims(&[100.0]).unwrap();
        assert_eq!(view_box.to_string(), "0 0 100 100");
    }

    #[test]
    fn two_values_are_width_and_height() {
        let view_box = ViewBox::from_dims(&[640.0, 480.0]).unwrap();
        assert_eq!(view_box, ViewBox::sized(640.0, 480.0));
        assert_eq!(view_box.to_string(), "0 0 640 480");
    }

    #[test]
    fn four_values_include_the_origin() {
        let view_box = ViewBox::from_dims(&[10.0, 10.0, 100.0, 200.5]).unwrap();
        assert_eq!(view_box.to_string(), "10 10 100 200.5");
    }

    #[test]
    fn other_lengths_are_ignored() {
        assert_eq!(ViewBox::from_dims(&[]), None);
        assert_eq!(ViewBox::from_dims(&[1.0, 2.0, 3.0]), None);
        assert_eq!(ViewBox::from_dims(&[1.0, 2.0, 3.0, 4.0, 5.0]), None);
    }

    #[test]
    fn zero_or_nan_sizes_are_ignored() {
        assert_eq!(ViewBox::from_dims(&[0.0, 100.0]), None);
        assert_eq!(ViewBox::from_dims(&[5.0, 5.0, 100.0, 0.0]), None);
        assert_eq!(ViewBox::from_dims(&[f64::NAN]), None);
    }
}
