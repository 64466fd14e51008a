//! `{{key}}` string templating.
//!
//! A tiny subset of moustache: every `{{key}}` marker whose key is known to
//! the [`TemplateVars`] is replaced by its value. Unknown markers stay in the
//! output untouched, which makes it safe to expand a template in several
//! passes with different variable sets. Useful when the template string comes
//! from elsewhere, such as server-rendered markup.
//!
//! ```
//! use std::collections::HashMap;
//! use lightdom_core::expand;
//!
//! let vars = HashMap::from([("place", "world")]);
//! assert_eq!(expand("Hello, {{place}}!", &vars), "Hello, world!");
//! assert_eq!(expand("{{greeting}}, {{place}}!", &vars), "{{greeting}}, world!");
//! ```

use core::fmt::Display;
use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A source of template variables.
pub trait TemplateVars {
    /// Returns the replacement for `key`, or `None` to leave the marker as is.
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<T: TemplateVars + ?Sized> TemplateVars for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

impl<K, V, S> TemplateVars for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    S: BuildHasher,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|value| Cow::Owned(value.to_string()))
    }
}

impl<K, V> TemplateVars for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|value| Cow::Owned(value.to_string()))
    }
}

impl<K, V> TemplateVars for [(K, V)]
where
    K: AsRef<str>,
    V: Display,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(name, _)| name.as_ref() == key)
            .map(|(_, value)| Cow::Owned(value.to_string()))
    }
}

impl<K, V, const N: usize> TemplateVars for [(K, V); N]
where
    K: AsRef<str>,
    V: Display,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.as_slice().lookup(key)
    }
}

/// JSON objects expand their members. Strings are inserted without quotes,
/// other values in their JSON form; non-object values know no keys.
impl TemplateVars for serde_json::Value {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.as_object()?.get(key)? {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Wraps a closure as a variable source.
#[derive(Debug, Clone, Copy)]
pub struct FnVars<F>(pub F);

impl<F, V> TemplateVars for FnVars<F>
where
    F: Fn(&str) -> Option<V>,
    V: Display,
{
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (self.0)(key).map(|value| Cow::Owned(value.to_string()))
    }
}

/// Expands every `{{key}}` marker in `template` from `vars`.
///
/// A key is the shortest run of one or more characters, without line breaks,
/// between `{{` and `}}`; it is looked up verbatim. Markers with no matching
/// variable are copied unchanged. Substituted values are not scanned for
/// further markers.
#[must_use]
pub fn expand(template: &str, vars: &(impl TemplateVars + ?Sized)) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        match marker_key(after_open) {
            Some(key) => {
                out.push_str(&rest[..start]);
                let marker_len = OPEN.len() + key.len() + CLOSE.len();
                match vars.lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + marker_len]),
                }
                rest = &rest[start + marker_len..];
            }
            None => {
                // Not a marker here; keep the first brace and rescan from the next one.
                out.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Finds the key of a marker whose opening braces were just consumed.
fn marker_key(after_open: &str) -> Option<&str> {
    let first = after_open.chars().next()?;
    if first == '\n' {
        return None;
    }
    let search_from = first.len_utf8();
    let close = after_open[search_from..].find(CLOSE)? + search_from;
    let key = &after_open[..close];
    (!key.contains('\n')).then_some(key)
}
