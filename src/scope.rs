//! Per-host variable scopes.
//!
//! A [`Scope`] is an ordered mapping from variable name to structured
//! value, built by layering `defaults` → `role_vars` → `host_vars`.
//! Layering replaces same-named keys wholesale; there is no deep merge.
//! Every value is cloned into the scope, so each host owns an
//! independent copy and mutation through one host's scope can never leak
//! into another's or into the defaults.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

/// Resolved variable mapping for one host (or for the local machine).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scope {
    vars: IndexMap<String, Value>,
}

impl Scope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Look up a variable as a string, if it is one.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }

    /// Whether a variable is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Overlay `other` onto this scope.
    ///
    /// Every key in `other` replaces the same-named key here entirely;
    /// values are cloned in (deep copy).
    pub fn layer(&mut self, other: &Self) {
        for (name, value) in &other.vars {
            self.vars.insert(name.clone(), value.clone());
        }
    }

    /// Iterate variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the scope is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<'a> IntoIterator for &'a Scope {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scope(pairs: &[(&str, Value)]) -> Scope {
        let mut s = Scope::new();
        for (name, value) in pairs {
            s.set(*name, value.clone());
        }
        s
    }

    #[test]
    fn layer_replaces_whole_values() {
        let mut base = scope(&[("a", Value::from(1)), ("b", Value::from(1))]);
        let over = scope(&[("a", Value::from(2))]);
        base.layer(&over);
        assert_eq!(base.get("a"), Some(&Value::from(2)));
        assert_eq!(base.get("b"), Some(&Value::from(1)));
    }

    #[test]
    fn layer_does_not_deep_merge_mappings() {
        let nested_one: Value = serde_yaml::from_str("x: 1\ny: 1\n").unwrap();
        let nested_two: Value = serde_yaml::from_str("x: 2\n").unwrap();
        let mut base = scope(&[("m", nested_one)]);
        base.layer(&scope(&[("m", nested_two.clone())]));
        assert_eq!(
            base.get("m"),
            Some(&nested_two),
            "layering must replace the mapping wholesale"
        );
    }

    #[test]
    fn layered_values_are_independent_copies() {
        let list: Value = serde_yaml::from_str("[1, 2]").unwrap();
        let source = scope(&[("l", list)]);
        let mut first = Scope::new();
        first.layer(&source);
        let mut second = Scope::new();
        second.layer(&source);
        first.set("l", Value::from("mutated"));
        assert_eq!(
            second.get("l"),
            source.get("l"),
            "mutating one layered copy must not affect another"
        );
    }

    #[test]
    fn get_str_only_returns_strings() {
        let s = scope(&[("name", Value::from("web1")), ("port", Value::from(22))]);
        assert_eq!(s.get_str("name"), Some("web1"));
        assert_eq!(s.get_str("port"), None);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let s = scope(&[
            ("z", Value::from(1)),
            ("a", Value::from(2)),
            ("m", Value::from(3)),
        ]);
        let names: Vec<&str> = s.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
