//! Structured attributes and scope chains
//!
//! This module provides:
//! - `Value`: the closed set of attribute value kinds, including nested groups
//! - `Attr`: one ordered key/value pair
//! - `Scope`: an immutable chain of attribute bindings and group openings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Marker substituted for the value of a trailing key that arrived without
/// a paired value.
pub const MISSING_VALUE: &str = "!MISSING";

/// Value type for structured logging attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Group(Vec<Attr>),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Group(attrs) => {
                let inner = attrs
                    .iter()
                    .map(|a| format!("{}={}", a.key, a.value))
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "[{}]", inner)
            }
            Value::Null => write!(f, "null"),
        }
    }
}

impl Value {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Group(attrs) => {
                let mut map = serde_json::Map::new();
                for attr in attrs {
                    // later duplicates replace earlier ones here
                    map.insert(attr.key.clone(), attr.value.to_json_value());
                }
                serde_json::Value::Object(map)
            }
            Value::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// One ordered key/value attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn group<K>(key: K, attrs: Vec<Attr>) -> Self
    where
        K: Into<String>,
    {
        Self {
            key: key.into(),
            value: Value::Group(attrs),
        }
    }

    /// Pair a flat alternating key/value argument list into attributes.
    ///
    /// Keys are taken from string values (anything else is stringified). A
    /// trailing key with no paired value is kept with [`MISSING_VALUE`] as
    /// its value rather than dropped.
    pub fn from_pairs(args: Vec<Value>) -> Vec<Attr> {
        let mut attrs = Vec::with_capacity(args.len() / 2 + 1);
        let mut iter = args.into_iter();
        while let Some(key) = iter.next() {
            let key = match key {
                Value::String(s) => s,
                other => other.to_string(),
            };
            match iter.next() {
                Some(value) => attrs.push(Attr { key, value }),
                None => attrs.push(Attr {
                    key,
                    value: Value::String(MISSING_VALUE.to_string()),
                }),
            }
        }
        attrs
    }

    /// Flatten attributes to `(dotted.key, rendered value)` pairs, expanding
    /// nested groups the way the text and remote layouts need them.
    pub fn flatten(attrs: &[Attr]) -> Vec<(String, String)> {
        let mut out = Vec::new();
        Self::flatten_into("", attrs, &mut out);
        out
    }

    fn flatten_into(prefix: &str, attrs: &[Attr], out: &mut Vec<(String, String)>) {
        for attr in attrs {
            let key = if prefix.is_empty() {
                attr.key.clone()
            } else {
                format!("{}.{}", prefix, attr.key)
            };
            match &attr.value {
                Value::Group(inner) => Self::flatten_into(&key, inner, out),
                other => out.push((key, other.to_string())),
            }
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// An immutable chain of attribute bindings and group openings.
///
/// Deriving a logger with `with`/`with_group` extends the chain without
/// touching the source; applying the chain to the call-site attributes
/// produces the final attribute set for one record, with group nesting
/// expressed as [`Value::Group`].
#[derive(Debug, Clone, Default)]
pub struct Scope {
    ops: Arc<Vec<ScopeOp>>,
}

#[derive(Debug, Clone)]
enum ScopeOp {
    Bind(Vec<Attr>),
    Open(String),
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the chain with pre-bound attributes.
    #[must_use]
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Scope {
        if attrs.is_empty() {
            return self.clone();
        }
        let mut ops = (*self.ops).clone();
        ops.push(ScopeOp::Bind(attrs));
        Scope { ops: Arc::new(ops) }
    }

    /// Extend the chain with a group opening; subsequent bindings and
    /// call-site attributes nest under `name`. An empty name is inert.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Scope {
        if name.is_empty() {
            return self.clone();
        }
        let mut ops = (*self.ops).clone();
        ops.push(ScopeOp::Open(name.to_string()));
        Scope { ops: Arc::new(ops) }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply the chain to one call's attributes, yielding the final
    /// top-level attribute set. Groups that end up empty are elided.
    pub fn apply(&self, call_attrs: Vec<Attr>) -> Vec<Attr> {
        let mut root: Vec<Attr> = Vec::new();
        let mut open: Vec<(String, Vec<Attr>)> = Vec::new();

        for op in self.ops.iter() {
            match op {
                ScopeOp::Bind(attrs) => {
                    let target = open.last_mut().map(|(_, a)| a).unwrap_or(&mut root);
                    target.extend(attrs.iter().cloned());
                }
                ScopeOp::Open(name) => open.push((name.clone(), Vec::new())),
            }
        }

        {
            let target = open.last_mut().map(|(_, a)| a).unwrap_or(&mut root);
            target.extend(call_attrs);
        }

        while let Some((name, attrs)) = open.pop() {
            if attrs.is_empty() {
                continue;
            }
            let parent = open.last_mut().map(|(_, a)| a).unwrap_or(&mut root);
            parent.push(Attr::group(name, attrs));
        }

        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_display() {
        let attr = Attr::new("user_id", 123);
        assert_eq!(attr.to_string(), "user_id=123");

        let attr = Attr::new("active", true);
        assert_eq!(attr.to_string(), "active=true");
    }

    #[test]
    fn test_from_pairs_even() {
        let attrs = Attr::from_pairs(vec!["k1".into(), 1.into(), "k2".into(), "v2".into()]);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], Attr::new("k1", 1));
        assert_eq!(attrs[1], Attr::new("k2", "v2"));
    }

    #[test]
    fn test_from_pairs_trailing_key_tolerated() {
        let attrs = Attr::from_pairs(vec!["k1".into(), 1.into(), "orphan".into()]);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].key, "orphan");
        assert_eq!(attrs[1].value, Value::String(MISSING_VALUE.to_string()));
    }

    #[test]
    fn test_from_pairs_non_string_key_stringified() {
        let attrs = Attr::from_pairs(vec![42.into(), "v".into()]);
        assert_eq!(attrs[0].key, "42");
    }

    #[test]
    fn test_scope_plain_bind() {
        let scope = Scope::new().with_attrs(vec![Attr::new("a", 1)]);
        let attrs = scope.apply(vec![Attr::new("b", 2)]);
        assert_eq!(attrs, vec![Attr::new("a", 1), Attr::new("b", 2)]);
    }

    #[test]
    fn test_scope_group_nesting() {
        let scope = Scope::new()
            .with_group("g")
            .with_attrs(vec![Attr::new("k", "v")]);
        let attrs = scope.apply(Vec::new());
        assert_eq!(attrs, vec![Attr::group("g", vec![Attr::new("k", "v")])]);
    }

    #[test]
    fn test_scope_call_attrs_join_open_group() {
        let scope = Scope::new().with_group("req");
        let attrs = scope.apply(vec![Attr::new("id", 7)]);
        assert_eq!(attrs, vec![Attr::group("req", vec![Attr::new("id", 7)])]);
    }

    #[test]
    fn test_scope_empty_group_elided() {
        let scope = Scope::new()
            .with_attrs(vec![Attr::new("a", 1)])
            .with_group("g");
        let attrs = scope.apply(Vec::new());
        assert_eq!(attrs, vec![Attr::new("a", 1)]);
    }

    #[test]
    fn test_scope_nested_groups() {
        let scope = Scope::new()
            .with_group("outer")
            .with_group("inner")
            .with_attrs(vec![Attr::new("k", "v")]);
        let attrs = scope.apply(Vec::new());
        assert_eq!(
            attrs,
            vec![Attr::group(
                "outer",
                vec![Attr::group("inner", vec![Attr::new("k", "v")])]
            )]
        );
    }

    #[test]
    fn test_scope_does_not_mutate_source() {
        let base = Scope::new().with_attrs(vec![Attr::new("a", 1)]);
        let _derived = base.with_attrs(vec![Attr::new("b", 2)]);
        let attrs = base.apply(Vec::new());
        assert_eq!(attrs, vec![Attr::new("a", 1)]);
    }

    #[test]
    fn test_duplicate_keys_preserved_in_order() {
        let scope = Scope::new().with_attrs(vec![Attr::new("k", 1)]);
        let attrs = scope.apply(vec![Attr::new("k", 2)]);
        assert_eq!(attrs, vec![Attr::new("k", 1), Attr::new("k", 2)]);
    }

    #[test]
    fn test_flatten_dotted_keys() {
        let attrs = vec![
            Attr::new("a", 1),
            Attr::group("g", vec![Attr::new("k", "v"), Attr::new("n", 2)]),
        ];
        let flat = Attr::flatten(&attrs);
        assert_eq!(
            flat,
            vec![
                ("a".to_string(), "1".to_string()),
                ("g.k".to_string(), "v".to_string()),
                ("g.n".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_json_value_last_key_wins() {
        let value = Value::Group(vec![Attr::new("k", 1), Attr::new("k", 2)]);
        let json = value.to_json_value();
        assert_eq!(json["k"], 2);
    }
}
