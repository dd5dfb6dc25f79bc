// Untyped protocol values: the ordered Struct and its Value union.
use std::fmt::{self, Write as _};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use indexmap::map::Iter;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Struct(Struct),
    List(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    DateTime,
    Struct,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "datetime",
            ValueKind::Struct => "struct",
            ValueKind::List => "list",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Struct(_) => ValueKind::Struct,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Struct> for Value {
    fn from(v: Struct) -> Self {
        Value::Struct(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

/// Ordered key/value structure exchanged with the remote API. Re-inserting a
/// key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Struct {
    members: IndexMap<String, Value>,
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.members.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.members.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn pretty(&self) -> String {
        let mut out = String::new();
        fmt_struct(self, 0, &mut out).ok();
        out
    }
}

impl<'a> IntoIterator for &'a Struct {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Struct {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Struct::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

fn fmt_struct(s: &Struct, indent: usize, out: &mut String) -> fmt::Result {
    writeln!(out, "{{")?;
    for (name, val) in s {
        write!(out, "{}{}: ", pad(indent + 2), name)?;
        fmt_value(val, indent + 2, out)?;
    }
    writeln!(out, "{}}}", pad(indent))
}

fn fmt_value(v: &Value, indent: usize, out: &mut String) -> fmt::Result {
    match v {
        Value::String(s) => writeln!(out, "\"{}\"", s),
        Value::Integer(x) => writeln!(out, "{}", x),
        Value::Boolean(b) => writeln!(out, "{}", b),
        Value::DateTime(d) => writeln!(out, "{}", d.format(ISO_DATE_FORMAT)),
        Value::Struct(s) => fmt_struct(s, indent, out),
        Value::List(items) => {
            writeln!(out, "[")?;
            for it in items {
                write!(out, "{}", pad(indent + 2))?;
                fmt_value(it, indent + 2, out)?;
            }
            writeln!(out, "{}]", pad(indent))
        }
    }
}

fn pad(n: usize) -> String {
    " ".repeat(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_in_place() {
        let mut s = Struct::new();
        s.insert("a", 1);
        s.insert("b", "two");
        let prev = s.insert("a", 3);
        assert_eq!(prev, Some(Value::Integer(1)));
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(s.get("a"), Some(&Value::Integer(3)));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut s: Struct = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        s.remove("y");
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["x", "z"]);
    }

    #[test]
    fn pretty_renders_nested_values() {
        let mut inner = Struct::new();
        inner.insert("key", "k");
        let mut s = Struct::new();
        s.insert("title", "Hello");
        s.insert("fields", Value::List(vec![Value::Struct(inner)]));
        let text = s.pretty();
        assert!(text.contains("title: \"Hello\""));
        assert!(text.contains("key: \"k\""));
    }
}
