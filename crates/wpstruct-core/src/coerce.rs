// Scalar and list coercions between field payloads and untyped values.
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::CoerceError;
use crate::mapper::{ElementKind, Element, FieldKind, Marshal, PopulateContext};
use crate::value::{ISO_DATE_FORMAT, Value};

// Tried in order; the compact form is XML-RPC dateTime.iso8601.
const DATE_FORMATS: &[&str] = &[
    "%Y%m%dT%H:%M:%S",
    ISO_DATE_FORMAT,
    "%Y-%m-%d %H:%M:%S",
];

impl Marshal for String {
    const KIND: FieldKind = FieldKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::DateTime(d) => Ok(d.format(ISO_DATE_FORMAT).to_string()),
            other => Err(ctx.mismatch("string", other)),
        }
    }
}

impl Element for String {
    const ELEMENT: ElementKind = ElementKind::String;
}

impl Marshal for i32 {
    const KIND: FieldKind = FieldKind::Integer;

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError> {
        match value {
            Value::Integer(n) => Ok(*n),
            Value::String(s) => s.trim().parse().map_err(|_| CoerceError::InvalidInteger {
                path: ctx.path(),
                value: s.clone(),
            }),
            other => Err(ctx.mismatch("integer", other)),
        }
    }
}

impl Element for i32 {
    const ELEMENT: ElementKind = ElementKind::Integer;
}

impl Marshal for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::Integer(n) => Err(CoerceError::InvalidBoolean {
                path: ctx.path(),
                value: n.to_string(),
            }),
            Value::String(s) => parse_bool(s).ok_or_else(|| CoerceError::InvalidBoolean {
                path: ctx.path(),
                value: s.clone(),
            }),
            other => Err(ctx.mismatch("boolean", other)),
        }
    }
}

impl Element for bool {
    const ELEMENT: ElementKind = ElementKind::Boolean;
}

impl Marshal for NaiveDateTime {
    const KIND: FieldKind = FieldKind::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError> {
        match value {
            Value::DateTime(d) => Ok(*d),
            Value::String(s) => parse_date(s).ok_or_else(|| CoerceError::InvalidDate {
                path: ctx.path(),
                value: s.clone(),
            }),
            other => Err(ctx.mismatch("datetime", other)),
        }
    }
}

impl Element for NaiveDateTime {
    const ELEMENT: ElementKind = ElementKind::DateTime;
}

impl<T: Element> Marshal for Vec<T> {
    const KIND: FieldKind = FieldKind::List(T::ELEMENT);

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Marshal::to_value).collect())
    }

    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError> {
        let Value::List(items) = value else {
            return Err(ctx.mismatch("list", value));
        };
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            ctx.push_index(i);
            let converted = T::from_value(item, ctx);
            ctx.pop();
            out.push(converted?);
        }
        Ok(out)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.naive_utc());
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Struct, ValueKind};

    fn coerce<T: Marshal>(v: Value) -> Result<T, CoerceError> {
        let mut ctx = PopulateContext::new();
        ctx.push_key("f");
        T::from_value(&v, &mut ctx)
    }

    #[test]
    fn text_accepts_scalars() {
        assert_eq!(coerce::<String>(Value::Integer(4)).unwrap(), "4");
        assert_eq!(coerce::<String>(Value::Boolean(false)).unwrap(), "false");
        let err = coerce::<String>(Value::List(vec![])).unwrap_err();
        assert_eq!(
            err,
            CoerceError::TypeMismatch {
                path: "f".into(),
                expected: "string",
                found: ValueKind::List,
            }
        );
    }

    #[test]
    fn integers_parse_from_trimmed_text() {
        assert_eq!(coerce::<i32>(" -12 ".into()).unwrap(), -12);
        assert!(matches!(
            coerce::<i32>("12abc".into()),
            Err(CoerceError::InvalidInteger { .. })
        ));
        assert!(matches!(
            coerce::<i32>(Value::Struct(Struct::new())),
            Err(CoerceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn booleans_accept_xmlrpc_integers() {
        assert!(coerce::<bool>(Value::Integer(1)).unwrap());
        assert!(!coerce::<bool>(Value::Integer(0)).unwrap());
        assert!(coerce::<bool>(Value::Integer(2)).is_err());
        assert!(coerce::<bool>("Yes".into()).unwrap());
        assert!(coerce::<bool>("maybe".into()).is_err());
    }

    #[test]
    fn dates_parse_known_layouts() {
        let expected = NaiveDate::from_ymd_opt(2012, 7, 4)
            .and_then(|d| d.and_hms_opt(8, 15, 0))
            .unwrap();
        for text in [
            "20120704T08:15:00",
            "2012-07-04T08:15:00",
            "2012-07-04 08:15:00",
            "2012-07-04T10:15:00+02:00",
        ] {
            assert_eq!(parse_date(text), Some(expected), "{text}");
        }
        assert_eq!(
            parse_date("2012-07-04"),
            NaiveDate::from_ymd_opt(2012, 7, 4).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert!(matches!(
            coerce::<NaiveDateTime>("yesterday".into()),
            Err(CoerceError::InvalidDate { .. })
        ));
    }

    #[test]
    fn list_fails_as_a_whole() {
        let v = Value::List(vec!["1".into(), "x".into(), Value::Integer(3)]);
        let err = coerce::<Vec<i32>>(v).unwrap_err();
        assert_eq!(err.path(), "f[1]");

        let ok = coerce::<Vec<i32>>(Value::List(vec!["1".into(), Value::Integer(3)])).unwrap();
        assert_eq!(ok, vec![1, 3]);
        assert!(coerce::<Vec<String>>("a".into()).is_err());
    }
}
