use serde_json::json;

use crate::value::{ISO_DATE_FORMAT, Struct, Value};

#[derive(Clone, Debug)]
pub struct JsonOpts {
    pub pretty: bool,
    pub date_format: String,
}

impl Default for JsonOpts {
    fn default() -> Self {
        Self {
            pretty: true,
            date_format: ISO_DATE_FORMAT.to_string(),
        }
    }
}

pub fn struct_to_json(s: &Struct, opts: &JsonOpts) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(s.len());
    for (name, val) in s {
        map.insert(name.clone(), value_to_json(val, opts));
    }
    serde_json::Value::Object(map)
}

pub fn value_to_json(v: &Value, opts: &JsonOpts) -> serde_json::Value {
    match v {
        Value::String(s) => json!(s),
        Value::Integer(x) => json!(*x),
        Value::Boolean(b) => json!(*b),
        Value::DateTime(d) => json!(d.format(&opts.date_format).to_string()),
        Value::Struct(s) => struct_to_json(s, opts),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(|it| value_to_json(it, opts)).collect())
        }
    }
}

pub fn dump_struct_json(s: &Struct, opts: &JsonOpts) -> Result<String, String> {
    let v = struct_to_json(s, opts);
    let out = if opts.pretty {
        serde_json::to_string_pretty(&v)
    } else {
        serde_json::to_string(&v)
    };
    out.map_err(|e| e.to_string())
}

// nulls are skipped; numbers outside i32 stay as text
pub fn json_to_struct(map: &serde_json::Map<String, serde_json::Value>) -> Struct {
    let mut out = Struct::new();
    for (k, v) in map {
        if let Some(val) = json_to_value(v) {
            out.insert(k.clone(), val);
        }
    }
    out
}

pub fn json_to_value(v: &serde_json::Value) -> Option<Value> {
    match v {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Boolean(*b)),
        serde_json::Value::Number(n) => Some(
            n.as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Value::Integer)
                .unwrap_or_else(|| Value::String(n.to_string())),
        ),
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Array(items) => {
            Some(Value::List(items.iter().filter_map(json_to_value).collect()))
        }
        serde_json::Value::Object(map) => Some(Value::Struct(json_to_struct(map))),
    }
}
