// Flat `key: value` draft parser. Continuation lines are appended verbatim,
// values are trimmed on flush, the last occurrence of a key wins.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Diagnostic, DiagnosticKind, ParseError};
use crate::json::json_to_struct;
use crate::mapper::PopulateContext;
use crate::registry::TypeRegistry;
use crate::value::{Struct, Value};

#[derive(Clone, Copy, Debug, Default)]
pub struct ParseOpts {
    pub strict: bool,
}

#[derive(Debug, Default)]
pub struct Parsed {
    pub fields: Struct,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct FlatFileParser<'r> {
    registry: &'r TypeRegistry,
    opts: ParseOpts,
}

impl Default for FlatFileParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatFileParser<'static> {
    /// Parser resolving list element types against [`TypeRegistry::global`].
    pub fn new() -> Self {
        FlatFileParser::with_registry(TypeRegistry::global())
    }
}

impl<'r> FlatFileParser<'r> {
    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            opts: ParseOpts::default(),
        }
    }

    pub fn with_opts(mut self, opts: ParseOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Parsed, ParseError> {
        let file = File::open(path)?;
        debug!("[wpstruct:flat] parsing {}", path.display());
        self.parse_reader(BufReader::new(file))
    }

    pub fn parse_str(&self, text: &str) -> Result<Parsed, ParseError> {
        self.parse_reader(text.as_bytes())
    }

    pub fn parse_reader<R: BufRead>(&self, input: R) -> Result<Parsed, ParseError> {
        let mut out = Parsed::default();
        let mut pending: Option<(String, String)> = None;
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, rest)) = split_key(&line) {
                if let Some((k, v)) = pending.take() {
                    self.put_value(&k, &v, &mut out);
                }
                pending = Some((key.to_string(), rest.to_string()));
            } else if let Some((_, value)) = pending.as_mut() {
                value.push_str(&line);
            } else {
                return Err(ParseError::InvalidFormat {
                    line: idx + 1,
                    content: line,
                });
            }
        }
        if let Some((k, v)) = pending {
            self.put_value(&k, &v, &mut out);
        }
        if self.opts.strict && !out.diagnostics.is_empty() {
            return Err(ParseError::Rejected {
                diagnostics: out.diagnostics,
            });
        }
        Ok(out)
    }

    fn put_value(&self, key: &str, raw: &str, out: &mut Parsed) {
        let value = raw.trim();
        if value.starts_with('[') {
            self.put_array(key, value, out);
        } else if value.eq_ignore_ascii_case("null") {
            debug!("[wpstruct:flat] key {} is null, dropped", key);
        } else {
            out.fields.insert(key, value);
        }
    }

    fn put_array(&self, key: &str, value: &str, out: &mut Parsed) {
        let items: Vec<serde_json::Value> = match serde_json::from_str(value) {
            Ok(items) => items,
            Err(e) => return skip(key, DiagnosticKind::MalformedJson(e.to_string()), out),
        };
        if items.is_empty() {
            debug!("[wpstruct:flat] key {} is an empty list, dropped", key);
            return;
        }
        if items.iter().all(serde_json::Value::is_string) {
            let strings = items
                .into_iter()
                .filter_map(|it| match it {
                    serde_json::Value::String(s) => Some(Value::String(s)),
                    _ => None,
                })
                .collect();
            out.fields.insert(key, Value::List(strings));
            return;
        }

        let factory = match self.registry.resolve_key(key) {
            Ok(f) => f,
            Err(name) => return skip(key, DiagnosticKind::UnresolvedType(name), out),
        };
        let mut records = Vec::with_capacity(items.len());
        let mut ctx = PopulateContext::new();
        ctx.push_key(key);
        for (index, item) in items.iter().enumerate() {
            let Some(map) = item.as_object() else {
                return skip(key, DiagnosticKind::NotAnObject { index }, out);
            };
            ctx.push_index(index);
            records.push(Value::Struct((factory.normalize)(&json_to_struct(map), &mut ctx)));
            ctx.pop();
        }
        let errors = ctx.into_errors();
        if !errors.is_empty() {
            for err in errors {
                skip(key, DiagnosticKind::Coercion(err), out);
            }
            return;
        }
        debug!(
            "[wpstruct:flat] key {} holds {} {} record(s)",
            key,
            records.len(),
            factory.type_name
        );
        out.fields.insert(key, Value::List(records));
    }
}

fn skip(key: &str, kind: DiagnosticKind, out: &mut Parsed) {
    let diag = Diagnostic {
        key: key.to_string(),
        kind,
    };
    warn!("[wpstruct:flat] {}", diag);
    out.diagnostics.push(diag);
}

fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let valid = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    valid.then_some((key, rest))
}
