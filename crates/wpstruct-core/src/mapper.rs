// Record <-> Struct marshalling driven by the field table of `record!`.
// Patches run after the generic pass in both directions.
use crate::error::{CoerceError, PopulateError};
use crate::value::{Struct, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    DateTime,
    Record(&'static str),
    List(ElementKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    String,
    Integer,
    Boolean,
    DateTime,
    Record(&'static str),
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".into(),
            FieldKind::Integer => "integer".into(),
            FieldKind::Boolean => "boolean".into(),
            FieldKind::DateTime => "datetime".into(),
            FieldKind::Record(name) => (*name).into(),
            FieldKind::List(el) => format!("list of {}", el.describe()),
        }
    }
}

impl ElementKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ElementKind::String => "string",
            ElementKind::Integer => "integer",
            ElementKind::Boolean => "boolean",
            ElementKind::DateTime => "datetime",
            ElementKind::Record(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Default)]
pub struct PopulateContext {
    path: Vec<String>,
    errors: Vec<CoerceError>,
}

impl PopulateContext {
    pub fn new() -> Self {
        Self::default()
    }

    // e.g. `terms[0].name`
    pub fn path(&self) -> String {
        let mut out = String::new();
        for seg in &self.path {
            if !out.is_empty() && !seg.starts_with('[') {
                out.push('.');
            }
            out.push_str(seg);
        }
        out
    }

    pub fn push_key(&mut self, key: &str) {
        self.path.push(key.to_string());
    }

    pub fn push_index(&mut self, index: usize) {
        self.path.push(format!("[{}]", index));
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    pub fn record(&mut self, err: CoerceError) {
        self.errors.push(err);
    }

    pub fn errors(&self) -> &[CoerceError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CoerceError> {
        self.errors
    }

    pub fn mismatch(&self, expected: &'static str, found: &Value) -> CoerceError {
        CoerceError::TypeMismatch {
            path: self.path(),
            expected,
            found: found.kind(),
        }
    }
}

pub trait Marshal: Sized {
    const KIND: FieldKind;

    fn to_value(&self) -> Value;

    // Nested failures go to `ctx`; Err means the whole value is unusable.
    fn from_value(value: &Value, ctx: &mut PopulateContext) -> Result<Self, CoerceError>;
}

pub trait Element: Marshal {
    const ELEMENT: ElementKind;
}

pub trait StructPatch {
    fn patch_populate(&mut self, _source: &Struct, _ctx: &mut PopulateContext) {}

    fn patch_serialize(&self, _out: &mut Struct) {}
}

pub trait Mapped: Default + StructPatch {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    fn populate_fields(&mut self, source: &Struct, ctx: &mut PopulateContext);

    fn serialize_fields(&self, out: &mut Struct);
}

/// Fills `target` from `source`.
///
/// Absent keys leave fields as they are. On error the target is partially
/// populated: every field that coerced has been set.
pub fn populate<T: Mapped>(source: &Struct, target: &mut T) -> Result<(), PopulateError> {
    let mut ctx = PopulateContext::new();
    populate_with(source, target, &mut ctx);
    let errors = ctx.into_errors();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PopulateError { errors })
    }
}

pub fn populate_with<T: Mapped>(source: &Struct, target: &mut T, ctx: &mut PopulateContext) {
    target.populate_fields(source, ctx);
    target.patch_populate(source, ctx);
}

/// Builds a new [`Struct`] holding every non-null field of `record`.
pub fn serialize<T: Mapped>(record: &T) -> Struct {
    let mut out = Struct::new();
    record.serialize_fields(&mut out);
    record.patch_serialize(&mut out);
    out
}

/// Populates a fresh `T` and serializes it again, so the result only holds
/// keys `T` knows about, in `T`'s field order and coerced to `T`'s kinds.
pub fn normalize<T: Mapped>(source: &Struct, ctx: &mut PopulateContext) -> Struct {
    let mut record = T::default();
    populate_with(source, &mut record, ctx);
    serialize(&record)
}

pub fn populate_field<T: Marshal>(
    slot: &mut Option<T>,
    key: &str,
    source: &Struct,
    ctx: &mut PopulateContext,
) {
    let Some(value) = source.get(key) else {
        return;
    };
    ctx.push_key(key);
    match T::from_value(value, ctx) {
        Ok(v) => *slot = Some(v),
        Err(e) => ctx.record(e),
    }
    ctx.pop();
}

pub fn serialize_field<T: Marshal>(slot: &Option<T>, key: &str, out: &mut Struct) {
    if let Some(v) = slot {
        out.insert(key, v.to_value());
    }
}

// `r#type` -> `type`
pub const fn field_key(ident: &'static str) -> &'static str {
    let bytes = ident.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'r' && bytes[1] == b'#' {
        match std::str::from_utf8(bytes.split_at(2).1) {
            Ok(key) => key,
            Err(_) => ident,
        }
    } else {
        ident
    }
}

pub fn record_to_value<T: Mapped>(record: &T) -> Value {
    Value::Struct(serialize(record))
}

pub fn record_from_value<T: Mapped>(
    value: &Value,
    ctx: &mut PopulateContext,
) -> Result<T, CoerceError> {
    match value {
        Value::Struct(s) => {
            let mut record = T::default();
            populate_with(s, &mut record, ctx);
            Ok(record)
        }
        other => Err(ctx.mismatch(T::TYPE_NAME, other)),
    }
}

/// Declares a record struct together with its field table.
///
/// Every field becomes `pub name: Option<T>`; the field name is the struct
/// key. Fields listed in a trailing `patched { .. }` block are left out of the
/// generic table and the type must provide its own [`StructPatch`].
///
/// ```
/// wpstruct_core::record! {
///     pub struct Tag {
///         name: String,
///         count: i32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@codec $name:ident { $( $field:ident : $ty:ty ),* }) => {
        impl $crate::mapper::Mapped for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const FIELDS: &'static [$crate::mapper::FieldDescriptor] = &[
                $(
                    $crate::mapper::FieldDescriptor {
                        name: $crate::mapper::field_key(stringify!($field)),
                        kind: <$ty as $crate::mapper::Marshal>::KIND,
                    },
                )*
            ];

            #[allow(unused_variables)]
            fn populate_fields(
                &mut self,
                source: &$crate::value::Struct,
                ctx: &mut $crate::mapper::PopulateContext,
            ) {
                $( $crate::mapper::populate_field(
                    &mut self.$field,
                    $crate::mapper::field_key(stringify!($field)),
                    source,
                    ctx,
                ); )*
            }

            #[allow(unused_variables)]
            fn serialize_fields(&self, out: &mut $crate::value::Struct) {
                $( $crate::mapper::serialize_field(
                    &self.$field,
                    $crate::mapper::field_key(stringify!($field)),
                    out,
                ); )*
            }
        }

        impl $crate::mapper::Marshal for $name {
            const KIND: $crate::mapper::FieldKind =
                $crate::mapper::FieldKind::Record(stringify!($name));

            fn to_value(&self) -> $crate::value::Value {
                $crate::mapper::record_to_value(self)
            }

            fn from_value(
                value: &$crate::value::Value,
                ctx: &mut $crate::mapper::PopulateContext,
            ) -> Result<Self, $crate::error::CoerceError> {
                $crate::mapper::record_from_value(value, ctx)
            }
        }

        impl $crate::mapper::Element for $name {
            const ELEMENT: $crate::mapper::ElementKind =
                $crate::mapper::ElementKind::Record(stringify!($name));
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
        patched {
            $( $(#[$pmeta:meta])* $pfield:ident : $pty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: Option<$ty>, )*
            $( $(#[$pmeta])* pub $pfield: Option<$pty>, )*
        }

        $crate::record!(@codec $name { $( $field : $ty ),* });
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $crate::record! {
            $(#[$meta])*
            $vis struct $name {
                $( $(#[$fmeta])* $field : $ty ),*
            }
            patched {}
        }

        impl $crate::mapper::StructPatch for $name {}
    };
}
