//! wpstruct-core: typed blog API records and the draft files they come from
//!
//! Pieces, bottom up:
//! - `value`: `Struct`/`Value`, what goes over the wire
//! - `mapper` and `record!`: records to and from a `Struct`
//! - `flat` with `registry`: drafts in, `Struct` out
//! - `json`, `draft`, `tabular`: what the CLI prints
pub mod coerce;
pub mod draft;
pub mod error;
pub mod flat;
pub mod json;
pub mod mapper;
pub mod records;
pub mod registry;
pub mod tabular;
pub mod value;

pub use draft::{
    Loaded, draft_template, find_drafts, from_flat_file, from_flat_str, load_with,
    template_from_fields,
};
pub use error::{CoerceError, Diagnostic, DiagnosticKind, ParseError, PopulateError};
pub use flat::{FlatFileParser, ParseOpts, Parsed};
pub use mapper::{Mapped, StructPatch, populate, serialize};
pub use registry::{TypeRegistry, type_name_for_key};
pub use tabular::StringHeader;
pub use value::{Struct, Value, ValueKind};
