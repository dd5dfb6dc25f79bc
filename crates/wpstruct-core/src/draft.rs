// Loading records from draft files, draft templates and draft discovery.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Diagnostic, ParseError, PopulateError};
use crate::flat::{FlatFileParser, Parsed};
use crate::mapper::{FieldDescriptor, FieldKind, Mapped, populate};

pub const DRAFT_EXTENSIONS: &[&str] = &["txt", "draft"];

/// A record read from a draft, with everything that went wrong on the way.
#[derive(Debug)]
pub struct Loaded<T> {
    pub record: T,
    pub diagnostics: Vec<Diagnostic>,
    pub populate_error: Option<PopulateError>,
}

impl<T> Loaded<T> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.populate_error.is_none()
    }
}

pub fn from_flat_file<T: Mapped>(path: &Path) -> Result<Loaded<T>, ParseError> {
    Ok(load_with(FlatFileParser::new().parse_file(path)?))
}

pub fn from_flat_str<T: Mapped>(text: &str) -> Result<Loaded<T>, ParseError> {
    Ok(load_with(FlatFileParser::new().parse_str(text)?))
}

pub fn load_with<T: Mapped>(parsed: Parsed) -> Loaded<T> {
    let mut record = T::default();
    let populate_error = populate(&parsed.fields, &mut record).err();
    Loaded {
        record,
        diagnostics: parsed.diagnostics,
        populate_error,
    }
}

/// Blank draft for `T`. Parsing it unchanged gives an empty struct.
pub fn draft_template<T: Mapped>() -> String {
    template_from_fields(T::TYPE_NAME, T::FIELDS)
}

pub fn template_from_fields(type_name: &str, fields: &[FieldDescriptor]) -> String {
    let mut out = String::new();
    writeln!(&mut out, "# {} draft", type_name).ok();
    for field in fields {
        let placeholder = match field.kind {
            FieldKind::List(_) => "[]",
            _ => "null",
        };
        writeln!(&mut out, "# {}", field.kind.describe()).ok();
        writeln!(&mut out, "{}: {}", field.name, placeholder).ok();
    }
    out
}

pub fn find_drafts(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| DRAFT_EXTENSIONS.contains(&ext))
        })
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Post, Term, User};

    #[test]
    fn template_parses_to_nothing() {
        let text = draft_template::<Post>();
        assert!(text.starts_with("# Post draft\n"));
        assert!(text.contains("\npost_title: null\n"));
        assert!(text.contains("\nterms: []\n"));
        let parsed = FlatFileParser::new().parse_str(&text).unwrap();
        assert!(parsed.fields.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn template_covers_every_field() {
        let text = draft_template::<User>();
        let keys = text.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(keys, User::FIELDS.len());
    }

    #[test]
    fn loaded_reports_populate_errors() {
        let loaded = from_flat_str::<Term>("name: rust\ncount: several").unwrap();
        assert_eq!(loaded.record.name.as_deref(), Some("rust"));
        assert_eq!(loaded.record.count, None);
        assert!(!loaded.is_clean());
        assert_eq!(loaded.populate_error.unwrap().errors.len(), 1);
    }
}
