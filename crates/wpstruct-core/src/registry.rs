// Name -> factory table used to build draft list elements.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::mapper::{self, FieldDescriptor, Mapped, PopulateContext};
use crate::records;
use crate::value::Struct;

pub type NormalizeFn = fn(&Struct, &mut PopulateContext) -> Struct;

#[derive(Clone, Copy)]
pub struct RecordFactory {
    pub type_name: &'static str,
    pub fields: &'static [FieldDescriptor],
    pub normalize: NormalizeFn,
}

impl std::fmt::Debug for RecordFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFactory")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    factories: BTreeMap<&'static str, RecordFactory>,
}

static DEFAULT_REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(|| {
    let mut reg = TypeRegistry::new();
    records::register_all(&mut reg);
    reg
});

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared registry holding every record type of this crate.
    pub fn global() -> &'static TypeRegistry {
        &DEFAULT_REGISTRY
    }

    pub fn register<T: Mapped>(&mut self) -> &mut Self {
        self.factories.insert(
            T::TYPE_NAME,
            RecordFactory {
                type_name: T::TYPE_NAME,
                fields: T::FIELDS,
                normalize: mapper::normalize::<T>,
            },
        );
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&RecordFactory> {
        self.factories.get(type_name)
    }

    pub fn resolve_key(&self, key: &str) -> Result<&RecordFactory, String> {
        let name = type_name_for_key(key);
        self.get(&name).ok_or(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Derives a record type name from a plural snake_case key:
/// `custom_fields` → `CustomField`, `terms` → `Term`, `categories` → `Categorie`.
pub fn type_name_for_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut chars = key.chars();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.by_ref().find(|&n| n != '_') {
                name.extend(next.to_uppercase());
            }
        } else {
            name.push(c);
        }
    }
    if name.ends_with('s') {
        name.pop();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}
