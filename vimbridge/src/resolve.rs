//! Field correspondence between a schema record and a legacy record.
//!
//! A [`Resolution`] is computed once per `(schema type, legacy type)` pair and cached by the
//! [`crate::Converter`]. Legacy fields are searched breadth-first through embedded composites;
//! the shallowest match wins, ties go to declaration order.

use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, trace, warn};

use crate::naming::NamingStrategy;
use crate::types::{FieldDescriptor, RecordDescriptor, Shape};

/// Embedded legacy field traversed on the way to a match.
#[derive(Debug, Clone, Copy)]
pub struct EmbedStep {
    pub ident: &'static str,
    pub record: &'static RecordDescriptor,
}

#[derive(Debug, Clone)]
pub struct FieldMatch {
    /// Index into the schema record's fields.
    pub schema_field: usize,
    /// Embedded fields from the legacy root down to the record holding the match.
    pub embedding: Vec<EmbedStep>,
    /// Index into the fields of the innermost record of `embedding` (or the legacy root).
    pub legacy_field: usize,
}

impl FieldMatch {
    pub fn depth(&self) -> usize {
        self.embedding.len()
    }
}

#[derive(Debug)]
pub struct Resolution {
    pub schema: &'static RecordDescriptor,
    pub legacy: &'static RecordDescriptor,
    pub matches: Vec<FieldMatch>,
    /// Schema fields with no legacy counterpart, left untouched by conversions.
    pub unmatched: Vec<&'static str>,
}

impl Resolution {
    pub fn resolve(
        schema: &'static RecordDescriptor,
        legacy: &'static RecordDescriptor,
        naming: &dyn NamingStrategy,
    ) -> Self {
        let mut matches = Vec::new();
        let mut unmatched = Vec::new();

        for (index, field) in schema.fields.iter().enumerate() {
            let expected = match field.legacy_name {
                Some(name) => name.to_string(),
                None => naming.legacy_field_name(field.ident),
            };
            match search(legacy, &expected, field.legacy_shape) {
                Some((embedding, legacy_field)) => matches.push(FieldMatch {
                    schema_field: index,
                    embedding,
                    legacy_field,
                }),
                None => {
                    trace!(
                        "{}.{} has no legacy counterpart `{expected}` in {}",
                        schema.rust_name, field.ident, legacy.name
                    );
                    unmatched.push(field.ident);
                }
            }
        }

        debug!(
            "resolved {} <-> {}: {} matched, {} unmatched",
            schema.rust_name,
            legacy.name,
            matches.len(),
            unmatched.len()
        );

        Self {
            schema,
            legacy,
            matches,
            unmatched,
        }
    }

    pub fn schema_field(&self, found: &FieldMatch) -> &'static FieldDescriptor {
        &self.schema.fields[found.schema_field]
    }

    pub fn legacy_field(&self, found: &FieldMatch) -> &'static FieldDescriptor {
        let holder = found.embedding.last().map_or(self.legacy, |step| step.record);
        &holder.fields[found.legacy_field]
    }

    /// Legacy field identifiers from the root record down to the matched field.
    pub fn legacy_idents(&self, found: &FieldMatch) -> Vec<&'static str> {
        found
            .embedding
            .iter()
            .map(|step| step.ident)
            .chain(std::iter::once(self.legacy_field(found).ident))
            .collect()
    }

    pub fn find(&self, schema_ident: &str) -> Option<&FieldMatch> {
        self.matches
            .iter()
            .find(|found| self.schema_field(found).ident == schema_ident)
    }

    /// Dotted legacy wire path of a match, e.g. `notEnoughLicenses.runtimeFault.faultMessage`.
    pub fn legacy_path(&self, found: &FieldMatch) -> String {
        let mut holder = self.legacy;
        let mut segments = Vec::with_capacity(found.depth() + 1);
        for step in &found.embedding {
            if let Some(field) = holder.field(step.ident) {
                segments.push(field.name);
            }
            holder = step.record;
        }
        segments.push(self.legacy_field(found).name);
        segments.join(".")
    }
}

fn search(
    legacy: &'static RecordDescriptor,
    expected: &str,
    shape_hint: Option<&str>,
) -> Option<(Vec<EmbedStep>, usize)> {
    let mut queue = VecDeque::from([(legacy, Vec::<EmbedStep>::new())]);
    while let Some((record, embedding)) = queue.pop_front() {
        for (index, field) in record.fields.iter().enumerate() {
            if field.name == expected && shape_hint.is_none_or(|hint| field.shape.type_name() == hint) {
                return Some((embedding, index));
            }
        }
        for field in record.fields.iter().filter(|field| field.embedded) {
            match &field.shape {
                Shape::Record(inner) => {
                    let mut next = embedding.clone();
                    next.push(EmbedStep {
                        ident: field.ident,
                        record: inner.get(),
                    });
                    queue.push_back((inner.get(), next));
                }
                other => warn!(
                    "{}.{} is marked embedded but has shape {other}; skipping",
                    record.name, field.ident
                ),
            }
        }
    }
    None
}

/// Resolution tables keyed by `(schema, legacy)` type ids.
#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    entries: RwLock<HashMap<(TypeId, TypeId), Arc<Resolution>>>,
}

impl ResolutionCache {
    pub(crate) fn get_or_resolve(
        &self,
        schema: &'static RecordDescriptor,
        legacy: &'static RecordDescriptor,
        naming: &dyn NamingStrategy,
    ) -> Arc<Resolution> {
        let key = (schema.type_id, legacy.type_id);
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(found);
        }

        if let Some(alias) = schema.legacy_alias
            && alias != legacy.name
        {
            warn!(
                "{} is aliased to legacy type {alias} but is being converted with {}",
                schema.rust_name, legacy.name
            );
        }

        let resolved = Arc::new(Resolution::resolve(schema, legacy, naming));
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert(resolved))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::{v1, vim};
    use crate::naming::LowerCamelCase;
    use crate::{LegacyObject, Record, SchemaMessage};

    #[derive(Debug, Default, LegacyObject)]
    struct Named {
        name: String,
    }

    #[derive(Debug, Default, LegacyObject)]
    struct Middle {
        #[bridge(embed)]
        named: Named,
    }

    #[derive(Debug, Default, LegacyObject)]
    struct Sibling {
        name: String,
        label: String,
    }

    #[derive(Debug, Default, LegacyObject)]
    struct Outer {
        #[bridge(embed)]
        middle: Middle,
        #[bridge(embed)]
        sibling: Sibling,
    }

    #[derive(Debug, Default, SchemaMessage)]
    struct Flat {
        name: String,
        label: String,
        missing: i32,
    }

    #[test]
    fn shallowest_embedded_match_wins() {
        let resolution = Resolution::resolve(Flat::descriptor(), Outer::descriptor(), &LowerCamelCase);

        let name = resolution.find("name").unwrap();
        assert_eq!(resolution.legacy_idents(name), vec!["sibling", "name"]);
        assert_eq!(name.depth(), 1);

        let label = resolution.find("label").unwrap();
        assert_eq!(resolution.legacy_path(label), "sibling.label");

        assert_eq!(resolution.unmatched, vec!["missing"]);
    }

    #[test]
    fn embedded_bases_are_flattened_transitively() {
        let resolution = Resolution::resolve(
            v1::MethodFault::descriptor(),
            vim::VmLimitLicense::descriptor(),
            &LowerCamelCase,
        );
        let messages = resolution.find("fault_message").unwrap();
        assert_eq!(
            resolution.legacy_path(messages),
            "notEnoughLicenses.runtimeFault.methodFault.faultMessage"
        );
        assert_eq!(messages.depth(), 3);
    }

    #[test]
    fn name_override_reaches_renamed_field() {
        let resolution = Resolution::resolve(
            v1::VstorageObjectVCenterQueryChangedDiskAreas::descriptor(),
            vim::VstorageObjectVCenterQueryChangedDiskAreasRequestType::descriptor(),
            &LowerCamelCase,
        );
        let this = resolution.find("this").unwrap();
        assert_eq!(resolution.legacy_path(this), "_this");
        assert!(resolution.unmatched.is_empty());
    }

    #[test]
    fn cache_resolves_each_pair_once() {
        let cache = ResolutionCache::default();
        let first = cache.get_or_resolve(Flat::descriptor(), Outer::descriptor(), &LowerCamelCase);
        let second = cache.get_or_resolve(Flat::descriptor(), Outer::descriptor(), &LowerCamelCase);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
