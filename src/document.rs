//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Suo.
//! The Suo project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Suo Documents
//!
//! Typed documents over a declared schema. A [`SuoDocType`] names a
//! [`SuoMapping`] (optionally backed by an index-wide mapping consulted for
//! lookups); a [`SuoDocument`] binds one to hit metadata and a body map.
//!
//! Documents have reference semantics: clones share the body, attribute
//! access hands out shared container handles, and sub-documents wrapped
//! around list elements write through to the list. Ingestion
//! ([`SuoDocument::from_hit`]) splits engine metadata from `_source` and
//! coerces declared fields; [`SuoDocument::full_clean`] validates the body
//! field by field and aggregates the failures.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::attr::{SuoAttrList, SuoAttrMap};
use crate::dsl::SuoToValue;
use crate::errors::{Result, SuoError};
use crate::fields::SuoField;
use crate::mapping::{SuoDynamic, SuoMapping};
use crate::value::{new_map_handle, recursive_to_value, SuoMapHandle, SuoValue};

/// Metadata names a document may carry into the engine.
pub const DOC_META_FIELDS: &[&str] = &["id", "routing"];

/// All hit metadata names, the writable ones included.
pub const META_FIELDS: &[&str] = &[
    "id",
    "routing",
    "index",
    "using",
    "score",
    "version",
    "seq_no",
    "primary_term",
];

/// Attribute view over a hit's metadata. Keys lose their underscore prefix
/// and `type` is renamed `doc_type`.
#[derive(Debug, Clone, Default)]
pub struct SuoHitMeta {
    inner: SuoAttrMap,
}

impl SuoHitMeta {
    pub fn new() -> SuoHitMeta {
        SuoHitMeta::default()
    }

    /// Collects metadata from a raw hit: every key except `_source` and
    /// `_fields`, underscore prefixes stripped.
    pub fn from_hit(hit: &SuoMapHandle) -> SuoHitMeta {
        let meta = SuoAttrMap::new();
        for (key, value) in hit.borrow().iter() {
            if key == "_source" || key == "_fields" {
                continue;
            }
            let name = key.strip_prefix('_').unwrap_or(key);
            meta.set(name, value.clone());
        }
        if meta.contains("type") {
            if let Ok(value) = meta.remove("type") {
                meta.set("doc_type", value);
            }
        }
        SuoHitMeta { inner: meta }
    }

    pub fn attr(&self, name: &str) -> Result<SuoValue> {
        self.inner
            .attr(name)
            .map_err(|_| SuoError::missing_attribute("SuoHitMeta", name))
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<SuoValue>) {
        self.inner.set(name, value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    pub fn to_value(&self) -> SuoValue {
        self.inner.to_value()
    }

    pub fn id(&self) -> Option<SuoValue> {
        self.inner.attr("id").ok()
    }

    pub fn index(&self) -> Option<String> {
        self.typed_str("index")
    }

    pub fn routing(&self) -> Option<String> {
        self.typed_str("routing")
    }

    pub fn doc_type(&self) -> Option<String> {
        self.typed_str("doc_type")
    }

    pub fn score(&self) -> Option<f64> {
        self.inner.attr("score").ok().and_then(|v| v.as_f64())
    }

    pub fn version(&self) -> Option<i64> {
        self.inner.attr("version").ok().and_then(|v| v.as_i64())
    }

    pub fn seq_no(&self) -> Option<i64> {
        self.inner.attr("seq_no").ok().and_then(|v| v.as_i64())
    }

    pub fn primary_term(&self) -> Option<i64> {
        self.inner.attr("primary_term").ok().and_then(|v| v.as_i64())
    }

    fn typed_str(&self, name: &str) -> Option<String> {
        self.inner
            .attr(name)
            .ok()
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    }
}

/// The document-class analog: a named schema, an optional index-wide
/// mapping consulted as a lookup fallback, and an optional validation hook
/// run after field cleaning.
#[derive(Clone)]
pub struct SuoDocType {
    name: String,
    mapping: SuoMapping,
    index: Option<Rc<SuoMapping>>,
    clean: Option<fn(&SuoDocument) -> Result<()>>,
}

impl SuoDocType {
    pub fn new(name: impl Into<String>) -> SuoDocType {
        SuoDocType {
            name: name.into(),
            mapping: SuoMapping::new(),
            index: None,
            clean: None,
        }
    }

    /// The type synthesized for inline `properties` declarations.
    pub fn anonymous(mapping: SuoMapping) -> SuoDocType {
        SuoDocType {
            name: "inner".to_string(),
            mapping,
            index: None,
            clean: None,
        }
    }

    /// Declares a field, builder style.
    pub fn field(mut self, name: impl Into<String>, field: SuoField) -> SuoDocType {
        self.mapping.set(name, field);
        self
    }

    pub fn with_dynamic(mut self, dynamic: SuoDynamic) -> SuoDocType {
        self.mapping.set_dynamic(Some(dynamic));
        self
    }

    /// Attaches an index-wide mapping consulted for lookups; its fields are
    /// optional during cleaning and it is never mutated through documents.
    pub fn with_index(mut self, index: Rc<SuoMapping>) -> SuoDocType {
        self.index = Some(index);
        self
    }

    /// Attaches a document-level validation hook, run by `full_clean` after
    /// the per-field sweep.
    pub fn with_clean(mut self, hook: fn(&SuoDocument) -> Result<()>) -> SuoDocType {
        self.clean = Some(hook);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mapping(&self) -> &SuoMapping {
        &self.mapping
    }

    pub(crate) fn mapping_mut(&mut self) -> &mut SuoMapping {
        &mut self.mapping
    }

    /// Looks up a field by dotted path, descending through object fields.
    /// The own mapping wins over the index fallback.
    pub fn resolve_field(&self, path: &str) -> Option<&SuoField> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut field = self
            .mapping
            .get(first)
            .or_else(|| self.index.as_deref().and_then(|index| index.get(first)))?;
        for step in parts {
            field = field.doc_type()?.mapping().get(step)?;
        }
        Some(field)
    }

    /// Own fields first, then index-only fields flagged as optional.
    fn list_fields(&self) -> impl Iterator<Item = (&str, &SuoField, bool)> + '_ {
        let own = self
            .mapping
            .iter()
            .map(|(name, field)| (name.as_str(), field, false));
        let index_only = self
            .index
            .iter()
            .flat_map(|index| index.iter())
            .filter(move |(name, _)| !self.mapping.contains(name))
            .map(|(name, field)| (name.as_str(), field, true));
        own.chain(index_only)
    }
}

impl std::fmt::Debug for SuoDocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuoDocType")
            .field("name", &self.name)
            .field("mapping", &self.mapping)
            .field("index", &self.index.is_some())
            .field("clean", &self.clean.is_some())
            .finish()
    }
}

/// One document: a type, hit metadata, and the body map. Clones share the
/// body handle.
#[derive(Debug, Clone)]
pub struct SuoDocument {
    doc_type: Rc<SuoDocType>,
    meta: SuoHitMeta,
    body: SuoMapHandle,
}

impl SuoDocument {
    /// An empty document of the given type.
    pub fn new(doc_type: Rc<SuoDocType>) -> SuoDocument {
        SuoDocument {
            doc_type,
            meta: SuoHitMeta::new(),
            body: new_map_handle(),
        }
    }

    /// A typed view over an existing body map. Nothing is copied or
    /// coerced; writes go through to the map.
    pub fn from_handle(doc_type: Rc<SuoDocType>, body: SuoMapHandle) -> SuoDocument {
        SuoDocument {
            doc_type,
            meta: SuoHitMeta::new(),
            body,
        }
    }

    /// Builds a document from plain body data, coercing each entry through
    /// its declared field when the field coerces. Unknown names are kept as
    /// they are.
    pub fn from_data(doc_type: Rc<SuoDocType>, data: &SuoMapHandle) -> Result<SuoDocument> {
        let doc = SuoDocument::new(doc_type);
        let entries: Vec<(String, SuoValue)> = data
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in entries {
            let value = match doc.doc_type.resolve_field(&name) {
                Some(field) if field.coerce() => field.deserialize(value)?,
                _ => value,
            };
            doc.body.borrow_mut().insert(name, value);
        }
        Ok(doc)
    }

    /// The ingestion entry point: splits metadata from `_source` and builds
    /// the body from it.
    pub fn from_hit(doc_type: Rc<SuoDocType>, hit: &SuoValue) -> Result<SuoDocument> {
        let handle = match hit {
            SuoValue::Map(handle) => handle,
            other => {
                return Err(SuoError::illegal_argument(format!(
                    "a hit must be a mapping, got {}",
                    other
                )))
            }
        };
        let meta = SuoHitMeta::from_hit(handle);
        let source = handle.borrow().get("_source").cloned();
        let mut doc = match source {
            None => SuoDocument::new(doc_type),
            Some(SuoValue::Map(source)) => SuoDocument::from_data(doc_type, &source)?,
            Some(other) => {
                return Err(SuoError::illegal_argument(format!(
                    "hit '_source' must be a mapping, got {}",
                    other
                )))
            }
        };
        doc.meta = meta;
        Ok(doc)
    }

    pub fn doc_type(&self) -> &Rc<SuoDocType> {
        &self.doc_type
    }

    pub fn type_name(&self) -> &str {
        self.doc_type.name()
    }

    pub fn meta(&self) -> &SuoHitMeta {
        &self.meta
    }

    pub fn body_handle(&self) -> &SuoMapHandle {
        &self.body
    }

    /// Attribute view over the body.
    pub fn body(&self) -> SuoAttrMap {
        SuoAttrMap::from_handle(self.body.clone())
    }

    /// Attribute access. Underscore-prefixed metadata names route to meta.
    /// A body hit returns the value (containers as shared handles); a miss
    /// on a declared field materializes its empty value, caching everything
    /// but Null and the empty string; anything else is a missing-attribute
    /// error naming the document type.
    pub fn attr(&self, name: &str) -> Result<SuoValue> {
        if let Some(meta_name) = name.strip_prefix('_') {
            if META_FIELDS.contains(&meta_name) {
                return self.meta.attr(meta_name);
            }
        }
        if let Some(value) = self.body.borrow().get(name) {
            return Ok(value.clone());
        }
        match self.doc_type.resolve_field(name) {
            Some(field) => {
                let value = field.empty();
                let cache = !matches!(&value, SuoValue::Null)
                    && !matches!(&value, SuoValue::Str(s) if s.is_empty());
                if cache {
                    self.body
                        .borrow_mut()
                        .insert(name.to_string(), value.clone());
                }
                Ok(value)
            }
            None => Err(SuoError::missing_attribute(self.type_name(), name)),
        }
    }

    /// [`attr`](Self::attr) with a default. A null default re-raises the
    /// missing-attribute error.
    pub fn get(&self, name: &str, default: impl Into<SuoValue>) -> Result<SuoValue> {
        match self.attr(name) {
            Ok(value) => Ok(value),
            Err(err) => {
                let default = default.into();
                if default.is_null() {
                    Err(err)
                } else {
                    Ok(default)
                }
            }
        }
    }

    /// Writes an attribute. Underscore-prefixed document metadata names
    /// (`_id`, `_routing`) route to meta; everything else goes to the body.
    pub fn set(&self, name: &str, value: impl Into<SuoValue>) {
        if let Some(meta_name) = name.strip_prefix('_') {
            if DOC_META_FIELDS.contains(&meta_name) {
                self.meta.set(meta_name, value);
                return;
            }
        }
        self.body.borrow_mut().insert(name.to_string(), value.into());
    }

    /// Removes a body attribute; missing names error.
    pub fn remove(&self, name: &str) -> Result<SuoValue> {
        self.body
            .borrow_mut()
            .shift_remove(name)
            .ok_or_else(|| SuoError::missing_attribute(self.type_name(), name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.body.borrow().contains_key(name)
    }

    /// List view over a list-valued attribute. Object fields attach their
    /// element wrapper, so mapping elements read back as typed documents.
    pub fn attr_list(&self, name: &str) -> Result<SuoAttrList> {
        let value = self.attr(name)?;
        let handle = match value {
            SuoValue::List(handle) => handle,
            other => {
                return Err(SuoError::illegal_argument(format!(
                    "attribute '{}' holds {}, not a list",
                    name, other
                )))
            }
        };
        Ok(
            match self
                .doc_type
                .resolve_field(name)
                .and_then(|field| field.wrapper())
            {
                Some(wrapper) => SuoAttrList::with_wrapper(handle, wrapper),
                None => SuoAttrList::from_handle(handle),
            },
        )
    }

    /// Renders the body: coercing fields serialize their values, everything
    /// else lowers to plain trees. With `skip_empty`, Null and empty
    /// containers drop out while `false`, `0`, and `""` survive.
    pub fn to_dict(&self, skip_empty: bool) -> Result<SuoValue> {
        let entries: Vec<(String, SuoValue)> = self
            .body
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut out = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let rendered = match self.doc_type.resolve_field(&name) {
                Some(field) if field.coerce() => field.serialize(&value)?,
                _ => recursive_to_value(&value)?,
            };
            if skip_empty && rendered.is_empty_like() {
                continue;
            }
            out.push((name, rendered));
        }
        Ok(SuoValue::map_from(out))
    }

    /// Wire JSON of [`to_dict`](Self::to_dict).
    pub fn to_json(&self, skip_empty: bool) -> Result<serde_json::Value> {
        self.to_dict(skip_empty)?.to_json()
    }

    /// Validates the body field by field. Own-mapping fields always run
    /// their `clean`; index-only fields skip when absent. Validation
    /// failures are collected per field and raised together after the full
    /// sweep; other errors abort immediately. Cleaned values write back
    /// when the name already exists in the body or the value is non-empty.
    pub fn clean_fields(&self) -> Result<()> {
        let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let fields: Vec<(String, SuoField, bool)> = self
            .doc_type
            .list_fields()
            .map(|(name, field, optional)| (name.to_string(), field.clone(), optional))
            .collect();
        for (name, field, optional) in fields {
            let data = self
                .body
                .borrow()
                .get(&name)
                .cloned()
                .unwrap_or(SuoValue::Null);
            if data.is_null() && optional {
                continue;
            }
            let mut cleaned = data.clone();
            match field.clean(data) {
                Ok(value) => cleaned = value,
                Err(err) if err.is_validation() => {
                    errors.entry(name.clone()).or_default().push(err.to_string());
                }
                Err(err) => return Err(err),
            }
            let present = self.body.borrow().contains_key(&name);
            if present || !cleaned.is_empty_like() {
                self.body.borrow_mut().insert(name, cleaned);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SuoError::Invalid { errors })
        }
    }

    /// Field cleaning plus the doc type's own validation hook.
    pub fn full_clean(&self) -> Result<()> {
        self.clean_fields()?;
        if let Some(hook) = self.doc_type.clean {
            hook(self)?;
        }
        Ok(())
    }
}

/// Documents compare by type name and body content; metadata does not take
/// part.
impl PartialEq for SuoDocument {
    fn eq(&self, other: &Self) -> bool {
        self.doc_type.name == other.doc_type.name
            && (Rc::ptr_eq(&self.body, &other.body) || *self.body.borrow() == *other.body.borrow())
    }
}

impl SuoToValue for SuoDocument {
    fn to_value(&self) -> Result<SuoValue> {
        self.to_dict(true)
    }
}

impl std::fmt::Display for SuoDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.doc_type.name())?;
        let mut first = true;
        for key in ["index", "id"] {
            if let Ok(value) = self.meta.attr(key) {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", key, value)?;
                first = false;
            }
        }
        write!(f, ")")
    }
}
