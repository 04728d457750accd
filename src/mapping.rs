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

//! # Suo Mapping
//!
//! The schema table behind document types and object fields: an ordered
//! name→field mapping plus the dynamic-handling policy. Declarations load
//! from plain values, JSON, or YAML files (the `yaml` feature), and render
//! back to the engine's `{"properties": ...}` wire form.

use std::path::Path;

use indexmap::IndexMap;

use crate::dsl::SuoToValue;
use crate::errors::{Result, SuoError};
use crate::fields::{construct_field, SuoField};
use crate::value::SuoValue;

/// How a schema treats undeclared fields. Config-only at this layer; the
/// engine enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuoDynamic {
    True,
    False,
    Strict,
}

impl SuoDynamic {
    pub fn from_value(value: &SuoValue) -> Result<SuoDynamic> {
        match value {
            SuoValue::Bool(true) => Ok(SuoDynamic::True),
            SuoValue::Bool(false) => Ok(SuoDynamic::False),
            SuoValue::Str(s) if s == "true" => Ok(SuoDynamic::True),
            SuoValue::Str(s) if s == "false" => Ok(SuoDynamic::False),
            SuoValue::Str(s) if s == "strict" => Ok(SuoDynamic::Strict),
            other => Err(SuoError::illegal_argument(format!(
                "'dynamic' must be true, false or \"strict\", got {}",
                other
            ))),
        }
    }

    pub fn to_value(self) -> SuoValue {
        match self {
            SuoDynamic::True => SuoValue::Bool(true),
            SuoDynamic::False => SuoValue::Bool(false),
            SuoDynamic::Strict => SuoValue::Str("strict".to_string()),
        }
    }
}

/// An ordered field table with an optional dynamic policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuoMapping {
    properties: IndexMap<String, SuoField>,
    dynamic: Option<SuoDynamic>,
}

impl SuoMapping {
    pub fn new() -> SuoMapping {
        SuoMapping::default()
    }

    /// Declares (or replaces) a field under `name`.
    pub fn set(&mut self, name: impl Into<String>, field: SuoField) {
        self.properties.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&SuoField> {
        self.properties.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut SuoField> {
        self.properties.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SuoField)> {
        self.properties.iter()
    }

    pub fn dynamic(&self) -> Option<SuoDynamic> {
        self.dynamic
    }

    pub fn set_dynamic(&mut self, dynamic: Option<SuoDynamic>) {
        self.dynamic = dynamic;
    }

    /// Parses a `{"properties": {...}, "dynamic": ...}` declaration tree.
    /// Unrecognized top-level keys are logged and skipped; bad field
    /// declarations are schema errors naming the field.
    pub fn from_value(value: &SuoValue) -> Result<SuoMapping> {
        let handle = match value {
            SuoValue::Map(handle) => handle,
            other => {
                return Err(SuoError::schema(format!(
                    "a mapping declaration must be a mapping, got {}",
                    other
                )))
            }
        };
        let entries: Vec<(String, SuoValue)> = handle
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut mapping = SuoMapping::new();
        for (key, entry) in entries {
            match key.as_str() {
                "properties" => {
                    let declared = match &entry {
                        SuoValue::Map(inner) => inner.clone(),
                        other => {
                            return Err(SuoError::schema(format!(
                                "'properties' must be a mapping, got {}",
                                other
                            )))
                        }
                    };
                    let fields: Vec<(String, SuoValue)> = declared
                        .borrow()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect();
                    for (name, declaration) in fields {
                        let field = construct_field(declaration).map_err(|err| {
                            SuoError::schema(format!("field '{}': {}", name, err))
                        })?;
                        mapping.set(name, field);
                    }
                }
                "dynamic" => {
                    let dynamic = SuoDynamic::from_value(&entry)
                        .map_err(|err| SuoError::schema(err.to_string()))?;
                    mapping.set_dynamic(Some(dynamic));
                }
                other => {
                    log::warn!("ignoring unsupported mapping key '{}'", other);
                }
            }
        }
        Ok(mapping)
    }

    pub fn from_json_str(raw: &str) -> Result<SuoMapping> {
        SuoMapping::from_value(&SuoValue::from_json_str(raw)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(raw: &str) -> Result<SuoMapping> {
        let tree: serde_json::Value = serde_yaml::from_str(raw)?;
        SuoMapping::from_value(&SuoValue::from_json(tree))
    }

    /// Loads a declaration file, dispatching on the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<SuoMapping> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "json" => SuoMapping::from_json_str(&raw),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => SuoMapping::from_yaml_str(&raw),
            #[cfg(not(feature = "yaml"))]
            "yaml" | "yml" => Err(SuoError::schema(
                "yaml mapping files need the 'yaml' feature",
            )),
            other => Err(SuoError::schema(format!(
                "unsupported mapping file extension '{}'",
                other
            ))),
        }
    }

    /// Merges another mapping into this one. Colliding object fields merge
    /// recursively; other collisions are replaced wholesale. With
    /// `update_only`, only names already declared here are touched and no
    /// new names are introduced.
    pub fn update(&mut self, other: &SuoMapping, update_only: bool) {
        for (name, their_field) in other.iter() {
            match self.properties.get_mut(name) {
                Some(mine) if mine.doc_type().is_some() && their_field.doc_type().is_some() => {
                    mine.update(their_field, update_only);
                }
                Some(mine) => *mine = their_field.clone(),
                None if update_only => {}
                None => {
                    self.properties.insert(name.clone(), their_field.clone());
                }
            }
        }
        if !update_only {
            if let Some(dynamic) = other.dynamic {
                self.dynamic = Some(dynamic);
            }
        }
    }
}

impl SuoToValue for SuoMapping {
    /// The engine wire form: `properties` always present, `dynamic` when
    /// set.
    fn to_value(&self) -> Result<SuoValue> {
        let mut properties = Vec::with_capacity(self.properties.len());
        for (name, field) in &self.properties {
            properties.push((name.clone(), field.to_value()?));
        }
        let mut out = vec![("properties".to_string(), SuoValue::map_from(properties))];
        if let Some(dynamic) = self.dynamic {
            out.push(("dynamic".to_string(), dynamic.to_value()));
        }
        Ok(SuoValue::map_from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(json: &str) -> SuoValue {
        SuoValue::from_json_str(json).unwrap()
    }

    const DECLARATION: &str = r#"{
        "dynamic": "strict",
        "properties": {
            "title": {"type": "text", "analyzer": "snowball"},
            "published": {"type": "date"},
            "comments": {
                "type": "nested",
                "properties": {
                    "author": {"type": "keyword"},
                    "likes": {"type": "integer"}
                }
            }
        }
    }"#;

    #[test]
    fn declarations_round_trip() {
        let mapping = SuoMapping::from_json_str(DECLARATION).unwrap();
        assert_eq!(mapping.dynamic(), Some(SuoDynamic::Strict));
        assert_eq!(mapping.names(), vec!["title", "published", "comments"]);
        assert_eq!(mapping.to_value().unwrap(), wire(DECLARATION));
    }

    #[test]
    fn bad_field_declarations_name_the_field() {
        let err =
            SuoMapping::from_json_str(r#"{"properties": {"title": {"analyzer": "x"}}}"#)
                .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("field 'title'"), "{}", rendered);
        assert!(rendered.contains("\"type\" key"), "{}", rendered);
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let mapping = SuoMapping::from_json_str(
            r#"{"properties": {"n": {"type": "keyword"}}, "_meta": {"team": "suo"}}"#,
        )
        .unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn update_replaces_and_extends() {
        let mut base = SuoMapping::from_json_str(
            r#"{"properties": {"title": {"type": "text"}, "views": {"type": "integer"}}}"#,
        )
        .unwrap();
        let other = SuoMapping::from_json_str(
            r#"{"properties": {"title": {"type": "keyword"}, "tags": {"type": "keyword"}},
                "dynamic": false}"#,
        )
        .unwrap();
        base.update(&other, false);
        assert_eq!(base.get("title").map(|f| f.name()), Some("keyword"));
        assert!(base.contains("tags"));
        assert_eq!(base.dynamic(), Some(SuoDynamic::False));
    }

    #[test]
    fn update_only_never_introduces_names() {
        let mut base = SuoMapping::from_json_str(
            r#"{"properties": {"title": {"type": "text"}}}"#,
        )
        .unwrap();
        let other = SuoMapping::from_json_str(
            r#"{"properties": {"title": {"type": "keyword"}, "tags": {"type": "keyword"}},
                "dynamic": true}"#,
        )
        .unwrap();
        base.update(&other, true);
        assert_eq!(base.get("title").map(|f| f.name()), Some("keyword"));
        assert!(!base.contains("tags"));
        assert_eq!(base.dynamic(), None);
    }

    #[test]
    fn colliding_object_fields_merge_recursively() {
        let mut base = SuoMapping::from_json_str(
            r#"{"properties": {"author": {
                "type": "object",
                "properties": {"name": {"type": "text"}}}}}"#,
        )
        .unwrap();
        let other = SuoMapping::from_json_str(
            r#"{"properties": {"author": {
                "type": "object",
                "properties": {"email": {"type": "keyword"}}}}}"#,
        )
        .unwrap();
        base.update(&other, false);
        let author = base.get("author").unwrap().doc_type().unwrap();
        assert!(author.mapping().contains("name"));
        assert!(author.mapping().contains("email"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_declarations_parse_the_same() {
        let mapping = SuoMapping::from_yaml_str(
            "properties:\n  title:\n    type: text\n  views:\n    type: integer\n",
        )
        .unwrap();
        assert_eq!(mapping.names(), vec!["title", "views"]);
        assert_eq!(mapping.get("views").map(|f| f.name()), Some("integer"));
    }

    #[test]
    fn files_dispatch_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, r#"{"properties": {"title": {"type": "text"}}}"#).unwrap();
        let mapping = SuoMapping::from_path(&path).unwrap();
        assert!(mapping.contains("title"));

        let odd = dir.path().join("articles.toml");
        std::fs::write(&odd, "properties = 1").unwrap();
        let err = SuoMapping::from_path(&odd).unwrap_err();
        assert!(err.to_string().contains("unsupported mapping file extension"));
    }
}
