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

use suox::{SuoParamMap, SuoRegistry, SuoToValue, SuoValue};

#[test]
fn default_registry_carries_all_families() {
    let registry = SuoRegistry::with_defaults();
    assert_eq!(
        registry.family_names(),
        vec!["analyzer", "field", "normalizer", "query"]
    );

    let queries = registry.class_names("query").unwrap();
    assert!(queries.contains(&"match_all"));
    assert!(queries.contains(&"bool"));
    assert!(queries.contains(&"percolate"));

    let fields = registry.class_names("field").unwrap();
    assert!(fields.contains(&"text"));
    assert!(fields.contains(&"nested"));
    assert!(fields.contains(&"scaled_float"));
}

#[test]
fn nodes_construct_by_registered_name() {
    let registry = SuoRegistry::with_defaults();

    let mut params = SuoParamMap::new();
    params.insert("normalizer", "lowercase");
    let node = registry.construct("field", "keyword", params).unwrap();
    let field = node.as_field().unwrap();
    assert_eq!(field.name(), "keyword");
    assert_eq!(
        field.to_value().unwrap(),
        SuoValue::from_json_str(r#"{"normalizer": "lowercase", "type": "keyword"}"#).unwrap()
    );

    let mut params = SuoParamMap::new();
    params.insert("field", "title");
    let node = registry.construct("query", "exists", params).unwrap();
    assert_eq!(node.as_query().unwrap().name(), "exists");
}

#[test]
fn lookups_error_with_the_requested_names() {
    let registry = SuoRegistry::with_defaults();

    let err = registry.dsl_class("query", "half_life").unwrap_err();
    assert_eq!(err.to_string(), "DSL class 'half_life' does not exist in query");

    let err = registry.shortcut("suggester").unwrap_err();
    assert_eq!(err.to_string(), "DSL type 'suggester' does not exist");

    let err = registry.class_names("suggester").unwrap_err();
    assert_eq!(err.to_string(), "DSL type 'suggester' does not exist");
}

#[test]
fn analyzer_lookup_falls_back_to_custom() {
    let registry = SuoRegistry::with_defaults();
    // Unregistered builtin types resolve through the "custom" class, the
    // way analyzer definitions name arbitrary engine types.
    let def = registry.dsl_class_or("analyzer", "whitespace", "custom").unwrap();
    assert_eq!(def.name, "custom");
}

#[test]
fn duplicate_registrations_keep_the_first() {
    let mut registry = SuoRegistry::with_defaults();
    let before = registry.class_names("field").unwrap().len();

    let keyword = *registry.dsl_class("field", "keyword").unwrap();
    let mut clash = keyword;
    clash.name = "text";
    registry.register_class("field", clash).unwrap();

    // No change: "text" keeps its original definition and nothing new
    // appears.
    assert_eq!(registry.class_names("field").unwrap().len(), before);
    let kept = registry.dsl_class("field", "text").unwrap();
    assert!(!kept.param_defs.is_empty());
}

#[test]
fn registering_into_a_missing_family_errors() {
    let mut registry = SuoRegistry::new();
    let def = *SuoRegistry::with_defaults().dsl_class("field", "text").unwrap();
    let err = registry.register_class("field", def).unwrap_err();
    assert_eq!(err.to_string(), "DSL type 'field' does not exist");
}
