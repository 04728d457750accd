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

//! # Suo Query Nodes
//!
//! The query family: building, coercing, and rendering query trees. A query
//! renders as a one-entry `{name: params}` map; compound kinds (`bool`,
//! `nested`) declare query-typed parameters, so their clauses coerce
//! recursively through [`construct_query`]. Representation only: nothing
//! here executes a search.
//!
//! ## Construction Paths
//!
//! - wire form: a one-entry mapping, `{"bool": {"must": [...]}}`, with
//!   double-underscore rewriting turned OFF so wire keys stay literal;
//! - by name: `SuoQuery::new("term", params)`;
//! - builders: `SuoQuery::bool_query().with_must(...)` and friends.

use crate::dsl::{
    SuoDslData, SuoDslNode, SuoParamDef, SuoParamDefs, SuoParamInput, SuoParamKind, SuoParamMap,
    SuoParamValue, SuoToValue,
};
use crate::errors::{Result, SuoError};
use crate::registry::{SuoClassDef, SuoRegistry};
use crate::value::SuoValue;

const NO_DEFS: SuoParamDefs = &[];

const BOOL_DEFS: SuoParamDefs = &[
    ("must", SuoParamDef::new("query", SuoParamKind::Multi)),
    ("should", SuoParamDef::new("query", SuoParamKind::Multi)),
    ("must_not", SuoParamDef::new("query", SuoParamKind::Multi)),
    ("filter", SuoParamDef::new("query", SuoParamKind::Multi)),
];

const NESTED_DEFS: SuoParamDefs = &[("query", SuoParamDef::new("query", SuoParamKind::Single))];

/// One query node.
#[derive(Debug, Clone)]
pub struct SuoQuery {
    name: &'static str,
    defs: SuoParamDefs,
    data: SuoDslData,
}

/// Nodes compare by kind and rendered output, so a wire-built query equals
/// the equivalent programmatic one.
impl PartialEq for SuoQuery {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.to_value().ok() == other.to_value().ok()
    }
}

impl SuoQuery {
    fn bare(name: &'static str, defs: SuoParamDefs) -> SuoQuery {
        SuoQuery {
            name,
            defs,
            data: SuoDslData::new(),
        }
    }

    fn build(name: &'static str, defs: SuoParamDefs, params: SuoParamMap) -> Result<SuoQuery> {
        let mut query = SuoQuery::bare(name, defs);
        query.data.set_expand_dots(params.expand_dots());
        for (pname, input) in params.into_entries() {
            query.data.set_param(defs, &pname, input)?;
        }
        Ok(query)
    }

    /// Constructs a registered query kind by name.
    pub fn new(name: &str, params: SuoParamMap) -> Result<SuoQuery> {
        let def = SuoRegistry::global().dsl_class("query", name)?;
        (def.factory)(params)?.into_query()
    }

    /// The registered kind name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sets a parameter, coercing query-typed ones.
    pub fn set_param(&mut self, name: &str, input: impl Into<SuoParamInput>) -> Result<()> {
        self.data.set_param(self.defs, name, input.into())
    }

    pub fn param(&self, name: &str) -> Option<&SuoParamValue> {
        self.data.param(name)
    }

    /// Reads a parameter with the declared-shape fallback (a missing clause
    /// list reads as empty).
    pub fn param_value(&self, name: &str) -> Result<SuoParamValue> {
        self.data.param_value(self.defs, name)
    }

    /// Mutable clause list of a declared Multi parameter, materialized on
    /// first use.
    pub fn clauses_mut(&mut self, slot: &str) -> Result<&mut Vec<SuoDslNode>> {
        self.data.param_nodes_mut(self.defs, slot)
    }

    /// A `match_all` query.
    pub fn match_all() -> SuoQuery {
        SuoQuery::bare("match_all", NO_DEFS)
    }

    /// A `term` query on one field.
    pub fn term(field: &str, value: impl Into<SuoValue>) -> SuoQuery {
        let mut query = SuoQuery::bare("term", NO_DEFS);
        query.data.set_raw_param(field, value.into());
        query
    }

    /// A `match` query on one field.
    pub fn match_query(field: &str, value: impl Into<SuoValue>) -> SuoQuery {
        let mut query = SuoQuery::bare("match", NO_DEFS);
        query.data.set_raw_param(field, value.into());
        query
    }

    /// An `exists` query.
    pub fn exists(field: &str) -> SuoQuery {
        let mut query = SuoQuery::bare("exists", NO_DEFS);
        query.data.set_raw_param("field", SuoValue::from(field));
        query
    }

    /// An `ids` query over literal document ids.
    pub fn ids(values: Vec<String>) -> SuoQuery {
        let mut query = SuoQuery::bare("ids", NO_DEFS);
        query.data.set_raw_param(
            "values",
            SuoValue::list(values.into_iter().map(SuoValue::Str).collect()),
        );
        query
    }

    /// An empty `bool` query; clauses attach through the `with_*` builders.
    pub fn bool_query() -> SuoQuery {
        SuoQuery::bare("bool", BOOL_DEFS)
    }

    pub fn with_must(mut self, query: SuoQuery) -> Result<SuoQuery> {
        self.clauses_mut("must")?.push(query.into());
        Ok(self)
    }

    pub fn with_should(mut self, query: SuoQuery) -> Result<SuoQuery> {
        self.clauses_mut("should")?.push(query.into());
        Ok(self)
    }

    pub fn with_must_not(mut self, query: SuoQuery) -> Result<SuoQuery> {
        self.clauses_mut("must_not")?.push(query.into());
        Ok(self)
    }

    pub fn with_filter(mut self, query: SuoQuery) -> Result<SuoQuery> {
        self.clauses_mut("filter")?.push(query.into());
        Ok(self)
    }

    /// `minimum_should_match` stays a raw parameter (number or `"2<75%"`
    /// style strings both pass through).
    pub fn with_minimum_should_match(mut self, value: impl Into<SuoValue>) -> SuoQuery {
        self.data.set_raw_param("minimum_should_match", value.into());
        self
    }

    /// A `nested` query wrapping an inner query under a path.
    pub fn nested(path: &str, query: SuoQuery) -> Result<SuoQuery> {
        let mut node = SuoQuery::bare("nested", NESTED_DEFS);
        node.data.set_raw_param("path", SuoValue::from(path));
        node.set_param("query", query)?;
        Ok(node)
    }

    /// A `percolate` query matching a document against stored queries.
    pub fn percolate(field: &str, document: SuoValue) -> SuoQuery {
        let mut query = SuoQuery::bare("percolate", NO_DEFS);
        query.data.set_raw_param("field", SuoValue::from(field));
        query.data.set_raw_param("document", document);
        query
    }
}

impl SuoToValue for SuoQuery {
    /// The one-entry `{name: params}` rendering.
    fn to_value(&self) -> Result<SuoValue> {
        Ok(SuoValue::map_from(vec![(
            self.name.to_string(),
            self.data.params_to_value()?,
        )]))
    }
}

impl std::fmt::Display for SuoQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        self.data.fmt_params(f)?;
        write!(f, ")")
    }
}

/// Coerces loose input into a query node: a one-entry mapping, a kind name,
/// or an existing node.
pub fn construct_query(input: impl Into<SuoParamInput>) -> Result<SuoQuery> {
    construct_query_with(input, SuoParamMap::new())
}

/// [`construct_query`] with explicit by-name parameters. Parameters are only
/// legal alongside a NAME input; mappings and ready-built nodes carry their
/// own.
pub fn construct_query_with(
    input: impl Into<SuoParamInput>,
    params: SuoParamMap,
) -> Result<SuoQuery> {
    match input.into() {
        SuoParamInput::Node(node) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "cannot accept parameters when passing in a constructed query",
                ));
            }
            node.into_query()
        }
        SuoParamInput::Value(SuoValue::Str(name)) => SuoQuery::new(&name, params),
        SuoParamInput::Value(SuoValue::Map(handle)) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "cannot accept parameters when passing in a mapping",
                ));
            }
            let mut entries: Vec<(String, SuoValue)> = handle
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if entries.len() != 1 {
                return Err(SuoError::illegal_argument(format!(
                    "a query mapping must hold a single {{name: params}} entry, got {} entries",
                    entries.len()
                )));
            }
            let (name, query_params) = entries.remove(0);
            let mut bag = SuoParamMap::from_value(&query_params)?;
            bag.set_expand_dots(false);
            SuoQuery::new(&name, bag)
        }
        SuoParamInput::Map(mut entries) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "cannot accept parameters when passing in a mapping",
                ));
            }
            if entries.len() != 1 {
                return Err(SuoError::illegal_argument(format!(
                    "a query mapping must hold a single {{name: params}} entry, got {} entries",
                    entries.len()
                )));
            }
            let (name, query_params) = entries.remove(0);
            let mut bag = match query_params {
                SuoParamInput::Map(inner) => {
                    let mut bag = SuoParamMap::new();
                    for (pname, entry) in inner {
                        bag.insert(pname, entry);
                    }
                    bag
                }
                SuoParamInput::Value(ref value @ SuoValue::Map(_)) => {
                    SuoParamMap::from_value(value)?
                }
                other => {
                    return Err(SuoError::illegal_argument(format!(
                        "query parameters must be mapping-shaped, got {:?}",
                        other
                    )))
                }
            };
            bag.set_expand_dots(false);
            SuoQuery::new(&name, bag)
        }
        other => Err(SuoError::illegal_argument(format!(
            "cannot construct a query from {:?}",
            other
        ))),
    }
}

fn query_shortcut(input: SuoParamInput) -> Result<SuoDslNode> {
    Ok(construct_query_with(input, SuoParamMap::new())?.into())
}

fn match_all_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("match_all", NO_DEFS, params)?.into())
}

fn match_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("match", NO_DEFS, params)?.into())
}

fn term_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("term", NO_DEFS, params)?.into())
}

fn terms_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("terms", NO_DEFS, params)?.into())
}

fn range_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("range", NO_DEFS, params)?.into())
}

fn exists_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("exists", NO_DEFS, params)?.into())
}

fn prefix_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("prefix", NO_DEFS, params)?.into())
}

fn wildcard_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("wildcard", NO_DEFS, params)?.into())
}

fn query_string_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("query_string", NO_DEFS, params)?.into())
}

fn ids_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("ids", NO_DEFS, params)?.into())
}

fn bool_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("bool", BOOL_DEFS, params)?.into())
}

fn nested_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("nested", NESTED_DEFS, params)?.into())
}

fn percolate_node(params: SuoParamMap) -> Result<SuoDslNode> {
    Ok(SuoQuery::build("percolate", NO_DEFS, params)?.into())
}

const QUERY_CLASSES: &[SuoClassDef] = &[
    SuoClassDef {
        name: "match_all",
        param_defs: NO_DEFS,
        factory: match_all_node,
    },
    SuoClassDef {
        name: "match",
        param_defs: NO_DEFS,
        factory: match_node,
    },
    SuoClassDef {
        name: "term",
        param_defs: NO_DEFS,
        factory: term_node,
    },
    SuoClassDef {
        name: "terms",
        param_defs: NO_DEFS,
        factory: terms_node,
    },
    SuoClassDef {
        name: "range",
        param_defs: NO_DEFS,
        factory: range_node,
    },
    SuoClassDef {
        name: "exists",
        param_defs: NO_DEFS,
        factory: exists_node,
    },
    SuoClassDef {
        name: "prefix",
        param_defs: NO_DEFS,
        factory: prefix_node,
    },
    SuoClassDef {
        name: "wildcard",
        param_defs: NO_DEFS,
        factory: wildcard_node,
    },
    SuoClassDef {
        name: "query_string",
        param_defs: NO_DEFS,
        factory: query_string_node,
    },
    SuoClassDef {
        name: "ids",
        param_defs: NO_DEFS,
        factory: ids_node,
    },
    SuoClassDef {
        name: "bool",
        param_defs: BOOL_DEFS,
        factory: bool_node,
    },
    SuoClassDef {
        name: "nested",
        param_defs: NESTED_DEFS,
        factory: nested_node,
    },
    SuoClassDef {
        name: "percolate",
        param_defs: NO_DEFS,
        factory: percolate_node,
    },
];

pub(crate) fn register_defaults(registry: &mut SuoRegistry) {
    registry.register_family("query", query_shortcut);
    registry.register_classes("query", QUERY_CLASSES);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(json: &str) -> SuoValue {
        SuoValue::from_json_str(json).unwrap()
    }

    #[test]
    fn single_entry_mapping_coerces() {
        let query = construct_query(wire(r#"{"match": {"title": "hello"}}"#)).unwrap();
        assert_eq!(query.name(), "match");
        assert_eq!(
            query.to_value().unwrap(),
            wire(r#"{"match": {"title": "hello"}}"#)
        );
    }

    #[test]
    fn multi_entry_mapping_is_rejected() {
        let err = construct_query(wire(r#"{"match": {}, "term": {}}"#)).unwrap_err();
        assert!(err.to_string().contains("single {name: params} entry"));
    }

    #[test]
    fn unknown_kind_errors_through_registry() {
        let err = construct_query("flux_capacitor").unwrap_err();
        assert_eq!(
            err.to_string(),
            "DSL class 'flux_capacitor' does not exist in query"
        );
    }

    #[test]
    fn bool_builder_collects_clauses() {
        let query = SuoQuery::bool_query()
            .with_must(SuoQuery::term("user", "kimchy"))
            .unwrap()
            .with_should(SuoQuery::match_query("title", "hello"))
            .unwrap()
            .with_minimum_should_match(1i64);
        let rendered = query.to_value().unwrap();
        assert_eq!(
            rendered,
            wire(
                r#"{"bool": {"must": [{"term": {"user": "kimchy"}}],
                    "should": [{"match": {"title": "hello"}}],
                    "minimum_should_match": 1}}"#
            )
        );
    }

    #[test]
    fn empty_clause_lists_are_omitted() {
        let query = SuoQuery::bool_query();
        assert_eq!(query.to_value().unwrap(), wire(r#"{"bool": {}}"#));
        // The declared-shape fallback still reads as an empty list.
        assert_eq!(
            query.param_value("must").unwrap(),
            SuoParamValue::Multi(Vec::new())
        );
    }

    #[test]
    fn wire_clauses_coerce_recursively() {
        let query = construct_query(wire(
            r#"{"bool": {"must": [{"term": {"user": "kimchy"}},
                {"exists": {"field": "title"}}]}}"#,
        ))
        .unwrap();
        match query.param("must") {
            Some(SuoParamValue::Multi(nodes)) => {
                assert_eq!(nodes.len(), 2);
                assert_eq!(nodes[0].as_query().unwrap().name(), "term");
                assert_eq!(nodes[1].as_query().unwrap().name(), "exists");
            }
            other => panic!("expected coerced clause nodes, got {:?}", other),
        }
    }

    #[test]
    fn wire_keys_keep_double_underscores() {
        let query = construct_query(wire(r#"{"term": {"user__name": "x"}}"#)).unwrap();
        assert_eq!(
            query.to_value().unwrap(),
            wire(r#"{"term": {"user__name": "x"}}"#)
        );

        // Programmatic construction rewrites instead.
        let mut programmatic = SuoQuery::match_all();
        programmatic.set_param("user__name", "x").unwrap();
        assert!(programmatic.param("user.name").is_some());
    }

    #[test]
    fn nested_wraps_a_single_query() {
        let query =
            SuoQuery::nested("comments", SuoQuery::match_query("comments.body", "great")).unwrap();
        assert_eq!(
            query.to_value().unwrap(),
            wire(
                r#"{"nested": {"path": "comments",
                    "query": {"match": {"comments.body": "great"}}}}"#
            )
        );
    }

    #[test]
    fn constructed_query_passes_through() {
        let original = SuoQuery::term("user", "kimchy");
        let via = construct_query(original.clone()).unwrap();
        assert_eq!(via, original);

        let mut params = SuoParamMap::new();
        params.insert("boost", 2i64);
        let err = construct_query_with(original, params).unwrap_err();
        assert!(err.to_string().contains("constructed query"));
    }
}
