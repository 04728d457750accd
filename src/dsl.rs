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

//! # Suo DSL Parameter Engine
//!
//! The machinery every DSL node family (fields, queries, analyzers) is built
//! on. Each concrete node kind declares a static parameter table naming which
//! of its parameters are typed, which family they belong to, and what shape
//! they take ([`SuoParamKind`]). [`SuoDslData`] stores the parameters and
//! implements the shared behavior:
//!
//! - double-underscore parameter names rewrite to dotted field paths
//!   (`title__raw` becomes `title.raw`);
//! - typed parameters coerce through their family's shortcut constructor,
//!   element-wise across the declared shape (a lone value promotes to a
//!   one-element list for Multi shapes);
//! - rendering reverses storage into a plain params map, omitting typed
//!   parameters that hold empty containers.

use indexmap::IndexMap;

use crate::analysis::SuoAnalysis;
use crate::errors::{Result, SuoError};
use crate::fields::SuoField;
use crate::query::SuoQuery;
use crate::registry::SuoRegistry;
use crate::value::{recursive_to_value, SuoValue};

/// Whether double-underscore parameter names rewrite to dots by default.
pub const EXPAND_DOUBLE_UNDERSCORE: bool = true;

/// Rendering capability of DSL nodes and node-bearing values.
pub trait SuoToValue {
    /// The plain-tree rendering of this node.
    fn to_value(&self) -> Result<SuoValue>;
}

/// Shape of a typed parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuoParamKind {
    /// One node.
    Single,
    /// A list of nodes; lone values promote to one-element lists.
    Multi,
    /// A name-to-node map.
    Hash,
    /// A list of name-to-node maps.
    MultiHash,
}

/// Declaration of one typed parameter: the node family its values coerce
/// through, and the shape they take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuoParamDef {
    pub family: &'static str,
    pub kind: SuoParamKind,
}

impl SuoParamDef {
    pub const fn new(family: &'static str, kind: SuoParamKind) -> SuoParamDef {
        SuoParamDef { family, kind }
    }
}

/// Static parameter table of a concrete node kind.
pub type SuoParamDefs = &'static [(&'static str, SuoParamDef)];

/// Looks up a parameter declaration by (already rewritten) name.
pub fn param_def(defs: SuoParamDefs, name: &str) -> Option<&'static SuoParamDef> {
    defs.iter()
        .find(|(def_name, _)| *def_name == name)
        .map(|(_, def)| def)
}

/// Rewrites `a__b` to `a.b`.
pub fn expand_param_name(name: &str) -> String {
    if name.contains("__") {
        name.replace("__", ".")
    } else {
        name.to_string()
    }
}

/// A constructed node of any family.
#[derive(Debug, Clone, PartialEq)]
pub enum SuoDslNode {
    Field(Box<SuoField>),
    Query(Box<SuoQuery>),
    Analysis(Box<SuoAnalysis>),
}

impl SuoDslNode {
    /// The family this node belongs to.
    pub fn type_name(&self) -> &'static str {
        match self {
            SuoDslNode::Field(_) => "field",
            SuoDslNode::Query(_) => "query",
            SuoDslNode::Analysis(node) => node.type_name(),
        }
    }

    pub fn as_field(&self) -> Option<&SuoField> {
        match self {
            SuoDslNode::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&SuoQuery> {
        match self {
            SuoDslNode::Query(query) => Some(query),
            _ => None,
        }
    }

    pub fn as_analysis(&self) -> Option<&SuoAnalysis> {
        match self {
            SuoDslNode::Analysis(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn into_field(self) -> Result<SuoField> {
        match self {
            SuoDslNode::Field(field) => Ok(*field),
            other => Err(SuoError::illegal_argument(format!(
                "expected a field node, got a {} node",
                other.type_name()
            ))),
        }
    }

    pub fn into_query(self) -> Result<SuoQuery> {
        match self {
            SuoDslNode::Query(query) => Ok(*query),
            other => Err(SuoError::illegal_argument(format!(
                "expected a query node, got a {} node",
                other.type_name()
            ))),
        }
    }

    pub fn into_analysis(self) -> Result<SuoAnalysis> {
        match self {
            SuoDslNode::Analysis(analysis) => Ok(*analysis),
            other => Err(SuoError::illegal_argument(format!(
                "expected an analysis node, got a {} node",
                other.type_name()
            ))),
        }
    }
}

impl SuoToValue for SuoDslNode {
    fn to_value(&self) -> Result<SuoValue> {
        match self {
            SuoDslNode::Field(field) => field.to_value(),
            SuoDslNode::Query(query) => query.to_value(),
            SuoDslNode::Analysis(analysis) => analysis.to_value(),
        }
    }
}

impl std::fmt::Display for SuoDslNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuoDslNode::Field(field) => field.fmt(f),
            SuoDslNode::Query(query) => query.fmt(f),
            SuoDslNode::Analysis(analysis) => analysis.fmt(f),
        }
    }
}

impl From<SuoField> for SuoDslNode {
    fn from(field: SuoField) -> Self {
        SuoDslNode::Field(Box::new(field))
    }
}

impl From<SuoQuery> for SuoDslNode {
    fn from(query: SuoQuery) -> Self {
        SuoDslNode::Query(Box::new(query))
    }
}

impl From<SuoAnalysis> for SuoDslNode {
    fn from(analysis: SuoAnalysis) -> Self {
        SuoDslNode::Analysis(Box::new(analysis))
    }
}

/// What callers hand in when setting a parameter: plain data, an
/// already-built node, or containers of either.
#[derive(Debug, Clone)]
pub enum SuoParamInput {
    Value(SuoValue),
    Node(SuoDslNode),
    List(Vec<SuoParamInput>),
    Map(Vec<(String, SuoParamInput)>),
}

impl From<SuoValue> for SuoParamInput {
    fn from(value: SuoValue) -> Self {
        SuoParamInput::Value(value)
    }
}

impl From<serde_json::Value> for SuoParamInput {
    fn from(value: serde_json::Value) -> Self {
        SuoParamInput::Value(SuoValue::from_json(value))
    }
}

impl From<&str> for SuoParamInput {
    fn from(value: &str) -> Self {
        SuoParamInput::Value(SuoValue::from(value))
    }
}

impl From<String> for SuoParamInput {
    fn from(value: String) -> Self {
        SuoParamInput::Value(SuoValue::from(value))
    }
}

impl From<i64> for SuoParamInput {
    fn from(value: i64) -> Self {
        SuoParamInput::Value(SuoValue::from(value))
    }
}

impl From<f64> for SuoParamInput {
    fn from(value: f64) -> Self {
        SuoParamInput::Value(SuoValue::from(value))
    }
}

impl From<bool> for SuoParamInput {
    fn from(value: bool) -> Self {
        SuoParamInput::Value(SuoValue::from(value))
    }
}

impl From<SuoField> for SuoParamInput {
    fn from(field: SuoField) -> Self {
        SuoParamInput::Node(field.into())
    }
}

impl From<SuoQuery> for SuoParamInput {
    fn from(query: SuoQuery) -> Self {
        SuoParamInput::Node(query.into())
    }
}

impl From<SuoAnalysis> for SuoParamInput {
    fn from(analysis: SuoAnalysis) -> Self {
        SuoParamInput::Node(analysis.into())
    }
}

impl<T: Into<SuoParamInput>> From<Vec<T>> for SuoParamInput {
    fn from(items: Vec<T>) -> Self {
        SuoParamInput::List(items.into_iter().map(Into::into).collect())
    }
}

/// Ordered bag of named parameter inputs, as factories receive them.
///
/// Factories pop their construction-level configuration out of the bag
/// (`take_*`) and feed the rest to the parameter engine. The bag also
/// carries the double-underscore rewriting flag, so wire-shaped input can
/// travel through a factory with rewriting turned off.
#[derive(Debug, Clone)]
pub struct SuoParamMap {
    entries: Vec<(String, SuoParamInput)>,
    expand_dots: bool,
}

impl Default for SuoParamMap {
    fn default() -> Self {
        SuoParamMap {
            entries: Vec::new(),
            expand_dots: EXPAND_DOUBLE_UNDERSCORE,
        }
    }
}

impl SuoParamMap {
    pub fn new() -> SuoParamMap {
        SuoParamMap::default()
    }

    /// Builds the bag from a map value, each entry a plain-value input.
    pub fn from_value(value: &SuoValue) -> Result<SuoParamMap> {
        match value {
            SuoValue::Map(handle) => Ok(SuoParamMap {
                entries: handle
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), SuoParamInput::Value(v.clone())))
                    .collect(),
                expand_dots: EXPAND_DOUBLE_UNDERSCORE,
            }),
            other => Err(SuoError::illegal_argument(format!(
                "expected a mapping of parameters, got {:?}",
                other
            ))),
        }
    }

    pub fn set_expand_dots(&mut self, expand: bool) {
        self.expand_dots = expand;
    }

    pub fn expand_dots(&self) -> bool {
        self.expand_dots
    }

    pub fn insert(&mut self, name: impl Into<String>, input: impl Into<SuoParamInput>) {
        self.entries.push((name.into(), input.into()));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes and returns the input under `name`.
    pub fn take(&mut self, name: &str) -> Option<SuoParamInput> {
        let position = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Removes a string-valued configuration entry.
    pub fn take_str(&mut self, name: &str) -> Result<Option<String>> {
        match self.take(name) {
            None => Ok(None),
            Some(SuoParamInput::Value(SuoValue::Str(s))) => Ok(Some(s)),
            Some(other) => Err(SuoError::illegal_argument(format!(
                "'{}' must be a string, got {:?}",
                name, other
            ))),
        }
    }

    /// Removes a boolean-valued configuration entry.
    pub fn take_bool(&mut self, name: &str) -> Result<Option<bool>> {
        match self.take(name) {
            None => Ok(None),
            Some(SuoParamInput::Value(SuoValue::Bool(b))) => Ok(Some(b)),
            Some(other) => Err(SuoError::illegal_argument(format!(
                "'{}' must be a boolean, got {:?}",
                name, other
            ))),
        }
    }

    /// Consumes the bag into its entries, in insertion order.
    pub fn into_entries(self) -> Vec<(String, SuoParamInput)> {
        self.entries
    }
}

/// One stored parameter: raw data for untyped parameters, coerced nodes in
/// one of the four shapes for typed ones.
#[derive(Debug, Clone, PartialEq)]
pub enum SuoParamValue {
    Raw(SuoValue),
    Single(SuoDslNode),
    Multi(Vec<SuoDslNode>),
    Hash(IndexMap<String, SuoDslNode>),
    MultiHash(Vec<IndexMap<String, SuoDslNode>>),
}

impl SuoParamValue {
    /// True for typed containers holding nothing; these are omitted from
    /// renderings and listings.
    pub fn is_empty_container(&self) -> bool {
        match self {
            SuoParamValue::Raw(_) | SuoParamValue::Single(_) => false,
            SuoParamValue::Multi(nodes) => nodes.is_empty(),
            SuoParamValue::Hash(entries) => entries.is_empty(),
            SuoParamValue::MultiHash(maps) => maps.is_empty(),
        }
    }

    /// Renders the stored parameter, or `None` when it is an empty typed
    /// container (omitted from node renderings).
    pub fn render(&self) -> Result<Option<SuoValue>> {
        Ok(match self {
            SuoParamValue::Raw(value) => Some(recursive_to_value(value)?),
            SuoParamValue::Single(node) => Some(node.to_value()?),
            SuoParamValue::Multi(nodes) => {
                if nodes.is_empty() {
                    None
                } else {
                    let mut out = Vec::with_capacity(nodes.len());
                    for node in nodes {
                        out.push(node.to_value()?);
                    }
                    Some(SuoValue::list(out))
                }
            }
            SuoParamValue::Hash(entries) => {
                if entries.is_empty() {
                    None
                } else {
                    let mut out = Vec::with_capacity(entries.len());
                    for (name, node) in entries {
                        out.push((name.clone(), node.to_value()?));
                    }
                    Some(SuoValue::map_from(out))
                }
            }
            SuoParamValue::MultiHash(maps) => {
                if maps.is_empty() {
                    None
                } else {
                    let mut out = Vec::with_capacity(maps.len());
                    for entries in maps {
                        let mut rendered = Vec::with_capacity(entries.len());
                        for (name, node) in entries {
                            rendered.push((name.clone(), node.to_value()?));
                        }
                        out.push(SuoValue::map_from(rendered));
                    }
                    Some(SuoValue::list(out))
                }
            }
        })
    }
}

impl std::fmt::Display for SuoParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuoParamValue::Raw(value) => value.fmt(f),
            SuoParamValue::Single(node) => node.fmt(f),
            SuoParamValue::Multi(nodes) => {
                write!(f, "[")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    node.fmt(f)?;
                }
                write!(f, "]")
            }
            SuoParamValue::Hash(entries) => {
                write!(f, "{{")?;
                for (i, (name, node)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, node)?;
                }
                write!(f, "}}")
            }
            SuoParamValue::MultiHash(maps) => {
                write!(f, "[")?;
                for (i, entries) in maps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{{")?;
                    for (j, (name, node)) in entries.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}: {}", name, node)?;
                    }
                    write!(f, "}}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Parameter storage and behavior shared by every node family.
#[derive(Debug, Clone, PartialEq)]
pub struct SuoDslData {
    params: IndexMap<String, SuoParamValue>,
    expand_dots: bool,
}

impl Default for SuoDslData {
    fn default() -> Self {
        SuoDslData {
            params: IndexMap::new(),
            expand_dots: EXPAND_DOUBLE_UNDERSCORE,
        }
    }
}

impl SuoDslData {
    pub fn new() -> SuoDslData {
        SuoDslData::default()
    }

    /// Disables (or re-enables) double-underscore rewriting for parameters
    /// set from here on.
    pub fn set_expand_dots(&mut self, expand: bool) {
        self.expand_dots = expand;
    }

    /// Stores a parameter, coercing typed ones through their family's
    /// shortcut constructor per the declared shape.
    pub fn set_param(
        &mut self,
        defs: SuoParamDefs,
        name: &str,
        input: SuoParamInput,
    ) -> Result<()> {
        let name = if self.expand_dots {
            expand_param_name(name)
        } else {
            name.to_string()
        };
        let stored = match param_def(defs, &name) {
            Some(def) => coerce_param(def, input)?,
            None => untyped_param(input)?,
        };
        self.params.insert(name, stored);
        Ok(())
    }

    /// Stores a plain-value parameter directly. Untyped storage never
    /// fails, so convenience constructors can stay infallible.
    pub fn set_raw_param(&mut self, name: &str, value: impl Into<SuoValue>) {
        let name = if self.expand_dots {
            expand_param_name(name)
        } else {
            name.to_string()
        };
        self.params.insert(name, SuoParamValue::Raw(value.into()));
    }

    pub fn param(&self, name: &str) -> Option<&SuoParamValue> {
        self.params.get(name)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.params.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The stored parameter, with the declared-shape fallback: a missing
    /// Multi/Hash/MultiHash parameter reads as its empty container.
    pub fn param_value(&self, defs: SuoParamDefs, name: &str) -> Result<SuoParamValue> {
        if let Some(stored) = self.params.get(name) {
            return Ok(stored.clone());
        }
        match param_def(defs, name).map(|def| def.kind) {
            Some(SuoParamKind::Multi) => Ok(SuoParamValue::Multi(Vec::new())),
            Some(SuoParamKind::Hash) => Ok(SuoParamValue::Hash(IndexMap::new())),
            Some(SuoParamKind::MultiHash) => Ok(SuoParamValue::MultiHash(Vec::new())),
            _ => Err(SuoError::missing_attribute("SuoDslData", name)),
        }
    }

    /// Mutable access to a declared Multi parameter's nodes, materializing
    /// the empty list on first use.
    pub fn param_nodes_mut(
        &mut self,
        defs: SuoParamDefs,
        name: &str,
    ) -> Result<&mut Vec<SuoDslNode>> {
        match param_def(defs, name).map(|def| def.kind) {
            Some(SuoParamKind::Multi) => {}
            Some(other) => {
                return Err(SuoError::illegal_argument(format!(
                    "parameter '{}' is declared {:?}, not Multi",
                    name, other
                )))
            }
            None => {
                return Err(SuoError::illegal_argument(format!(
                    "parameter '{}' is not a declared node list",
                    name
                )))
            }
        }
        let slot = self
            .params
            .entry(name.to_string())
            .or_insert_with(|| SuoParamValue::Multi(Vec::new()));
        match slot {
            SuoParamValue::Multi(nodes) => Ok(nodes),
            other => Err(SuoError::illegal_argument(format!(
                "parameter '{}' holds {}, not a node list",
                name, other
            ))),
        }
    }

    /// Renders the parameters into a plain map. Typed parameters holding
    /// empty containers are omitted.
    pub fn params_to_value(&self) -> Result<SuoValue> {
        let mut out = Vec::with_capacity(self.params.len());
        for (name, stored) in &self.params {
            if let Some(rendered) = stored.render()? {
                out.push((name.clone(), rendered));
            }
        }
        Ok(SuoValue::map_from(out))
    }

    /// Stable parameter listing for Display impls: sorted by name, dots
    /// rendered back as double underscores, empty typed containers omitted.
    pub fn fmt_params(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self
            .params
            .iter()
            .filter(|(_, stored)| !stored.is_empty_container())
            .map(|(name, _)| name)
            .collect();
        names.sort();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{}={}",
                name.replace('.', "__"),
                self.params[name.as_str()]
            )?;
        }
        Ok(())
    }
}

/// Stores an untyped parameter. Plain values stay raw; ready-built nodes
/// (and all-node containers) are kept as nodes so they render through their
/// own serialization.
fn untyped_param(input: SuoParamInput) -> Result<SuoParamValue> {
    match input {
        SuoParamInput::Value(value) => Ok(SuoParamValue::Raw(value)),
        SuoParamInput::Node(node) => Ok(SuoParamValue::Single(node)),
        SuoParamInput::List(items) => {
            if items
                .iter()
                .all(|item| matches!(item, SuoParamInput::Value(_)))
            {
                let values: Vec<SuoValue> = items
                    .into_iter()
                    .map(|item| match item {
                        SuoParamInput::Value(value) => value,
                        _ => unreachable!(),
                    })
                    .collect();
                Ok(SuoParamValue::Raw(SuoValue::list(values)))
            } else if items
                .iter()
                .all(|item| matches!(item, SuoParamInput::Node(_)))
            {
                let nodes: Vec<SuoDslNode> = items
                    .into_iter()
                    .map(|item| match item {
                        SuoParamInput::Node(node) => node,
                        _ => unreachable!(),
                    })
                    .collect();
                Ok(SuoParamValue::Multi(nodes))
            } else {
                Err(SuoError::illegal_argument(
                    "untyped list parameters cannot mix plain values and DSL nodes",
                ))
            }
        }
        SuoParamInput::Map(entries) => {
            if entries
                .iter()
                .all(|(_, item)| matches!(item, SuoParamInput::Value(_)))
            {
                let values: Vec<(String, SuoValue)> = entries
                    .into_iter()
                    .map(|(name, item)| match item {
                        SuoParamInput::Value(value) => (name, value),
                        _ => unreachable!(),
                    })
                    .collect();
                Ok(SuoParamValue::Raw(SuoValue::map_from(values)))
            } else if entries
                .iter()
                .all(|(_, item)| matches!(item, SuoParamInput::Node(_)))
            {
                let nodes: IndexMap<String, SuoDslNode> = entries
                    .into_iter()
                    .map(|(name, item)| match item {
                        SuoParamInput::Node(node) => (name, node),
                        _ => unreachable!(),
                    })
                    .collect();
                Ok(SuoParamValue::Hash(nodes))
            } else {
                Err(SuoError::illegal_argument(
                    "untyped map parameters cannot mix plain values and DSL nodes",
                ))
            }
        }
    }
}

/// Coerces a typed parameter across its declared shape.
fn coerce_param(def: &SuoParamDef, input: SuoParamInput) -> Result<SuoParamValue> {
    let registry = SuoRegistry::global();
    let shortcut = registry.shortcut(def.family)?;
    match def.kind {
        SuoParamKind::Single => Ok(SuoParamValue::Single(shortcut(input)?)),
        SuoParamKind::Multi => {
            let mut nodes = Vec::new();
            for item in promote_to_inputs(input) {
                nodes.push(shortcut(item)?);
            }
            Ok(SuoParamValue::Multi(nodes))
        }
        SuoParamKind::Hash => {
            let mut nodes = IndexMap::new();
            for (name, item) in entry_inputs(input)? {
                nodes.insert(name, shortcut(item)?);
            }
            Ok(SuoParamValue::Hash(nodes))
        }
        SuoParamKind::MultiHash => {
            let mut maps = Vec::new();
            for item in promote_to_inputs(input) {
                let mut nodes = IndexMap::new();
                for (name, entry) in entry_inputs(item)? {
                    nodes.insert(name, shortcut(entry)?);
                }
                maps.push(nodes);
            }
            Ok(SuoParamValue::MultiHash(maps))
        }
    }
}

/// List promotion: lists unpack element-wise, anything else becomes a
/// one-element list.
fn promote_to_inputs(input: SuoParamInput) -> Vec<SuoParamInput> {
    match input {
        SuoParamInput::List(items) => items,
        SuoParamInput::Value(SuoValue::List(handle)) => handle
            .borrow()
            .iter()
            .cloned()
            .map(SuoParamInput::Value)
            .collect(),
        other => vec![other],
    }
}

/// Hash shapes require mapping-shaped input.
pub(crate) fn entry_inputs(input: SuoParamInput) -> Result<Vec<(String, SuoParamInput)>> {
    match input {
        SuoParamInput::Map(entries) => Ok(entries),
        SuoParamInput::Value(SuoValue::Map(handle)) => Ok(handle
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), SuoParamInput::Value(v.clone())))
            .collect()),
        other => Err(SuoError::illegal_argument(format!(
            "expected a mapping-shaped parameter, got {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_underscores_become_dots() {
        assert_eq!(expand_param_name("title__raw"), "title.raw");
        assert_eq!(expand_param_name("plain"), "plain");
    }

    #[test]
    fn untyped_params_stay_raw() {
        let mut data = SuoDslData::new();
        data.set_param(&[], "boost", SuoParamInput::from(2i64)).unwrap();
        assert_eq!(
            data.param("boost"),
            Some(&SuoParamValue::Raw(SuoValue::Int(2)))
        );
    }

    #[test]
    fn dot_rewriting_can_be_disabled() {
        let mut data = SuoDslData::new();
        data.set_expand_dots(false);
        data.set_param(&[], "a__b", SuoParamInput::from(1i64)).unwrap();
        assert!(data.has_param("a__b"));
        assert!(!data.has_param("a.b"));
    }
}
