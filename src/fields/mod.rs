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

//! # Suo Field Hierarchy
//!
//! Mapping field kinds and their value coercion. A [`SuoField`] pairs a
//! concrete kind with the shared parameter engine; the kind decides the wire
//! type name, the parameter table, and how values move between wire shapes
//! and typed values:
//!
//! - `deserialize` turns wire input into typed values (booleans, numbers,
//!   dates, addresses, byte strings, ranges, query nodes, sub-documents);
//! - `serialize` renders typed values back into wire shapes;
//! - `clean` runs deserialization plus the `required` probe, the unit of
//!   work document validation is built from.
//!
//! Both directions are list-aware: a list input maps element-wise and
//! preserves null elements, so multi-valued fields reuse the scalar rules.
//!
//! ## Construction Paths
//!
//! - by kind: `SuoField::keyword()`, `SuoField::date()`, ... with the
//!   `with_multi` / `with_required` builders;
//! - by name: `SuoField::new("keyword", params)` through the registry;
//! - from wire declarations: [`construct_field`] accepts a
//!   `{"type": ..., ...params}` mapping (a `properties` key alone implies
//!   `"object"`), a kind name, or a ready-built field.

mod object;
mod range;
mod scalar;

pub use object::SuoSchemaSource;
pub use range::SuoRange;

use std::rc::Rc;

use chrono::FixedOffset;

use crate::attr::SuoObjWrapper;
use crate::document::SuoDocType;
use crate::dsl::{
    SuoDslData, SuoDslNode, SuoParamDef, SuoParamDefs, SuoParamInput, SuoParamKind, SuoParamMap,
    SuoParamValue, SuoToValue,
};
use crate::errors::{Result, SuoError};
use crate::registry::{SuoClassDef, SuoRegistry};
use crate::value::SuoValue;

/// The base parameter table: every kind carries a `fields` hash of
/// sub-fields unless its own table says otherwise.
const DEFAULT_DEFS: SuoParamDefs = &[("fields", SuoParamDef::new("field", SuoParamKind::Hash))];

const TEXT_DEFS: SuoParamDefs = &[
    ("fields", SuoParamDef::new("field", SuoParamKind::Hash)),
    ("analyzer", SuoParamDef::new("analyzer", SuoParamKind::Single)),
    (
        "search_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
    (
        "search_quote_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
];

// search_as_you_type declares its own table and drops `fields` with it.
const SEARCH_AS_YOU_TYPE_DEFS: SuoParamDefs = &[
    ("analyzer", SuoParamDef::new("analyzer", SuoParamKind::Single)),
    (
        "search_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
    (
        "search_quote_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
];

const KEYWORD_DEFS: SuoParamDefs = &[
    ("fields", SuoParamDef::new("field", SuoParamKind::Hash)),
    (
        "search_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
    (
        "normalizer",
        SuoParamDef::new("normalizer", SuoParamKind::Single),
    ),
];

const COMPLETION_DEFS: SuoParamDefs = &[
    ("analyzer", SuoParamDef::new("analyzer", SuoParamKind::Single)),
    (
        "search_analyzer",
        SuoParamDef::new("analyzer", SuoParamKind::Single),
    ),
];

/// What a custom field kind renders as: a builtin type name, or a
/// ready-built field whose rendering it adopts wholesale.
#[derive(Debug, Clone)]
pub enum SuoCustomType {
    Name(String),
    Field(Box<SuoField>),
}

impl From<&str> for SuoCustomType {
    fn from(name: &str) -> Self {
        SuoCustomType::Name(name.to_string())
    }
}

impl From<String> for SuoCustomType {
    fn from(name: String) -> Self {
        SuoCustomType::Name(name)
    }
}

impl From<SuoField> for SuoCustomType {
    fn from(field: SuoField) -> Self {
        SuoCustomType::Field(Box::new(field))
    }
}

/// The concrete field kinds. Kinds that need construction-level
/// configuration carry it as payload; everything else is a bare variant.
#[derive(Debug, Clone)]
pub enum SuoFieldKind {
    Text,
    SearchAsYouType,
    Keyword,
    ConstantKeyword,
    Completion,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    HalfFloat,
    Double,
    RankFeature,
    RankFeatures,
    ScaledFloat,
    DenseVector,
    SparseVector,
    Date {
        default_timezone: Option<FixedOffset>,
    },
    Ip,
    Binary,
    Percolator,
    IntegerRange,
    FloatRange,
    LongRange,
    DoubleRange,
    DateRange,
    IpRange,
    Object {
        doc_type: Rc<SuoDocType>,
    },
    Nested {
        doc_type: Rc<SuoDocType>,
    },
    GeoPoint,
    GeoShape,
    Join,
    TokenCount,
    Murmur3,
    Custom {
        builtin: SuoCustomType,
    },
}

impl SuoFieldKind {
    /// The wire type name.
    pub fn name(&self) -> &'static str {
        match self {
            SuoFieldKind::Text => "text",
            SuoFieldKind::SearchAsYouType => "search_as_you_type",
            SuoFieldKind::Keyword => "keyword",
            SuoFieldKind::ConstantKeyword => "constant_keyword",
            SuoFieldKind::Completion => "completion",
            SuoFieldKind::Boolean => "boolean",
            SuoFieldKind::Byte => "byte",
            SuoFieldKind::Short => "short",
            SuoFieldKind::Integer => "integer",
            SuoFieldKind::Long => "long",
            SuoFieldKind::Float => "float",
            SuoFieldKind::HalfFloat => "half_float",
            SuoFieldKind::Double => "double",
            SuoFieldKind::RankFeature => "rank_feature",
            SuoFieldKind::RankFeatures => "rank_features",
            SuoFieldKind::ScaledFloat => "scaled_float",
            SuoFieldKind::DenseVector => "dense_vector",
            SuoFieldKind::SparseVector => "sparse_vector",
            SuoFieldKind::Date { .. } => "date",
            SuoFieldKind::Ip => "ip",
            SuoFieldKind::Binary => "binary",
            SuoFieldKind::Percolator => "percolator",
            SuoFieldKind::IntegerRange => "integer_range",
            SuoFieldKind::FloatRange => "float_range",
            SuoFieldKind::LongRange => "long_range",
            SuoFieldKind::DoubleRange => "double_range",
            SuoFieldKind::DateRange => "date_range",
            SuoFieldKind::IpRange => "ip_range",
            SuoFieldKind::Object { .. } => "object",
            SuoFieldKind::Nested { .. } => "nested",
            SuoFieldKind::GeoPoint => "geo_point",
            SuoFieldKind::GeoShape => "geo_shape",
            SuoFieldKind::Join => "join",
            SuoFieldKind::TokenCount => "token_count",
            SuoFieldKind::Murmur3 => "murmur3",
            SuoFieldKind::Custom { .. } => "custom",
        }
    }

    /// The parameter table of this kind. Tables do not accumulate: a kind
    /// that declares its own replaces the base table outright.
    pub fn param_defs(&self) -> SuoParamDefs {
        match self {
            SuoFieldKind::Text => TEXT_DEFS,
            SuoFieldKind::SearchAsYouType => SEARCH_AS_YOU_TYPE_DEFS,
            SuoFieldKind::Keyword | SuoFieldKind::ConstantKeyword => KEYWORD_DEFS,
            SuoFieldKind::Completion => COMPLETION_DEFS,
            _ => DEFAULT_DEFS,
        }
    }

    /// Whether document ingestion runs this kind's deserialization.
    pub fn coerce(&self) -> bool {
        matches!(
            self,
            SuoFieldKind::Boolean
                | SuoFieldKind::Byte
                | SuoFieldKind::Short
                | SuoFieldKind::Integer
                | SuoFieldKind::Long
                | SuoFieldKind::Float
                | SuoFieldKind::HalfFloat
                | SuoFieldKind::Double
                | SuoFieldKind::RankFeature
                | SuoFieldKind::ScaledFloat
                | SuoFieldKind::DenseVector
                | SuoFieldKind::Date { .. }
                | SuoFieldKind::Ip
                | SuoFieldKind::Binary
                | SuoFieldKind::Percolator
                | SuoFieldKind::IntegerRange
                | SuoFieldKind::FloatRange
                | SuoFieldKind::LongRange
                | SuoFieldKind::DoubleRange
                | SuoFieldKind::DateRange
                | SuoFieldKind::Object { .. }
                | SuoFieldKind::Nested { .. }
                | SuoFieldKind::Custom { .. }
        )
    }

    fn multi_default(&self) -> bool {
        matches!(self, SuoFieldKind::Nested { .. })
    }
}

/// One mapping field: a kind plus its cardinality, requiredness, and
/// parameters.
#[derive(Debug, Clone)]
pub struct SuoField {
    kind: SuoFieldKind,
    multi: bool,
    required: bool,
    data: SuoDslData,
}

/// Fields compare by kind name and rendered output. Cardinality and
/// requiredness are construction-level configuration and do not render, so
/// they do not take part.
impl PartialEq for SuoField {
    fn eq(&self, other: &Self) -> bool {
        self.kind.name() == other.kind.name() && self.to_value().ok() == other.to_value().ok()
    }
}

impl SuoField {
    fn with_kind(kind: SuoFieldKind) -> SuoField {
        let multi = kind.multi_default();
        SuoField {
            kind,
            multi,
            required: false,
            data: SuoDslData::new(),
        }
    }

    fn build(kind: SuoFieldKind, mut params: SuoParamMap) -> Result<SuoField> {
        let mut field = SuoField::with_kind(kind);
        if let Some(multi) = params.take_bool("multi")? {
            field.multi = multi;
        }
        if let Some(required) = params.take_bool("required")? {
            field.required = required;
        }
        field.data.set_expand_dots(params.expand_dots());
        let defs = field.kind.param_defs();
        for (name, input) in params.into_entries() {
            field.data.set_param(defs, &name, input)?;
        }
        Ok(field)
    }

    /// Constructs a registered field kind by name.
    pub fn new(name: &str, params: SuoParamMap) -> Result<SuoField> {
        let def = SuoRegistry::global().dsl_class("field", name)?;
        (def.factory)(params)?.into_field()
    }

    /// A plain text field.
    pub fn text() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Text)
    }

    pub fn search_as_you_type() -> SuoField {
        SuoField::with_kind(SuoFieldKind::SearchAsYouType)
    }

    /// An untokenized keyword field.
    pub fn keyword() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Keyword)
    }

    pub fn boolean() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Boolean)
    }

    pub fn byte() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Byte)
    }

    pub fn short() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Short)
    }

    pub fn integer() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Integer)
    }

    pub fn long() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Long)
    }

    pub fn float() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Float)
    }

    pub fn half_float() -> SuoField {
        SuoField::with_kind(SuoFieldKind::HalfFloat)
    }

    pub fn double() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Double)
    }

    /// A scaled float; the scaling factor is mandatory and renders as a
    /// regular parameter.
    pub fn scaled_float(scaling_factor: f64) -> SuoField {
        let mut field = SuoField::with_kind(SuoFieldKind::ScaledFloat);
        field.data.set_raw_param("scaling_factor", scaling_factor);
        field
    }

    /// A dense vector of `dims` float components. Always multi-valued.
    pub fn dense_vector(dims: i64) -> SuoField {
        let mut field = SuoField::with_kind(SuoFieldKind::DenseVector);
        field.data.set_raw_param("dims", dims);
        field.multi = true;
        field
    }

    /// A date field with no default timezone.
    pub fn date() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Date {
            default_timezone: None,
        })
    }

    /// A date field that stamps the given offset onto naive datetimes.
    pub fn date_with_offset(default_timezone: FixedOffset) -> SuoField {
        SuoField::with_kind(SuoFieldKind::Date {
            default_timezone: Some(default_timezone),
        })
    }

    pub fn ip() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Ip)
    }

    pub fn binary() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Binary)
    }

    /// A percolator field; values deserialize into query nodes.
    pub fn percolator() -> SuoField {
        SuoField::with_kind(SuoFieldKind::Percolator)
    }

    /// An object field over the given schema source.
    pub fn object(source: impl Into<SuoSchemaSource>) -> SuoField {
        SuoField::with_kind(SuoFieldKind::Object {
            doc_type: object::resolve_schema(source.into()),
        })
    }

    /// A nested field; like object, but multi-valued by default.
    pub fn nested(source: impl Into<SuoSchemaSource>) -> SuoField {
        SuoField::with_kind(SuoFieldKind::Nested {
            doc_type: object::resolve_schema(source.into()),
        })
    }

    /// A user-defined mapping type rendering as `builtin`.
    pub fn custom(builtin: impl Into<SuoCustomType>) -> SuoField {
        SuoField::with_kind(SuoFieldKind::Custom {
            builtin: builtin.into(),
        })
    }

    pub fn with_multi(mut self, multi: bool) -> SuoField {
        self.multi = multi;
        self
    }

    pub fn with_required(mut self, required: bool) -> SuoField {
        self.required = required;
        self
    }

    /// The wire type name of this field's kind.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn kind(&self) -> &SuoFieldKind {
        &self.kind
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether document ingestion coerces values through this field.
    pub fn coerce(&self) -> bool {
        self.kind.coerce()
    }

    /// Sets a parameter, coercing declared ones through their family.
    pub fn set_param(&mut self, name: &str, input: impl Into<SuoParamInput>) -> Result<()> {
        self.data.set_param(self.kind.param_defs(), name, input.into())
    }

    pub fn param(&self, name: &str) -> Option<&SuoParamValue> {
        self.data.param(name)
    }

    /// Reads a parameter with the declared-shape fallback (a missing
    /// `fields` hash reads as empty).
    pub fn param_value(&self, name: &str) -> Result<SuoParamValue> {
        self.data.param_value(self.kind.param_defs(), name)
    }

    /// The sub-field under `name` in the `fields` hash, if any.
    pub fn subfield(&self, name: &str) -> Option<SuoField> {
        match self.data.param("fields") {
            Some(SuoParamValue::Hash(entries)) => entries
                .get(name)
                .and_then(|node| node.as_field())
                .cloned(),
            _ => None,
        }
    }

    /// The inner document type of object-like kinds.
    pub fn doc_type(&self) -> Option<&Rc<SuoDocType>> {
        match &self.kind {
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type } => Some(doc_type),
            _ => None,
        }
    }

    /// The value an unset field materializes as: a fresh empty list for
    /// multi fields, an empty typed document for object kinds, Null
    /// otherwise.
    pub fn empty(&self) -> SuoValue {
        if self.multi {
            return SuoValue::list(Vec::new());
        }
        match &self.kind {
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type } => {
                object::empty_object(doc_type)
            }
            _ => SuoValue::Null,
        }
    }

    /// The element wrapper object-like kinds hand to list views, turning
    /// mapping elements into typed documents on read.
    pub fn wrapper(&self) -> Option<SuoObjWrapper> {
        match &self.kind {
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type } => {
                Some(object::object_wrapper(doc_type))
            }
            _ => None,
        }
    }

    /// Wire input to typed value. Null passes; lists map element-wise into a
    /// fresh list, preserving null elements.
    pub fn deserialize(&self, value: SuoValue) -> Result<SuoValue> {
        match value {
            SuoValue::Null => Ok(SuoValue::Null),
            SuoValue::List(handle) => {
                let items: Vec<SuoValue> = handle.borrow().iter().cloned().collect();
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(match item {
                        SuoValue::Null => SuoValue::Null,
                        other => self.deserialize_one(other)?,
                    });
                }
                Ok(SuoValue::list(out))
            }
            other => self.deserialize_one(other),
        }
    }

    fn deserialize_one(&self, value: SuoValue) -> Result<SuoValue> {
        match &self.kind {
            SuoFieldKind::Boolean => scalar::deserialize_boolean(value),
            SuoFieldKind::Byte
            | SuoFieldKind::Short
            | SuoFieldKind::Integer
            | SuoFieldKind::Long => scalar::deserialize_integer(value),
            SuoFieldKind::Float
            | SuoFieldKind::HalfFloat
            | SuoFieldKind::Double
            | SuoFieldKind::RankFeature
            | SuoFieldKind::ScaledFloat
            | SuoFieldKind::DenseVector => scalar::deserialize_float(value),
            SuoFieldKind::Date { default_timezone } => {
                scalar::deserialize_date(value, *default_timezone)
            }
            SuoFieldKind::Ip => scalar::deserialize_ip(value),
            SuoFieldKind::Binary => scalar::deserialize_binary(value),
            SuoFieldKind::Percolator => scalar::deserialize_percolator(value),
            SuoFieldKind::IntegerRange => range::deserialize_range(&SuoField::integer(), value),
            SuoFieldKind::FloatRange => range::deserialize_range(&SuoField::float(), value),
            SuoFieldKind::LongRange => range::deserialize_range(&SuoField::long(), value),
            SuoFieldKind::DoubleRange => range::deserialize_range(&SuoField::double(), value),
            SuoFieldKind::DateRange => range::deserialize_range(&SuoField::date(), value),
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type } => {
                object::deserialize_object(doc_type, value)
            }
            _ => Ok(value),
        }
    }

    /// Typed value to wire shape. Lists map element-wise into a fresh list.
    pub fn serialize(&self, value: &SuoValue) -> Result<SuoValue> {
        if let SuoValue::List(handle) = value {
            let items: Vec<SuoValue> = handle.borrow().iter().cloned().collect();
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(self.serialize_one(&item)?);
            }
            return Ok(SuoValue::list(out));
        }
        self.serialize_one(value)
    }

    fn serialize_one(&self, value: &SuoValue) -> Result<SuoValue> {
        if value.is_null() {
            return Ok(SuoValue::Null);
        }
        match &self.kind {
            SuoFieldKind::Ip => scalar::serialize_ip(value),
            SuoFieldKind::Binary => scalar::serialize_binary(value),
            SuoFieldKind::Percolator => scalar::serialize_percolator(value),
            SuoFieldKind::IntegerRange => range::serialize_range(&SuoField::integer(), value),
            SuoFieldKind::FloatRange => range::serialize_range(&SuoField::float(), value),
            SuoFieldKind::LongRange => range::serialize_range(&SuoField::long(), value),
            SuoFieldKind::DoubleRange => range::serialize_range(&SuoField::double(), value),
            SuoFieldKind::DateRange => range::serialize_range(&SuoField::date(), value),
            SuoFieldKind::Object { .. } | SuoFieldKind::Nested { .. } => {
                object::serialize_object(value)
            }
            _ => Ok(value.clone()),
        }
    }

    /// Deserialization plus the `required` probe. Kind overrides: binary
    /// data is opaque and passes untouched; booleans only fail required on
    /// Null (false is a value); object kinds recurse into their documents.
    pub fn clean(&self, value: SuoValue) -> Result<SuoValue> {
        match &self.kind {
            SuoFieldKind::Binary => Ok(value),
            SuoFieldKind::Boolean => {
                let value = match value {
                    SuoValue::Null => SuoValue::Null,
                    other => self.deserialize(other)?,
                };
                if value.is_null() && self.required {
                    return Err(SuoError::validation("Value required for this field."));
                }
                Ok(value)
            }
            SuoFieldKind::Object { .. } | SuoFieldKind::Nested { .. } => {
                let value = self.base_clean(value)?;
                object::clean_elements(&value)?;
                Ok(value)
            }
            _ => self.base_clean(value),
        }
    }

    fn base_clean(&self, value: SuoValue) -> Result<SuoValue> {
        let value = match value {
            SuoValue::Null => SuoValue::Null,
            other => self.deserialize(other)?,
        };
        if self.required && value.is_empty_like() {
            return Err(SuoError::validation("Value required for this field."));
        }
        Ok(value)
    }

    /// Merges another object field's schema into this one's. Both sides
    /// must be object-like; anything else is a no-op. With `update_only`,
    /// only names that already exist are updated and none are introduced.
    pub fn update(&mut self, other: &SuoField, update_only: bool) {
        object::update_field(self, other, update_only);
    }
}

impl SuoToValue for SuoField {
    /// The `{"type": <name>, ...params}` rendering. Object kinds merge their
    /// sub-schema's rendering in; custom kinds render as their builtin.
    fn to_value(&self) -> Result<SuoValue> {
        match &self.kind {
            SuoFieldKind::Custom {
                builtin: SuoCustomType::Field(inner),
            } => inner.to_value(),
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type } => {
                let rendered = doc_type.mapping().to_value()?;
                let params = self.data.params_to_value()?;
                if let (SuoValue::Map(out), SuoValue::Map(extra)) = (&rendered, &params) {
                    let mut out = out.borrow_mut();
                    out.insert(
                        "type".to_string(),
                        SuoValue::Str(self.kind.name().to_string()),
                    );
                    for (name, value) in extra.borrow().iter() {
                        out.insert(name.clone(), value.clone());
                    }
                }
                Ok(rendered)
            }
            kind => {
                let type_name = match kind {
                    SuoFieldKind::Custom {
                        builtin: SuoCustomType::Name(name),
                    } => name.clone(),
                    other => other.name().to_string(),
                };
                let rendered = self.data.params_to_value()?;
                if let SuoValue::Map(handle) = &rendered {
                    handle
                        .borrow_mut()
                        .insert("type".to_string(), SuoValue::Str(type_name));
                }
                Ok(rendered)
            }
        }
    }
}

impl std::fmt::Display for SuoField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.kind.name())?;
        self.data.fmt_params(f)?;
        write!(f, ")")
    }
}

/// Coerces loose input into a field: a `{"type": ...}` mapping, a kind
/// name, or an existing field.
pub fn construct_field(input: impl Into<SuoParamInput>) -> Result<SuoField> {
    construct_field_with(input, SuoParamMap::new())
}

/// [`construct_field`] with explicit by-name parameters. Parameters are only
/// legal alongside a NAME input; mappings and ready-built fields carry their
/// own.
pub fn construct_field_with(
    input: impl Into<SuoParamInput>,
    params: SuoParamMap,
) -> Result<SuoField> {
    match input.into() {
        SuoParamInput::Node(node) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "construct_field() cannot accept parameters when passing in a constructed field",
                ));
            }
            node.into_field()
        }
        SuoParamInput::Value(SuoValue::Str(name)) => SuoField::new(&name, params),
        SuoParamInput::Value(ref value @ SuoValue::Map(_)) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "construct_field() cannot accept parameters when passing in a mapping",
                ));
            }
            // Wire keys are literal; no double-underscore rewriting.
            let mut bag = SuoParamMap::from_value(value)?;
            bag.set_expand_dots(false);
            field_from_bag(bag)
        }
        SuoParamInput::Map(entries) => {
            if !params.is_empty() {
                return Err(SuoError::illegal_argument(
                    "construct_field() cannot accept parameters when passing in a mapping",
                ));
            }
            let mut bag = SuoParamMap::new();
            for (name, entry) in entries {
                bag.insert(name, entry);
            }
            bag.set_expand_dots(false);
            field_from_bag(bag)
        }
        other => Err(SuoError::illegal_argument(format!(
            "cannot construct a field from {:?}",
            other
        ))),
    }
}

/// The mapping form: pop `type`, falling back to `"object"` when only
/// `properties` is given.
fn field_from_bag(mut bag: SuoParamMap) -> Result<SuoField> {
    let name = match bag.take_str("type")? {
        Some(name) => name,
        None if bag.contains("properties") => "object".to_string(),
        None => {
            return Err(SuoError::illegal_argument(
                "construct_field() needs to have a \"type\" key",
            ))
        }
    };
    SuoField::new(&name, bag)
}

fn field_shortcut(input: SuoParamInput) -> Result<SuoDslNode> {
    Ok(construct_field_with(input, SuoParamMap::new())?.into())
}

macro_rules! field_factory {
    ($factory:ident, $kind:expr) => {
        fn $factory(params: SuoParamMap) -> Result<SuoDslNode> {
            Ok(SuoField::build($kind, params)?.into())
        }
    };
}

field_factory!(text_node, SuoFieldKind::Text);
field_factory!(search_as_you_type_node, SuoFieldKind::SearchAsYouType);
field_factory!(keyword_node, SuoFieldKind::Keyword);
field_factory!(constant_keyword_node, SuoFieldKind::ConstantKeyword);
field_factory!(completion_node, SuoFieldKind::Completion);
field_factory!(boolean_node, SuoFieldKind::Boolean);
field_factory!(byte_node, SuoFieldKind::Byte);
field_factory!(short_node, SuoFieldKind::Short);
field_factory!(integer_node, SuoFieldKind::Integer);
field_factory!(long_node, SuoFieldKind::Long);
field_factory!(float_node, SuoFieldKind::Float);
field_factory!(half_float_node, SuoFieldKind::HalfFloat);
field_factory!(double_node, SuoFieldKind::Double);
field_factory!(rank_feature_node, SuoFieldKind::RankFeature);
field_factory!(rank_features_node, SuoFieldKind::RankFeatures);
field_factory!(sparse_vector_node, SuoFieldKind::SparseVector);
field_factory!(ip_node, SuoFieldKind::Ip);
field_factory!(binary_node, SuoFieldKind::Binary);
field_factory!(percolator_node, SuoFieldKind::Percolator);
field_factory!(integer_range_node, SuoFieldKind::IntegerRange);
field_factory!(float_range_node, SuoFieldKind::FloatRange);
field_factory!(long_range_node, SuoFieldKind::LongRange);
field_factory!(double_range_node, SuoFieldKind::DoubleRange);
field_factory!(date_range_node, SuoFieldKind::DateRange);
field_factory!(ip_range_node, SuoFieldKind::IpRange);
field_factory!(geo_point_node, SuoFieldKind::GeoPoint);
field_factory!(geo_shape_node, SuoFieldKind::GeoShape);
field_factory!(join_node, SuoFieldKind::Join);
field_factory!(token_count_node, SuoFieldKind::TokenCount);
field_factory!(murmur3_node, SuoFieldKind::Murmur3);

fn date_node(mut params: SuoParamMap) -> Result<SuoDslNode> {
    let default_timezone = match params.take_str("default_timezone")? {
        Some(raw) => Some(scalar::parse_fixed_offset(&raw)?),
        None => None,
    };
    Ok(SuoField::build(SuoFieldKind::Date { default_timezone }, params)?.into())
}

fn scaled_float_node(params: SuoParamMap) -> Result<SuoDslNode> {
    if !params.contains("scaling_factor") {
        return Err(SuoError::illegal_argument(
            "a scaled_float field requires a 'scaling_factor'",
        ));
    }
    Ok(SuoField::build(SuoFieldKind::ScaledFloat, params)?.into())
}

fn dense_vector_node(params: SuoParamMap) -> Result<SuoDslNode> {
    if !params.contains("dims") {
        return Err(SuoError::illegal_argument(
            "a dense_vector field requires 'dims'",
        ));
    }
    let mut field = SuoField::build(SuoFieldKind::DenseVector, params)?;
    // Vectors are lists of components no matter what the caller said.
    field.multi = true;
    Ok(field.into())
}

fn object_node(mut params: SuoParamMap) -> Result<SuoDslNode> {
    let doc_type = object::doc_type_from_bag(&mut params)?;
    Ok(SuoField::build(SuoFieldKind::Object { doc_type }, params)?.into())
}

fn nested_node(mut params: SuoParamMap) -> Result<SuoDslNode> {
    let doc_type = object::doc_type_from_bag(&mut params)?;
    Ok(SuoField::build(SuoFieldKind::Nested { doc_type }, params)?.into())
}

fn custom_node(mut params: SuoParamMap) -> Result<SuoDslNode> {
    let builtin = match params.take("builtin_type") {
        Some(SuoParamInput::Value(SuoValue::Str(name))) => SuoCustomType::Name(name),
        Some(SuoParamInput::Node(node)) => SuoCustomType::Field(Box::new(node.into_field()?)),
        Some(other) => {
            return Err(SuoError::illegal_argument(format!(
                "'builtin_type' must be a type name or a field, got {:?}",
                other
            )))
        }
        None => {
            return Err(SuoError::illegal_argument(
                "a custom field requires a 'builtin_type' (type name or field)",
            ))
        }
    };
    Ok(SuoField::build(SuoFieldKind::Custom { builtin }, params)?.into())
}

const FIELD_CLASSES: &[SuoClassDef] = &[
    SuoClassDef {
        name: "text",
        param_defs: TEXT_DEFS,
        factory: text_node,
    },
    SuoClassDef {
        name: "search_as_you_type",
        param_defs: SEARCH_AS_YOU_TYPE_DEFS,
        factory: search_as_you_type_node,
    },
    SuoClassDef {
        name: "keyword",
        param_defs: KEYWORD_DEFS,
        factory: keyword_node,
    },
    SuoClassDef {
        name: "constant_keyword",
        param_defs: KEYWORD_DEFS,
        factory: constant_keyword_node,
    },
    SuoClassDef {
        name: "completion",
        param_defs: COMPLETION_DEFS,
        factory: completion_node,
    },
    SuoClassDef {
        name: "boolean",
        param_defs: DEFAULT_DEFS,
        factory: boolean_node,
    },
    SuoClassDef {
        name: "byte",
        param_defs: DEFAULT_DEFS,
        factory: byte_node,
    },
    SuoClassDef {
        name: "short",
        param_defs: DEFAULT_DEFS,
        factory: short_node,
    },
    SuoClassDef {
        name: "integer",
        param_defs: DEFAULT_DEFS,
        factory: integer_node,
    },
    SuoClassDef {
        name: "long",
        param_defs: DEFAULT_DEFS,
        factory: long_node,
    },
    SuoClassDef {
        name: "float",
        param_defs: DEFAULT_DEFS,
        factory: float_node,
    },
    SuoClassDef {
        name: "half_float",
        param_defs: DEFAULT_DEFS,
        factory: half_float_node,
    },
    SuoClassDef {
        name: "double",
        param_defs: DEFAULT_DEFS,
        factory: double_node,
    },
    SuoClassDef {
        name: "rank_feature",
        param_defs: DEFAULT_DEFS,
        factory: rank_feature_node,
    },
    SuoClassDef {
        name: "rank_features",
        param_defs: DEFAULT_DEFS,
        factory: rank_features_node,
    },
    SuoClassDef {
        name: "scaled_float",
        param_defs: DEFAULT_DEFS,
        factory: scaled_float_node,
    },
    SuoClassDef {
        name: "dense_vector",
        param_defs: DEFAULT_DEFS,
        factory: dense_vector_node,
    },
    SuoClassDef {
        name: "sparse_vector",
        param_defs: DEFAULT_DEFS,
        factory: sparse_vector_node,
    },
    SuoClassDef {
        name: "date",
        param_defs: DEFAULT_DEFS,
        factory: date_node,
    },
    SuoClassDef {
        name: "ip",
        param_defs: DEFAULT_DEFS,
        factory: ip_node,
    },
    SuoClassDef {
        name: "binary",
        param_defs: DEFAULT_DEFS,
        factory: binary_node,
    },
    SuoClassDef {
        name: "percolator",
        param_defs: DEFAULT_DEFS,
        factory: percolator_node,
    },
    SuoClassDef {
        name: "integer_range",
        param_defs: DEFAULT_DEFS,
        factory: integer_range_node,
    },
    SuoClassDef {
        name: "float_range",
        param_defs: DEFAULT_DEFS,
        factory: float_range_node,
    },
    SuoClassDef {
        name: "long_range",
        param_defs: DEFAULT_DEFS,
        factory: long_range_node,
    },
    SuoClassDef {
        name: "double_range",
        param_defs: DEFAULT_DEFS,
        factory: double_range_node,
    },
    SuoClassDef {
        name: "date_range",
        param_defs: DEFAULT_DEFS,
        factory: date_range_node,
    },
    SuoClassDef {
        name: "ip_range",
        param_defs: DEFAULT_DEFS,
        factory: ip_range_node,
    },
    SuoClassDef {
        name: "object",
        param_defs: DEFAULT_DEFS,
        factory: object_node,
    },
    SuoClassDef {
        name: "nested",
        param_defs: DEFAULT_DEFS,
        factory: nested_node,
    },
    SuoClassDef {
        name: "geo_point",
        param_defs: DEFAULT_DEFS,
        factory: geo_point_node,
    },
    SuoClassDef {
        name: "geo_shape",
        param_defs: DEFAULT_DEFS,
        factory: geo_shape_node,
    },
    SuoClassDef {
        name: "join",
        param_defs: DEFAULT_DEFS,
        factory: join_node,
    },
    SuoClassDef {
        name: "token_count",
        param_defs: DEFAULT_DEFS,
        factory: token_count_node,
    },
    SuoClassDef {
        name: "murmur3",
        param_defs: DEFAULT_DEFS,
        factory: murmur3_node,
    },
    SuoClassDef {
        name: "custom",
        param_defs: DEFAULT_DEFS,
        factory: custom_node,
    },
];

pub(crate) fn register_defaults(registry: &mut SuoRegistry) {
    registry.register_family("field", field_shortcut);
    registry.register_classes("field", FIELD_CLASSES);
}
