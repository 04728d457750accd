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

//! # Suo Value Module
//!
//! This module provides the in-memory value tree that documents and DSL nodes
//! are built from. A [`SuoValue`] is a superset of JSON: the usual scalars and
//! containers, plus the typed values field deserialization produces (byte
//! strings, date/times, IP addresses, ranges, query nodes, and typed
//! sub-documents).
//!
//! ## Reference Semantics
//!
//! Containers are shared handles (`Rc<RefCell<...>>`). Cloning a
//! `SuoValue::Map` or `SuoValue::List` clones the handle, not the data, so two
//! values holding the same container observe each other's writes. This is the
//! aliasing contract the attribute views in [`crate::attr`] are built on. The
//! tree is single-threaded by design; there are no locks.
//!
//! ## Wire Boundary
//!
//! [`SuoValue::from_json`] and [`SuoValue::to_json`] convert between the tree
//! and `serde_json::Value`. Lowering to JSON renders the typed scalars into
//! their wire forms (ISO-8601 strings for dates, base64 for bytes, dotted
//! strings for addresses).

use std::cell::RefCell;
use std::net::IpAddr;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;

use crate::document::SuoDocument;
use crate::dsl::SuoToValue;
use crate::errors::Result;
use crate::fields::SuoRange;
use crate::query::SuoQuery;

/// Shared handle to an ordered map of values.
pub type SuoMapHandle = Rc<RefCell<IndexMap<String, SuoValue>>>;

/// Shared handle to a list of values.
pub type SuoListHandle = Rc<RefCell<Vec<SuoValue>>>;

/// Creates a fresh empty map handle.
pub fn new_map_handle() -> SuoMapHandle {
    Rc::new(RefCell::new(IndexMap::new()))
}

/// Creates a fresh empty list handle.
pub fn new_list_handle() -> SuoListHandle {
    Rc::new(RefCell::new(Vec::new()))
}

/// A date or time value.
///
/// The three forms deserialization can produce are kept apart: an
/// offset-aware datetime, a naive datetime (no offset known), and a bare
/// calendar date. Values only compare equal within the same form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuoDate {
    /// Datetime with a fixed UTC offset.
    Aware(DateTime<FixedOffset>),
    /// Datetime without offset information.
    Naive(NaiveDateTime),
    /// Calendar date without a time of day.
    Day(NaiveDate),
}

impl SuoDate {
    /// Parses a datetime or date from its common textual forms.
    ///
    /// Tries RFC 3339 first, then offset-less datetime layouts, then a bare
    /// `YYYY-MM-DD` date. Returns `None` when nothing matches.
    pub fn parse(raw: &str) -> Option<SuoDate> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(SuoDate::Aware(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Some(SuoDate::Aware(dt));
        }
        for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
                return Some(SuoDate::Naive(dt));
            }
        }
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(SuoDate::Day(day));
        }
        None
    }

    /// Builds a naive UTC datetime from epoch milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Option<SuoDate> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| SuoDate::Naive(dt.naive_utc()))
    }

    /// Applies a default offset to naive datetimes; aware datetimes and bare
    /// dates are returned unchanged.
    pub fn with_default_offset(self, offset: FixedOffset) -> SuoDate {
        match self {
            SuoDate::Naive(dt) => match offset.from_local_datetime(&dt).single() {
                Some(aware) => SuoDate::Aware(aware),
                None => SuoDate::Naive(dt),
            },
            other => other,
        }
    }

    /// Renders the ISO-8601 wire form.
    pub fn to_iso_string(&self) -> String {
        match self {
            SuoDate::Aware(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            SuoDate::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            SuoDate::Day(day) => day.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Timeline ordering within the same form; mixed forms are incomparable.
impl PartialOrd for SuoDate {
    fn partial_cmp(&self, other: &SuoDate) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (SuoDate::Aware(a), SuoDate::Aware(b)) => Some(a.cmp(b)),
            (SuoDate::Naive(a), SuoDate::Naive(b)) => Some(a.cmp(b)),
            (SuoDate::Day(a), SuoDate::Day(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl std::fmt::Display for SuoDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}

/// The in-memory value tree.
#[derive(Debug, Clone)]
pub enum SuoValue {
    /// Absent / null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// Text scalar.
    Str(String),
    /// Raw byte string (binary field payloads).
    Bytes(Vec<u8>),
    /// Date or datetime value.
    Date(SuoDate),
    /// IP address value.
    Ip(IpAddr),
    /// Shared list.
    List(SuoListHandle),
    /// Shared ordered map.
    Map(SuoMapHandle),
    /// Range value object (`gt`/`gte`/`lt`/`lte` bounds).
    Range(SuoRange),
    /// Deserialized query node (percolator payloads).
    Query(Rc<SuoQuery>),
    /// Typed sub-document sharing its body handle.
    Doc(SuoDocument),
}

impl SuoValue {
    /// Builds a tree from wire JSON. Integers that fit `i64` stay integral.
    pub fn from_json(value: serde_json::Value) -> SuoValue {
        match value {
            serde_json::Value::Null => SuoValue::Null,
            serde_json::Value::Bool(b) => SuoValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SuoValue::Int(i)
                } else {
                    SuoValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => SuoValue::Str(s),
            serde_json::Value::Array(items) => {
                let list: Vec<SuoValue> = items.into_iter().map(SuoValue::from_json).collect();
                SuoValue::List(Rc::new(RefCell::new(list)))
            }
            serde_json::Value::Object(entries) => {
                let map: IndexMap<String, SuoValue> = entries
                    .into_iter()
                    .map(|(k, v)| (k, SuoValue::from_json(v)))
                    .collect();
                SuoValue::Map(Rc::new(RefCell::new(map)))
            }
        }
    }

    /// Parses a JSON string into a tree.
    pub fn from_json_str(raw: &str) -> Result<SuoValue> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(SuoValue::from_json(value))
    }

    /// Lowers the tree to wire JSON.
    ///
    /// Typed scalars take their wire forms: dates become ISO-8601 strings,
    /// bytes become base64 text, addresses become dotted strings. Nodes and
    /// documents render through their own serialization.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            SuoValue::Null => serde_json::Value::Null,
            SuoValue::Bool(b) => serde_json::Value::Bool(*b),
            SuoValue::Int(i) => serde_json::Value::Number((*i).into()),
            SuoValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SuoValue::Str(s) => serde_json::Value::String(s.clone()),
            SuoValue::Bytes(b) => serde_json::Value::String(BASE64.encode(b)),
            SuoValue::Date(d) => serde_json::Value::String(d.to_iso_string()),
            SuoValue::Ip(ip) => serde_json::Value::String(ip.to_string()),
            SuoValue::List(items) => {
                let mut out = Vec::with_capacity(items.borrow().len());
                for item in items.borrow().iter() {
                    out.push(item.to_json()?);
                }
                serde_json::Value::Array(out)
            }
            SuoValue::Map(entries) => {
                let mut out = serde_json::Map::new();
                for (key, value) in entries.borrow().iter() {
                    out.insert(key.clone(), value.to_json()?);
                }
                serde_json::Value::Object(out)
            }
            SuoValue::Range(range) => range.to_value()?.to_json()?,
            SuoValue::Query(query) => query.to_value()?.to_json()?,
            SuoValue::Doc(doc) => doc.to_dict(true)?.to_json()?,
        })
    }

    /// Builds a list value from owned elements.
    pub fn list(items: Vec<SuoValue>) -> SuoValue {
        SuoValue::List(Rc::new(RefCell::new(items)))
    }

    /// Builds an empty map value.
    pub fn map() -> SuoValue {
        SuoValue::Map(new_map_handle())
    }

    /// Builds a map value from owned entries.
    pub fn map_from(entries: Vec<(String, SuoValue)>) -> SuoValue {
        SuoValue::Map(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    /// Builds a byte-string value.
    pub fn bytes(data: impl Into<Vec<u8>>) -> SuoValue {
        SuoValue::Bytes(data.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SuoValue::Null)
    }

    /// True for null and for empty containers. Scalar "zero" values
    /// (`false`, `0`, `0.0`, `""`) are NOT empty-like; they survive both
    /// required checks and skip-empty rendering.
    pub fn is_empty_like(&self) -> bool {
        match self {
            SuoValue::Null => true,
            SuoValue::List(items) => items.borrow().is_empty(),
            SuoValue::Map(entries) => entries.borrow().is_empty(),
            _ => false,
        }
    }

    /// Truth value of the tree node, container emptiness included.
    pub fn truthy(&self) -> bool {
        match self {
            SuoValue::Null => false,
            SuoValue::Bool(b) => *b,
            SuoValue::Int(i) => *i != 0,
            SuoValue::Float(f) => *f != 0.0,
            SuoValue::Str(s) => !s.is_empty(),
            SuoValue::Bytes(b) => !b.is_empty(),
            SuoValue::List(items) => !items.borrow().is_empty(),
            SuoValue::Map(entries) => !entries.borrow().is_empty(),
            SuoValue::Date(_)
            | SuoValue::Ip(_)
            | SuoValue::Range(_)
            | SuoValue::Query(_)
            | SuoValue::Doc(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SuoValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SuoValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SuoValue::Float(f) => Some(*f),
            SuoValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SuoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The shared handle when this is a map.
    pub fn as_map_handle(&self) -> Option<&SuoMapHandle> {
        match self {
            SuoValue::Map(handle) => Some(handle),
            _ => None,
        }
    }

    /// The shared handle when this is a list.
    pub fn as_list_handle(&self) -> Option<&SuoListHandle> {
        match self {
            SuoValue::List(handle) => Some(handle),
            _ => None,
        }
    }

    /// Ordering for range-bound checks: numbers compare across Int/Float,
    /// strings lexicographically, dates on the timeline. Everything else is
    /// incomparable.
    pub fn partial_cmp_value(&self, other: &SuoValue) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (SuoValue::Int(a), SuoValue::Int(b)) => Some(a.cmp(b)),
            (SuoValue::Int(a), SuoValue::Float(b)) => (*a as f64).partial_cmp(b),
            (SuoValue::Float(a), SuoValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (SuoValue::Float(a), SuoValue::Float(b)) => a.partial_cmp(b),
            (SuoValue::Str(a), SuoValue::Str(b)) => Some(a.cmp(b)),
            (SuoValue::Date(a), SuoValue::Date(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Default for SuoValue {
    fn default() -> Self {
        SuoValue::Null
    }
}

impl std::fmt::Display for SuoValue {
    /// Compact JSON-flavored rendering for logs and node listings.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuoValue::Null => write!(f, "null"),
            SuoValue::Bool(b) => write!(f, "{}", b),
            SuoValue::Int(i) => write!(f, "{}", i),
            SuoValue::Float(x) => write!(f, "{}", x),
            SuoValue::Str(s) => write!(f, "{:?}", s),
            SuoValue::Bytes(b) => write!(f, "b64'{}'", BASE64.encode(b)),
            SuoValue::Date(d) => write!(f, "'{}'", d),
            SuoValue::Ip(ip) => write!(f, "'{}'", ip),
            SuoValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt(f)?;
                }
                write!(f, "]")
            }
            SuoValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            SuoValue::Range(range) => write!(f, "{}", range),
            SuoValue::Query(query) => write!(f, "{}", query),
            SuoValue::Doc(doc) => write!(f, "{}", doc),
        }
    }
}

impl PartialEq for SuoValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SuoValue::Null, SuoValue::Null) => true,
            (SuoValue::Bool(a), SuoValue::Bool(b)) => a == b,
            (SuoValue::Int(a), SuoValue::Int(b)) => a == b,
            (SuoValue::Float(a), SuoValue::Float(b)) => a == b,
            (SuoValue::Int(a), SuoValue::Float(b)) | (SuoValue::Float(b), SuoValue::Int(a)) => {
                (*a as f64) == *b
            }
            (SuoValue::Str(a), SuoValue::Str(b)) => a == b,
            (SuoValue::Bytes(a), SuoValue::Bytes(b)) => a == b,
            (SuoValue::Date(a), SuoValue::Date(b)) => a == b,
            (SuoValue::Ip(a), SuoValue::Ip(b)) => a == b,
            (SuoValue::List(a), SuoValue::List(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (SuoValue::Map(a), SuoValue::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (SuoValue::Range(a), SuoValue::Range(b)) => a == b,
            // Ranges are mappings of ops to bounds and compare as such.
            (SuoValue::Range(a), SuoValue::Map(b)) | (SuoValue::Map(b), SuoValue::Range(a)) => {
                *a.handle().borrow() == *b.borrow()
            }
            (SuoValue::Query(a), SuoValue::Query(b)) => a == b,
            (SuoValue::Doc(a), SuoValue::Doc(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for SuoValue {
    fn from(value: bool) -> Self {
        SuoValue::Bool(value)
    }
}

impl From<i64> for SuoValue {
    fn from(value: i64) -> Self {
        SuoValue::Int(value)
    }
}

impl From<i32> for SuoValue {
    fn from(value: i32) -> Self {
        SuoValue::Int(value as i64)
    }
}

impl From<f64> for SuoValue {
    fn from(value: f64) -> Self {
        SuoValue::Float(value)
    }
}

impl From<&str> for SuoValue {
    fn from(value: &str) -> Self {
        SuoValue::Str(value.to_string())
    }
}

impl From<String> for SuoValue {
    fn from(value: String) -> Self {
        SuoValue::Str(value)
    }
}

impl From<SuoDate> for SuoValue {
    fn from(value: SuoDate) -> Self {
        SuoValue::Date(value)
    }
}

impl From<IpAddr> for SuoValue {
    fn from(value: IpAddr) -> Self {
        SuoValue::Ip(value)
    }
}

/// Recursively lowers a tree to plain scalars, lists, and maps.
///
/// Nodes that know how to render themselves (queries, documents, ranges) are
/// replaced by their rendered maps; containers are rebuilt with fresh handles
/// so the result is detached from the input. Typed scalars (dates, bytes,
/// addresses) stay as they are.
pub fn recursive_to_value(value: &SuoValue) -> Result<SuoValue> {
    Ok(match value {
        SuoValue::List(items) => {
            let mut out = Vec::with_capacity(items.borrow().len());
            for item in items.borrow().iter() {
                out.push(recursive_to_value(item)?);
            }
            SuoValue::list(out)
        }
        SuoValue::Map(entries) => {
            let mut out: IndexMap<String, SuoValue> = IndexMap::new();
            for (key, item) in entries.borrow().iter() {
                out.insert(key.clone(), recursive_to_value(item)?);
            }
            SuoValue::Map(Rc::new(RefCell::new(out)))
        }
        SuoValue::Range(range) => range.to_value()?,
        SuoValue::Query(query) => query.to_value()?,
        SuoValue::Doc(doc) => doc.to_dict(true)?,
        other => other.clone(),
    })
}
