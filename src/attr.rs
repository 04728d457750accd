//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Suo.
//! The Suo project belongs to the Dunimd project team.
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

//! # Suo Attribute Views
//!
//! Ergonomic views over the shared value tree. A [`SuoAttrMap`] reads and
//! writes an underlying map handle; a [`SuoAttrList`] does the same for a
//! list, optionally wrapping mapping elements through an element wrapper
//! (composite fields use this to hand back typed documents).
//!
//! Views never copy: constructing one from a handle and cloning it later
//! always aliases the same container, so writes made through any view (or
//! through the raw handle) are visible everywhere. Wrapping on read is cheap
//! and stateless; nothing is cached.

use std::ops::Range;
use std::rc::Rc;

use crate::errors::{Result, SuoError};
use crate::value::{new_list_handle, new_map_handle, SuoListHandle, SuoMapHandle, SuoValue};

/// Element wrapper applied by [`SuoAttrList`] when reading mapping elements.
pub type SuoObjWrapper = Rc<dyn Fn(&SuoMapHandle) -> SuoValue>;

/// View over a shared ordered map.
#[derive(Clone)]
pub struct SuoAttrMap {
    inner: SuoMapHandle,
}

impl SuoAttrMap {
    /// Creates a view over a fresh empty map.
    pub fn new() -> SuoAttrMap {
        SuoAttrMap {
            inner: new_map_handle(),
        }
    }

    /// Creates a view over an existing handle. No data is copied; the view
    /// aliases the container.
    pub fn from_handle(handle: SuoMapHandle) -> SuoAttrMap {
        SuoAttrMap { inner: handle }
    }

    /// Creates a view over the map inside `value`.
    pub fn from_value(value: &SuoValue) -> Result<SuoAttrMap> {
        match value {
            SuoValue::Map(handle) => Ok(SuoAttrMap::from_handle(handle.clone())),
            other => Err(SuoError::illegal_argument(format!(
                "expected a mapping, got {:?}",
                other
            ))),
        }
    }

    /// Creates a detached view from wire JSON (must be a JSON object).
    pub fn from_json(value: serde_json::Value) -> Result<SuoAttrMap> {
        SuoAttrMap::from_value(&SuoValue::from_json(value))
    }

    /// The shared handle behind this view.
    pub fn handle(&self) -> &SuoMapHandle {
        &self.inner
    }

    /// Attribute access: the value under `name`, or a missing-attribute
    /// error. Container values come back as shared handles.
    pub fn attr(&self, name: &str) -> Result<SuoValue> {
        self.inner
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| SuoError::missing_attribute("SuoAttrMap", name))
    }

    /// Keyed access with a default. The default only suppresses the missing
    /// key when it is non-null; a null default re-raises, matching the
    /// fail-fast attribute contract.
    pub fn get(&self, name: &str, default: SuoValue) -> Result<SuoValue> {
        if let Some(value) = self.inner.borrow().get(name) {
            return Ok(value.clone());
        }
        if default.is_null() {
            Err(SuoError::missing_attribute("SuoAttrMap", name))
        } else {
            Ok(default)
        }
    }

    /// Writes through to the underlying map, inserting or overwriting.
    pub fn set(&self, name: impl Into<String>, value: impl Into<SuoValue>) {
        self.inner.borrow_mut().insert(name.into(), value.into());
    }

    /// Removes and returns the value under `name`; missing keys error.
    pub fn remove(&self, name: &str) -> Result<SuoValue> {
        self.inner
            .borrow_mut()
            .shift_remove(name)
            .ok_or_else(|| SuoError::missing_attribute("SuoAttrMap", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Snapshot of the entries in insertion order. Container values still
    /// alias the shared data.
    pub fn entries(&self) -> Vec<(String, SuoValue)> {
        self.inner
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Dotted-path lookup descending through maps and numeric list indexes,
    /// e.g. `"address.city"` or `"tags.0"`.
    pub fn path(&self, dotted: &str) -> Result<SuoValue> {
        let mut current = SuoValue::Map(self.inner.clone());
        for segment in dotted.split('.') {
            current = match &current {
                SuoValue::Map(handle) => handle
                    .borrow()
                    .get(segment)
                    .cloned()
                    .ok_or_else(|| SuoError::missing_attribute("SuoAttrMap", dotted))?,
                SuoValue::List(handle) => {
                    let index: usize = segment.parse().map_err(|_| {
                        SuoError::missing_attribute("SuoAttrMap", dotted)
                    })?;
                    handle
                        .borrow()
                        .get(index)
                        .cloned()
                        .ok_or_else(|| SuoError::missing_attribute("SuoAttrMap", dotted))?
                }
                _ => return Err(SuoError::missing_attribute("SuoAttrMap", dotted)),
            };
        }
        Ok(current)
    }

    /// The wrapped container itself, no copy. Callers clone the data
    /// explicitly when isolation is required.
    pub fn to_value(&self) -> SuoValue {
        SuoValue::Map(self.inner.clone())
    }

    /// Wire JSON rendering of the wrapped map.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        self.to_value().to_json()
    }

    /// Recursive in-place merge of `other` into this map. Map values present
    /// on both sides merge recursively; on a scalar conflict the new value
    /// wins, unless `raise_on_conflict` is set and the values differ.
    pub fn merge_from(&self, other: &SuoAttrMap, raise_on_conflict: bool) -> Result<()> {
        merge(&self.to_value(), &other.to_value(), raise_on_conflict)
    }
}

impl Default for SuoAttrMap {
    fn default() -> Self {
        SuoAttrMap::new()
    }
}

impl std::fmt::Debug for SuoAttrMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_map().entries(inner.iter()).finish()
    }
}

impl PartialEq for SuoAttrMap {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl PartialEq<SuoValue> for SuoAttrMap {
    fn eq(&self, other: &SuoValue) -> bool {
        self.to_value() == *other
    }
}

/// View over a shared list, with an optional element wrapper.
#[derive(Clone)]
pub struct SuoAttrList {
    inner: SuoListHandle,
    wrapper: Option<SuoObjWrapper>,
}

impl SuoAttrList {
    /// Creates a view over a fresh empty list.
    pub fn new() -> SuoAttrList {
        SuoAttrList {
            inner: new_list_handle(),
            wrapper: None,
        }
    }

    /// Creates a view over an existing handle.
    pub fn from_handle(handle: SuoListHandle) -> SuoAttrList {
        SuoAttrList {
            inner: handle,
            wrapper: None,
        }
    }

    /// Creates a view whose mapping elements are wrapped on read.
    pub fn with_wrapper(handle: SuoListHandle, wrapper: SuoObjWrapper) -> SuoAttrList {
        SuoAttrList {
            inner: handle,
            wrapper: Some(wrapper),
        }
    }

    /// Creates a view over the list inside `value`.
    pub fn from_value(value: &SuoValue) -> Result<SuoAttrList> {
        match value {
            SuoValue::List(handle) => Ok(SuoAttrList::from_handle(handle.clone())),
            other => Err(SuoError::illegal_argument(format!(
                "expected a list, got {:?}",
                other
            ))),
        }
    }

    /// The shared handle behind this view.
    pub fn handle(&self) -> &SuoListHandle {
        &self.inner
    }

    /// Applies the element wrapper to a single value: mapping elements go
    /// through the wrapper, everything else passes through unchanged.
    pub fn wrap(&self, value: SuoValue) -> SuoValue {
        match (&self.wrapper, &value) {
            (Some(wrapper), SuoValue::Map(handle)) => wrapper(handle),
            _ => value,
        }
    }

    /// The element at `index`, wrapped.
    pub fn get(&self, index: usize) -> Option<SuoValue> {
        let value = self.inner.borrow().get(index).cloned()?;
        Some(self.wrap(value))
    }

    /// Overwrites the element at `index`.
    pub fn set(&self, index: usize, value: impl Into<SuoValue>) -> Result<()> {
        let mut items = self.inner.borrow_mut();
        if index >= items.len() {
            return Err(SuoError::illegal_argument(format!(
                "list index {} out of range (len {})",
                index,
                items.len()
            )));
        }
        items[index] = value.into();
        Ok(())
    }

    /// Appends through to the underlying list.
    pub fn push(&self, value: impl Into<SuoValue>) {
        self.inner.borrow_mut().push(value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Snapshot of the elements, wrapped lazily on the way out.
    pub fn items(&self) -> Vec<SuoValue> {
        self.inner
            .borrow()
            .iter()
            .cloned()
            .map(|value| self.wrap(value))
            .collect()
    }

    /// A new detached view over a copy of the sub-range; the element wrapper
    /// carries over (list slicing copies, like it does for plain lists).
    pub fn slice(&self, range: Range<usize>) -> SuoAttrList {
        let items = self.inner.borrow();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        let copied: Vec<SuoValue> = items[start..end].to_vec();
        drop(items);
        SuoAttrList {
            inner: Rc::new(std::cell::RefCell::new(copied)),
            wrapper: self.wrapper.clone(),
        }
    }

    /// The wrapped container itself, no copy.
    pub fn to_value(&self) -> SuoValue {
        SuoValue::List(self.inner.clone())
    }
}

impl Default for SuoAttrList {
    fn default() -> Self {
        SuoAttrList::new()
    }
}

impl std::fmt::Debug for SuoAttrList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_list().entries(inner.iter()).finish()
    }
}

impl PartialEq for SuoAttrList {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || *self.inner.borrow() == *other.inner.borrow()
    }
}

impl PartialEq<SuoValue> for SuoAttrList {
    fn eq(&self, other: &SuoValue) -> bool {
        self.to_value() == *other
    }
}

impl PartialEq<Vec<SuoValue>> for SuoAttrList {
    fn eq(&self, other: &Vec<SuoValue>) -> bool {
        *self.inner.borrow() == *other
    }
}

/// Recursive in-place mapping merge.
///
/// Both arguments must be map values. Keys present on both sides with map
/// values on both sides merge recursively; with `raise_on_conflict`, keys
/// whose values differ and are not both maps produce a merge error naming
/// the key; otherwise the new value wins. Keys only in `new_data` are
/// inserted.
pub fn merge(data: &SuoValue, new_data: &SuoValue, raise_on_conflict: bool) -> Result<()> {
    let (target, source) = match (data, new_data) {
        (SuoValue::Map(target), SuoValue::Map(source)) => (target, source),
        _ => {
            return Err(SuoError::illegal_argument(format!(
                "unable to merge {:?} with {:?}",
                data, new_data
            )))
        }
    };

    // Snapshot first: the two sides may alias the same container.
    let entries: Vec<(String, SuoValue)> = source
        .borrow()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for (key, new_value) in entries {
        let existing = target.borrow().get(&key).cloned();
        match (existing, &new_value) {
            (Some(SuoValue::Map(old)), SuoValue::Map(_)) => {
                merge(&SuoValue::Map(old), &new_value, raise_on_conflict)?;
            }
            (Some(old), _) if raise_on_conflict && old != new_value => {
                return Err(SuoError::merge(key));
            }
            _ => {
                target.borrow_mut().insert(key, new_value);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_visible_through_every_view() {
        let map = SuoAttrMap::new();
        let alias = SuoAttrMap::from_handle(map.handle().clone());
        map.set("x", 1i64);
        assert_eq!(alias.attr("x").unwrap(), SuoValue::Int(1));
        alias.set("y", "z");
        assert_eq!(map.attr("y").unwrap(), SuoValue::Str("z".into()));
    }

    #[test]
    fn get_only_suppresses_with_non_null_default() {
        let map = SuoAttrMap::new();
        assert!(map.get("missing", SuoValue::Null).is_err());
        assert_eq!(
            map.get("missing", SuoValue::Int(3)).unwrap(),
            SuoValue::Int(3)
        );
    }

    #[test]
    fn slice_copies_and_keeps_wrapper() {
        let list = SuoAttrList::new();
        for i in 0..4i64 {
            list.push(i);
        }
        let sliced = list.slice(1..3);
        assert_eq!(sliced.len(), 2);
        assert_eq!(sliced.get(0).unwrap(), SuoValue::Int(1));
        sliced.push(99i64);
        // The slice is detached from the source list.
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn list_appends_write_through() {
        let list = SuoAttrList::new();
        let alias = SuoAttrList::from_handle(list.handle().clone());
        list.push("a");
        assert_eq!(alias.len(), 1);
        assert_eq!(alias.get(0).unwrap(), SuoValue::Str("a".into()));
    }

    #[test]
    fn path_descends_maps_and_lists() {
        let map =
            SuoAttrMap::from_json(serde_json::json!({"a": {"b": [10, 20]}})).unwrap();
        assert_eq!(map.path("a.b.1").unwrap(), SuoValue::Int(20));
        assert!(map.path("a.c").is_err());
    }

    #[test]
    fn merge_recurses_and_detects_conflicts() {
        let base = SuoValue::from_json(serde_json::json!({"a": {"x": 1}, "keep": true}));
        let incoming = SuoValue::from_json(serde_json::json!({"a": {"y": 2}, "new": 3}));
        merge(&base, &incoming, true).unwrap();
        let view = SuoAttrMap::from_value(&base).unwrap();
        assert_eq!(view.path("a.x").unwrap(), SuoValue::Int(1));
        assert_eq!(view.path("a.y").unwrap(), SuoValue::Int(2));
        assert_eq!(view.attr("new").unwrap(), SuoValue::Int(3));

        let conflicting = SuoValue::from_json(serde_json::json!({"keep": false}));
        let err = merge(&base, &conflicting, true).unwrap_err();
        assert!(matches!(err, SuoError::Merge { ref key } if key == "keep"));

        // Equal values never conflict, and without the flag the new value wins.
        let same = SuoValue::from_json(serde_json::json!({"keep": true}));
        merge(&base, &same, true).unwrap();
        merge(&base, &conflicting, false).unwrap();
        assert_eq!(view.attr("keep").unwrap(), SuoValue::Bool(false));
    }
}
