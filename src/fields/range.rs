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

//! # Suo Range Values
//!
//! Interval values for the range field kinds. A [`SuoRange`] holds up to
//! four bounds keyed by the comparison ops `gt`, `gte`, `lt` and `lte`;
//! range fields coerce each bound through their core scalar field, so a
//! `date_range` carries typed dates the same way a plain `date` does.

use std::cmp::Ordering;

use crate::errors::{Result, SuoError};
use crate::fields::SuoField;
use crate::value::{new_map_handle, SuoMapHandle, SuoValue};

const RANGE_OPS: [&str; 4] = ["gt", "gte", "lt", "lte"];

/// An interval with optional bounds on either side. Clones share the
/// underlying bound map.
#[derive(Debug, Clone)]
pub struct SuoRange {
    bounds: SuoMapHandle,
}

impl SuoRange {
    /// Builds a range from bound pairs, rejecting unknown ops.
    pub fn new(bounds: Vec<(String, SuoValue)>) -> Result<SuoRange> {
        for (op, _) in &bounds {
            if !RANGE_OPS.contains(&op.as_str()) {
                return Err(SuoError::illegal_argument(format!(
                    "Range received an unknown op '{}'",
                    op
                )));
            }
        }
        let handle = new_map_handle();
        handle.borrow_mut().extend(bounds);
        Ok(SuoRange { bounds: handle })
    }

    /// Adopts an existing map value as a range, sharing its handle.
    pub fn from_value(value: &SuoValue) -> Result<SuoRange> {
        match value {
            SuoValue::Range(range) => Ok(range.clone()),
            SuoValue::Map(handle) => {
                for op in handle.borrow().keys() {
                    if !RANGE_OPS.contains(&op.as_str()) {
                        return Err(SuoError::illegal_argument(format!(
                            "Range received an unknown op '{}'",
                            op
                        )));
                    }
                }
                Ok(SuoRange {
                    bounds: handle.clone(),
                })
            }
            other => Err(SuoError::illegal_argument(format!(
                "Range accepts a mapping of ops to bounds, got {}",
                other
            ))),
        }
    }

    pub fn bound(&self, op: &str) -> Option<SuoValue> {
        self.bounds.borrow().get(op).cloned()
    }

    pub fn gt(&self) -> Option<SuoValue> {
        self.bound("gt")
    }

    pub fn gte(&self) -> Option<SuoValue> {
        self.bound("gte")
    }

    pub fn lt(&self) -> Option<SuoValue> {
        self.bound("lt")
    }

    pub fn lte(&self) -> Option<SuoValue> {
        self.bound("lte")
    }

    /// The lower bound and whether it is inclusive; `gt` wins over `gte`
    /// when both are present.
    pub fn lower(&self) -> Option<(SuoValue, bool)> {
        if let Some(bound) = self.bound("gt") {
            return Some((bound, false));
        }
        self.bound("gte").map(|bound| (bound, true))
    }

    /// The upper bound and whether it is inclusive; `lt` wins over `lte`.
    pub fn upper(&self) -> Option<(SuoValue, bool)> {
        if let Some(bound) = self.bound("lt") {
            return Some((bound, false));
        }
        self.bound("lte").map(|bound| (bound, true))
    }

    /// Membership test against both bounds. Null and values incomparable
    /// with a bound are outside the range.
    pub fn contains(&self, item: &SuoValue) -> bool {
        if item.is_null() {
            return false;
        }
        if let Some((bound, inclusive)) = self.lower() {
            match item.partial_cmp_value(&bound) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) if inclusive => {}
                _ => return false,
            }
        }
        if let Some((bound, inclusive)) = self.upper() {
            match item.partial_cmp_value(&bound) {
                Some(Ordering::Less) => {}
                Some(Ordering::Equal) if inclusive => {}
                _ => return false,
            }
        }
        true
    }

    /// Snapshot of the bounds in stored order.
    pub fn entries(&self) -> Vec<(String, SuoValue)> {
        self.bounds
            .borrow()
            .iter()
            .map(|(op, bound)| (op.clone(), bound.clone()))
            .collect()
    }

    pub(crate) fn handle(&self) -> &SuoMapHandle {
        &self.bounds
    }
}

impl crate::dsl::SuoToValue for SuoRange {
    fn to_value(&self) -> Result<SuoValue> {
        Ok(SuoValue::Map(self.bounds.clone()))
    }
}

impl PartialEq for SuoRange {
    fn eq(&self, other: &Self) -> bool {
        if std::rc::Rc::ptr_eq(&self.bounds, &other.bounds) {
            return true;
        }
        *self.bounds.borrow() == *other.bounds.borrow()
    }
}

impl PartialEq<SuoValue> for SuoRange {
    fn eq(&self, other: &SuoValue) -> bool {
        match other {
            SuoValue::Range(range) => self == range,
            SuoValue::Map(handle) => *self.bounds.borrow() == *handle.borrow(),
            _ => false,
        }
    }
}

impl std::fmt::Display for SuoRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Range(")?;
        for (i, (op, bound)) in self.bounds.borrow().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", op, bound)?;
        }
        write!(f, ")")
    }
}

/// Wire mapping to a typed range, coercing each bound through the core
/// scalar field. Ranges pass through as they are.
pub(crate) fn deserialize_range(core: &SuoField, value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Range(range) => Ok(SuoValue::Range(range)),
        SuoValue::Map(handle) => {
            let raw: Vec<(String, SuoValue)> = handle
                .borrow()
                .iter()
                .map(|(op, bound)| (op.clone(), bound.clone()))
                .collect();
            let mut bounds = Vec::with_capacity(raw.len());
            for (op, bound) in raw {
                bounds.push((op, core.deserialize(bound)?));
            }
            Ok(SuoValue::Range(SuoRange::new(bounds)?))
        }
        other => Err(SuoError::validation(format!(
            "Could not parse range from the value ({})",
            other
        ))),
    }
}

/// Typed range (or bare mapping) back to the wire form, serializing each
/// bound through the core scalar field.
pub(crate) fn serialize_range(core: &SuoField, value: &SuoValue) -> Result<SuoValue> {
    let entries = match value {
        SuoValue::Range(range) => range.entries(),
        SuoValue::Map(handle) => handle
            .borrow()
            .iter()
            .map(|(op, bound)| (op.clone(), bound.clone()))
            .collect(),
        other => {
            return Err(SuoError::illegal_argument(format!(
                "cannot serialize {} as a range",
                other
            )))
        }
    };
    let mut out = Vec::with_capacity(entries.len());
    for (op, bound) in entries {
        out.push((op, core.serialize(&bound)?));
    }
    Ok(SuoValue::map_from(out))
}
