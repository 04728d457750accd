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

//! # Suo Scalar Coercion
//!
//! Value coercion for the scalar field kinds. Every failure here is a
//! validation error, so document cleaning can collect coercion problems
//! field by field instead of aborting on the first bad value.

use std::net::IpAddr;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::FixedOffset;

use crate::errors::{Result, SuoError};
use crate::query::construct_query;
use crate::value::{SuoDate, SuoValue};

/// The string `"false"` reads as false; anything else follows truthiness.
pub(crate) fn deserialize_boolean(value: SuoValue) -> Result<SuoValue> {
    if let SuoValue::Str(s) = &value {
        if s == "false" {
            return Ok(SuoValue::Bool(false));
        }
    }
    Ok(SuoValue::Bool(value.truthy()))
}

/// Whole numbers pass, floats truncate toward zero, strings parse after
/// trimming, booleans lower to 0/1.
pub(crate) fn deserialize_integer(value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Int(n) => Ok(SuoValue::Int(n)),
        SuoValue::Float(f) => Ok(SuoValue::Int(f as i64)),
        SuoValue::Bool(b) => Ok(SuoValue::Int(i64::from(b))),
        SuoValue::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(SuoValue::Int)
            .map_err(|_| parse_error("integer", &SuoValue::Str(s.clone()))),
        other => Err(parse_error("integer", &other)),
    }
}

pub(crate) fn deserialize_float(value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Float(f) => Ok(SuoValue::Float(f)),
        SuoValue::Int(n) => Ok(SuoValue::Float(n as f64)),
        SuoValue::Bool(b) => Ok(SuoValue::Float(if b { 1.0 } else { 0.0 })),
        SuoValue::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(SuoValue::Float)
            .map_err(|_| parse_error("float", &SuoValue::Str(s.clone()))),
        other => Err(parse_error("float", &other)),
    }
}

/// Strings parse into datetimes, integers read as epoch milliseconds (kept
/// naive), typed dates pass. The default timezone is stamped onto naive
/// datetimes only; bare dates and epoch values stay as they are.
pub(crate) fn deserialize_date(
    value: SuoValue,
    default_timezone: Option<FixedOffset>,
) -> Result<SuoValue> {
    let date = match value {
        SuoValue::Str(s) => match SuoDate::parse(&s) {
            Some(date) => date,
            None => return Err(parse_error("date", &SuoValue::Str(s))),
        },
        SuoValue::Date(date) => date,
        SuoValue::Int(millis) => {
            return match SuoDate::from_epoch_millis(millis) {
                Some(date) => Ok(SuoValue::Date(date)),
                None => Err(parse_error("date", &SuoValue::Int(millis))),
            }
        }
        other => return Err(parse_error("date", &other)),
    };
    Ok(SuoValue::Date(match default_timezone {
        Some(offset) => date.with_default_offset(offset),
        None => date,
    }))
}

pub(crate) fn deserialize_ip(value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Ip(addr) => Ok(SuoValue::Ip(addr)),
        SuoValue::Str(s) => s
            .parse::<IpAddr>()
            .map(SuoValue::Ip)
            .map_err(|_| parse_error("ip", &SuoValue::Str(s.clone()))),
        other => Err(parse_error("ip", &other)),
    }
}

pub(crate) fn deserialize_binary(value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Bytes(bytes) => Ok(SuoValue::Bytes(bytes)),
        SuoValue::Str(s) => BASE64
            .decode(s.as_bytes())
            .map(SuoValue::Bytes)
            .map_err(|_| parse_error("base64 data", &SuoValue::Str(s.clone()))),
        other => Err(parse_error("base64 data", &other)),
    }
}

/// Percolator values become query nodes: names, `{name: params}` mappings,
/// and already-built queries are all accepted.
pub(crate) fn deserialize_percolator(value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Query(query) => Ok(SuoValue::Query(query)),
        other => Ok(SuoValue::Query(Rc::new(construct_query(other)?))),
    }
}

pub(crate) fn serialize_ip(value: &SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Ip(addr) => Ok(SuoValue::Str(addr.to_string())),
        SuoValue::Str(s) => Ok(SuoValue::Str(s.clone())),
        other => Ok(SuoValue::Str(other.to_string())),
    }
}

/// Byte strings render as base64; empty data renders as null. Strings are
/// taken to be base64 already and pass through.
pub(crate) fn serialize_binary(value: &SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Bytes(bytes) if bytes.is_empty() => Ok(SuoValue::Null),
        SuoValue::Str(s) if s.is_empty() => Ok(SuoValue::Null),
        SuoValue::Bytes(bytes) => Ok(SuoValue::Str(BASE64.encode(bytes.as_slice()))),
        SuoValue::Str(s) => Ok(SuoValue::Str(s.clone())),
        other => Err(SuoError::illegal_argument(format!(
            "cannot serialize {} as binary data",
            other
        ))),
    }
}

pub(crate) fn serialize_percolator(value: &SuoValue) -> Result<SuoValue> {
    use crate::dsl::SuoToValue;
    match value {
        SuoValue::Query(query) => query.to_value(),
        SuoValue::Map(handle) => Ok(SuoValue::Map(handle.clone())),
        other => Err(SuoError::illegal_argument(format!(
            "cannot serialize {} as a query",
            other
        ))),
    }
}

fn parse_error(what: &str, value: &SuoValue) -> SuoError {
    SuoError::validation(format!("Could not parse {} from the value ({})", what, value))
}

/// Parses a fixed UTC offset: `Z`, `+HH:MM`, `-HH:MM`, or `+HHMM`.
pub(crate) fn parse_fixed_offset(raw: &str) -> Result<FixedOffset> {
    let bad = || {
        SuoError::illegal_argument(format!(
            "invalid timezone offset '{}', expected Z, +HH:MM or -HH:MM",
            raw
        ))
    };
    if raw == "Z" || raw == "z" {
        return FixedOffset::east_opt(0).ok_or_else(bad);
    }
    let (sign, rest) = match raw.chars().next() {
        Some('+') => (1, &raw[1..]),
        Some('-') => (-1, &raw[1..]),
        _ => return Err(bad()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| bad())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| bad())?;
    if hours > 23 || minutes > 59 {
        return Err(bad());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(bad)
}
