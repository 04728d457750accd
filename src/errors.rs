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

//! # Suo Error Module
//!
//! This module defines the error types and utilities used throughout the Suo
//! mapping runtime for consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! Suo uses a structured error approach with the following principles:
//!
//! - **Explicit Error Types**: Each error variant represents a specific category
//!   of failure, making it easier to handle errors appropriately
//! - **Context-Rich**: Errors include relevant context (family names, field
//!   names, offending values) to aid debugging
//! - **Two Validation Shapes**: A single field failure carries one message; a
//!   document-level failure carries a field-name to messages map, so callers
//!   can tell the two apart without string matching
//! - **Serde Support**: Errors can be serialized/deserialized for logging and
//!   persistence
//!
//! ## Error Categories
//!
//! - **UnknownDslType / UnknownDslClass**: Registry lookups that name a family
//!   or concrete type that was never registered
//! - **Validation / Invalid**: Field-level and document-level validation
//!   failures
//! - **MissingAttribute**: Attribute access on a view or document that has no
//!   such key and no schema fallback
//! - **IllegalArgument**: Construction misuse (conflicting inputs, malformed
//!   shortcut arguments)
//! - **Schema**: Mapping declaration problems
//! - **Merge**: Conflicting values during recursive mapping merge
//! - **Io / Serde**: Filesystem and (de)serialization errors
//!
//! ## Usage
//!
//! ```rust
//! use suox::errors::{Result, SuoError};
//!
//! fn check(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(SuoError::validation("Value required for this field."));
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Suo Core.
///
/// This is a type alias for `std::result::Result<T, SuoError>` that provides
/// a more concise way to write function signatures that return Suo errors.
pub type Result<T> = std::result::Result<T, SuoError>;

/// Canonical error enumeration for Suo Core.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum SuoError {
    /// A DSL family name that was never registered.
    #[error("DSL type '{0}' does not exist")]
    UnknownDslType(String),

    /// A concrete DSL name that was never registered in its family.
    #[error("DSL class '{name}' does not exist in {family}")]
    UnknownDslClass { family: String, name: String },

    /// Single-field validation failure.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Document-level validation failure, field name to messages.
    #[error("validation failed for {} document field(s)", errors.len())]
    Invalid {
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Attribute access that found no key and no schema fallback.
    #[error("'{object}' object has no attribute '{name}'")]
    MissingAttribute { object: String, name: String },

    /// Construction misuse such as conflicting inputs.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Errors caused by malformed mapping declarations.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Conflicting values encountered during a recursive merge.
    #[error("incompatible data for key '{key}', cannot be merged")]
    Merge { key: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for SuoError {
    fn from(err: io::Error) -> Self {
        SuoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SuoError {
    fn from(err: serde_json::Error) -> Self {
        SuoError::Serde(err.to_string())
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Error> for SuoError {
    fn from(err: serde_yaml::Error) -> Self {
        SuoError::Serde(err.to_string())
    }
}

impl SuoError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        SuoError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        SuoError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct illegal argument errors.
    pub fn illegal_argument<T: Into<String>>(message: T) -> Self {
        SuoError::IllegalArgument(message.into())
    }

    /// Helper to construct attribute lookup errors.
    pub fn missing_attribute(object: impl Into<String>, name: impl Into<String>) -> Self {
        SuoError::MissingAttribute {
            object: object.into(),
            name: name.into(),
        }
    }

    /// Helper to construct merge conflict errors.
    pub fn merge(key: impl Into<String>) -> Self {
        SuoError::Merge { key: key.into() }
    }

    /// Helper to construct registry lookup errors for concrete names.
    pub fn unknown_class(family: impl Into<String>, name: impl Into<String>) -> Self {
        SuoError::UnknownDslClass {
            family: family.into(),
            name: name.into(),
        }
    }

    /// True when this error is either validation shape.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SuoError::Validation { .. } | SuoError::Invalid { .. }
        )
    }

    /// The message of a single-field validation error, if that is what this is.
    pub fn validation_message(&self) -> Option<&str> {
        match self {
            SuoError::Validation { message } => Some(message),
            _ => None,
        }
    }
}
