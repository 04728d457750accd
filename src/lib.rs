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

//! # Suo Core Library
//!
//! This is the main library entry point for the Suo document mapping and
//! query DSL runtime. It provides typed schemas over schemaless JSON-like
//! data: field declarations that coerce and validate values, documents that
//! bind a schema to engine hits, and composable query nodes that render to
//! the engine's wire form.
//!
//! ## Module Overview
//!
//! The library is organized into the following major modules:
//!
//! - **value**: SuoValue, the shared in-memory tree behind every surface
//! - **attr**: Attribute views over shared maps/lists and the recursive merge
//! - **dsl**: The parameter engine shared by every DSL node family
//! - **registry**: Name-to-constructor registry for fields, queries, analyzers
//! - **analysis**: Analyzer/normalizer nodes referenced by name from fields
//! - **query**: Query node family, from match_all to bool composition
//! - **fields**: The field kind hierarchy and per-kind value coercion
//! - **mapping**: Ordered schema tables and declaration-file loading
//! - **document**: Document types, hit ingestion, validation, rendering
//!
//! ## Feature Flags
//!
//! - `yaml`: Enables YAML mapping declaration files (JSON always works)
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use suox::{SuoDocType, SuoDocument, SuoField, SuoValue};
//!
//! // Declare a schema
//! let article = Rc::new(
//!     SuoDocType::new("article")
//!         .field("title", SuoField::text().with_required(true))
//!         .field("published", SuoField::date())
//!         .field("views", SuoField::integer()),
//! );
//!
//! // Ingest an engine hit
//! let hit = SuoValue::from_json_str(
//!     r#"{"_id": "42", "_source": {"title": "hello", "views": "7"}}"#,
//! ).unwrap();
//! let doc = SuoDocument::from_hit(article, &hit).unwrap();
//!
//! // Typed access and validation
//! assert_eq!(doc.attr("views").unwrap(), SuoValue::Int(7));
//! doc.full_clean().unwrap();
//! ```
//!
//! ## Architecture
//!
//! Suo follows a layered architecture:
//! 1. **Values**: Data lives in shared, insertion-ordered value trees
//! 2. **Views**: Attribute wrappers give dotted access without copying
//! 3. **Nodes**: Fields, queries, and analyzers share one parameter engine
//! 4. **Registry**: Wire names resolve to node constructors at runtime
//! 5. **Documents**: Schemas bind values to validation and rendering
//!
//! ## Error Handling
//!
//! All operations return `Result<T, SuoError>` for explicit error handling.
//! Common error types include validation failures, unknown DSL names, and
//! malformed schema declarations.

pub mod errors;
pub mod value;
pub mod attr;
pub mod dsl;
pub mod registry;
pub mod analysis;
pub mod query;
pub mod fields;
pub mod mapping;
pub mod document;

pub use errors::{Result, SuoError};
pub use value::{recursive_to_value, SuoDate, SuoListHandle, SuoMapHandle, SuoValue};
pub use attr::{merge, SuoAttrList, SuoAttrMap, SuoObjWrapper};

pub use dsl::{
    SuoDslData, SuoDslNode, SuoParamDef, SuoParamDefs, SuoParamInput, SuoParamKind, SuoParamMap,
    SuoParamValue, SuoToValue,
};
pub use registry::{SuoClassDef, SuoNodeFactory, SuoRegistry, SuoShortcut};

pub use analysis::{construct_analyzer, construct_normalizer, SuoAnalysis};
pub use query::{construct_query, construct_query_with, SuoQuery};
pub use fields::{
    construct_field, construct_field_with, SuoCustomType, SuoField, SuoFieldKind, SuoRange,
    SuoSchemaSource,
};
pub use mapping::{SuoDynamic, SuoMapping};
pub use document::{
    SuoDocType, SuoDocument, SuoHitMeta, DOC_META_FIELDS, META_FIELDS,
};
