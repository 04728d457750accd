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

//! # Suo Composite Fields
//!
//! Support for the object and nested kinds: schema resolution, wrapping of
//! mapping data into typed sub-documents, and schema merging.

use std::rc::Rc;

use crate::attr::SuoObjWrapper;
use crate::document::{SuoDocType, SuoDocument};
use crate::dsl::{entry_inputs, SuoParamInput, SuoParamMap};
use crate::errors::{Result, SuoError};
use crate::fields::{construct_field, SuoField, SuoFieldKind};
use crate::mapping::{SuoDynamic, SuoMapping};
use crate::value::{SuoMapHandle, SuoValue};

/// Where an object field takes its schema from: an existing document type,
/// or an inline mapping. One or the other; the two cannot be combined.
#[derive(Debug, Clone)]
pub enum SuoSchemaSource {
    DocType(Rc<SuoDocType>),
    Mapping(SuoMapping),
}

impl From<Rc<SuoDocType>> for SuoSchemaSource {
    fn from(doc_type: Rc<SuoDocType>) -> Self {
        SuoSchemaSource::DocType(doc_type)
    }
}

impl From<SuoDocType> for SuoSchemaSource {
    fn from(doc_type: SuoDocType) -> Self {
        SuoSchemaSource::DocType(Rc::new(doc_type))
    }
}

impl From<SuoMapping> for SuoSchemaSource {
    fn from(mapping: SuoMapping) -> Self {
        SuoSchemaSource::Mapping(mapping)
    }
}

/// Document types are shared; inline mappings become anonymous types.
/// Schema edits go through copy-on-write on the shared handle, so a field
/// never mutates a type it did not create.
pub(crate) fn resolve_schema(source: SuoSchemaSource) -> Rc<SuoDocType> {
    match source {
        SuoSchemaSource::DocType(doc_type) => doc_type,
        SuoSchemaSource::Mapping(mapping) => Rc::new(SuoDocType::anonymous(mapping)),
    }
}

/// The wire declaration path: `properties` and `dynamic` keys lifted out of
/// a field's parameter bag into an anonymous document type.
pub(crate) fn doc_type_from_bag(params: &mut SuoParamMap) -> Result<Rc<SuoDocType>> {
    let mut mapping = SuoMapping::new();
    if let Some(properties) = params.take("properties") {
        for (name, input) in entry_inputs(properties)? {
            mapping.set(name, construct_field(input)?);
        }
    }
    if let Some(dynamic) = params.take("dynamic") {
        match dynamic {
            SuoParamInput::Value(value) => mapping.set_dynamic(Some(SuoDynamic::from_value(&value)?)),
            other => {
                return Err(SuoError::illegal_argument(format!(
                    "'dynamic' must be a plain value, got {:?}",
                    other
                )))
            }
        }
    }
    Ok(Rc::new(SuoDocType::anonymous(mapping)))
}

/// Wraps mapping data into a typed sub-document. Documents of the right
/// type pass through; foreign documents and plain mappings are re-wrapped,
/// coercing declared fields on the way in.
pub(crate) fn deserialize_object(doc_type: &Rc<SuoDocType>, value: SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Doc(doc) if Rc::ptr_eq(doc.doc_type(), doc_type) => Ok(SuoValue::Doc(doc)),
        SuoValue::Doc(doc) => {
            let data = doc.body_handle().clone();
            Ok(SuoValue::Doc(SuoDocument::from_data(
                doc_type.clone(),
                &data,
            )?))
        }
        SuoValue::Map(handle) => Ok(SuoValue::Doc(SuoDocument::from_data(
            doc_type.clone(),
            &handle,
        )?)),
        other => Err(SuoError::validation(format!(
            "Could not parse object from the value ({})",
            other
        ))),
    }
}

/// Plain mappings pass through; sub-documents render via their `to_dict`
/// with empty values skipped, so nothing hollow reaches the wire.
pub(crate) fn serialize_object(value: &SuoValue) -> Result<SuoValue> {
    match value {
        SuoValue::Map(handle) => Ok(SuoValue::Map(handle.clone())),
        SuoValue::Doc(doc) => doc.to_dict(true),
        other => Err(SuoError::illegal_argument(format!(
            "cannot serialize {} as an object",
            other
        ))),
    }
}

/// Runs full validation on every sub-document in the cleaned value.
pub(crate) fn clean_elements(value: &SuoValue) -> Result<()> {
    match value {
        SuoValue::Doc(doc) => doc.full_clean(),
        SuoValue::List(items) => {
            let docs: Vec<SuoDocument> = items
                .borrow()
                .iter()
                .filter_map(|item| match item {
                    SuoValue::Doc(doc) => Some(doc.clone()),
                    _ => None,
                })
                .collect();
            for doc in docs {
                doc.full_clean()?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// The empty value of an object field: a fresh document of its type.
pub(crate) fn empty_object(doc_type: &Rc<SuoDocType>) -> SuoValue {
    SuoValue::Doc(SuoDocument::new(doc_type.clone()))
}

/// The list-element wrapper: mapping elements read back as typed documents
/// sharing the element's handle, so writes land in the list.
pub(crate) fn object_wrapper(doc_type: &Rc<SuoDocType>) -> SuoObjWrapper {
    let doc_type = doc_type.clone();
    Rc::new(move |handle: &SuoMapHandle| {
        SuoValue::Doc(SuoDocument::from_handle(doc_type.clone(), handle.clone()))
    })
}

/// Merges `other`'s schema into `field`'s. Anything but two object-like
/// fields is a silent no-op.
pub(crate) fn update_field(field: &mut SuoField, other: &SuoField, update_only: bool) {
    let (mine, theirs) = match (&mut field.kind, &other.kind) {
        (
            SuoFieldKind::Object { doc_type } | SuoFieldKind::Nested { doc_type },
            SuoFieldKind::Object { doc_type: other_type }
            | SuoFieldKind::Nested { doc_type: other_type },
        ) => (doc_type, other_type),
        _ => {
            log::warn!("field update needs object fields on both sides, skipping");
            return;
        }
    };
    Rc::make_mut(mine)
        .mapping_mut()
        .update(theirs.mapping(), update_only);
}
