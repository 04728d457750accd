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

use std::rc::Rc;

use serde_json::json;

use suox::{
    SuoDocType, SuoDocument, SuoDynamic, SuoError, SuoField, SuoMapping, SuoValue,
};

fn post_type() -> Rc<SuoDocType> {
    let comment = SuoDocType::new("comment")
        .field("author", SuoField::keyword())
        .field("body", SuoField::text());
    Rc::new(
        SuoDocType::new("post")
            .field("title", SuoField::text().with_required(true))
            .field("views", SuoField::integer())
            .field("published", SuoField::date())
            .field("tags", SuoField::keyword().with_multi(true))
            .field("comments", SuoField::nested(Rc::new(comment))),
    )
}

#[test]
fn hits_ingest_into_typed_documents() {
    let hit = SuoValue::from_json_str(
        r#"{
            "_index": "blog",
            "_type": "_doc",
            "_id": "42",
            "_score": 1.5,
            "_source": {
                "title": "Grids",
                "views": "7",
                "published": "2024-01-02T03:04:05Z",
                "tags": ["search", "schema"],
                "comments": [{"author": "ada", "body": "nice"}]
            }
        }"#,
    )
    .unwrap();

    let doc = SuoDocument::from_hit(post_type(), &hit).unwrap();

    // Metadata is split off and loses its underscores.
    assert_eq!(doc.meta().id(), Some(SuoValue::Str("42".into())));
    assert_eq!(doc.meta().index(), Some("blog".to_string()));
    assert_eq!(doc.meta().doc_type(), Some("_doc".to_string()));
    assert_eq!(doc.meta().score(), Some(1.5));
    assert_eq!(doc.attr("_score").unwrap(), SuoValue::Float(1.5));

    // Source values coerce per their declared fields.
    assert_eq!(doc.attr("views").unwrap(), SuoValue::Int(7));
    match doc.attr("published").unwrap() {
        SuoValue::Date(date) => assert_eq!(date.to_iso_string(), "2024-01-02T03:04:05Z"),
        other => panic!("expected a date, got {:?}", other),
    }

    // Nested elements come back as typed documents.
    let comments = doc.attr_list("comments").unwrap();
    assert_eq!(comments.len(), 1);
    match comments.get(0).unwrap() {
        SuoValue::Doc(comment) => {
            assert_eq!(comment.type_name(), "comment");
            assert_eq!(comment.attr("author").unwrap(), SuoValue::Str("ada".into()));
        }
        other => panic!("expected a comment document, got {:?}", other),
    }
}

#[test]
fn undeclared_attributes_error_with_the_type_name() {
    let doc = SuoDocument::new(post_type());
    let err = doc.attr("nonexistent").unwrap_err();
    assert_eq!(
        err.to_string(),
        "'post' object has no attribute 'nonexistent'"
    );

    // A declared but absent field materializes its empty value instead.
    assert_eq!(doc.attr("title").unwrap(), SuoValue::Null);
    assert_eq!(doc.attr("tags").unwrap(), SuoValue::list(vec![]));

    // get() only swallows the miss when the default is non-null.
    assert!(doc.get("nonexistent", SuoValue::Null).is_err());
    assert_eq!(
        doc.get("nonexistent", "fallback").unwrap(),
        SuoValue::Str("fallback".into())
    );
}

#[test]
fn metadata_writes_route_past_the_body() {
    let doc = SuoDocument::new(post_type());

    doc.set("_id", "7");
    doc.set("_routing", "shard-1");
    assert_eq!(doc.meta().id(), Some(SuoValue::Str("7".into())));
    assert_eq!(doc.meta().routing(), Some("shard-1".to_string()));
    assert!(!doc.contains("_id"));

    // Plain names always land in the body, reserved-looking or not.
    doc.set("id", "body-id");
    assert!(doc.contains("id"));
    assert_eq!(doc.meta().id(), Some(SuoValue::Str("7".into())));
}

#[test]
fn rendering_skips_empty_but_keeps_zero_values() {
    let doc = SuoDocument::new(post_type());
    doc.set("title", "On Nothing");
    doc.set("views", 0i64);
    doc.set("tags", SuoValue::list(vec![]));
    doc.set("summary", "");

    assert_eq!(
        doc.to_json(true).unwrap(),
        json!({"title": "On Nothing", "views": 0, "summary": ""})
    );
    // Without skip_empty the empty containers stay.
    assert_eq!(
        doc.to_json(false).unwrap(),
        json!({"title": "On Nothing", "views": 0, "tags": [], "summary": ""})
    );
}

#[test]
fn nested_documents_share_their_storage() {
    let hit = SuoValue::from_json_str(
        r#"{"_source": {
            "title": "Grids",
            "comments": [{"author": "ada", "body": "nice"}]
        }}"#,
    )
    .unwrap();
    let doc = SuoDocument::from_hit(post_type(), &hit).unwrap();

    let comments = doc.attr_list("comments").unwrap();
    if let SuoValue::Doc(comment) = comments.get(0).unwrap() {
        comment.set("author", "grace");
    }

    // The write is visible through the parent rendering: views share
    // handles instead of copying.
    let rendered = doc.to_json(true).unwrap();
    assert_eq!(rendered["comments"][0]["author"], json!("grace"));
}

#[test]
fn clean_aggregates_errors_per_field() {
    let doc = SuoDocument::new(post_type());
    doc.set("views", "many");
    doc.set("published", "not-a-date");

    let err = doc.clean_fields().unwrap_err();
    let errors = match err {
        SuoError::Invalid { ref errors } => errors,
        ref other => panic!("expected aggregated validation errors, got {:?}", other),
    };
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        vec!["published", "title", "views"]
    );
    assert!(errors["views"][0].contains("Could not parse integer"));
    assert!(errors["title"][0].contains("Value required"));
    assert_eq!(err.to_string(), "validation failed for 3 document field(s)");
}

#[test]
fn clean_writes_coerced_values_back() {
    let doc = SuoDocument::new(post_type());
    doc.set("title", "Grids");
    doc.set("views", "12");

    doc.clean_fields().unwrap();
    assert_eq!(doc.attr("views").unwrap(), SuoValue::Int(12));
}

fn published_posts_need_views(doc: &SuoDocument) -> suox::Result<()> {
    if doc.contains("published") && !doc.contains("views") {
        return Err(SuoError::validation("published posts must track views"));
    }
    Ok(())
}

#[test]
fn type_level_hooks_run_after_field_cleaning() {
    let post = Rc::new(
        SuoDocType::new("post")
            .field("title", SuoField::text())
            .field("published", SuoField::date())
            .field("views", SuoField::integer())
            .with_clean(published_posts_need_views),
    );

    let doc = SuoDocument::new(post.clone());
    doc.set("title", "Grids");
    doc.set("published", "2024-01-02");
    let err = doc.full_clean().unwrap_err();
    assert!(err.to_string().contains("must track views"));

    doc.set("views", 3i64);
    doc.full_clean().unwrap();
}

#[test]
fn dynamic_strict_declarations_round_trip() {
    let mapping = SuoMapping::from_json_str(
        r#"{
            "dynamic": "strict",
            "properties": {"name": {"type": "keyword"}}
        }"#,
    )
    .unwrap();
    assert_eq!(mapping.dynamic(), Some(SuoDynamic::Strict));

    let post = Rc::new(SuoDocType::new("profile").field(
        "user",
        SuoField::object(mapping),
    ));
    let doc = SuoDocument::new(post);
    doc.set(
        "user",
        SuoValue::from_json_str(r#"{"name": "ada"}"#).unwrap(),
    );
    let rendered = doc.to_json(true).unwrap();
    assert_eq!(rendered["user"]["name"], json!("ada"));
}
