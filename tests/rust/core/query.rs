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

use suox::{construct_query, SuoQuery, SuoToValue, SuoValue};

fn wire(json: &str) -> SuoValue {
    SuoValue::from_json_str(json).unwrap()
}

#[test]
fn wire_form_and_builders_agree() {
    let from_wire = construct_query(wire(
        r#"{"bool": {
            "must": [{"term": {"user": "kimchy"}}],
            "must_not": [{"exists": {"field": "deleted_at"}}],
            "minimum_should_match": 1
        }}"#,
    ))
    .unwrap();

    let built = SuoQuery::bool_query()
        .with_must(SuoQuery::term("user", "kimchy"))
        .unwrap()
        .with_must_not(SuoQuery::exists("deleted_at"))
        .unwrap()
        .with_minimum_should_match(1i64);

    assert_eq!(from_wire, built);
    assert_eq!(from_wire.to_value().unwrap(), built.to_value().unwrap());
}

#[test]
fn simple_kinds_render_their_wire_shapes() {
    assert_eq!(
        SuoQuery::match_all().to_value().unwrap(),
        wire(r#"{"match_all": {}}"#)
    );
    assert_eq!(
        SuoQuery::match_query("title", "hello world").to_value().unwrap(),
        wire(r#"{"match": {"title": "hello world"}}"#)
    );
    assert_eq!(
        SuoQuery::ids(vec!["1".into(), "3".into()]).to_value().unwrap(),
        wire(r#"{"ids": {"values": ["1", "3"]}}"#)
    );
}

#[test]
fn bool_clauses_nest_arbitrarily_deep() {
    let inner = SuoQuery::bool_query()
        .with_should(SuoQuery::term("tags", "rust"))
        .unwrap()
        .with_should(SuoQuery::term("tags", "search"))
        .unwrap();
    let outer = SuoQuery::bool_query()
        .with_filter(SuoQuery::exists("published"))
        .unwrap()
        .with_must(inner)
        .unwrap();

    assert_eq!(
        outer.to_value().unwrap(),
        wire(
            r#"{"bool": {
                "filter": [{"exists": {"field": "published"}}],
                "must": [{"bool": {"should": [
                    {"term": {"tags": "rust"}},
                    {"term": {"tags": "search"}}
                ]}}]
            }}"#
        )
    );
}

#[test]
fn nested_queries_wrap_under_a_path() {
    let query = SuoQuery::nested(
        "comments",
        SuoQuery::match_query("comments.body", "excellent"),
    )
    .unwrap();
    assert_eq!(
        query.to_value().unwrap(),
        wire(
            r#"{"nested": {
                "path": "comments",
                "query": {"match": {"comments.body": "excellent"}}
            }}"#
        )
    );
}

#[test]
fn percolate_carries_the_candidate_document() {
    let query = SuoQuery::percolate(
        "stored_query",
        wire(r#"{"message": "out of stock"}"#),
    );
    assert_eq!(
        query.to_value().unwrap(),
        wire(
            r#"{"percolate": {
                "field": "stored_query",
                "document": {"message": "out of stock"}
            }}"#
        )
    );
}

#[test]
fn wire_clause_lists_promote_single_values() {
    // A lone clause mapping reads the same as a one-element list.
    let single = construct_query(wire(
        r#"{"bool": {"must": {"term": {"user": "kimchy"}}}}"#,
    ))
    .unwrap();
    let listed = construct_query(wire(
        r#"{"bool": {"must": [{"term": {"user": "kimchy"}}]}}"#,
    ))
    .unwrap();
    assert_eq!(single, listed);
}

#[test]
fn malformed_wire_queries_are_rejected() {
    let err = construct_query(wire(r#"{"term": {}, "match": {}}"#)).unwrap_err();
    assert!(err.to_string().contains("single {name: params} entry"));

    let err = construct_query(wire(r#"{"time_travel": {}}"#)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "DSL class 'time_travel' does not exist in query"
    );

    let err = construct_query(SuoValue::Int(42)).unwrap_err();
    assert!(err.to_string().contains("cannot construct a query"));
}

#[test]
fn queries_format_for_logging() {
    let query = SuoQuery::bool_query()
        .with_must(SuoQuery::term("user", "kimchy"))
        .unwrap();
    assert_eq!(
        format!("{}", query),
        r#"bool(must=[term(user="kimchy")])"#
    );
}
