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

use serde_json::json;

use suox::{merge, SuoAttrList, SuoAttrMap, SuoError, SuoValue};

#[test]
fn attr_map_views_alias_one_container() {
    let map = SuoAttrMap::from_json(json!({"city": "Oslo"})).unwrap();
    let alias = SuoAttrMap::from_handle(map.handle().clone());

    alias.set("country", "Norway");
    assert_eq!(map.attr("country").unwrap(), SuoValue::Str("Norway".into()));

    map.remove("city").unwrap();
    assert!(!alias.contains("city"));
    assert_eq!(alias.keys(), vec!["country".to_string()]);
}

#[test]
fn attr_access_fails_fast_on_missing_names() {
    let map = SuoAttrMap::from_json(json!({"present": 1})).unwrap();

    let err = map.attr("absent").unwrap_err();
    assert_eq!(
        err.to_string(),
        "'SuoAttrMap' object has no attribute 'absent'"
    );

    // A null default does not paper over the miss; a real default does.
    assert!(map.get("absent", SuoValue::Null).is_err());
    assert_eq!(
        map.get("absent", SuoValue::Int(7)).unwrap(),
        SuoValue::Int(7)
    );
}

#[test]
fn nested_containers_stay_shared_through_paths() {
    let map = SuoAttrMap::from_json(json!({
        "address": {"city": "Oslo", "geo": {"lat": 59.9}},
        "tags": ["a", "b"]
    }))
    .unwrap();

    assert_eq!(map.path("address.city").unwrap(), SuoValue::Str("Oslo".into()));
    assert_eq!(map.path("address.geo.lat").unwrap(), SuoValue::Float(59.9));
    assert_eq!(map.path("tags.1").unwrap(), SuoValue::Str("b".into()));

    // Writing through a sub-view is visible from the root.
    let address = SuoAttrMap::from_value(&map.attr("address").unwrap()).unwrap();
    address.set("zip", "0150");
    assert_eq!(map.path("address.zip").unwrap(), SuoValue::Str("0150".into()));
}

#[test]
fn attr_list_slices_copy_but_pushes_share() {
    let list = SuoAttrList::new();
    for i in 0..5i64 {
        list.push(i);
    }

    let alias = SuoAttrList::from_handle(list.handle().clone());
    alias.push(5i64);
    assert_eq!(list.len(), 6);

    let sliced = list.slice(2..4);
    assert_eq!(
        sliced.items(),
        vec![SuoValue::Int(2), SuoValue::Int(3)]
    );
    sliced.set(0, 99i64).unwrap();
    // The source list never sees writes to a slice.
    assert_eq!(list.get(2).unwrap(), SuoValue::Int(2));
}

#[test]
fn merge_deep_extends_and_overwrites() {
    let base = SuoValue::from_json(json!({
        "settings": {"analysis": {"analyzer": {"a": 1}}},
        "mappings": {"properties": {"title": {"type": "text"}}}
    }));
    let incoming = SuoValue::from_json(json!({
        "settings": {"analysis": {"analyzer": {"b": 2}}},
        "aliases": {"blog": {}}
    }));

    merge(&base, &incoming, false).unwrap();

    let view = SuoAttrMap::from_value(&base).unwrap();
    assert_eq!(view.path("settings.analysis.analyzer.a").unwrap(), SuoValue::Int(1));
    assert_eq!(view.path("settings.analysis.analyzer.b").unwrap(), SuoValue::Int(2));
    assert!(view.contains("aliases"));
    assert!(view.contains("mappings"));
}

#[test]
fn merge_conflict_names_the_offending_key() {
    let base = SuoValue::from_json(json!({"number_of_shards": 1}));
    let incoming = SuoValue::from_json(json!({"number_of_shards": 2}));

    let err = merge(&base, &incoming, true).unwrap_err();
    assert!(matches!(
        err,
        SuoError::Merge { ref key } if key == "number_of_shards"
    ));
    assert_eq!(
        err.to_string(),
        "incompatible data for key 'number_of_shards', cannot be merged"
    );

    // Without the flag the incoming value simply wins.
    merge(&base, &incoming, false).unwrap();
    let view = SuoAttrMap::from_value(&base).unwrap();
    assert_eq!(view.attr("number_of_shards").unwrap(), SuoValue::Int(2));
}

#[test]
fn merge_rejects_non_mapping_inputs() {
    let base = SuoValue::from_json(json!({"a": 1}));
    let scalar = SuoValue::Int(3);
    let err = merge(&base, &scalar, false).unwrap_err();
    assert!(err.to_string().contains("unable to merge"));
}
