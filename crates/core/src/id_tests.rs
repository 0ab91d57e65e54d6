// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn resource_id_splits_namespace_and_name() {
    let id: ResourceId = "harvester-system/bundle-abc".parse().unwrap();
    assert_eq!(id.namespace(), "harvester-system");
    assert_eq!(id.name(), "bundle-abc");
    assert_eq!(id.to_string(), "harvester-system/bundle-abc");
}

#[parameterized(
    no_slash = { "foo" },
    empty_namespace = { "/foo" },
    empty_name = { "ns/" },
    too_many_segments = { "ns/foo/bar" },
    empty = { "" },
)]
fn resource_id_rejects_malformed(input: &str) {
    let err = input.parse::<ResourceId>().unwrap_err();
    assert_eq!(err, ResourceIdError::Malformed(input.to_string()));
}

#[test]
fn resource_id_serializes_as_string() {
    let id = ResourceId::new("ns", "foo");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"ns/foo\"");

    let back: ResourceId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<ResourceId>("\"nope\"").is_err());
}

#[test]
fn uuid_gen_creates_unique_ids() {
    let id_gen = UuidIdGen;
    let a = id_gen.next();
    assert_ne!(a, id_gen.next());
    assert_eq!(a.len(), 36);
}

#[test]
fn sequential_gen_is_shared_between_clones() {
    let id_gen = SequentialIdGen::new("run");
    let other = id_gen.clone();
    assert_eq!(id_gen.next(), "run-1");
    assert_eq!(other.next(), "run-2");
}
