//! End-to-end tests over the public API: interpolation, single-value get and
//! set, and the deployment-field sync routine.

use pretty_assertions::assert_eq;

use opsmith::{
    get_path, interpolate, set_path, update_from_service_deployment, Node, OpsmithError,
    ServiceDeployment, Variables,
};

fn vars(entries: &[(&str, Node)]) -> Variables {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_interpolate_identity() {
    let out = interpolate(b"key: value", b"", &Variables::new()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "key: value\n");
}

#[test]
fn test_interpolate_preserves_key_order() {
    let manifest = b"zebra: 1\nalpha: 2\nmiddle: 3\n";
    let out = interpolate(manifest, b"", &Variables::new()).unwrap();
    assert_eq!(out, manifest);
}

#[test]
fn test_interpolate_replace_op() {
    let ops = b"- type: replace\n  path: /key\n  value: 10\n";
    let out = interpolate(b"key: value\n", ops, &Variables::new()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "key: 10\n");
}

#[test]
fn test_interpolate_remove_op() {
    let ops = b"- type: remove\n  path: /b\n";
    let out = interpolate(b"a: 1\nb: 2\nc: 3\n", ops, &Variables::new()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a: 1\nc: 3\n");
}

#[test]
fn test_interpolate_missing_variable_is_a_noop() {
    let out = interpolate(b"key: ((variable))\n", b"", &Variables::new()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "key: ((variable))\n");
}

#[test]
fn test_interpolate_scalar_variable() {
    let out = interpolate(
        b"key: ((variable))\n",
        b"",
        &vars(&[("variable", Node::string("value"))]),
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "key: value\n");
}

#[test]
fn test_interpolate_composite_variable_expands_fully() {
    let nested = Node::mapping(vec![(
        "level1".to_string(),
        Node::mapping(vec![(
            "level2".to_string(),
            Node::string("level3"),
        )]),
    )]);
    let out = interpolate(b"key: ((variable))\n", b"", &vars(&[("variable", nested)])).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "key:\n  level1:\n    level2: level3\n"
    );
}

#[test]
fn test_interpolate_op_error_reports_index_and_path() {
    let ops = b"- type: replace\n  path: /a\n  value: 1\n- type: remove\n  path: /missing\n";
    let err = interpolate(b"a: 0\n", ops, &Variables::new()).unwrap_err();
    match &err {
        OpsmithError::OpApplication { index, path, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(path.as_str(), "/missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_get_path_multiline_block_returned_verbatim() {
    let manifest = b"items:\n- name: first_array_element\n  value: |-\n    ok\n    this\n    is\n    weird\n";
    let value = get_path(manifest, "/items/name=first_array_element/value").unwrap();
    assert_eq!(value, "ok\nthis\nis\nweird");
}

#[test]
fn test_get_path_missing_path_is_a_traversal_error() {
    let err = get_path(b"key: value\n", "/wrong/path").unwrap_err();
    assert!(err.is_traversal());
}

#[test]
fn test_set_path_nested_value_under_matched_element() {
    let manifest = b"items:\n- name: first\n  value: old\n";
    let value = Node::mapping(vec![(
        "some-random-key".to_string(),
        Node::mapping(vec![(
            "level-2-random-key".to_string(),
            Node::string("finally-value"),
        )]),
    )]);
    let out = set_path(manifest, "/items/name=first/value", value).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(
        text.contains(
            "  value:\n    some-random-key:\n      level-2-random-key: finally-value\n"
        ),
        "unexpected output:\n{text}"
    );
}

#[test]
fn test_set_path_creates_intermediate_containers() {
    let out = set_path(b"top: here\n", "/brand/new/key", Node::int(1)).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "top: here\nbrand:\n  new:\n    key: 1\n"
    );
}

#[test]
fn test_get_of_set_round_trips_scalars() {
    let manifest = b"a:\n  b: old\nitems:\n- name: first\n  value: x\n";
    for (path, value, expected) in [
        ("/a/b", Node::string("hello"), "hello"),
        ("/items/name=first/value", Node::int(7), "7"),
        ("/fresh", Node::bool(true), "true"),
    ] {
        let updated = set_path(manifest, path, value).unwrap();
        assert_eq!(get_path(&updated, path).unwrap(), expected);
    }
}

#[test]
fn test_replace_op_is_idempotent() {
    let ops_once = b"- type: replace\n  path: /key\n  value: 10\n";
    let ops_twice =
        b"- type: replace\n  path: /key\n  value: 10\n- type: replace\n  path: /key\n  value: 10\n";
    let once = interpolate(b"key: value\n", ops_once, &Variables::new()).unwrap();
    let twice = interpolate(b"key: value\n", ops_twice, &Variables::new()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_sync_preserves_stemcell_alias_and_replaces_releases() {
    let manifest = b"name: old-name\nstemcells:\n- alias: default\n  os: old-os\n  version: '0'\nreleases:\n- name: old-release\n  version: '1'\nupdate:\n  canaries: 1\n";
    let record = ServiceDeployment::from_bytes(
        b"deployment_name: service-instance_guid\nstemcell:\n  version: '621.74'\n  os: ubuntu-xenial\nreleases:\n- name: redis\n  version: '15'\n  jobs:\n  - redis-server\n",
    )
    .unwrap();

    let out = update_from_service_deployment(manifest, &record).unwrap();
    let root = Node::from_bytes(&out).unwrap();

    assert_eq!(
        root.get("name").and_then(Node::as_str),
        Some("service-instance_guid")
    );

    let stemcells = root.get("stemcells").and_then(Node::as_sequence).unwrap();
    assert_eq!(stemcells.len(), 1);
    assert_eq!(
        stemcells[0].get("alias").and_then(Node::as_str),
        Some("default")
    );
    assert_eq!(
        stemcells[0].get("version").and_then(Node::as_str),
        Some("621.74")
    );
    assert_eq!(
        stemcells[0].get("os").and_then(Node::as_str),
        Some("ubuntu-xenial")
    );

    // release fields beyond name/version (the job list) are dropped
    let releases = root.get("releases").and_then(Node::as_sequence).unwrap();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].get("name").and_then(Node::as_str), Some("redis"));
    assert_eq!(
        releases[0].get("version").and_then(Node::as_str),
        Some("15")
    );
    assert!(releases[0].get("jobs").is_none());

    // unrelated manifest sections pass through
    assert_eq!(
        root.get("update").and_then(|u| u.get("canaries")),
        Some(&Node::int(1))
    );
}

#[test]
fn test_interpolate_pipeline_vars_then_ops_then_output() {
    let manifest = b"name: ((deployment_name))\ninstance_groups:\n- name: redis\n  instances: 1\n";
    let ops = b"- type: replace\n  path: /instance_groups/name=redis/instances\n  value: 3\n- type: replace\n  path: /instance_groups/name=redis/persistent_disk\n  value: 10240\n";
    let out = interpolate(
        manifest,
        ops,
        &vars(&[("deployment_name", Node::string("redis-dev"))]),
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "name: redis-dev\ninstance_groups:\n- name: redis\n  instances: 3\n  persistent_disk: 10240\n"
    );
}
