//! Create/read/refresh/delete lifecycle against the in-memory device.

mod common;

use common::*;

#[tokio::test]
async fn test_create_then_read_returns_defaults_and_computed() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();

    let created = templates
        .create(&template("temp1").with("multihop", true), &opts())
        .await
        .unwrap();
    assert_eq!(created.id, "*2");
    assert_eq!(created.path, "/routing/bgp/template/*2");

    let read = templates.read("*2", &opts()).await.unwrap();
    assert_eq!(read, created);

    let values = &read.values;
    assert_eq!(values.get("name"), Some(&Value::from("temp1")));
    assert_eq!(values.get("as"), Some(&Value::from("65000")));
    assert_eq!(values.get("multihop"), Some(&Value::Bool(true)));
    assert_eq!(values.get("hold_time"), Some(&Value::from("3m")));
    assert_eq!(values.get("keepalive_time"), Some(&Value::from("3m")));
    assert_eq!(values.get("vrf"), Some(&Value::from("main")));
    assert_eq!(values.get("address_families"), Some(&Value::set(["ip"])));
    assert_eq!(values.get("routing_table"), Some(&Value::from("main")));
    assert!(values.get("as_override").is_none());

    assert_eq!(device.write_count(), 1);
}

#[tokio::test]
async fn test_create_sends_supplied_values_and_defaults_only() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();

    templates
        .create(
            &template("temp1").with("input", Record::new().with("filter", "bgp-in")),
            &opts(),
        )
        .await
        .unwrap();

    let writes = device.writes();
    let [DeviceCall::Create { collection, bag: sent }] = writes.as_slice() else {
        panic!("expected exactly one create, got {writes:?}");
    };
    assert_eq!(collection, TEMPLATES);
    assert_eq!(
        sent,
        &bag(&[
            ("add-path-out", "none"),
            ("address-families", "ip"),
            ("as", "65000"),
            ("disabled", "false"),
            ("hold-time", "3m"),
            ("input.filter", "bgp-in"),
            ("keepalive-time", "3m"),
            ("name", "temp1"),
            ("nexthop-choice", "default"),
            ("vrf", "main"),
        ])
    );
}

#[tokio::test]
async fn test_create_validation_fails_before_any_device_call() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();

    let err = templates
        .create(
            &Record::new()
                .with("name", "temp1")
                .with("nexthop_choice", "sideways"),
            &opts(),
        )
        .await
        .unwrap_err();

    let ReconcileError::Validation { path, id, errors } = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(path, TEMPLATES);
    assert!(id.is_none());
    let attributes: Vec<&str> = errors.iter().map(|v| v.attribute.as_str()).collect();
    assert_eq!(attributes, vec!["as", "nexthop_choice"]);
    assert!(device.calls().is_empty());
}

#[tokio::test]
async fn test_create_device_error_is_reported_with_path() {
    let (device, reconciler) = reconciler();
    device.fail_next_write(400, "failure: duplicate name");
    let templates = reconciler.resource("bgp_template").unwrap();

    let err = templates.create(&template("default"), &opts()).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Device { .. }));
    assert_eq!(err.path(), TEMPLATES);
    assert!(err.to_string().contains("duplicate name"));
}

#[tokio::test]
async fn test_read_missing_is_not_found_and_refresh_is_none() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();

    let err = templates.read("*9", &opts()).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.id(), Some("*9"));

    let created = templates.create(&template("temp1"), &opts()).await.unwrap();
    assert!(device.remove(&created.path));
    assert_eq!(templates.refresh(&created.id, &opts()).await.unwrap(), None);
}

#[tokio::test]
async fn test_read_never_writes() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();

    templates.read("*1", &opts()).await.unwrap();
    templates.refresh("*1", &opts()).await.unwrap();
    assert_eq!(device.write_count(), 0);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (device, reconciler) = reconciler();
    let templates = reconciler.resource("bgp_template").unwrap();
    let created = templates.create(&template("temp1"), &opts()).await.unwrap();

    templates.delete(&created.id, &opts()).await.unwrap();
    templates.delete(&created.id, &opts()).await.unwrap();

    assert!(device.item(&created.path).is_none());
    assert!(templates.read(&created.id, &opts()).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unknown_resource_type_has_no_handle() {
    let (_device, reconciler) = reconciler();
    assert!(reconciler.resource("bgp_peer").is_none());
}
