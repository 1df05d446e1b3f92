//! Tests for capability declaration, descriptor tables, and resolution

use quickbeam::*;

fn describe_default(record: &Record) -> Value {
    Value::string(format!("a plain {}", record.type_name))
}

fn badge_draw(_record: &Record) -> Value {
    Value::string("[*]")
}

fn widget_capability() -> std::sync::Arc<Capability> {
    Capability::builder("Widget")
        .operation("draw")
        .operation_with_default("describe", describe_default)
        .build()
}

#[test]
fn test_each_variant_invokes_its_own_implementation() {
    let widget = widget_capability();

    let button = TypeDescriptor::builder("Button", widget.clone())
        .operation("draw", |_| Value::string("[ button ]"))
        .operation("describe", |_| Value::string("a clickable button"))
        .build()
        .unwrap();

    let label = TypeDescriptor::builder("Label", widget.clone())
        .operation("draw", |r| {
            let text = r.get("text").and_then(Value::as_str).unwrap_or("");
            Value::string(format!("[ {} ]", text))
        })
        .build()
        .unwrap();

    let gauge = TypeDescriptor::builder("Gauge", widget)
        .operation("draw", |r| {
            let level = r.get("level").and_then(Value::as_i64).unwrap_or(0);
            Value::string(format!("[{}%]", level))
        })
        .build()
        .unwrap();

    // One variable type, three concrete variants
    let widgets = vec![
        Instance::new(button, Record::new("Button")),
        Instance::new(label, Record::new("Label").with_field("text", Value::string("hi"))),
        Instance::new(gauge, Record::new("Gauge").with_field("level", Value::I64(75))),
    ];

    let drawn: Vec<Value> = widgets
        .iter()
        .map(|w| w.invoke("draw").unwrap())
        .collect();
    assert_eq!(
        drawn,
        vec![
            Value::string("[ button ]"),
            Value::string("[ hi ]"),
            Value::string("[75%]"),
        ]
    );
}

#[test]
fn test_override_replaces_the_default() {
    let widget = widget_capability();

    let button = TypeDescriptor::builder("Button", widget.clone())
        .operation("draw", |_| Value::string("[ button ]"))
        .operation("describe", |_| Value::string("a clickable button"))
        .build()
        .unwrap();

    let label = TypeDescriptor::builder("Label", widget)
        .operation("draw", |_| Value::string("[ ]"))
        .build()
        .unwrap();

    // Button overrode the default; Label inherited it
    let button = Instance::new(button, Record::new("Button"));
    let label = Instance::new(label, Record::new("Label"));
    assert_eq!(
        button.invoke("describe").unwrap(),
        Value::string("a clickable button")
    );
    assert_eq!(
        label.invoke("describe").unwrap(),
        Value::string("a plain Label")
    );
}

#[test]
fn test_incomplete_table_is_a_build_failure() {
    let widget = widget_capability();

    // "draw" has no default and no override: construction is refused
    let err = TypeDescriptor::builder("Ghost", widget).build().unwrap_err();
    assert_eq!(
        err,
        DispatchError::UnimplementedCapability {
            variant: "Ghost".to_string(),
            capability: "Widget".to_string(),
            operation: "draw".to_string(),
        }
    );
}

#[test]
fn test_undeclared_operation_is_rejected() {
    let widget = widget_capability();

    let button = TypeDescriptor::builder("Button", widget)
        .operation("draw", |_| Value::string("[ button ]"))
        .build()
        .unwrap();

    // At resolution
    assert_eq!(
        button.resolve("blink").unwrap_err(),
        DispatchError::UndeclaredOperation {
            capability: "Widget".to_string(),
            operation: "blink".to_string(),
        }
    );

    // And through an instance
    let instance = Instance::new(button, Record::new("Button"));
    assert!(instance.invoke("blink").is_err());
}

#[test]
fn test_sealed_variant_resolves_direct() {
    let widget = widget_capability();

    let badge = TypeDescriptor::builder("Badge", widget)
        .operation("draw", badge_draw)
        .sealed(true)
        .build()
        .unwrap();
    assert!(badge.is_sealed());

    // Every call site gets the same single implementation
    let first = badge.resolve("draw").unwrap();
    let second = badge.resolve("draw").unwrap();
    assert!(first.is_direct());
    assert!(second.is_direct());

    let record = Record::new("Badge");
    assert_eq!(first.implementation()(&record), Value::string("[*]"));
    assert_eq!(
        first.implementation()(&record),
        second.implementation()(&record)
    );
}

#[test]
fn test_sealed_resolution_matches_table_resolution() {
    let widget = widget_capability();

    let sealed = TypeDescriptor::builder("Badge", widget.clone())
        .operation("draw", badge_draw)
        .sealed(true)
        .build()
        .unwrap();
    let open = TypeDescriptor::builder("Badge", widget)
        .operation("draw", badge_draw)
        .build()
        .unwrap();

    // Short-circuit resolution is behaviorally indistinguishable from
    // the table lookup for the same variant
    let record = Record::new("Badge").with_field("pinned", Value::Bool(true));
    let direct = sealed.resolve("draw").unwrap();
    let table = open.resolve("draw").unwrap();
    assert!(direct.is_direct());
    assert!(!table.is_direct());
    assert_eq!(
        direct.implementation()(&record),
        table.implementation()(&record)
    );
}

#[test]
fn test_descriptor_is_shared_not_copied() {
    let widget = widget_capability();

    let button = TypeDescriptor::builder("Button", widget)
        .operation("draw", |_| Value::string("[ button ]"))
        .build()
        .unwrap();

    // Many instances, one descriptor
    let a = Instance::new(button.clone(), Record::new("Button"));
    let b = Instance::new(button.clone(), Record::new("Button"));
    assert!(std::ptr::eq(a.descriptor(), b.descriptor()));
    assert_eq!(std::sync::Arc::strong_count(&button), 3);
}

#[test]
fn test_instance_invoke_reads_its_record() {
    let widget = Capability::builder("Shape")
        .operation_with_default("area", |r| {
            let w = r.get("width").and_then(Value::as_f64).unwrap_or(0.0);
            let h = r.get("height").and_then(Value::as_f64).unwrap_or(0.0);
            Value::F64(w * h)
        })
        .build();

    let rect = TypeDescriptor::builder("Rect", widget).build().unwrap();
    let instance = Instance::new(
        rect,
        Record::new("Rect")
            .with_field("width", Value::F64(3.0))
            .with_field("height", Value::F64(4.0)),
    );

    assert_eq!(instance.invoke("area").unwrap(), Value::F64(12.0));
}
