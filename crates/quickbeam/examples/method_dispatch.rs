//! Table vs. direct dispatch: variants behind a shared capability run
//! their own table entries; a sealed variant resolves to its single
//! implementation without consulting a table at all.

use quickbeam::{Capability, Instance, Record, TypeDescriptor, Value};

fn describe_default(record: &Record) -> Value {
    Value::string(format!("a plain {}", record.type_name))
}

fn main() -> quickbeam::Result<()> {
    // The capability every widget variant shares.
    let widget = Capability::builder("Widget")
        .operation("draw")
        .operation_with_default("describe", describe_default)
        .build();

    let button = TypeDescriptor::builder("Button", widget.clone())
        .operation("draw", |_| Value::string("[ button ]"))
        .operation("describe", |_| Value::string("a clickable button"))
        .build()?;

    let label = TypeDescriptor::builder("Label", widget.clone())
        .operation("draw", |r| {
            let text = r.get("text").and_then(Value::as_str).unwrap_or("");
            Value::string(format!("[ {} ]", text))
        })
        .build()?;

    // One collection type, two concrete variants: each element carries
    // its descriptor, and each call runs that variant's own entry.
    let widgets = vec![
        Instance::new(button, Record::new("Button")),
        Instance::new(
            label,
            Record::new("Label").with_field("text", Value::string("hello")),
        ),
    ];

    println!("---- table dispatch ----");
    for w in &widgets {
        println!("{}  {}", w.invoke("draw")?, w.invoke("describe")?);
    }

    // A sealed variant has no further specializations, so resolution
    // skips the table and hands back the one known implementation; a
    // caller could substitute the call with its effect outright.
    let badge = TypeDescriptor::builder("Badge", widget)
        .operation("draw", |_| Value::string("[*]"))
        .sealed(true)
        .build()?;

    println!("---- direct dispatch ----");
    let resolution = badge.resolve("draw")?;
    println!("resolved without a table lookup: {}", resolution.is_direct());
    println!("badge draws: {}", resolution.implementation()(&Record::new("Badge")));
    Ok(())
}
