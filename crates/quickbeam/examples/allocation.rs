//! Value vs. reference storage: one record shape, two copy behaviors.
//!
//! An inline record is copied field by field; mutating the copy leaves
//! the original alone. A shared record is copied by handle; both names
//! look at the same resident storage, so a mutation through either is
//! seen by both.

use std::collections::HashMap;

use anyhow::Result;
use quickbeam::{KeyValue, Record, Region, StorageKind, Value};

fn size_record() -> Record {
    Record::new("Size")
        .with_field("width", Value::F64(100.0))
        .with_field("height", Value::F64(100.0))
}

fn main() -> Result<()> {
    let region = Region::new();

    // Held inline: the copy is a second, independent instance.
    let size = region.declare(StorageKind::Inline, size_record());
    let mut copy = region.duplicate(&size)?;
    copy.write(&region, "width", Value::F64(150.0))?;
    copy.write(&region, "height", Value::F64(150.0))?;

    println!("---- inline ----");
    println!(
        "original: {} x {}",
        size.read(&region, "width")?,
        size.read(&region, "height")?
    );
    println!(
        "copy:     {} x {}",
        copy.read(&region, "width")?,
        copy.read(&region, "height")?
    );

    // The same shape in the shared region: the copy is another name for
    // the same storage.
    let shared = region.declare(StorageKind::Shared, size_record());
    let mut alias = region.duplicate(&shared)?;
    alias.write(&region, "width", Value::F64(150.0))?;
    alias.write(&region, "height", Value::F64(150.0))?;

    println!("---- shared ----");
    println!(
        "original: {} x {}  (handle {})",
        shared.read(&region, "width")?,
        shared.read(&region, "height")?,
        shared.as_handle().expect("shared storage has a handle"),
    );
    println!(
        "alias:    {} x {}  (handle {})",
        alias.read(&region, "width")?,
        alias.read(&region, "height")?,
        alias.as_handle().expect("shared storage has a handle"),
    );

    // Lookup tables with inline keys never touch the shared region;
    // float or handle keys are refused outright.
    let mut cache: HashMap<KeyValue, i64> = HashMap::new();
    cache.insert(KeyValue(Value::string("group-one")), 1);
    cache.insert(KeyValue(Value::I64(2)), 2);
    println!("---- cache ----");
    println!("entries: {}", cache.len());
    println!(
        "float key allowed: {}",
        KeyValue::is_hashable(&Value::F64(1.0))
    );

    region.discard(size)?;
    region.discard(copy)?;
    region.discard(shared)?;
    region.discard(alias)?;
    println!("slots still resident: {}", region.len());
    Ok(())
}
