//! Retain/release bookkeeping: the owner count decides when shared
//! storage is reclaimed, and every copy of a record that embeds handles
//! pays for the handles it carries.

use anyhow::Result;
use quickbeam::{Record, Region, Value};

fn main() -> Result<()> {
    let region = Region::new();

    // One resident size record, two successive owners.
    let size = region.alloc(
        Record::new("Size")
            .with_field("width", Value::F64(100.0))
            .with_field("height", Value::F64(100.0)),
    );
    let second = size; // handle copy: same slot, no ownership yet
    region.retain(second)?; // now a real second owner

    region.release(size)?; // first owner gone; the record survives
    println!("owners after first release: {}", region.strong_count(second)?);

    region.release(second)?; // count reaches zero: reclaimed, synchronously
    println!("slot live after final release: {}", region.contains(size));

    // A mixed record: inline priority, shared text storage. Copying it
    // copies the priority by value and retains the text storage; a copy
    // that skipped the retain would free the text out from under the
    // original.
    let text = region.alloc(Record::new("TextStorage").with_field("contents", Value::string("hello")));
    let message = Record::new("Message")
        .with_field("priority", Value::I64(1))
        .with_field("text", Value::Handle(text));

    let copy = region.clone_record(&message)?;
    println!("text owners with two message copies: {}", region.strong_count(text)?);

    region.dispose_record(copy)?;
    region.dispose_record(message)?;
    println!("text live after disposing both: {}", region.contains(text));

    // Copy overhead is proportional to the embedded handle count: three
    // copies of a record holding two handles cost six retains.
    let inner_a = region.alloc(Record::new("Inner").with_field("num", Value::I64(0)));
    let inner_b = region.alloc(Record::new("Inner").with_field("num", Value::I64(0)));
    let holder = Record::new("Holder")
        .with_field("a", Value::Handle(inner_a))
        .with_field("b", Value::Handle(inner_b));

    let before = region.stats();
    let copies = vec![
        region.clone_record(&holder)?,
        region.clone_record(&holder)?,
        region.clone_record(&holder)?,
    ];
    let after = region.stats();
    println!(
        "retains for three copies of a two-handle record: {}",
        after.retains - before.retains
    );

    for copy in copies {
        region.dispose_record(copy)?;
    }
    region.dispose_record(holder)?;
    println!("slots still resident: {}", region.len());
    Ok(())
}
