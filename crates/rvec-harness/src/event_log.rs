#![forbid(unsafe_code)]

//! JSONL event logs.
//!
//! One line per event:
//!
//! ```text
//! {"event":"vector_event","seq":0,"kind":"inserted","index":0,"value":"10"}
//! {"event":"vector_event","seq":1,"kind":"cleared"}
//! ```
//!
//! Element values are rendered with `Debug`, so any `T: Debug` can be
//! logged without a serialization impl.

use std::fmt::Debug;
use std::io::{self, BufRead, Write};

use rvec_core::OwnedVectorEvent;
use serde_json::{Value, json};

/// Render one event as a JSON object.
#[must_use]
pub fn event_to_json<T: Debug>(seq: usize, event: &OwnedVectorEvent<T>) -> Value {
    let kind = event.kind().as_str();
    match event {
        OwnedVectorEvent::Inserted { index, value } => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
            "index": index,
            "value": format!("{value:?}"),
        }),
        OwnedVectorEvent::Updated {
            index,
            old_value,
            new_value,
        } => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
            "index": index,
            "old_value": format!("{old_value:?}"),
            "new_value": format!("{new_value:?}"),
        }),
        OwnedVectorEvent::Erased { index, old_value } => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
            "index": index,
            "old_value": format!("{old_value:?}"),
        }),
        OwnedVectorEvent::Cleared => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
        }),
        OwnedVectorEvent::Reserved { new_capacity } => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
            "new_capacity": new_capacity,
        }),
        OwnedVectorEvent::Resized { old_size, new_size } => json!({
            "event": "vector_event",
            "seq": seq,
            "kind": kind,
            "old_size": old_size,
            "new_size": new_size,
        }),
    }
}

/// Write `events` as JSONL, numbering them from zero.
pub fn write_event_log_jsonl<W, T>(mut writer: W, events: &[OwnedVectorEvent<T>]) -> io::Result<()>
where
    W: Write,
    T: Debug,
{
    for (seq, event) in events.iter().enumerate() {
        let line = event_to_json(seq, event);
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Read a JSONL event log back into JSON values.
///
/// Blank lines are skipped. Every other line must be a JSON object whose
/// `event` field is `"vector_event"` and whose `seq` matches its position.
pub fn read_event_log_jsonl<R: BufRead>(reader: R) -> io::Result<Vec<Value>> {
    let mut out = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed).map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid JSONL at line {}: {err}", line_idx + 1),
            )
        })?;
        if value.get("event").and_then(Value::as_str) != Some("vector_event") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("missing vector_event tag at line {}", line_idx + 1),
            ));
        }
        let seq = value.get("seq").and_then(Value::as_u64);
        if seq != Some(out.len() as u64) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "out-of-order seq at line {}: expected {}, got {seq:?}",
                    line_idx + 1,
                    out.len()
                ),
            ));
        }
        out.push(value);
    }
    Ok(out)
}
