//! Record codec for one tag's record list.
//!
//! # Wire Format
//!
//! A record list is a stream of newline-delimited JSON records, one per entry:
//!
//! ```text
//! {"value":["https://www.example.org"],"index":"0"}
//! {"value":["https://www.example.org/page2"],"index":"2"}
//! ```
//!
//! The tag itself is not part of the record; it is the key the list is stored under
//! and is supplied again when decoding.
//!
//! A record is well formed only if its `value` array holds exactly one token and its
//! `index` token parses as a non-negative integer. Decoding reads from a streaming
//! source and rejects the whole list on the first malformed record.

pub mod error;


pub use error::{CodecError, CodecResult};

use std::borrow::Cow;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::model::Entry;

#[derive(Debug, Serialize, Deserialize)]
struct WireRecord<'a> {
    value: Vec<Cow<'a, str>>,
    index: Cow<'a, str>,
}

impl WireRecord<'_> {
    fn into_entry(self, tag: &str, record: usize) -> CodecResult<Entry> {
        let WireRecord { mut value, index } = self;

        if value.len() != 1 {
            return Err(CodecError::Damaged {
                record,
                reason: format!("expected exactly one value token, found {}", value.len()),
            });
        }

        let tag_index = index.parse::<usize>().map_err(|e| CodecError::Damaged {
            record,
            reason: format!("invalid tag index '{}': {}", index, e),
        })?;

        let value = value.pop().map(Cow::into_owned).unwrap_or_default();
        Ok(Entry::new(value, tag, tag_index))
    }
}

/// Writes `entries` to `sink` in record order.
///
/// Fails only when the sink fails.
pub fn encode<W: Write>(entries: &[Entry], mut sink: W) -> CodecResult<()> {
    for entry in entries {
        let record = WireRecord {
            value: vec![Cow::Borrowed(entry.value.as_str())],
            index: Cow::Owned(entry.tag_index.to_string()),
        };

        serde_json::to_writer(&mut sink, &record).map_err(std::io::Error::from)?;
        sink.write_all(b"\n")?;
    }

    sink.flush()?;
    Ok(())
}

/// Encodes `entries` into a fresh buffer.
pub fn encode_to_vec(entries: &[Entry]) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(entries.len() * 32);
    encode(entries, &mut buf)?;
    Ok(buf)
}

/// Reads every record from `source`, attributing them to `tag`.
///
/// An empty source decodes to an empty list.
pub fn decode<R: Read>(source: R, tag: &str) -> CodecResult<Vec<Entry>> {
    let stream = serde_json::Deserializer::from_reader(source).into_iter::<WireRecord<'static>>();

    let mut entries = Vec::new();
    for (record, parsed) in stream.enumerate() {
        let wire = parsed.map_err(|e| {
            if e.is_io() {
                CodecError::Io(e.into())
            } else {
                CodecError::Damaged {
                    record,
                    reason: e.to_string(),
                }
            }
        })?;

        entries.push(wire.into_entry(tag, record)?);
    }

    Ok(entries)
}
