//! The record contract and the passthrough record for unknown sids.

use std::any::Any;
use std::fmt::Debug;

use bytes::Bytes;
use crate::codec::BiffRead;
use crate::error::BiffResult;
use crate::stream::RecordInputStream;

/// The unit of data in a BIFF stream.
///
/// Every concrete record type parses once from a logical record's payload,
/// may be mutated in memory, and serializes back on demand. `data_size` is
/// recomputed from current field state, never cached from parse time, since
/// string and array mutations change the serialized length. The framing
/// writer verifies that [`write_data`](Record::write_data) emits exactly
/// `data_size` bytes before anything reaches the output.
pub trait Record: Debug + Any {
    /// Stable 16-bit record type identifier.
    fn sid(&self) -> u16;

    /// Serialized payload length for the current field state.
    fn data_size(&self) -> usize;

    /// Append the payload bytes for the current field state.
    fn write_data(&self, out: &mut Vec<u8>);

    /// Deep copy with no shared mutable buffers.
    fn clone_record(&self) -> Box<dyn Record>;

    /// Downcast support for callers that know the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Record> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}

/// Passthrough record for sids the registry does not know.
///
/// Stores the raw payload verbatim so unrecognized record types survive a
/// read/write cycle byte-for-byte even though they are not understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecord {
    sid: u16,
    data: Bytes,
}

impl UnknownRecord {
    /// Wrap a raw payload under the given sid.
    pub fn new(sid: u16, data: impl Into<Bytes>) -> Self {
        UnknownRecord {
            sid,
            data: data.into(),
        }
    }

    /// Capture the full remaining payload of the open logical record.
    pub fn parse(sid: u16, input: &mut RecordInputStream) -> BiffResult<Self> {
        let data = input.read_bytes(input.remaining())?;
        Ok(UnknownRecord {
            sid,
            data: data.into(),
        })
    }

    /// The preserved payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Record for UnknownRecord {
    fn sid(&self) -> u16 {
        self.sid
    }

    fn data_size(&self) -> usize {
        self.data.len()
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.data);
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
