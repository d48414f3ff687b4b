//! Serialization framing: the write-path inverse of continuation merging.
//!
//! A logical record whose payload exceeds the maximum physical chunk size is
//! emitted as one primary chunk followed by CONTINUE chunks, each capped at
//! [`MAX_RECORD_DATA`]. The payload is produced by the record's own
//! `write_data` and verified against its `data_size` report before any
//! framing is emitted, so a buggy record cannot silently corrupt the file.

use crate::consts::{CONTINUE_SID, MAX_RECORD_DATA};
use crate::error::{BiffError, BiffResult};
use crate::record::Record;

/// Write one physical chunk header: sid and payload length, both u16 LE.
#[inline]
pub fn write_record_header(out: &mut Vec<u8>, sid: u16, data_len: u16) {
    out.extend_from_slice(&sid.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
}

/// Frames logical records into physical chunks.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    max_chunk: usize,
    trailing_continue: bool,
}

impl Default for RecordWriter {
    fn default() -> Self {
        RecordWriter {
            max_chunk: MAX_RECORD_DATA,
            trailing_continue: false,
        }
    }
}

impl RecordWriter {
    /// Writer with the standard 8224-byte chunk cap and no terminator chunk.
    pub fn new() -> Self {
        RecordWriter::default()
    }

    /// Override the maximum payload bytes per physical chunk.
    ///
    /// The chunk length field is a u16, so the cap must fit in one.
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        assert!(
            max_chunk > 0 && max_chunk <= u16::MAX as usize,
            "chunk capacity must fit the u16 length field"
        );
        self.max_chunk = max_chunk;
        self
    }

    /// Emit a zero-length CONTINUE terminator when a payload is an exact
    /// multiple of the chunk cap. Off by default; a per-format difference,
    /// not a universal rule.
    pub fn with_trailing_continue(mut self, trailing_continue: bool) -> Self {
        self.trailing_continue = trailing_continue;
        self
    }

    /// Frame an already-serialized payload under `sid`, splitting into
    /// CONTINUE chunks as needed.
    pub fn write_framed(&self, out: &mut Vec<u8>, sid: u16, payload: &[u8]) {
        let head = payload.len().min(self.max_chunk);
        write_record_header(out, sid, head as u16);
        out.extend_from_slice(&payload[..head]);

        let mut offset = head;
        while offset < payload.len() {
            let n = (payload.len() - offset).min(self.max_chunk);
            write_record_header(out, CONTINUE_SID, n as u16);
            out.extend_from_slice(&payload[offset..offset + n]);
            offset += n;
        }

        if self.trailing_continue && !payload.is_empty() && payload.len() % self.max_chunk == 0 {
            write_record_header(out, CONTINUE_SID, 0);
        }
    }

    /// Serialize one record: payload bytes from `write_data`, checked
    /// against `data_size`, then framed. A size mismatch is a programming
    /// error in the record type and fails before any output is written.
    pub fn write_record(&self, out: &mut Vec<u8>, record: &dyn Record) -> BiffResult<()> {
        let declared = record.data_size();
        let mut payload = Vec::with_capacity(declared);
        record.write_data(&mut payload);
        if payload.len() != declared {
            return Err(BiffError::SerializedSizeMismatch {
                sid: record.sid(),
                declared,
                written: payload.len(),
            });
        }
        self.write_framed(out, record.sid(), &payload);
        Ok(())
    }

    /// Serialize an ordered sequence of records into one stream.
    pub fn serialize_records(&self, records: &[Box<dyn Record>]) -> BiffResult<Vec<u8>> {
        let mut out = Vec::new();
        for record in records {
            self.write_record(&mut out, record.as_ref())?;
        }
        Ok(out)
    }
}
