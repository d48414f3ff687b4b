//! Record input stream: framing and continuation merging.
//!
//! A BIFF stream is a sequence of physical chunks, each framed as
//! `{sid: u16 LE, length: u16 LE, payload}`. A logical record is one leading
//! chunk plus any number of immediately following CONTINUE chunks carrying
//! overflow payload. [`RecordInputStream`] presents the caller with one
//! contiguous logical payload: reads roll transparently across CONTINUE
//! boundaries, while [`available_in_chunk`](RecordInputStream::available_in_chunk)
//! and [`BiffRead::remaining`] stay queryable because several legacy payloads
//! gate optional trailing fields on "are any bytes left".

use crate::codec::{self, BiffRead};
use crate::consts::{CONTINUE_SID, HEADER_SIZE};
use crate::error::{BiffError, BiffResult};
use bytes::Bytes;

/// A saved stream position, taken with [`RecordInputStream::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
    current_sid: Option<u16>,
    chunk_remaining: usize,
}

/// Cursor over a BIFF record stream held in memory.
///
/// The stream is either between records (no record open), inside a logical
/// record, or exhausted. [`next_record`](Self::next_record) opens the next
/// record, the [`BiffRead`] primitives consume its payload, and
/// [`complete_record`](Self::complete_record) discards whatever
/// the parser left unread, continuation chunks included.
pub struct RecordInputStream {
    data: Bytes,
    /// Offset of the next unread byte
    pos: usize,
    /// Sid of the open logical record, `None` between records
    current_sid: Option<u16>,
    /// Unread payload bytes left in the current physical chunk
    chunk_remaining: usize,
}

impl RecordInputStream {
    /// Wrap an in-memory byte source.
    pub fn new(data: impl Into<Bytes>) -> Self {
        RecordInputStream {
            data: data.into(),
            pos: 0,
            current_sid: None,
            chunk_remaining: 0,
        }
    }

    /// Peek the header at `at` without consuming it.
    fn peek_header(&self, at: usize) -> Option<(u16, usize)> {
        if at + HEADER_SIZE > self.data.len() {
            return None;
        }
        let sid = u16::from_le_bytes([self.data[at], self.data[at + 1]]);
        let len = u16::from_le_bytes([self.data[at + 2], self.data[at + 3]]);
        Some((sid, len as usize))
    }

    /// True when another chunk header can start a new logical record.
    ///
    /// Only meaningful between records; close the open record with
    /// [`complete_record`](Self::complete_record) first.
    pub fn has_next_record(&self) -> bool {
        self.pos + HEADER_SIZE <= self.data.len()
    }

    /// Sid of the next record without opening it.
    pub fn peek_next_sid(&self) -> Option<u16> {
        self.peek_header(self.pos).map(|(sid, _)| sid)
    }

    /// Open the next logical record and return its sid.
    ///
    /// Any record still open is completed first, discarding its unread
    /// bytes. Fails on a truncated header, a chunk whose declared length
    /// runs past the end of the source, or a CONTINUE chunk with no
    /// predecessor; all three indicate corrupt input and abort the decode.
    pub fn next_record(&mut self) -> BiffResult<u16> {
        if self.current_sid.is_some() {
            self.complete_record()?;
        }
        let available = self.data.len() - self.pos;
        if available < HEADER_SIZE {
            return Err(BiffError::TruncatedHeader { available });
        }
        let sid = codec::read_u16_le(&self.data, self.pos)?;
        let declared = codec::read_u16_le(&self.data, self.pos + 2)? as usize;
        if sid == CONTINUE_SID {
            return Err(BiffError::OrphanContinuation { offset: self.pos });
        }
        if self.pos + HEADER_SIZE + declared > self.data.len() {
            return Err(BiffError::TruncatedChunk {
                sid,
                declared,
                available: self.data.len() - self.pos - HEADER_SIZE,
            });
        }
        self.pos += HEADER_SIZE;
        self.chunk_remaining = declared;
        self.current_sid = Some(sid);
        Ok(sid)
    }

    /// Sid of the currently open record, `None` between records.
    pub fn current_sid(&self) -> Option<u16> {
        self.current_sid
    }

    /// Unread payload bytes left in the current physical chunk only.
    ///
    /// Contrast with [`BiffRead::remaining`], which also counts adjacent
    /// continuation chunks.
    pub fn available_in_chunk(&self) -> usize {
        self.chunk_remaining
    }

    /// Save the cursor position for a later [`rewind`](Self::rewind).
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            current_sid: self.current_sid,
            chunk_remaining: self.chunk_remaining,
        }
    }

    /// Restore a previously saved cursor position.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.current_sid = checkpoint.current_sid;
        self.chunk_remaining = checkpoint.chunk_remaining;
    }

    /// Roll into an adjacent CONTINUE chunk. `Ok(false)` when the next
    /// chunk starts a different record or the source is exhausted.
    fn advance_to_continuation(&mut self) -> BiffResult<bool> {
        match self.peek_header(self.pos) {
            Some((sid, declared)) if sid == CONTINUE_SID => {
                if self.pos + HEADER_SIZE + declared > self.data.len() {
                    return Err(BiffError::TruncatedChunk {
                        sid,
                        declared,
                        available: self.data.len() - self.pos - HEADER_SIZE,
                    });
                }
                self.pos += HEADER_SIZE;
                self.chunk_remaining = declared;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Close the open logical record, discarding any unread payload bytes
    /// and the continuation chunks that carry them. Returns the number of
    /// payload bytes discarded. No-op between records.
    pub fn complete_record(&mut self) -> BiffResult<usize> {
        if self.current_sid.is_none() {
            return Ok(0);
        }
        let mut skipped = 0usize;
        loop {
            skipped += self.chunk_remaining;
            self.pos += self.chunk_remaining;
            self.chunk_remaining = 0;
            if !self.advance_to_continuation()? {
                break;
            }
        }
        self.current_sid = None;
        Ok(skipped)
    }

    /// Bytes left in the logical record: the current chunk remainder plus a
    /// forward scan over adjacent CONTINUE headers, without consuming them.
    fn logical_remaining(&self) -> usize {
        if self.current_sid.is_none() {
            return 0;
        }
        let mut total = self.chunk_remaining;
        let mut at = self.pos + self.chunk_remaining;
        while let Some((sid, declared)) = self.peek_header(at) {
            if sid != CONTINUE_SID {
                break;
            }
            // A truncated continuation still counts toward the declared
            // total; the read path reports it as TruncatedChunk.
            total += declared;
            at += HEADER_SIZE + declared;
            if at > self.data.len() {
                break;
            }
        }
        total
    }
}

impl BiffRead for RecordInputStream {
    fn read_exact(&mut self, buf: &mut [u8]) -> BiffResult<()> {
        let requested = buf.len();
        let remaining = self.logical_remaining();
        if requested > remaining {
            return Err(BiffError::ReadPastRecordEnd {
                sid: self.current_sid.unwrap_or(CONTINUE_SID),
                requested,
                remaining,
            });
        }
        let mut filled = 0;
        while filled < requested {
            if self.chunk_remaining == 0 {
                if !self.advance_to_continuation()? {
                    return Err(BiffError::ReadPastRecordEnd {
                        sid: self.current_sid.unwrap_or(CONTINUE_SID),
                        requested,
                        remaining: filled,
                    });
                }
                continue;
            }
            let n = (requested - filled).min(self.chunk_remaining);
            buf[filled..filled + n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            self.chunk_remaining -= n;
            filled += n;
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.logical_remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_RECORD_DATA;

    fn chunk(sid: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&sid.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_single_record() {
        let data = chunk(0x0042, &[0xB0, 0x04]);
        let mut stream = RecordInputStream::new(data);

        assert!(stream.has_next_record());
        assert_eq!(stream.peek_next_sid(), Some(0x0042));
        assert_eq!(stream.next_record().unwrap(), 0x0042);
        assert_eq!(stream.remaining(), 2);
        assert_eq!(stream.available_in_chunk(), 2);
        assert_eq!(stream.read_u16().unwrap(), 1200);
        assert_eq!(stream.remaining(), 0);
        stream.complete_record().unwrap();
        assert!(!stream.has_next_record());
    }

    #[test]
    fn test_zero_length_record() {
        let data = chunk(0x000A, &[]);
        let mut stream = RecordInputStream::new(data);
        assert_eq!(stream.next_record().unwrap(), 0x000A);
        assert_eq!(stream.remaining(), 0);
        assert!(stream.read_u8().is_err());
        assert_eq!(stream.complete_record().unwrap(), 0);
    }

    #[test]
    fn test_continuation_merge() {
        let mut data = chunk(0x00FC, &[1, 2, 3]);
        data.extend_from_slice(&chunk(CONTINUE_SID, &[4, 5]));
        data.extend_from_slice(&chunk(CONTINUE_SID, &[6]));
        data.extend_from_slice(&chunk(0x000A, &[]));

        let mut stream = RecordInputStream::new(data);
        assert_eq!(stream.next_record().unwrap(), 0x00FC);
        assert_eq!(stream.remaining(), 6);
        assert_eq!(stream.available_in_chunk(), 3);

        // Read across both continuation boundaries in one call
        let merged = stream.read_bytes(6).unwrap();
        assert_eq!(merged, [1, 2, 3, 4, 5, 6]);
        assert_eq!(stream.remaining(), 0);

        stream.complete_record().unwrap();
        assert_eq!(stream.next_record().unwrap(), 0x000A);
    }

    #[test]
    fn test_remaining_tracks_read_position() {
        let mut data = chunk(0x1025, &[0u8; 4]);
        data.extend_from_slice(&chunk(CONTINUE_SID, &[0u8; 4]));

        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        for expected in (0..8).rev() {
            assert_eq!(stream.remaining(), expected + 1);
            stream.read_u8().unwrap();
            assert_eq!(stream.remaining(), expected);
        }
    }

    #[test]
    fn test_record_end_is_not_a_continuation() {
        // Second record follows immediately; consuming the first must not
        // bleed into it.
        let mut data = chunk(0x0022, &[1, 0]);
        data.extend_from_slice(&chunk(0x0042, &[0xE4, 0x04]));

        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        assert_eq!(stream.read_u16().unwrap(), 1);
        assert_eq!(stream.remaining(), 0);
        assert!(stream.read_u8().is_err());
        stream.complete_record().unwrap();
        assert_eq!(stream.next_record().unwrap(), 0x0042);
        assert_eq!(stream.read_u16().unwrap(), 1252);
    }

    #[test]
    fn test_orphan_continuation() {
        let data = chunk(CONTINUE_SID, &[1, 2, 3]);
        let mut stream = RecordInputStream::new(data);
        assert!(matches!(
            stream.next_record(),
            Err(BiffError::OrphanContinuation { offset: 0 })
        ));
    }

    #[test]
    fn test_truncated_chunk() {
        // Header claims 10 payload bytes, source holds 2
        let mut data = Vec::new();
        data.extend_from_slice(&0x0201u16.to_le_bytes());
        data.extend_from_slice(&10u16.to_le_bytes());
        data.extend_from_slice(&[0xAA, 0xBB]);

        let mut stream = RecordInputStream::new(data);
        assert!(matches!(
            stream.next_record(),
            Err(BiffError::TruncatedChunk {
                sid: 0x0201,
                declared: 10,
                available: 2
            })
        ));
    }

    #[test]
    fn test_truncated_continuation() {
        let mut data = chunk(0x00FC, &[1, 2]);
        data.extend_from_slice(&CONTINUE_SID.to_le_bytes());
        data.extend_from_slice(&100u16.to_le_bytes());
        data.push(0xFF);

        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        let mut buf = [0u8; 3];
        assert!(matches!(
            stream.read_exact(&mut buf),
            Err(BiffError::TruncatedChunk { declared: 100, .. })
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut data = chunk(0x000A, &[]);
        data.extend_from_slice(&[0x09, 0x08]); // half a header
        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        stream.complete_record().unwrap();
        assert!(matches!(
            stream.next_record(),
            Err(BiffError::TruncatedHeader { available: 2 })
        ));
    }

    #[test]
    fn test_complete_record_discards_continuations() {
        let mut data = chunk(0x00FC, &[1, 2, 3]);
        data.extend_from_slice(&chunk(CONTINUE_SID, &[4, 5, 6, 7]));
        data.extend_from_slice(&chunk(0x000A, &[]));

        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        stream.read_u8().unwrap();
        assert_eq!(stream.complete_record().unwrap(), 6);
        assert_eq!(stream.next_record().unwrap(), 0x000A);
    }

    #[test]
    fn test_max_size_chunk_without_spurious_continuation() {
        // A full 8224-byte chunk followed by a different record must not
        // swallow that record as a continuation.
        let payload = vec![0x5A; MAX_RECORD_DATA];
        let mut data = chunk(0x00FC, &payload);
        data.extend_from_slice(&chunk(0x000A, &[]));

        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        assert_eq!(stream.remaining(), MAX_RECORD_DATA);
        assert_eq!(stream.read_bytes(MAX_RECORD_DATA).unwrap(), payload);
        assert_eq!(stream.remaining(), 0);
        stream.complete_record().unwrap();
        assert_eq!(stream.next_record().unwrap(), 0x000A);
    }

    #[test]
    fn test_checkpoint_rewind() {
        let data = chunk(0x0203, &[1, 2, 3, 4]);
        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        let mark = stream.checkpoint();
        stream.read_bytes(3).unwrap();
        stream.rewind(mark);
        assert_eq!(stream.remaining(), 4);
        assert_eq!(stream.read_bytes(4).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_next_record_auto_completes_open_record() {
        let mut data = chunk(0x0203, &[1, 2, 3, 4]);
        data.extend_from_slice(&chunk(0x000A, &[]));
        let mut stream = RecordInputStream::new(data);
        stream.next_record().unwrap();
        // Leave the payload unread and move on
        assert_eq!(stream.next_record().unwrap(), 0x000A);
    }
}
