//! Record type registry and dispatch loop.
//!
//! A [`RecordRegistry`] maps sids to record constructors. It is an explicit
//! value built once at startup and handed to the [`RecordFactory`], not a
//! global table: some legacy sids carry different meanings in different
//! substream contexts (a chart substream reuses ids the workbook globals
//! assign elsewhere), so callers keep one registry per context and pick the
//! right one when they enter a substream.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{BiffError, BiffResult};
use crate::codec::BiffRead;
use crate::record::{Record, UnknownRecord};
use crate::records::{
    BofRecord, BoundSheetRecord, ChartRecord, CodepageRecord, Date1904Record, DimensionsRecord,
    EofRecord,
};
use crate::stream::RecordInputStream;

/// Constructor for one record type, invoked with the stream positioned at
/// the start of the logical record's payload.
pub type RecordCtor = fn(&mut RecordInputStream) -> BiffResult<Box<dyn Record>>;

/// Maps record type ids to constructors.
#[derive(Clone, Default)]
pub struct RecordRegistry {
    ctors: HashMap<u16, RecordCtor>,
}

impl RecordRegistry {
    /// An empty registry. Every record decodes as [`UnknownRecord`].
    pub fn new() -> Self {
        RecordRegistry::default()
    }

    /// Registry for the workbook-globals substream: stream structure and
    /// bookkeeping records.
    pub fn workbook() -> Self {
        let mut registry = RecordRegistry::new();
        registry.register(BofRecord::SID, |input| {
            Ok(Box::new(BofRecord::parse(input)?))
        });
        registry.register(EofRecord::SID, |input| {
            Ok(Box::new(EofRecord::parse(input)?))
        });
        registry.register(CodepageRecord::SID, |input| {
            Ok(Box::new(CodepageRecord::parse(input)?))
        });
        registry.register(Date1904Record::SID, |input| {
            Ok(Box::new(Date1904Record::parse(input)?))
        });
        registry.register(DimensionsRecord::SID, |input| {
            Ok(Box::new(DimensionsRecord::parse(input)?))
        });
        registry.register(BoundSheetRecord::SID, |input| {
            Ok(Box::new(BoundSheetRecord::parse(input)?))
        });
        registry
    }

    /// Registry for a chart substream: the workbook table plus the record
    /// types whose sids are only meaningful inside a chart.
    pub fn chart() -> Self {
        let mut registry = RecordRegistry::workbook();
        registry.register(ChartRecord::SID, |input| {
            Ok(Box::new(ChartRecord::parse(input)?))
        });
        registry
    }

    /// Bind a constructor to a sid, replacing any previous binding.
    pub fn register(&mut self, sid: u16, ctor: RecordCtor) {
        self.ctors.insert(sid, ctor);
    }

    /// Remove a binding. Returns whether one was present.
    pub fn unregister(&mut self, sid: u16) -> bool {
        self.ctors.remove(&sid).is_some()
    }

    /// Look up the constructor for a sid.
    pub fn get(&self, sid: u16) -> Option<RecordCtor> {
        self.ctors.get(&sid).copied()
    }

    /// Whether a constructor is bound for `sid`.
    pub fn contains(&self, sid: u16) -> bool {
        self.ctors.contains_key(&sid)
    }

    /// Number of registered record types.
    pub fn len(&self) -> usize {
        self.ctors.len()
    }

    /// True when no record types are registered.
    pub fn is_empty(&self) -> bool {
        self.ctors.is_empty()
    }
}

impl std::fmt::Debug for RecordRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordRegistry")
            .field("types", &self.ctors.len())
            .finish()
    }
}

/// How to treat a record parser that consumes a different number of payload
/// bytes than the chunk declared.
///
/// Real-world files contain slack bytes in some records, so round-tripping
/// favors [`Lenient`](LengthPolicy::Lenient); validation tooling runs
/// [`Strict`](LengthPolicy::Strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Any length mismatch is a fatal error naming the sid and byte delta.
    Strict,
    /// Warn, reposition the cursor to the declared record end, continue.
    #[default]
    Lenient,
}

/// Drives the read loop: peek sid, dispatch to the registry, collect.
pub struct RecordFactory<'a> {
    registry: &'a RecordRegistry,
    policy: LengthPolicy,
}

impl<'a> RecordFactory<'a> {
    /// Factory with the default lenient length policy.
    pub fn new(registry: &'a RecordRegistry) -> Self {
        RecordFactory {
            registry,
            policy: LengthPolicy::default(),
        }
    }

    /// Factory with an explicit length policy.
    pub fn with_policy(registry: &'a RecordRegistry, policy: LengthPolicy) -> Self {
        RecordFactory { registry, policy }
    }

    /// The active length policy.
    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Decode every remaining record in the stream, in order.
    ///
    /// Framing errors abort the whole decode; byte offsets are unrecoverable
    /// once framing is lost. Cancellation is simply not calling again.
    pub fn read_records(&self, stream: &mut RecordInputStream) -> BiffResult<Vec<Box<dyn Record>>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record(stream)? {
            records.push(record);
        }
        Ok(records)
    }

    /// Decode the next record, or `None` when the stream is exhausted.
    pub fn read_record(
        &self,
        stream: &mut RecordInputStream,
    ) -> BiffResult<Option<Box<dyn Record>>> {
        if !stream.has_next_record() {
            return Ok(None);
        }
        let sid = stream.next_record()?;
        let declared = stream.remaining();

        let Some(ctor) = self.registry.get(sid) else {
            debug!("no constructor for sid 0x{sid:04X}, preserving {declared} bytes verbatim");
            let record = UnknownRecord::parse(sid, stream)?;
            stream.complete_record()?;
            return Ok(Some(Box::new(record)));
        };

        let mark = stream.checkpoint();
        match ctor(stream) {
            Ok(record) => {
                let leftover = stream.remaining();
                if leftover > 0 {
                    match self.policy {
                        LengthPolicy::Strict => {
                            return Err(BiffError::PayloadSizeMismatch {
                                sid,
                                declared,
                                consumed: declared - leftover,
                            });
                        }
                        LengthPolicy::Lenient => {
                            warn!(
                                "record 0x{sid:04X}: parser consumed {} of {declared} payload bytes, skipping the rest",
                                declared - leftover
                            );
                        }
                    }
                }
                stream.complete_record()?;
                Ok(Some(record))
            }
            Err(err @ BiffError::ReadPastRecordEnd { .. }) => match self.policy {
                LengthPolicy::Strict => Err(err),
                LengthPolicy::Lenient => {
                    warn!("record 0x{sid:04X}: {err}, preserving payload verbatim");
                    stream.rewind(mark);
                    let record = UnknownRecord::parse(sid, stream)?;
                    stream.complete_record()?;
                    Ok(Some(Box::new(record)))
                }
            },
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CONTINUE_SID;

    fn chunk(sid: u16, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&sid.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn test_dispatch_known_records() {
        let mut data = chunk(0x0042, &1252u16.to_le_bytes());
        data.extend_from_slice(&chunk(0x0022, &0u16.to_le_bytes()));
        data.extend_from_slice(&chunk(0x000A, &[]));

        let registry = RecordRegistry::workbook();
        let factory = RecordFactory::new(&registry);
        let mut stream = RecordInputStream::new(data);
        let records = factory.read_records(&mut stream).unwrap();

        assert_eq!(records.len(), 3);
        let codepage = records[0]
            .as_any()
            .downcast_ref::<CodepageRecord>()
            .unwrap();
        assert_eq!(codepage.codepage, 1252);
        assert!(records[1].as_any().downcast_ref::<Date1904Record>().is_some());
        assert!(records[2].as_any().downcast_ref::<EofRecord>().is_some());
    }

    #[test]
    fn test_unknown_sid_becomes_passthrough() {
        let data = chunk(0x7777, &[1, 2, 3, 4, 5]);
        let registry = RecordRegistry::workbook();
        let factory = RecordFactory::new(&registry);
        let mut stream = RecordInputStream::new(data);
        let records = factory.read_records(&mut stream).unwrap();

        assert_eq!(records.len(), 1);
        let unknown = records[0].as_any().downcast_ref::<UnknownRecord>().unwrap();
        assert_eq!(unknown.sid(), 0x7777);
        assert_eq!(unknown.data(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lenient_skips_slack_bytes() {
        // CODEPAGE with two trailing slack bytes; lenient mode parses and
        // repositions, leaving the next record intact.
        let mut payload = 1200u16.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0xCC, 0xDD]);
        let mut data = chunk(0x0042, &payload);
        data.extend_from_slice(&chunk(0x000A, &[]));

        let registry = RecordRegistry::workbook();
        let factory = RecordFactory::with_policy(&registry, LengthPolicy::Lenient);
        let mut stream = RecordInputStream::new(data);
        let records = factory.read_records(&mut stream).unwrap();

        assert_eq!(records.len(), 2);
        let codepage = records[0]
            .as_any()
            .downcast_ref::<CodepageRecord>()
            .unwrap();
        assert_eq!(codepage.codepage, 1200);
    }

    #[test]
    fn test_strict_rejects_slack_bytes() {
        let mut payload = 1200u16.to_le_bytes().to_vec();
        payload.extend_from_slice(&[0xCC, 0xDD]);
        let data = chunk(0x0042, &payload);

        let registry = RecordRegistry::workbook();
        let factory = RecordFactory::with_policy(&registry, LengthPolicy::Strict);
        let mut stream = RecordInputStream::new(data);
        let err = factory.read_records(&mut stream).unwrap_err();
        assert!(matches!(
            err,
            BiffError::PayloadSizeMismatch {
                sid: 0x0042,
                declared: 4,
                consumed: 2
            }
        ));
    }

    #[test]
    fn test_lenient_preserves_short_payload_verbatim() {
        // CODEPAGE with a single payload byte: the parser needs two. Strict
        // fails; lenient falls back to a byte-preserving passthrough.
        let data = chunk(0x0042, &[0x2A]);
        let registry = RecordRegistry::workbook();

        let strict = RecordFactory::with_policy(&registry, LengthPolicy::Strict);
        let mut stream = RecordInputStream::new(data.clone());
        assert!(matches!(
            strict.read_records(&mut stream).unwrap_err(),
            BiffError::ReadPastRecordEnd { sid: 0x0042, .. }
        ));

        let lenient = RecordFactory::with_policy(&registry, LengthPolicy::Lenient);
        let mut stream = RecordInputStream::new(data);
        let records = lenient.read_records(&mut stream).unwrap();
        assert_eq!(records.len(), 1);
        let unknown = records[0].as_any().downcast_ref::<UnknownRecord>().unwrap();
        assert_eq!(unknown.data(), &[0x2A]);
    }

    #[test]
    fn test_per_context_registries_disagree_on_a_sid() {
        let data = chunk(ChartRecord::SID, &[0u8; 16]);

        let workbook = RecordRegistry::workbook();
        let factory = RecordFactory::new(&workbook);
        let mut stream = RecordInputStream::new(data.clone());
        let records = factory.read_records(&mut stream).unwrap();
        assert!(records[0].as_any().downcast_ref::<UnknownRecord>().is_some());

        let chart = RecordRegistry::chart();
        let factory = RecordFactory::new(&chart);
        let mut stream = RecordInputStream::new(data);
        let records = factory.read_records(&mut stream).unwrap();
        assert!(records[0].as_any().downcast_ref::<ChartRecord>().is_some());
    }

    #[test]
    fn test_register_and_unregister() {
        let mut registry = RecordRegistry::new();
        assert!(registry.is_empty());
        registry.register(0x1002, |input| Ok(Box::new(ChartRecord::parse(input)?)));
        assert!(registry.contains(0x1002));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(0x1002));
        assert!(!registry.unregister(0x1002));
    }

    #[test]
    fn test_continued_record_dispatch() {
        // An unknown record split across a continuation merges before parse.
        let mut data = chunk(0x0666, &[1, 2, 3]);
        data.extend_from_slice(&chunk(CONTINUE_SID, &[4, 5]));

        let registry = RecordRegistry::workbook();
        let factory = RecordFactory::new(&registry);
        let mut stream = RecordInputStream::new(data);
        let records = factory.read_records(&mut stream).unwrap();
        let unknown = records[0].as_any().downcast_ref::<UnknownRecord>().unwrap();
        assert_eq!(unknown.data(), &[1, 2, 3, 4, 5]);
    }
}
