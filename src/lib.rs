//! Biffstream - a binary record stream framework for legacy Office files
//!
//! This library implements the generic container mechanism underneath the
//! BIFF binary format used by .xls files: a stream of physical chunks, each
//! framed as `{sid: u16 LE, length: u16 LE, payload}`, where payloads larger
//! than the 8224-byte chunk cap spill into CONTINUE chunks.
//!
//! # Features
//!
//! - **Record input stream**: merges continuation chunks so payload parsers
//!   see one contiguous logical record, while "bytes remaining" stays
//!   queryable for layouts with optional trailing fields
//! - **Registry dispatch**: explicit per-context registries map sids to
//!   constructors; unknown sids round-trip byte-for-byte as passthrough
//!   records
//! - **Continuation splitting**: the write path recomputes record lengths,
//!   verifies them against the bytes actually emitted, and re-splits
//!   oversized payloads into CONTINUE chunks
//! - **Length policies**: strict for validation tooling, lenient (default)
//!   for round-tripping real-world files with slack bytes
//!
//! # Example - decoding a record stream
//!
//! ```
//! use biffstream::records::ChartRecord;
//! use biffstream::{Record, RecordFactory, RecordInputStream, RecordRegistry, RecordWriter};
//!
//! # fn main() -> biffstream::BiffResult<()> {
//! let records: Vec<Box<dyn Record>> = vec![Box::new(ChartRecord {
//!     x: 0,
//!     y: 0,
//!     width: 1000,
//!     height: 600,
//! })];
//!
//! // Serialize, then decode with the chart-substream registry
//! let bytes = RecordWriter::new().serialize_records(&records)?;
//! let registry = RecordRegistry::chart();
//! let factory = RecordFactory::new(&registry);
//! let mut stream = RecordInputStream::new(bytes);
//! let decoded = factory.read_records(&mut stream)?;
//!
//! let chart = decoded[0].as_any().downcast_ref::<ChartRecord>().unwrap();
//! assert_eq!(chart.width, 1000);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - parsing a payload by hand
//!
//! ```
//! use biffstream::{BiffRead, RecordInputStream};
//!
//! # fn main() -> biffstream::BiffResult<()> {
//! // One chunk: sid 0x0042, two payload bytes
//! let mut stream = RecordInputStream::new(vec![0x42, 0x00, 0x02, 0x00, 0xB0, 0x04]);
//! let sid = stream.next_record()?;
//! assert_eq!(sid, 0x0042);
//! assert_eq!(stream.read_u16()?, 1200);
//! assert_eq!(stream.remaining(), 0);
//! # Ok(())
//! # }
//! ```

/// Little-endian primitive and string codecs
pub mod codec;

/// Wire constants: continuation sid, chunk cap, header size
pub mod consts;

/// Error types
pub mod error;

/// The record contract and the unknown-record passthrough
pub mod record;

/// Built-in stream-structure record types
pub mod records;

/// Record type registry and the dispatch loop
pub mod registry;

/// Record input stream: framing and continuation merging
pub mod stream;

/// Serialization framing and continuation splitting
pub mod writer;

// Re-export commonly used types for convenience
pub use codec::BiffRead;
pub use error::{BiffError, BiffResult};
pub use record::{Record, UnknownRecord};
pub use registry::{LengthPolicy, RecordCtor, RecordFactory, RecordRegistry};
pub use stream::{Checkpoint, RecordInputStream};
pub use writer::RecordWriter;
