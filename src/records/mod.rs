//! Built-in record types.
//!
//! Only the stream-structure and bookkeeping records the framework itself
//! needs are defined here; the hundreds of remaining payload layouts are
//! plain fixed structs on top of the same [`Record`](crate::record::Record)
//! contract and live with their consumers.

mod bof;
mod boundsheet;
mod chart;
mod eof;
mod misc;

pub use bof::BofRecord;
pub use boundsheet::{BoundSheetRecord, SheetKind, SheetVisibility};
pub use chart::ChartRecord;
pub use eof::EofRecord;
pub use misc::{CodepageRecord, Date1904Record, DimensionsRecord};
