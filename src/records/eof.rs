//! EOF (End of File) record.

use std::any::Any;

use crate::error::BiffResult;
use crate::record::Record;
use crate::stream::RecordInputStream;

/// EOF record (0x000A): closes a substream. Zero-length payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EofRecord;

impl EofRecord {
    /// Record type id
    pub const SID: u16 = 0x000A;

    /// Parse from the open logical record. Consumes nothing.
    pub fn parse(_input: &mut RecordInputStream) -> BiffResult<Self> {
        Ok(EofRecord)
    }
}

impl Record for EofRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        0
    }

    fn write_data(&self, _out: &mut Vec<u8>) {}

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
