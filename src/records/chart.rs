//! CHART record: position and size of a chart frame.

use std::any::Any;

use crate::codec::BiffRead;
use crate::error::BiffResult;
use crate::record::Record;
use crate::stream::RecordInputStream;

/// CHART record (0x1002): chart frame position and size, four signed
/// little-endian 32-bit fixed-point values. Only meaningful inside a chart
/// substream; the same sid means something else in other contexts, which is
/// why it is registered in [`RecordRegistry::chart`] and nowhere else.
///
/// [`RecordRegistry::chart`]: crate::registry::RecordRegistry::chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRecord {
    /// Horizontal position of the frame
    pub x: i32,
    /// Vertical position of the frame
    pub y: i32,
    /// Frame width
    pub width: i32,
    /// Frame height
    pub height: i32,
}

impl ChartRecord {
    /// Record type id
    pub const SID: u16 = 0x1002;

    /// Parse from the open logical record.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        Ok(ChartRecord {
            x: input.read_i32()?,
            y: input.read_i32()?,
            width: input.read_i32()?,
            height: input.read_i32()?,
        })
    }
}

impl Record for ChartRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        16
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.x.to_le_bytes());
        out.extend_from_slice(&self.y.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
