//! Small fixed-layout bookkeeping records: CODEPAGE, DATE1904, DIMENSIONS.

use std::any::Any;

use crate::codec::BiffRead;
use crate::error::{BiffError, BiffResult};
use crate::record::Record;
use crate::stream::RecordInputStream;

/// CODEPAGE record (0x0042): text encoding of the stream's compressed
/// strings. 1200 means UTF-16 and marks a BIFF8 writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepageRecord {
    /// Windows code page identifier
    pub codepage: u16,
}

impl CodepageRecord {
    /// Record type id
    pub const SID: u16 = 0x0042;

    /// Parse from the open logical record.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        Ok(CodepageRecord {
            codepage: input.read_u16()?,
        })
    }
}

impl Record for CodepageRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        2
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.codepage.to_le_bytes());
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// DATE1904 record (0x0022): which epoch serial dates count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date1904Record {
    /// True for the 1904 (Mac) date system, false for 1900 (Windows)
    pub is_1904: bool,
}

impl Date1904Record {
    /// Record type id
    pub const SID: u16 = 0x0022;

    /// Parse from the open logical record.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        Ok(Date1904Record {
            is_1904: input.read_u16()? != 0,
        })
    }
}

impl Record for Date1904Record {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        2
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&u16::from(self.is_1904).to_le_bytes());
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// DIMENSIONS record (0x0200): used cell range of a sheet.
///
/// BIFF8 stores 32-bit row indices in a 14-byte payload; BIFF5 used 16-bit
/// rows in 10 bytes. Both parse, and each serializes back in the layout it
/// arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionsRecord {
    /// First used row
    pub first_row: u32,
    /// Last used row, plus one
    pub last_row: u32,
    /// First used column
    pub first_col: u16,
    /// Last used column, plus one
    pub last_col: u16,
    reserved: u16,
    compact: bool,
}

impl DimensionsRecord {
    /// Record type id
    pub const SID: u16 = 0x0200;

    /// A BIFF8-layout dimensions record.
    pub fn new(first_row: u32, last_row: u32, first_col: u16, last_col: u16) -> Self {
        DimensionsRecord {
            first_row,
            last_row,
            first_col,
            last_col,
            reserved: 0,
            compact: false,
        }
    }

    /// Parse from the open logical record, accepting either layout.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        match input.remaining() {
            14 => Ok(DimensionsRecord {
                first_row: input.read_u32()?,
                last_row: input.read_u32()?,
                first_col: input.read_u16()?,
                last_col: input.read_u16()?,
                reserved: input.read_u16()?,
                compact: false,
            }),
            10 => Ok(DimensionsRecord {
                first_row: input.read_u16()? as u32,
                last_row: input.read_u16()? as u32,
                first_col: input.read_u16()?,
                last_col: input.read_u16()?,
                reserved: input.read_u16()?,
                compact: true,
            }),
            found => Err(BiffError::InvalidRecord {
                sid: Self::SID,
                message: format!("expected a 10 or 14 byte payload, found {found}"),
            }),
        }
    }
}

impl Record for DimensionsRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        if self.compact { 10 } else { 14 }
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        if self.compact {
            out.extend_from_slice(&(self.first_row as u16).to_le_bytes());
            out.extend_from_slice(&(self.last_row as u16).to_le_bytes());
        } else {
            out.extend_from_slice(&self.first_row.to_le_bytes());
            out.extend_from_slice(&self.last_row.to_le_bytes());
        }
        out.extend_from_slice(&self.first_col.to_le_bytes());
        out.extend_from_slice(&self.last_col.to_le_bytes());
        out.extend_from_slice(&self.reserved.to_le_bytes());
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(*self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
