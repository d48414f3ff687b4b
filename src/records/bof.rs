//! BOF (Beginning of File) record.

use std::any::Any;

use crate::codec::BiffRead;
use crate::error::BiffResult;
use crate::record::Record;
use crate::stream::RecordInputStream;

/// BOF record (0x0809): opens a substream.
///
/// Only the version and substream type are guaranteed; early BIFF writers
/// truncate the trailing build and compatibility fields, so each is gated on
/// bytes remaining in the record, in order. Presence is prefix-consistent: a
/// later field being `Some` implies all earlier ones are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BofRecord {
    /// BIFF version tag (0x0600 for BIFF8)
    pub version: u16,
    /// Substream type (workbook globals, worksheet, chart, macro)
    pub substream: u16,
    /// Build identifier of the writing application
    pub build: Option<u16>,
    /// Build year of the writing application
    pub build_year: Option<u16>,
    /// File history flags
    pub history_flags: Option<u32>,
    /// Lowest BIFF version that can read this substream
    pub lowest_version: Option<u32>,
}

impl BofRecord {
    /// Record type id
    pub const SID: u16 = 0x0809;

    /// BIFF8 version tag
    pub const BIFF8_VERSION: u16 = 0x0600;

    /// A full BIFF8 BOF for the given substream type.
    pub fn biff8(substream: u16) -> Self {
        BofRecord {
            version: Self::BIFF8_VERSION,
            substream,
            build: Some(0x0DBB),
            build_year: Some(0x07CC),
            history_flags: Some(0x0000_0001),
            lowest_version: Some(0x0000_0006),
        }
    }

    /// Parse from the open logical record.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        let version = input.read_u16()?;
        let substream = input.read_u16()?;
        let build = if input.remaining() >= 2 {
            Some(input.read_u16()?)
        } else {
            None
        };
        let build_year = if input.remaining() >= 2 {
            Some(input.read_u16()?)
        } else {
            None
        };
        let history_flags = if input.remaining() >= 4 {
            Some(input.read_u32()?)
        } else {
            None
        };
        let lowest_version = if input.remaining() >= 4 {
            Some(input.read_u32()?)
        } else {
            None
        };

        Ok(BofRecord {
            version,
            substream,
            build,
            build_year,
            history_flags,
            lowest_version,
        })
    }
}

impl Record for BofRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        4 + self.build.map_or(0, |_| 2)
            + self.build_year.map_or(0, |_| 2)
            + self.history_flags.map_or(0, |_| 4)
            + self.lowest_version.map_or(0, |_| 4)
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.substream.to_le_bytes());
        if let Some(build) = self.build {
            out.extend_from_slice(&build.to_le_bytes());
        }
        if let Some(build_year) = self.build_year {
            out.extend_from_slice(&build_year.to_le_bytes());
        }
        if let Some(history_flags) = self.history_flags {
            out.extend_from_slice(&history_flags.to_le_bytes());
        }
        if let Some(lowest_version) = self.lowest_version {
            out.extend_from_slice(&lowest_version.to_le_bytes());
        }
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
