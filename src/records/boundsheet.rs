//! BOUNDSHEET record: per-sheet metadata in the workbook globals.

use std::any::Any;

use crate::codec::{self, BiffRead};
use crate::error::{BiffError, BiffResult};
use crate::record::Record;
use crate::stream::RecordInputStream;

/// Sheet visibility states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetVisibility {
    /// Shown in the sheet tab bar
    Visible = 0x00,
    /// Hidden, unhideable through the UI
    Hidden = 0x01,
    /// Hidden, only unhideable through code
    VeryHidden = 0x02,
}

impl SheetVisibility {
    fn from_u8(value: u8) -> BiffResult<Self> {
        match value & 0x03 {
            0x00 => Ok(SheetVisibility::Visible),
            0x01 => Ok(SheetVisibility::Hidden),
            0x02 => Ok(SheetVisibility::VeryHidden),
            v => Err(BiffError::InvalidRecord {
                sid: BoundSheetRecord::SID,
                message: format!("invalid visibility value: {v}"),
            }),
        }
    }
}

/// Sheet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// Ordinary worksheet
    Worksheet = 0x00,
    /// Macro sheet
    MacroSheet = 0x01,
    /// Chart sheet
    ChartSheet = 0x02,
    /// Visual Basic module
    VbModule = 0x06,
}

impl SheetKind {
    fn from_u8(value: u8) -> BiffResult<Self> {
        match value {
            0x00 => Ok(SheetKind::Worksheet),
            0x01 => Ok(SheetKind::MacroSheet),
            0x02 => Ok(SheetKind::ChartSheet),
            0x06 => Ok(SheetKind::VbModule),
            v => Err(BiffError::InvalidRecord {
                sid: BoundSheetRecord::SID,
                message: format!("invalid sheet type: {v}"),
            }),
        }
    }
}

/// BOUNDSHEET record (0x0085): stream offset, visibility, type, and name of
/// one sheet. The name is a short Unicode string, so this record exercises
/// both legacy text encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSheetRecord {
    /// Absolute stream position of the sheet's BOF record
    pub bof_position: u32,
    /// Visibility state
    pub visibility: SheetVisibility,
    /// Sheet type
    pub kind: SheetKind,
    /// Sheet name, at most 31 characters in real files
    pub name: String,
}

impl BoundSheetRecord {
    /// Record type id
    pub const SID: u16 = 0x0085;

    /// A visible worksheet entry.
    pub fn worksheet(name: impl Into<String>) -> Self {
        BoundSheetRecord {
            bof_position: 0,
            visibility: SheetVisibility::Visible,
            kind: SheetKind::Worksheet,
            name: name.into(),
        }
    }

    /// Parse from the open logical record.
    pub fn parse(input: &mut RecordInputStream) -> BiffResult<Self> {
        let bof_position = input.read_u32()?;
        let visibility = SheetVisibility::from_u8(input.read_u8()?)?;
        let kind = SheetKind::from_u8(input.read_u8()?)?;
        let name = codec::read_short_unicode_string(input)?;

        Ok(BoundSheetRecord {
            bof_position,
            visibility,
            kind,
            name,
        })
    }
}

impl Record for BoundSheetRecord {
    fn sid(&self) -> u16 {
        Self::SID
    }

    fn data_size(&self) -> usize {
        6 + codec::short_unicode_string_size(&self.name)
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.bof_position.to_le_bytes());
        out.push(self.visibility as u8);
        out.push(self.kind as u8);
        codec::write_short_unicode_string(out, &self.name);
    }

    fn clone_record(&self) -> Box<dyn Record> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
