/// Record type id of the CONTINUE record. A CONTINUE chunk carries overflow
/// payload bytes of the immediately preceding record and has no meaning of
/// its own.
pub const CONTINUE_SID: u16 = 0x003C;

/// Size of a physical chunk header in bytes (sid + length, both u16 LE)
pub const HEADER_SIZE: usize = 4;

/// Maximum net payload bytes of one physical chunk (BIFF8)
///
/// The length field could address 65535 bytes, but the classic binary
/// container caps each chunk at 8224 payload bytes and spills the rest into
/// CONTINUE chunks.
pub const MAX_RECORD_DATA: usize = 8224;

// BOF subtypes (the `dt` field)
/// Workbook globals substream
pub const BOF_WORKBOOK_GLOBALS: u16 = 0x0005;
/// Worksheet substream
pub const BOF_WORKSHEET: u16 = 0x0010;
/// Chart substream
pub const BOF_CHART: u16 = 0x0020;
/// Macro sheet substream
pub const BOF_MACRO: u16 = 0x0040;
