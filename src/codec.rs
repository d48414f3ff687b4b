//! Little-endian byte codec for BIFF record payloads.
//!
//! All multi-byte values in a BIFF stream are little-endian. This module
//! provides the primitive slice-level readers, the [`BiffRead`] cursor trait
//! implemented by the record input stream, and the two legacy string
//! encodings: compressed (one byte per character, Windows-1252) and
//! uncompressed (UTF-16LE, two bytes per character).

use crate::error::{BiffError, BiffResult};
use encoding_rs::WINDOWS_1252;
use zerocopy::{F64, FromBytes, I16, I32, I64, LE, U16, U32, U64};

/// Read a little-endian u16 from a byte slice at the given offset.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BiffResult<u16> {
    if offset + 2 > data.len() {
        return Err(BiffError::Encoding("not enough data for u16".to_string()));
    }
    U16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read u16".to_string())))
}

/// Read a little-endian i16 from a byte slice at the given offset.
#[inline]
pub fn read_i16_le(data: &[u8], offset: usize) -> BiffResult<i16> {
    if offset + 2 > data.len() {
        return Err(BiffError::Encoding("not enough data for i16".to_string()));
    }
    I16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read i16".to_string())))
}

/// Read a little-endian u32 from a byte slice at the given offset.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BiffResult<u32> {
    if offset + 4 > data.len() {
        return Err(BiffError::Encoding("not enough data for u32".to_string()));
    }
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read u32".to_string())))
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BiffResult<i32> {
    if offset + 4 > data.len() {
        return Err(BiffError::Encoding("not enough data for i32".to_string()));
    }
    I32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read i32".to_string())))
}

/// Read a little-endian u64 from a byte slice at the given offset.
#[inline]
pub fn read_u64_le(data: &[u8], offset: usize) -> BiffResult<u64> {
    if offset + 8 > data.len() {
        return Err(BiffError::Encoding("not enough data for u64".to_string()));
    }
    U64::<LE>::read_from_bytes(&data[offset..offset + 8])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read u64".to_string())))
}

/// Read a little-endian i64 from a byte slice at the given offset.
#[inline]
pub fn read_i64_le(data: &[u8], offset: usize) -> BiffResult<i64> {
    if offset + 8 > data.len() {
        return Err(BiffError::Encoding("not enough data for i64".to_string()));
    }
    I64::<LE>::read_from_bytes(&data[offset..offset + 8])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read i64".to_string())))
}

/// Read a little-endian f64 from a byte slice at the given offset.
#[inline]
pub fn read_f64_le(data: &[u8], offset: usize) -> BiffResult<f64> {
    if offset + 8 > data.len() {
        return Err(BiffError::Encoding("not enough data for f64".to_string()));
    }
    F64::<LE>::read_from_bytes(&data[offset..offset + 8])
        .map(|v| v.get())
        .or_else(|_| Err(BiffError::Encoding("failed to read f64".to_string())))
}

/// Forward-only little-endian cursor over a logical record payload.
///
/// Implemented by [`RecordInputStream`](crate::stream::RecordInputStream),
/// where reads roll transparently across CONTINUE chunk boundaries. Reading
/// past the declared end of the current logical record is an error, never
/// silent truncation.
pub trait BiffRead {
    /// Fill `buf` completely from the cursor, or fail without partial state.
    fn read_exact(&mut self, buf: &mut [u8]) -> BiffResult<()>;

    /// Bytes remaining in the full logical record, continuations included.
    fn remaining(&self) -> usize;

    /// Read a single byte.
    fn read_u8(&mut self) -> BiffResult<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian u16.
    fn read_u16(&mut self) -> BiffResult<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        read_u16_le(&buf, 0)
    }

    /// Read a little-endian i16.
    fn read_i16(&mut self) -> BiffResult<i16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        read_i16_le(&buf, 0)
    }

    /// Read a little-endian u32.
    fn read_u32(&mut self) -> BiffResult<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        read_u32_le(&buf, 0)
    }

    /// Read a little-endian i32.
    fn read_i32(&mut self) -> BiffResult<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        read_i32_le(&buf, 0)
    }

    /// Read a little-endian u64.
    fn read_u64(&mut self) -> BiffResult<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        read_u64_le(&buf, 0)
    }

    /// Read a little-endian i64.
    fn read_i64(&mut self) -> BiffResult<i64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        read_i64_le(&buf, 0)
    }

    /// Read a little-endian IEEE 754 double.
    fn read_f64(&mut self) -> BiffResult<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        read_f64_le(&buf, 0)
    }

    /// Read `count` raw bytes into a fresh vector.
    fn read_bytes(&mut self, count: usize) -> BiffResult<Vec<u8>> {
        let mut buf = vec![0u8; count];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Discard `count` bytes from the cursor.
    fn skip(&mut self, count: usize) -> BiffResult<()> {
        let mut scratch = [0u8; 64];
        let mut left = count;
        while left > 0 {
            let n = left.min(scratch.len());
            self.read_exact(&mut scratch[..n])?;
            left -= n;
        }
        Ok(())
    }
}

/// Decode a string body of `char_count` characters from the cursor.
///
/// Consumes exactly `char_count * 2` bytes when `double_byte` is set
/// (UTF-16LE), otherwise exactly `char_count` bytes (Windows-1252).
pub fn read_string_body<R: BiffRead + ?Sized>(
    input: &mut R,
    char_count: usize,
    double_byte: bool,
) -> BiffResult<String> {
    if double_byte {
        let buf = input.read_bytes(char_count * 2)?;
        let units: Vec<u16> = buf
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16(&units)
            .map_err(|e| BiffError::Encoding(format!("invalid UTF-16 text: {e}")))
    } else {
        let buf = input.read_bytes(char_count)?;
        Ok(WINDOWS_1252.decode(&buf).0.into_owned())
    }
}

/// Read a BIFF8 Unicode string: cch u16, flags u8, then the body.
///
/// Only the low flag bit (compressed vs double-byte) is interpreted; rich
/// text and phonetic extensions belong to specific payloads, not the codec.
pub fn read_unicode_string<R: BiffRead + ?Sized>(input: &mut R) -> BiffResult<String> {
    let cch = input.read_u16()? as usize;
    let flags = input.read_u8()?;
    read_string_body(input, cch, flags & 0x01 != 0)
}

/// Read a short BIFF8 Unicode string: cch u8, flags u8, then the body.
/// Used for sheet names and other small labels.
pub fn read_short_unicode_string<R: BiffRead + ?Sized>(input: &mut R) -> BiffResult<String> {
    let cch = input.read_u8()? as usize;
    let flags = input.read_u8()?;
    read_string_body(input, cch, flags & 0x01 != 0)
}

/// Write a BIFF8 Unicode string: cch u16, flags u8, then the body.
///
/// Strings that fit Windows-1252 are written compressed; anything else falls
/// back to UTF-16LE with the double-byte flag set.
pub fn write_unicode_string(out: &mut Vec<u8>, value: &str) {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(value);
    if unmappable {
        let units: Vec<u16> = value.encode_utf16().collect();
        let cch = units.len().min(0xFFFF);
        out.extend_from_slice(&(cch as u16).to_le_bytes());
        out.push(0x01);
        for unit in &units[..cch] {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    } else {
        let cch = bytes.len().min(0xFFFF);
        out.extend_from_slice(&(cch as u16).to_le_bytes());
        out.push(0x00);
        out.extend_from_slice(&bytes[..cch]);
    }
}

/// Write a short BIFF8 Unicode string: cch u8, flags u8, then the body.
pub fn write_short_unicode_string(out: &mut Vec<u8>, value: &str) {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(value);
    if unmappable {
        let units: Vec<u16> = value.encode_utf16().collect();
        let cch = units.len().min(0xFF);
        out.push(cch as u8);
        out.push(0x01);
        for unit in &units[..cch] {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    } else {
        let cch = bytes.len().min(0xFF);
        out.push(cch as u8);
        out.push(0x00);
        out.extend_from_slice(&bytes[..cch]);
    }
}

/// Serialized size of [`write_unicode_string`] output for `value`.
pub fn unicode_string_size(value: &str) -> usize {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(value);
    if unmappable {
        3 + value.encode_utf16().count().min(0xFFFF) * 2
    } else {
        3 + bytes.len().min(0xFFFF)
    }
}

/// Serialized size of [`write_short_unicode_string`] output for `value`.
pub fn short_unicode_string_size(value: &str) -> usize {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(value);
    if unmappable {
        2 + value.encode_utf16().count().min(0xFF) * 2
    } else {
        2 + bytes.len().min(0xFF)
    }
}
