use crate::error::{CdrError, Result};

/// Encapsulation header: representation id (2, big-endian) + options (2) = 4 bytes.
pub const ENCAPSULATION_HEADER_SIZE: usize = 4;

/// Representation id for little-endian plain CDR (`00 01`).
pub const CDR_LE: u16 = 0x0001;

/// Cursor over a CDR body with per-primitive alignment.
///
/// Offsets are relative to the start of the wrapped slice. When built with
/// [`CdrReader::from_encapsulated`] the slice starts right after the
/// encapsulation header, which is the origin CDR alignment is measured from.
#[derive(Debug, Clone)]
pub struct CdrReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> CdrReader<'a> {
    /// Wrap a bare CDR body.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Validate the encapsulation header and wrap the body that follows it.
    ///
    /// Only plain little-endian CDR ([`CDR_LE`]) is accepted. Parameter-list
    /// and XCDR2 representations lay fields out differently.
    pub fn from_encapsulated(payload: &'a [u8]) -> Result<Self> {
        if payload.len() < ENCAPSULATION_HEADER_SIZE {
            return Err(CdrError::MissingEncapsulation {
                len: payload.len(),
            });
        }

        let representation = u16::from_be_bytes([payload[0], payload[1]]);
        if representation != CDR_LE {
            return Err(CdrError::UnsupportedRepresentation(representation));
        }

        Ok(Self::new(&payload[ENCAPSULATION_HEADER_SIZE..]))
    }

    /// Current cursor offset from the start of the body.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Advance the cursor to the next multiple of `alignment`.
    ///
    /// Padding past the end of the buffer is an out-of-bounds error, so a
    /// truncated payload is reported at the field that needed the padding.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let pad = padding(self.pos, alignment);
        self.take(pad).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_aligned::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_aligned::<4>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_aligned::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_aligned::<8>()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_aligned::<8>()?))
    }

    /// Read a fixed-size `float64` array (e.g. a 3x3 covariance block).
    pub fn read_f64_array<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut out = [0.0; N];
        for value in &mut out {
            *value = self.read_f64()?;
        }
        Ok(out)
    }

    /// Read a CDR string: `uint32` length (including NUL), then the bytes.
    ///
    /// The trailing NUL is stripped. The cursor is left directly after the
    /// string; the next primitive applies its own alignment.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        let bytes = bytes.strip_suffix(b"\0").unwrap_or(bytes);
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CdrError::InvalidUtf8 { offset: start })
    }

    /// Read a CDR string and pad the cursor to the next 4-byte boundary.
    ///
    /// The pad is `(4 - len % 4) % 4` bytes for a length field of `len`,
    /// so the following field starts 4-aligned.
    pub fn read_aligned_string(&mut self) -> Result<String> {
        let value = self.read_string()?;
        self.align(4)?;
        Ok(value)
    }

    /// Consume a string without validating or allocating it.
    pub fn skip_string(&mut self) -> Result<()> {
        let len = self.read_u32()? as usize;
        self.take(len).map(|_| ())
    }

    fn read_aligned<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.align(N)?;
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let buf = self.buf;
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= buf.len())
            .ok_or_else(|| CdrError::OutOfBounds {
                offset: self.pos,
                needed: n,
                len: buf.len(),
            })?;
        let bytes = &buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }
}

fn padding(pos: usize, alignment: usize) -> usize {
    if alignment <= 1 {
        return 0;
    }
    (alignment - pos % alignment) % alignment
}
