//! Cursor-based byte access over one TLS record body.

use super::error::TlsError;

pub struct TlsReader<'a> {
    body: &'a [u8],
    pos: usize,
}

impl<'a> TlsReader<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { body, pos: 0 }
    }

    pub fn read_u8(&mut self) -> Result<u8, TlsError> {
        let value = self
            .body
            .get(self.pos)
            .copied()
            .ok_or(TlsError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, TlsError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], TlsError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(TlsError::Truncated { offset: self.pos })?;
        let slice = self
            .body
            .get(self.pos..end)
            .ok_or(TlsError::Truncated { offset: self.pos })?;
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), TlsError> {
        self.read_slice(len).map(|_| ())
    }

    /// Skip a field preceded by its own u8 length.
    pub fn skip_u8_vector(&mut self) -> Result<(), TlsError> {
        let len = self.read_u8()?;
        self.skip(usize::from(len))
    }

    /// Skip a field preceded by its own u16 length.
    pub fn skip_u16_vector(&mut self) -> Result<(), TlsError> {
        let len = self.read_u16_be()?;
        self.skip(usize::from(len))
    }
}
