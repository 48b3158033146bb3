//! Cursor-based byte access over one DNS message.
//!
//! Unlike fixed-layout protocols, DNS sections are variable length, so the
//! reader advances a cursor and also supports reading names whose labels
//! may jump backwards through compression pointers.

use super::error::DnsError;
use super::layout;

pub struct DnsReader<'a> {
    message: &'a [u8],
    pos: usize,
}

impl<'a> DnsReader<'a> {
    pub fn new(message: &'a [u8]) -> Self {
        Self { message, pos: 0 }
    }

    /// Reader positioned mid-message, for names inside record data that
    /// may point back into the whole message.
    pub fn at(message: &'a [u8], pos: usize) -> Self {
        Self { message, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, DnsError> {
        let value = self
            .message
            .get(self.pos)
            .copied()
            .ok_or(DnsError::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DnsError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DnsError> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(DnsError::Truncated { offset: self.pos })?;
        let slice = self
            .message
            .get(self.pos..end)
            .ok_or(DnsError::Truncated { offset: self.pos })?;
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DnsError> {
        self.read_slice(len).map(|_| ())
    }

    /// Read a possibly compressed domain name starting at the cursor.
    ///
    /// The cursor advances past the name as it appears in the record; the
    /// bytes a pointer jumps to are read without moving the cursor again.
    pub fn read_name(&mut self) -> Result<String, DnsError> {
        let mut name = String::new();
        let mut cursor = self.pos;
        let mut jumps = 0usize;
        let mut jumped = false;

        loop {
            let len = self
                .message
                .get(cursor)
                .copied()
                .ok_or(DnsError::Truncated { offset: cursor })?;

            if len & layout::POINTER_TAG == layout::POINTER_TAG {
                let low = self
                    .message
                    .get(cursor + 1)
                    .copied()
                    .ok_or(DnsError::Truncated { offset: cursor + 1 })?;
                if !jumped {
                    self.pos = cursor + 2;
                    jumped = true;
                }
                jumps += 1;
                if jumps > layout::MAX_NAME_JUMPS {
                    return Err(DnsError::PointerLoop { offset: cursor });
                }
                cursor = usize::from(len & !layout::POINTER_TAG) << 8 | usize::from(low);
                continue;
            }

            if len == 0 {
                if !jumped {
                    self.pos = cursor + 1;
                }
                return Ok(name);
            }

            let length = usize::from(len);
            if length > layout::MAX_LABEL_LEN {
                return Err(DnsError::LabelTooLong {
                    offset: cursor,
                    length,
                });
            }
            let start = cursor + 1;
            let end = start + length;
            let label = self
                .message
                .get(start..end)
                .ok_or(DnsError::Truncated { offset: start })?;
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(&String::from_utf8_lossy(label));
            cursor = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DnsReader;
    use crate::protocols::dns::error::DnsError;

    #[test]
    fn reads_integers_and_advances() {
        let mut reader = DnsReader::new(&[0x12, 0x34, 0x00, 0x00, 0x00, 0x05]);
        assert_eq!(reader.read_u16_be().unwrap(), 0x1234);
        reader.skip(3).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 5);
        assert_eq!(reader.pos(), 6);
        assert!(matches!(
            reader.read_u8(),
            Err(DnsError::Truncated { offset: 6 })
        ));
    }

    #[test]
    fn reads_plain_name() {
        let mut message = vec![3, b'w', b'w', b'w', 7];
        message.extend_from_slice(b"example");
        message.extend_from_slice(&[3, b'c', b'o', b'm', 0]);
        let mut reader = DnsReader::new(&message);
        assert_eq!(reader.read_name().unwrap(), "www.example.com");
        assert_eq!(reader.pos(), message.len());
    }

    #[test]
    fn reads_compressed_name_and_keeps_cursor() {
        // "a.b" at offset 0, then a name that is a pointer back to it.
        let message = vec![
            1, b'a', 1, b'b', 0, // offsets 0..5
            0xc0, 0x00, // pointer to offset 0
            0xff, // trailing byte the cursor should land on
        ];
        let mut reader = DnsReader::new(&message);
        assert_eq!(reader.read_name().unwrap(), "a.b");
        assert_eq!(reader.read_name().unwrap(), "a.b");
        assert_eq!(reader.pos(), 7);
    }

    #[test]
    fn pointer_loop_is_rejected() {
        let message = vec![0xc0, 0x00];
        let mut reader = DnsReader::new(&message);
        assert!(matches!(
            reader.read_name(),
            Err(DnsError::PointerLoop { .. })
        ));
    }
}
