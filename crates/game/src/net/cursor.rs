use glam::Vec2;

/// Sequential reader over a received packet buffer.
///
/// Reads never fail: an out-of-range read yields `0` and leaves the cursor
/// where it was, so a truncated packet decodes to zeroed fields instead of
/// aborting the frame.
///
/// The boundary check is the legacy-permissive `offset > len` (not `>=`),
/// kept for wire compatibility with the original client: a read starting
/// exactly at the end of the buffer is not rejected up front, it just has no
/// bytes left and zero-fills.
#[derive(Debug)]
pub struct PacketCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PacketCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Read one byte and advance the cursor by 1.
    pub fn read_u8(&mut self) -> u8 {
        if self.offset > self.data.len() {
            return 0;
        }

        let value = self.data.get(self.offset).copied().unwrap_or(0);
        self.offset += 1;
        value
    }

    /// Read a signed short in host byte order and advance the cursor by 2.
    ///
    /// Host order matches the rest of the wire format; see the note on
    /// [`Message`](super::Message) about cross-endian play.
    pub fn read_i16(&mut self) -> i16 {
        if self.offset > self.data.len() {
            return 0;
        }

        let value = match self.data.get(self.offset..self.offset + 2) {
            Some(bytes) => i16::from_ne_bytes([bytes[0], bytes[1]]),
            None => 0,
        };
        self.offset += 2;
        value
    }

    /// Read a field position as two signed shorts, x then y.
    pub fn read_position(&mut self) -> Vec2 {
        let x = self.read_i16();
        let y = self.read_i16();
        Vec2::new(x as f32, y as f32)
    }
}
