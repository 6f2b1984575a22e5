use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use std::io;
use tessera_common::{BlockPos, ChunkPos, CodecConfig, ProtocolError, Result};
use uuid::Uuid;

/// Most bytes a VarInt may occupy.
pub const MAX_VARINT_LEN: usize = 5;
/// Most bytes a VarLong may occupy.
pub const MAX_VARLONG_LEN: usize = 10;
/// Default cap for strings, in UTF-16 code units.
pub const MAX_STRING_LEN: usize = 32767;

/// Packet buffer. Contains the bytes and a read cursor.
///
/// Writes always append, so the write position is the end of the buffer. The read cursor never
/// passes it: every read first checks that enough bytes are available and fails with
/// `BufferUnderrun` otherwise. A buffer is not meant to be shared between threads; each
/// connection owns its own.
#[derive(Debug, Clone, Default)]
pub struct PacketBuffer {
    buffer: Vec<u8>,
    cursor: usize,
    config: CodecConfig,
}

macro_rules! fixed_width {
    ($($(#[$meta:meta])* $read:ident, $write:ident, $ty:ty, $size:expr, $read_fn:path, $write_fn:path;)*) => {
        $(
            $(#[$meta])*
            pub fn $read(&mut self) -> Result<$ty> {
                let bytes = self.read_slice($size)?;
                Ok($read_fn(bytes))
            }

            $(#[$meta])*
            pub fn $write(&mut self, value: $ty) {
                let mut bytes = [0u8; $size];
                $write_fn(&mut bytes, value);
                self.buffer.extend_from_slice(&bytes);
            }
        )*
    };
}

impl PacketBuffer {
    /// Creates an empty buffer decoding under the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Creates an empty buffer that decodes under `config`.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates a buffer over received bytes, cursor at the start.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes,
            ..Self::default()
        }
    }

    pub fn from_bytes_with_config(bytes: Vec<u8>, config: CodecConfig) -> Self {
        Self {
            buffer: bytes,
            cursor: 0,
            config,
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn get_buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn get_cursor(&self) -> usize {
        self.cursor
    }

    /// Write position, i.e. total bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes between the read cursor and the write position.
    pub fn readable_bytes(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buffer)
    }

    /// Returns the byte under the cursor without consuming it.
    pub fn peek_byte(&self) -> Option<u8> {
        self.buffer.get(self.cursor).copied()
    }

    pub fn ensure_readable(&self, needed: usize) -> Result<()> {
        let remaining = self.readable_bytes();
        if needed > remaining {
            return Err(ProtocolError::BufferUnderrun { needed, remaining });
        }
        Ok(())
    }

    /// Consumes `length` bytes and returns them as a slice of the buffer.
    pub fn read_slice(&mut self, length: usize) -> Result<&[u8]> {
        self.ensure_readable(length)?;
        let start = self.cursor;
        self.cursor += length;
        Ok(&self.buffer[start..self.cursor])
    }

    /// Consumes `length` bytes into an owned byte range.
    pub fn read_bytes(&mut self, length: usize) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.read_slice(length)?))
    }

    /// Consumes everything left in the buffer, failing if that exceeds `max`.
    pub fn read_remaining(&mut self, max: usize) -> Result<Bytes> {
        let length = self.readable_bytes();
        if length > max {
            return Err(ProtocolError::PayloadTooLarge { length, max });
        }
        self.read_bytes(length)
    }

    pub fn write_bytes_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of bytes `value` occupies as a VarInt.
    pub fn varint_size(value: i32) -> usize {
        let value = value as u32;
        for size in 1..MAX_VARINT_LEN {
            if value >> (7 * size) == 0 {
                return size;
            }
        }
        MAX_VARINT_LEN
    }

    /// Writes a VarInt: seven bits per byte, least significant group first, high bit set on
    /// every byte but the last. Negative values always take five bytes.
    pub fn write_varint(&mut self, value: i32) {
        let mut value = value as u32;
        while value & !0x7F != 0 {
            self.buffer.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Reads a VarInt. More than five bytes is `MalformedVarint`.
    pub fn read_varint(&mut self) -> Result<i32> {
        let mut result: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u32) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result as i32);
            }
        }
        Err(ProtocolError::MalformedVarint)
    }

    pub fn write_varlong(&mut self, value: i64) {
        let mut value = value as u64;
        while value & !0x7F != 0 {
            self.buffer.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Reads a VarLong. More than ten bytes is `MalformedVarlong`.
    pub fn read_varlong(&mut self) -> Result<i64> {
        let mut result: u64 = 0;
        for i in 0..MAX_VARLONG_LEN {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result as i64);
            }
        }
        Err(ProtocolError::MalformedVarlong)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    /// Any non-zero byte reads as true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    fixed_width! {
        read_u16, write_u16, u16, 2, BigEndian::read_u16, BigEndian::write_u16;
        read_i16, write_i16, i16, 2, BigEndian::read_i16, BigEndian::write_i16;
        read_i32, write_i32, i32, 4, BigEndian::read_i32, BigEndian::write_i32;
        read_i64, write_i64, i64, 8, BigEndian::read_i64, BigEndian::write_i64;
        read_u64, write_u64, u64, 8, BigEndian::read_u64, BigEndian::write_u64;
        read_f32, write_f32, f32, 4, BigEndian::read_f32, BigEndian::write_f32;
        read_f64, write_f64, f64, 8, BigEndian::read_f64, BigEndian::write_f64;
    }

    /// Writes a string with a VarInt byte-length prefix. `max_len` is in UTF-16 code units.
    pub fn write_string(&mut self, value: &str, max_len: usize) -> Result<()> {
        let units = value.encode_utf16().count();
        if units > max_len {
            return Err(ProtocolError::StringTooLong {
                length: units,
                max: max_len,
            });
        }
        let bytes = value.as_bytes();
        if bytes.len() > i32::MAX as usize {
            return Err(ProtocolError::StringTooLong {
                length: bytes.len(),
                max: max_len.saturating_mul(3),
            });
        }
        self.write_varint(bytes.len() as i32);
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Reads a string written by `write_string`.
    ///
    /// The declared byte length is checked against `max_len * 3` before any payload byte is
    /// consumed, then the decoded string is checked against `max_len` code units.
    pub fn read_string(&mut self, max_len: usize) -> Result<String> {
        let length = self.read_varint()?;
        if length < 0 {
            return Err(ProtocolError::NegativeLength(length));
        }
        let length = length as usize;
        let max_bytes = max_len.saturating_mul(3);
        if length > max_bytes {
            return Err(ProtocolError::StringTooLong {
                length,
                max: max_bytes,
            });
        }
        let bytes = self.read_slice(length)?;
        let value = std::str::from_utf8(bytes)
            .map_err(|_| ProtocolError::InvalidUtf8)?
            .to_owned();
        let units = value.encode_utf16().count();
        if units > max_len {
            return Err(ProtocolError::StringTooLong {
                length: units,
                max: max_len,
            });
        }
        Ok(value)
    }

    /// Writes a byte array with a VarInt length prefix.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_length(bytes.len())?;
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a VarInt length. Lengths a VarInt cannot carry are `PayloadTooLarge`.
    pub fn write_length(&mut self, length: usize) -> Result<()> {
        let prefix = i32::try_from(length).map_err(|_| ProtocolError::PayloadTooLarge {
            length,
            max: i32::MAX as usize,
        })?;
        self.write_varint(prefix);
        Ok(())
    }

    /// Reads a VarInt-prefixed byte array, rejecting declared lengths above `max` before
    /// allocating.
    pub fn read_byte_array(&mut self, max: usize) -> Result<Vec<u8>> {
        let length = self.read_length()?;
        if length > max {
            return Err(ProtocolError::PayloadTooLarge { length, max });
        }
        Ok(self.read_slice(length)?.to_vec())
    }

    /// Reads a non-negative VarInt length.
    pub fn read_length(&mut self) -> Result<usize> {
        let length = self.read_varint()?;
        if length < 0 {
            return Err(ProtocolError::NegativeLength(length));
        }
        Ok(length as usize)
    }

    /// Writes a UUID as its 16 big-endian bytes.
    pub fn write_uuid(&mut self, value: Uuid) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.read_slice(16)?);
        Ok(Uuid::from_bytes(bytes))
    }

    pub fn write_block_pos(&mut self, pos: BlockPos) {
        self.write_i64(pos.to_long());
    }

    pub fn read_block_pos(&mut self) -> Result<BlockPos> {
        Ok(BlockPos::from_long(self.read_i64()?))
    }

    pub fn write_chunk_pos(&mut self, pos: ChunkPos) {
        self.write_i64(pos.to_long());
    }

    pub fn read_chunk_pos(&mut self) -> Result<ChunkPos> {
        Ok(ChunkPos::from_long(self.read_i64()?))
    }
}

impl io::Read for PacketBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let to_read = buf.len().min(self.readable_bytes());
        buf[..to_read].copy_from_slice(&self.buffer[self.cursor..self.cursor + to_read]);
        self.cursor += to_read;
        Ok(to_read)
    }
}

impl io::Write for PacketBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
