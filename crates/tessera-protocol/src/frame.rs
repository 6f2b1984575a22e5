use crate::buffer::PacketBuffer;
use bytes::{Buf, Bytes, BytesMut};
use tessera_common::{ProtocolError, Result};
use tokio_util::codec::{Decoder, Encoder};

/// Frame length prefixes are VarInts of at most three bytes.
pub const MAX_FRAME_PREFIX_LEN: usize = 3;

/// Splits a byte stream into VarInt length-prefixed frames, and prefixes outgoing ones.
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_length: usize,
}

impl FrameCodec {
    pub fn new(max_frame_length: usize) -> Self {
        Self { max_frame_length }
    }

    pub fn max_frame_length(&self) -> usize {
        self.max_frame_length
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<BytesMut>> {
        let mut length = 0usize;
        let mut prefix_len = 0;
        loop {
            if prefix_len == MAX_FRAME_PREFIX_LEN {
                return Err(ProtocolError::MalformedVarint);
            }
            let Some(&byte) = src.get(prefix_len) else {
                return Ok(None);
            };
            length |= ((byte & 0x7f) as usize) << (7 * prefix_len);
            prefix_len += 1;
            if byte & 0x80 == 0 {
                break;
            }
        }

        if length > self.max_frame_length {
            return Err(ProtocolError::FrameTooLarge {
                length,
                max: self.max_frame_length,
            });
        }

        let total = prefix_len + length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }
        src.advance(prefix_len);
        Ok(Some(src.split_to(length)))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Bytes, dst: &mut BytesMut) -> Result<()> {
        if frame.len() > self.max_frame_length {
            return Err(ProtocolError::FrameTooLarge {
                length: frame.len(),
                max: self.max_frame_length,
            });
        }
        let mut prefix = PacketBuffer::with_capacity(MAX_FRAME_PREFIX_LEN);
        prefix.write_varint(frame.len() as i32);

        dst.reserve(prefix.len() + frame.len());
        dst.extend_from_slice(prefix.get_buffer());
        dst.extend_from_slice(&frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_partial_frames() {
        let mut codec = FrameCodec::new(1024);
        let mut src = BytesMut::new();
        assert!(codec.decode(&mut src).unwrap().is_none());

        src.extend_from_slice(&[3, 0xaa]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(src.len(), 2);

        src.extend_from_slice(&[0xbb, 0xcc, 1, 0xdd]);
        assert_eq!(&codec.decode(&mut src).unwrap().unwrap()[..], &[0xaa, 0xbb, 0xcc]);
        assert_eq!(&codec.decode(&mut src).unwrap().unwrap()[..], &[0xdd]);
        assert!(src.is_empty());
    }

    #[test]
    fn test_frame_too_large() {
        let mut codec = FrameCodec::new(100);
        let mut src = BytesMut::from(&[0xc8, 0x01][..]);
        assert_matches!(
            codec.decode(&mut src),
            Err(ProtocolError::FrameTooLarge { length: 200, max: 100 })
        );

        let mut dst = BytesMut::new();
        assert_matches!(
            codec.encode(Bytes::from(vec![0; 101]), &mut dst),
            Err(ProtocolError::FrameTooLarge { length: 101, max: 100 })
        );
    }

    #[test]
    fn test_prefix_longer_than_three_bytes() {
        let mut codec = FrameCodec::new(usize::MAX);
        let mut src = BytesMut::from(&[0x80, 0x80, 0x80, 0x01][..]);
        assert_matches!(codec.decode(&mut src), Err(ProtocolError::MalformedVarint));
    }

    #[test]
    fn test_encode_prefix() {
        let mut codec = FrameCodec::new(1024);
        let mut dst = BytesMut::new();
        codec.encode(Bytes::from(vec![7; 300]), &mut dst).unwrap();
        assert_eq!(&dst[..2], &[0xac, 0x02]);
        assert_eq!(dst.len(), 302);
    }
}
