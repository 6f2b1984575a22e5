#![allow(dead_code)]

use tessera_common::CodecConfig;
use tessera_protocol::handler::ClientboundHandler;
use tessera_protocol::packets::*;
use tessera_protocol::{DirectionalPacket, PacketBuffer, Result};
use tessera_common::ConnectionProtocol;

/// Encodes a packet with its id, then decodes it again under `phase`.
pub fn reencode<P: DirectionalPacket>(packet: &P, phase: ConnectionProtocol) -> Result<P> {
    let mut buffer = PacketBuffer::new();
    packet.encode(&mut buffer)?;
    let mut buffer = PacketBuffer::from_bytes_with_config(buffer.get_buffer().to_vec(), CodecConfig::default());
    P::decode(phase, &mut buffer)
}

/// Bytes of a packet as they appear inside a frame: id then body.
pub fn encode<P: DirectionalPacket>(packet: &P) -> Vec<u8> {
    let mut buffer = PacketBuffer::new();
    packet.encode(&mut buffer).unwrap();
    buffer.get_buffer().to_vec()
}

pub fn light_array(fill: u8) -> Box<[u8; 2048]> {
    Box::new([fill; 2048])
}

/// Records which handler methods ran.
#[derive(Default)]
pub struct CallLog {
    pub calls: Vec<&'static str>,
    pub chunks: Vec<LevelChunkWithLightPacket>,
}

impl ClientboundHandler for CallLog {
    fn unhandled(&mut self, name: &'static str) {
        self.calls.push(name);
    }

    fn handle_level_chunk_with_light(&mut self, packet: &LevelChunkWithLightPacket) {
        self.calls.push("level_chunk_with_light");
        self.chunks.push(packet.clone());
    }
}
