use crate::buffer::PacketBuffer;
use crate::packet::Packet;
use tessera_common::{ConnectionProtocol, ProtocolError, Result};

pub const MAX_HOST_NAME_LEN: usize = 255;

/// What the client wants to do after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIntent {
    Status,
    Login,
    Transfer,
}

impl ClientIntent {
    /// Wire id. Unlike ordinal enums these start at 1.
    pub fn id(self) -> i32 {
        match self {
            ClientIntent::Status => 1,
            ClientIntent::Login => 2,
            ClientIntent::Transfer => 3,
        }
    }

    pub fn by_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(ClientIntent::Status),
            2 => Some(ClientIntent::Login),
            3 => Some(ClientIntent::Transfer),
            _ => None,
        }
    }

    /// Phase both sides switch to once the intention is sent.
    pub fn next_phase(self) -> ConnectionProtocol {
        match self {
            ClientIntent::Status => ConnectionProtocol::Status,
            ClientIntent::Login | ClientIntent::Transfer => ConnectionProtocol::Login,
        }
    }
}

/// Handshake packet
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIntentionPacket {
    pub protocol_version: i32,
    pub host_name: String,
    pub port: u16,
    pub intention: ClientIntent,
}

impl Packet for ClientIntentionPacket {
    const NAME: &'static str = "intention";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let protocol_version = buffer.read_varint()?;
        let host_name = buffer.read_string(MAX_HOST_NAME_LEN)?;
        let port = buffer.read_u16()?;
        let id = buffer.read_varint()?;
        let intention = ClientIntent::by_id(id).ok_or(ProtocolError::InvalidEnumOrdinal {
            name: "ClientIntent",
            ordinal: id,
        })?;

        Ok(Self {
            protocol_version,
            host_name,
            port,
            intention,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.protocol_version);
        buffer.write_string(&self.host_name, MAX_HOST_NAME_LEN)?;
        buffer.write_u16(self.port);
        buffer.write_varint(self.intention.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_intention_layout() {
        let packet = ClientIntentionPacket {
            protocol_version: 767,
            host_name: "localhost".to_string(),
            port: 25565,
            intention: ClientIntent::Login,
        };
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();

        assert_eq!(&buffer.get_buffer()[..2], &[0xff, 0x05]);
        assert_eq!(buffer.get_buffer().last(), Some(&2));
        assert_eq!(ClientIntentionPacket::read_from_buffer(&mut buffer).unwrap(), packet);
    }

    #[test]
    fn test_unknown_intent() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(767);
        buffer.write_string("localhost", MAX_HOST_NAME_LEN).unwrap();
        buffer.write_u16(25565);
        buffer.write_varint(0);
        assert_matches!(
            ClientIntentionPacket::read_from_buffer(&mut buffer),
            Err(ProtocolError::InvalidEnumOrdinal { ordinal: 0, .. })
        );
    }
}
