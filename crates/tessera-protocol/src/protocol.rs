//! Packet sets of every protocol phase, and the per-direction unions over them.

use crate::buffer::PacketBuffer;
use crate::handler::{ClientboundHandler, ServerboundHandler};
use crate::packet::packet_set;
use crate::packets::*;
use tessera_common::{ConnectionProtocol, PacketFlow, ProtocolError, Result};

packet_set! {
    pub enum HandshakeServerbound(ConnectionProtocol::Handshake, PacketFlow::Serverbound)
        dispatches to ServerboundHandler {
        0x00 => Intention(ClientIntentionPacket) => handle_client_intention,
    }
}

packet_set! {
    pub enum StatusClientbound(ConnectionProtocol::Status, PacketFlow::Clientbound)
        dispatches to ClientboundHandler {
        0x00 => StatusResponse(StatusResponsePacket) => handle_status_response,
        0x01 => PongResponse(PongResponsePacket) => handle_pong_response,
    }
}

packet_set! {
    pub enum StatusServerbound(ConnectionProtocol::Status, PacketFlow::Serverbound)
        dispatches to ServerboundHandler {
        0x00 => StatusRequest(StatusRequestPacket) => handle_status_request,
        0x01 => PingRequest(PingRequestPacket) => handle_ping_request,
    }
}

packet_set! {
    pub enum LoginClientbound(ConnectionProtocol::Login, PacketFlow::Clientbound)
        dispatches to ClientboundHandler {
        0x00 => LoginDisconnect(LoginDisconnectPacket) => handle_login_disconnect,
        0x02 => LoginFinished(LoginFinishedPacket) => handle_login_finished,
    }
}

packet_set! {
    pub enum LoginServerbound(ConnectionProtocol::Login, PacketFlow::Serverbound)
        dispatches to ServerboundHandler {
        0x00 => Hello(HelloPacket) => handle_hello,
        0x03 => LoginAcknowledged(LoginAcknowledgedPacket) => handle_login_acknowledged,
    }
}

packet_set! {
    pub enum ConfigurationClientbound(ConnectionProtocol::Configuration, PacketFlow::Clientbound)
        dispatches to ClientboundHandler {
        0x01 => CustomPayload(ClientboundCustomPayloadPacket) => handle_custom_payload,
        0x02 => Disconnect(DisconnectPacket) => handle_disconnect,
        0x03 => FinishConfiguration(FinishConfigurationPacket) => handle_finish_configuration,
        0x04 => KeepAlive(KeepAlivePacket) => handle_keep_alive,
    }
}

packet_set! {
    pub enum ConfigurationServerbound(ConnectionProtocol::Configuration, PacketFlow::Serverbound)
        dispatches to ServerboundHandler {
        0x00 => ClientInformation(ClientInformationPacket) => handle_client_information,
        0x02 => CustomPayload(ServerboundCustomPayloadPacket) => handle_custom_payload,
        0x03 => FinishConfiguration(FinishConfigurationPacket) => handle_finish_configuration,
        0x04 => KeepAlive(KeepAlivePacket) => handle_keep_alive,
    }
}

packet_set! {
    pub enum PlayClientbound(ConnectionProtocol::Play, PacketFlow::Clientbound)
        dispatches to ClientboundHandler {
        0x01 => AddEntity(AddEntityPacket) => handle_add_entity,
        0x09 => BlockUpdate(BlockUpdatePacket) => handle_block_update,
        0x19 => CustomPayload(ClientboundCustomPayloadPacket) => handle_custom_payload,
        0x1d => Disconnect(DisconnectPacket) => handle_disconnect,
        0x21 => ForgetLevelChunk(ForgetLevelChunkPacket) => handle_forget_level_chunk,
        0x26 => KeepAlive(KeepAlivePacket) => handle_keep_alive,
        0x27 => LevelChunkWithLight(LevelChunkWithLightPacket) => handle_level_chunk_with_light,
        0x2a => LightUpdate(LightUpdatePacket) => handle_light_update,
        0x30 => MoveEntityRot(MoveEntityRotPacket) => handle_move_entity_rot,
        0x54 => SetChunkCacheCenter(SetChunkCacheCenterPacket) => handle_set_chunk_cache_center,
        0x5a => SetEntityMotion(SetEntityMotionPacket) => handle_set_entity_motion,
        0x5d => SetHealth(SetHealthPacket) => handle_set_health,
        0x68 => Sound(SoundPacket) => handle_sound,
        0x6c => SystemChat(SystemChatPacket) => handle_system_chat,
    }
}

packet_set! {
    pub enum PlayServerbound(ConnectionProtocol::Play, PacketFlow::Serverbound)
        dispatches to ServerboundHandler {
        0x04 => ChatCommand(ChatCommandPacket) => handle_chat_command,
        0x12 => CustomPayload(ServerboundCustomPayloadPacket) => handle_custom_payload,
        0x18 => KeepAlive(KeepAlivePacket) => handle_keep_alive,
        0x1a => MovePlayerPos(MovePlayerPosPacket) => handle_move_player_pos,
        0x2f => SetCarriedItem(SetCarriedItemPacket) => handle_set_carried_item,
    }
}

/// The packets of one direction across all phases, as the connection layer handles them.
pub trait DirectionalPacket: Sized + Send + 'static {
    const FLOW: PacketFlow;
    type Handler: ?Sized;

    /// Decodes one frame under `phase`.
    fn decode(phase: ConnectionProtocol, buffer: &mut PacketBuffer) -> Result<Self>;

    /// Writes the id and body.
    fn encode(&self, buffer: &mut PacketBuffer) -> Result<()>;

    fn phase(&self) -> ConnectionProtocol;

    fn name(&self) -> &'static str;

    /// The phase both sides move to once this packet has been received.
    fn next_phase(&self) -> Option<ConnectionProtocol>;

    fn dispatch(self, handler: &mut Self::Handler);
}

/// Every packet the server can send.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientboundPacket {
    Status(StatusClientbound),
    Login(LoginClientbound),
    Configuration(ConfigurationClientbound),
    Play(PlayClientbound),
}

impl ClientboundPacket {
    pub fn packet_id(&self) -> i32 {
        match self {
            ClientboundPacket::Status(packet) => packet.packet_id(),
            ClientboundPacket::Login(packet) => packet.packet_id(),
            ClientboundPacket::Configuration(packet) => packet.packet_id(),
            ClientboundPacket::Play(packet) => packet.packet_id(),
        }
    }
}

impl DirectionalPacket for ClientboundPacket {
    const FLOW: PacketFlow = PacketFlow::Clientbound;
    type Handler = dyn ClientboundHandler;

    fn decode(phase: ConnectionProtocol, buffer: &mut PacketBuffer) -> Result<Self> {
        match phase {
            ConnectionProtocol::Handshake => {
                // The server sends nothing during the handshake
                let id = buffer.read_varint()?;
                Err(ProtocolError::UnknownPacketId {
                    id,
                    phase,
                    flow: Self::FLOW,
                })
            }
            ConnectionProtocol::Status => StatusClientbound::decode(buffer).map(Self::Status),
            ConnectionProtocol::Login => LoginClientbound::decode(buffer).map(Self::Login),
            ConnectionProtocol::Configuration => {
                ConfigurationClientbound::decode(buffer).map(Self::Configuration)
            }
            ConnectionProtocol::Play => PlayClientbound::decode(buffer).map(Self::Play),
        }
    }

    fn encode(&self, buffer: &mut PacketBuffer) -> Result<()> {
        match self {
            ClientboundPacket::Status(packet) => packet.encode(buffer),
            ClientboundPacket::Login(packet) => packet.encode(buffer),
            ClientboundPacket::Configuration(packet) => packet.encode(buffer),
            ClientboundPacket::Play(packet) => packet.encode(buffer),
        }
    }

    fn phase(&self) -> ConnectionProtocol {
        match self {
            ClientboundPacket::Status(_) => ConnectionProtocol::Status,
            ClientboundPacket::Login(_) => ConnectionProtocol::Login,
            ClientboundPacket::Configuration(_) => ConnectionProtocol::Configuration,
            ClientboundPacket::Play(_) => ConnectionProtocol::Play,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ClientboundPacket::Status(packet) => packet.name(),
            ClientboundPacket::Login(packet) => packet.name(),
            ClientboundPacket::Configuration(packet) => packet.name(),
            ClientboundPacket::Play(packet) => packet.name(),
        }
    }

    fn next_phase(&self) -> Option<ConnectionProtocol> {
        match self {
            ClientboundPacket::Login(LoginClientbound::LoginFinished(_)) => {
                Some(ConnectionProtocol::Configuration)
            }
            ClientboundPacket::Configuration(ConfigurationClientbound::FinishConfiguration(_)) => {
                Some(ConnectionProtocol::Play)
            }
            _ => None,
        }
    }

    fn dispatch(self, handler: &mut Self::Handler) {
        match self {
            ClientboundPacket::Status(packet) => packet.dispatch(handler),
            ClientboundPacket::Login(packet) => packet.dispatch(handler),
            ClientboundPacket::Configuration(packet) => packet.dispatch(handler),
            ClientboundPacket::Play(packet) => packet.dispatch(handler),
        }
    }
}

/// Every packet the client can send.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerboundPacket {
    Handshake(HandshakeServerbound),
    Status(StatusServerbound),
    Login(LoginServerbound),
    Configuration(ConfigurationServerbound),
    Play(PlayServerbound),
}

impl ServerboundPacket {
    pub fn packet_id(&self) -> i32 {
        match self {
            ServerboundPacket::Handshake(packet) => packet.packet_id(),
            ServerboundPacket::Status(packet) => packet.packet_id(),
            ServerboundPacket::Login(packet) => packet.packet_id(),
            ServerboundPacket::Configuration(packet) => packet.packet_id(),
            ServerboundPacket::Play(packet) => packet.packet_id(),
        }
    }
}

impl DirectionalPacket for ServerboundPacket {
    const FLOW: PacketFlow = PacketFlow::Serverbound;
    type Handler = dyn ServerboundHandler;

    fn decode(phase: ConnectionProtocol, buffer: &mut PacketBuffer) -> Result<Self> {
        match phase {
            ConnectionProtocol::Handshake => {
                HandshakeServerbound::decode(buffer).map(Self::Handshake)
            }
            ConnectionProtocol::Status => StatusServerbound::decode(buffer).map(Self::Status),
            ConnectionProtocol::Login => LoginServerbound::decode(buffer).map(Self::Login),
            ConnectionProtocol::Configuration => {
                ConfigurationServerbound::decode(buffer).map(Self::Configuration)
            }
            ConnectionProtocol::Play => PlayServerbound::decode(buffer).map(Self::Play),
        }
    }

    fn encode(&self, buffer: &mut PacketBuffer) -> Result<()> {
        match self {
            ServerboundPacket::Handshake(packet) => packet.encode(buffer),
            ServerboundPacket::Status(packet) => packet.encode(buffer),
            ServerboundPacket::Login(packet) => packet.encode(buffer),
            ServerboundPacket::Configuration(packet) => packet.encode(buffer),
            ServerboundPacket::Play(packet) => packet.encode(buffer),
        }
    }

    fn phase(&self) -> ConnectionProtocol {
        match self {
            ServerboundPacket::Handshake(_) => ConnectionProtocol::Handshake,
            ServerboundPacket::Status(_) => ConnectionProtocol::Status,
            ServerboundPacket::Login(_) => ConnectionProtocol::Login,
            ServerboundPacket::Configuration(_) => ConnectionProtocol::Configuration,
            ServerboundPacket::Play(_) => ConnectionProtocol::Play,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ServerboundPacket::Handshake(packet) => packet.name(),
            ServerboundPacket::Status(packet) => packet.name(),
            ServerboundPacket::Login(packet) => packet.name(),
            ServerboundPacket::Configuration(packet) => packet.name(),
            ServerboundPacket::Play(packet) => packet.name(),
        }
    }

    fn next_phase(&self) -> Option<ConnectionProtocol> {
        match self {
            ServerboundPacket::Handshake(HandshakeServerbound::Intention(packet)) => {
                Some(packet.intention.next_phase())
            }
            ServerboundPacket::Login(LoginServerbound::LoginAcknowledged(_)) => {
                Some(ConnectionProtocol::Configuration)
            }
            ServerboundPacket::Configuration(ConfigurationServerbound::FinishConfiguration(_)) => {
                Some(ConnectionProtocol::Play)
            }
            _ => None,
        }
    }

    fn dispatch(self, handler: &mut Self::Handler) {
        match self {
            ServerboundPacket::Handshake(packet) => packet.dispatch(handler),
            ServerboundPacket::Status(packet) => packet.dispatch(handler),
            ServerboundPacket::Login(packet) => packet.dispatch(handler),
            ServerboundPacket::Configuration(packet) => packet.dispatch(handler),
            ServerboundPacket::Play(packet) => packet.dispatch(handler),
        }
    }
}

macro_rules! direction_from {
    ($direction:ident: $($variant:ident($set:ty),)*) => {
        $(
            impl From<$set> for $direction {
                fn from(packet: $set) -> Self {
                    $direction::$variant(packet)
                }
            }
        )*
    };
}

direction_from!(ClientboundPacket:
    Status(StatusClientbound),
    Login(LoginClientbound),
    Configuration(ConfigurationClientbound),
    Play(PlayClientbound),
);

direction_from!(ServerboundPacket:
    Handshake(HandshakeServerbound),
    Status(StatusServerbound),
    Login(LoginServerbound),
    Configuration(ConfigurationServerbound),
    Play(PlayServerbound),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::DispatchTable;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn assert_bijection<P>(table: &DispatchTable<P>, expected: usize) {
        assert_eq!(table.len(), expected, "duplicate id in {} {}", table.phase(), table.flow());
        let names: HashSet<_> = table.iter().map(|entry| entry.name).collect();
        assert_eq!(names.len(), expected);
        for entry in table.iter() {
            assert_eq!(table.entry(entry.id).map(|e| e.name), Some(entry.name));
            assert_eq!(table.id_of(entry.name), Some(entry.id));
        }
    }

    #[test]
    fn test_tables_are_bijections() {
        assert_bijection(HandshakeServerbound::table(), 1);
        assert_bijection(StatusClientbound::table(), 2);
        assert_bijection(StatusServerbound::table(), 2);
        assert_bijection(LoginClientbound::table(), 2);
        assert_bijection(LoginServerbound::table(), 2);
        assert_bijection(ConfigurationClientbound::table(), 4);
        assert_bijection(ConfigurationServerbound::table(), 4);
        assert_bijection(PlayClientbound::table(), 14);
        assert_bijection(PlayServerbound::table(), 5);
    }

    #[test]
    fn test_table_phase_and_flow() {
        let table = PlayClientbound::table();
        assert_eq!(table.phase(), ConnectionProtocol::Play);
        assert_eq!(table.flow(), PacketFlow::Clientbound);
        assert_eq!(PlayClientbound::PHASE, ConnectionProtocol::Play);
    }

    #[test]
    fn test_variant_ids_match_table() {
        let packet = PlayServerbound::from(KeepAlivePacket::new(5));
        assert_eq!(packet.packet_id(), 0x18);
        assert_eq!(PlayServerbound::table().id_of(packet.name()), Some(0x18));

        let packet = ConfigurationServerbound::from(KeepAlivePacket::new(5));
        assert_eq!(packet.packet_id(), 0x04);
    }

    #[test]
    fn test_phase_transitions() {
        let intention = ServerboundPacket::from(HandshakeServerbound::from(ClientIntentionPacket {
            protocol_version: 767,
            host_name: "localhost".to_string(),
            port: 25565,
            intention: ClientIntent::Status,
        }));
        assert_eq!(intention.next_phase(), Some(ConnectionProtocol::Status));

        let acknowledged = ServerboundPacket::from(LoginServerbound::from(LoginAcknowledgedPacket));
        assert_eq!(acknowledged.next_phase(), Some(ConnectionProtocol::Configuration));

        let finished = ClientboundPacket::from(LoginClientbound::from(LoginFinishedPacket::new(
            GameProfile::offline("Steve"),
        )));
        assert_eq!(finished.next_phase(), Some(ConnectionProtocol::Configuration));

        let finish = ServerboundPacket::from(ConfigurationServerbound::from(FinishConfigurationPacket));
        assert_eq!(finish.next_phase(), Some(ConnectionProtocol::Play));

        let keep_alive = ServerboundPacket::from(PlayServerbound::from(KeepAlivePacket::new(1)));
        assert_eq!(keep_alive.next_phase(), None);
    }

    #[test]
    fn test_no_clientbound_handshake_packets() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(0);
        assert_matches!(
            ClientboundPacket::decode(ConnectionProtocol::Handshake, &mut buffer),
            Err(ProtocolError::UnknownPacketId {
                id: 0,
                phase: ConnectionProtocol::Handshake,
                flow: PacketFlow::Clientbound
            })
        );
    }
}
