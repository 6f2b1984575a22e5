//! Handler interfaces, one per direction. Dispatch calls exactly one method per decoded packet,
//! synchronously, and drops the packet when the method returns.
//!
//! Every method defaults to `unhandled`, so an implementation only overrides what it handles.

use crate::packet::Packet;
use crate::packets::*;

/// Receives packets sent by the server.
pub trait ClientboundHandler {
    /// Called for every packet the implementation does not handle. Does nothing by default.
    fn unhandled(&mut self, _name: &'static str) {}

    // Status
    fn handle_status_response(&mut self, _packet: &StatusResponsePacket) {
        self.unhandled(StatusResponsePacket::NAME)
    }

    fn handle_pong_response(&mut self, _packet: &PongResponsePacket) {
        self.unhandled(PongResponsePacket::NAME)
    }

    // Login
    fn handle_login_disconnect(&mut self, _packet: &LoginDisconnectPacket) {
        self.unhandled(LoginDisconnectPacket::NAME)
    }

    fn handle_login_finished(&mut self, _packet: &LoginFinishedPacket) {
        self.unhandled(LoginFinishedPacket::NAME)
    }

    // Configuration and play
    fn handle_custom_payload(&mut self, _packet: &ClientboundCustomPayloadPacket) {
        self.unhandled(ClientboundCustomPayloadPacket::NAME)
    }

    fn handle_disconnect(&mut self, _packet: &DisconnectPacket) {
        self.unhandled(DisconnectPacket::NAME)
    }

    fn handle_finish_configuration(&mut self, _packet: &FinishConfigurationPacket) {
        self.unhandled(FinishConfigurationPacket::NAME)
    }

    fn handle_keep_alive(&mut self, _packet: &KeepAlivePacket) {
        self.unhandled(KeepAlivePacket::NAME)
    }

    // Play
    fn handle_add_entity(&mut self, _packet: &AddEntityPacket) {
        self.unhandled(AddEntityPacket::NAME)
    }

    fn handle_block_update(&mut self, _packet: &BlockUpdatePacket) {
        self.unhandled(BlockUpdatePacket::NAME)
    }

    fn handle_forget_level_chunk(&mut self, _packet: &ForgetLevelChunkPacket) {
        self.unhandled(ForgetLevelChunkPacket::NAME)
    }

    fn handle_level_chunk_with_light(&mut self, _packet: &LevelChunkWithLightPacket) {
        self.unhandled(LevelChunkWithLightPacket::NAME)
    }

    fn handle_light_update(&mut self, _packet: &LightUpdatePacket) {
        self.unhandled(LightUpdatePacket::NAME)
    }

    fn handle_move_entity_rot(&mut self, _packet: &MoveEntityRotPacket) {
        self.unhandled(MoveEntityRotPacket::NAME)
    }

    fn handle_set_chunk_cache_center(&mut self, _packet: &SetChunkCacheCenterPacket) {
        self.unhandled(SetChunkCacheCenterPacket::NAME)
    }

    fn handle_set_entity_motion(&mut self, _packet: &SetEntityMotionPacket) {
        self.unhandled(SetEntityMotionPacket::NAME)
    }

    fn handle_set_health(&mut self, _packet: &SetHealthPacket) {
        self.unhandled(SetHealthPacket::NAME)
    }

    fn handle_sound(&mut self, _packet: &SoundPacket) {
        self.unhandled(SoundPacket::NAME)
    }

    fn handle_system_chat(&mut self, _packet: &SystemChatPacket) {
        self.unhandled(SystemChatPacket::NAME)
    }
}

/// Receives packets sent by the client.
pub trait ServerboundHandler {
    /// Called for every packet the implementation does not handle. Does nothing by default.
    fn unhandled(&mut self, _name: &'static str) {}

    // Handshake
    fn handle_client_intention(&mut self, _packet: &ClientIntentionPacket) {
        self.unhandled(ClientIntentionPacket::NAME)
    }

    // Status
    fn handle_status_request(&mut self, _packet: &StatusRequestPacket) {
        self.unhandled(StatusRequestPacket::NAME)
    }

    fn handle_ping_request(&mut self, _packet: &PingRequestPacket) {
        self.unhandled(PingRequestPacket::NAME)
    }

    // Login
    fn handle_hello(&mut self, _packet: &HelloPacket) {
        self.unhandled(HelloPacket::NAME)
    }

    fn handle_login_acknowledged(&mut self, _packet: &LoginAcknowledgedPacket) {
        self.unhandled(LoginAcknowledgedPacket::NAME)
    }

    // Configuration and play
    fn handle_client_information(&mut self, _packet: &ClientInformationPacket) {
        self.unhandled(ClientInformationPacket::NAME)
    }

    fn handle_custom_payload(&mut self, _packet: &ServerboundCustomPayloadPacket) {
        self.unhandled(ServerboundCustomPayloadPacket::NAME)
    }

    fn handle_finish_configuration(&mut self, _packet: &FinishConfigurationPacket) {
        self.unhandled(FinishConfigurationPacket::NAME)
    }

    fn handle_keep_alive(&mut self, _packet: &KeepAlivePacket) {
        self.unhandled(KeepAlivePacket::NAME)
    }

    // Play
    fn handle_chat_command(&mut self, _packet: &ChatCommandPacket) {
        self.unhandled(ChatCommandPacket::NAME)
    }

    fn handle_move_player_pos(&mut self, _packet: &MovePlayerPosPacket) {
        self.unhandled(MovePlayerPosPacket::NAME)
    }

    fn handle_set_carried_item(&mut self, _packet: &SetCarriedItemPacket) {
        self.unhandled(SetCarriedItemPacket::NAME)
    }
}
