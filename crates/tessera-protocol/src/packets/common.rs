//! Packets registered in both the configuration and play phases.

use crate::buffer::PacketBuffer;
use crate::codec::ProtocolEnum;
use crate::packet::Packet;
use crate::registry::ResourceLocation;
use bytes::Bytes;
use tessera_common::{ProtocolError, Result};
use tessera_nbt::Tag;

pub const MAX_LANGUAGE_LEN: usize = 16;

/// Keep alive packet. The receiver echoes the id back.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepAlivePacket {
    pub id: i64,
}

impl KeepAlivePacket {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

impl Packet for KeepAlivePacket {
    const NAME: &'static str = "keep_alive";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            id: buffer.read_i64()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i64(self.id);
        Ok(())
    }
}

macro_rules! custom_payload {
    ($(#[$meta:meta])* $name:ident, $cap:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub channel: ResourceLocation,
            /// Rest of the frame, passed through uninterpreted.
            pub data: Bytes,
        }

        impl Packet for $name {
            const NAME: &'static str = "custom_payload";

            fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
                let channel = buffer.read_resource_location()?;
                let max = buffer.config().$cap;
                Ok(Self {
                    channel,
                    data: buffer.read_remaining(max)?,
                })
            }

            fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
                let max = buffer.config().$cap;
                if self.data.len() > max {
                    return Err(ProtocolError::PayloadTooLarge {
                        length: self.data.len(),
                        max,
                    });
                }
                buffer.write_resource_location(&self.channel)?;
                buffer.write_bytes_raw(&self.data);
                Ok(())
            }
        }
    };
}

custom_payload!(
    /// Mod channel message from the server.
    ClientboundCustomPayloadPacket,
    max_clientbound_custom_payload
);
custom_payload!(
    /// Mod channel message from the client.
    ServerboundCustomPayloadPacket,
    max_serverbound_custom_payload
);

/// Reads a required text component.
pub(crate) fn read_component(buffer: &mut PacketBuffer, field: &'static str) -> Result<Tag> {
    buffer
        .read_nbt_tag()?
        .ok_or(ProtocolError::MissingRequiredField(field))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectPacket {
    /// Text component.
    pub reason: Tag,
}

impl Packet for DisconnectPacket {
    const NAME: &'static str = "disconnect";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            reason: read_component(buffer, "reason")?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_nbt_tag(Some(&self.reason))
    }
}

/// Sent by both sides to leave the configuration phase. No fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishConfigurationPacket;

impl Packet for FinishConfigurationPacket {
    const NAME: &'static str = "finish_configuration";

    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(FinishConfigurationPacket)
    }

    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatVisibility {
    Full,
    System,
    Hidden,
}

impl ProtocolEnum for ChatVisibility {
    const NAME: &'static str = "ChatVisibility";
    const VALUES: &'static [Self] = &[
        ChatVisibility::Full,
        ChatVisibility::System,
        ChatVisibility::Hidden,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanoidArm {
    Left,
    Right,
}

impl ProtocolEnum for HumanoidArm {
    const NAME: &'static str = "HumanoidArm";
    const VALUES: &'static [Self] = &[HumanoidArm::Left, HumanoidArm::Right];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleStatus {
    All,
    Decreased,
    Minimal,
}

impl ProtocolEnum for ParticleStatus {
    const NAME: &'static str = "ParticleStatus";
    const VALUES: &'static [Self] = &[
        ParticleStatus::All,
        ParticleStatus::Decreased,
        ParticleStatus::Minimal,
    ];
}

/// Client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInformationPacket {
    pub language: String,
    pub view_distance: i8,
    pub chat_visibility: ChatVisibility,
    pub chat_colors: bool,
    /// Bit mask of visible skin parts.
    pub model_customisation: u8,
    pub main_hand: HumanoidArm,
    pub text_filtering_enabled: bool,
    pub allows_listing: bool,
    pub particle_status: ParticleStatus,
}

impl Packet for ClientInformationPacket {
    const NAME: &'static str = "client_information";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            language: buffer.read_string(MAX_LANGUAGE_LEN)?,
            view_distance: buffer.read_i8()?,
            chat_visibility: buffer.read_enum()?,
            chat_colors: buffer.read_bool()?,
            model_customisation: buffer.read_u8()?,
            main_hand: buffer.read_enum()?,
            text_filtering_enabled: buffer.read_bool()?,
            allows_listing: buffer.read_bool()?,
            particle_status: buffer.read_enum()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_string(&self.language, MAX_LANGUAGE_LEN)?;
        buffer.write_i8(self.view_distance);
        buffer.write_enum(self.chat_visibility);
        buffer.write_bool(self.chat_colors);
        buffer.write_u8(self.model_customisation);
        buffer.write_enum(self.main_hand);
        buffer.write_bool(self.text_filtering_enabled);
        buffer.write_bool(self.allows_listing);
        buffer.write_enum(self.particle_status);
        Ok(())
    }
}
