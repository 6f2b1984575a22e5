use super::common::read_component;
use crate::buffer::{PacketBuffer, MAX_STRING_LEN};
use crate::packet::Packet;
use tessera_common::Result;
use tessera_nbt::Tag;

/// Server message shown in chat, or above the hotbar when `overlay` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemChatPacket {
    /// Text component.
    pub content: Tag,
    pub overlay: bool,
}

impl Packet for SystemChatPacket {
    const NAME: &'static str = "system_chat";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            content: read_component(buffer, "content")?,
            overlay: buffer.read_bool()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_nbt_tag(Some(&self.content))?;
        buffer.write_bool(self.overlay);
        Ok(())
    }
}

/// A command typed by the player, without the leading slash.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCommandPacket {
    pub command: String,
}

impl Packet for ChatCommandPacket {
    const NAME: &'static str = "chat_command";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            command: buffer.read_string(MAX_STRING_LEN)?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_string(&self.command, MAX_STRING_LEN)
    }
}
