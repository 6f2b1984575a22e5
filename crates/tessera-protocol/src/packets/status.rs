use crate::buffer::{PacketBuffer, MAX_STRING_LEN};
use crate::packet::Packet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_common::Result;

/// Server list entry, sent as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Text component, kept as raw JSON.
    pub description: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<StatusPlayers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<StatusVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub enforces_secure_chat: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPlayers {
    pub max: i32,
    pub online: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample: Vec<StatusPlayerSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPlayerSample {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusRequestPacket;

impl Packet for StatusRequestPacket {
    const NAME: &'static str = "status_request";

    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(StatusRequestPacket)
    }

    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponsePacket {
    pub status: ServerStatus,
}

impl Packet for StatusResponsePacket {
    const NAME: &'static str = "status_response";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let json = buffer.read_string(MAX_STRING_LEN)?;
        Ok(Self {
            status: serde_json::from_str(&json)?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        let json = serde_json::to_string(&self.status)?;
        buffer.write_string(&json, MAX_STRING_LEN)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingRequestPacket {
    pub time: i64,
}

impl Packet for PingRequestPacket {
    const NAME: &'static str = "ping_request";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            time: buffer.read_i64()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i64(self.time);
        Ok(())
    }
}

/// Echoes the time of a ping request.
#[derive(Debug, Clone, PartialEq)]
pub struct PongResponsePacket {
    pub time: i64,
}

impl Packet for PongResponsePacket {
    const NAME: &'static str = "pong_response";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            time: buffer.read_i64()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i64(self.time);
        Ok(())
    }
}
