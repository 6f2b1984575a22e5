use crate::buffer::{PacketBuffer, MAX_STRING_LEN};
use crate::codec::FieldCodec;
use crate::packet::Packet;
use tessera_common::Result;
use uuid::Uuid;

pub const MAX_PLAYER_NAME_LEN: usize = 16;
pub const MAX_PROPERTY_NAME_LEN: usize = 64;
pub const MAX_PROPERTY_SIGNATURE_LEN: usize = 1024;
pub const MAX_PROFILE_PROPERTIES: usize = 16;
/// Disconnect reasons are JSON text components and may be long.
pub const MAX_REASON_LEN: usize = 262_144;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

pub const PROFILE_PROPERTY: FieldCodec<ProfileProperty> = FieldCodec::new(
    |buffer, property| {
        buffer.write_string(&property.name, MAX_PROPERTY_NAME_LEN)?;
        buffer.write_string(&property.value, MAX_STRING_LEN)?;
        buffer.write_optional(property.signature.as_ref(), |buffer, signature| {
            buffer.write_string(signature, MAX_PROPERTY_SIGNATURE_LEN)
        })
    },
    |buffer| {
        Ok(ProfileProperty {
            name: buffer.read_string(MAX_PROPERTY_NAME_LEN)?,
            value: buffer.read_string(MAX_STRING_LEN)?,
            signature: buffer.read_optional(|buffer| buffer.read_string(MAX_PROPERTY_SIGNATURE_LEN))?,
        })
    },
);

#[derive(Debug, Clone, PartialEq)]
pub struct GameProfile {
    pub id: Uuid,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
}

impl GameProfile {
    /// Profile of an unauthenticated player. The id is derived from the name, so the same
    /// name always maps to the same id.
    pub fn offline(name: &str) -> Self {
        let id = Uuid::new_v3(
            &Uuid::NAMESPACE_DNS,
            format!("OfflinePlayer:{}", name).as_bytes(),
        );
        Self {
            id,
            name: name.to_string(),
            properties: Vec::new(),
        }
    }
}

pub const GAME_PROFILE: FieldCodec<GameProfile> = FieldCodec::new(
    |buffer, profile| {
        buffer.write_uuid(profile.id);
        buffer.write_string(&profile.name, MAX_PLAYER_NAME_LEN)?;
        buffer.write_list(&profile.properties, &PROFILE_PROPERTY)
    },
    |buffer| {
        Ok(GameProfile {
            id: buffer.read_uuid()?,
            name: buffer.read_string(MAX_PLAYER_NAME_LEN)?,
            properties: buffer.read_list(MAX_PROFILE_PROPERTIES, &PROFILE_PROPERTY)?,
        })
    },
);

/// Login start
#[derive(Debug, Clone, PartialEq)]
pub struct HelloPacket {
    pub name: String,
    pub profile_id: Uuid,
}

impl Packet for HelloPacket {
    const NAME: &'static str = "hello";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            name: buffer.read_string(MAX_PLAYER_NAME_LEN)?,
            profile_id: buffer.read_uuid()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_string(&self.name, MAX_PLAYER_NAME_LEN)?;
        buffer.write_uuid(self.profile_id);
        Ok(())
    }
}

/// Login success. The client answers with `LoginAcknowledgedPacket`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginFinishedPacket {
    pub profile: GameProfile,
    pub strict_error_handling: bool,
}

impl LoginFinishedPacket {
    pub fn new(profile: GameProfile) -> Self {
        Self {
            profile,
            strict_error_handling: false,
        }
    }
}

impl Packet for LoginFinishedPacket {
    const NAME: &'static str = "login_finished";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            profile: buffer.read_nested(&GAME_PROFILE)?,
            strict_error_handling: buffer.read_bool()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_nested(&self.profile, &GAME_PROFILE)?;
        buffer.write_bool(self.strict_error_handling);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginDisconnectPacket {
    /// JSON text component.
    pub reason: String,
}

impl Packet for LoginDisconnectPacket {
    const NAME: &'static str = "login_disconnect";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            reason: buffer.read_string(MAX_REASON_LEN)?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_string(&self.reason, MAX_REASON_LEN)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginAcknowledgedPacket;

impl Packet for LoginAcknowledgedPacket {
    const NAME: &'static str = "login_acknowledged";

    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(LoginAcknowledgedPacket)
    }

    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tessera_common::ProtocolError;

    #[test]
    fn test_offline_profile_stable() {
        let first = GameProfile::offline("Steve");
        let second = GameProfile::offline("Steve");
        assert_eq!(first.id, second.id);
        assert_eq!(first.id.get_version_num(), 3);
        assert_ne!(first.id, GameProfile::offline("Alex").id);
    }

    #[test]
    fn test_login_finished_with_properties() {
        let mut profile = GameProfile::offline("Steve");
        profile.properties.push(ProfileProperty {
            name: "textures".to_string(),
            value: "e30=".to_string(),
            signature: None,
        });
        let packet = LoginFinishedPacket::new(profile);

        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();
        assert_eq!(LoginFinishedPacket::read_from_buffer(&mut buffer).unwrap(), packet);
    }

    #[test]
    fn test_player_name_cap() {
        let mut buffer = PacketBuffer::new();
        let result = HelloPacket {
            name: "ThisNameIsFarTooLong".to_string(),
            profile_id: Uuid::nil(),
        }
        .write_to_buffer(&mut buffer);
        assert_matches!(result, Err(ProtocolError::StringTooLong { max: 16, .. }));
    }
}
