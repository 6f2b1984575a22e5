use crate::buffer::PacketBuffer;
use crate::codec::{FieldCodec, ProtocolEnum};
use crate::packet::Packet;
use crate::quantize::{pack_sound_coordinate, unpack_sound_coordinate};
use crate::registry::ResourceLocation;
use tessera_common::{ProtocolError, Result, Vec3};

const SOUND_REGISTRY: &str = "sound_event";

/// A sound not present in the client's registry, sent inline.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEvent {
    pub location: ResourceLocation,
    /// Fixed audible range; `None` lets the range scale with volume.
    pub fixed_range: Option<f32>,
}

pub const SOUND_EVENT: FieldCodec<SoundEvent> = FieldCodec::new(
    |buffer, event| {
        buffer.write_resource_location(&event.location)?;
        buffer.write_optional(event.fixed_range.as_ref(), |buffer, range| {
            buffer.write_f32(*range);
            Ok(())
        })
    },
    |buffer| {
        Ok(SoundEvent {
            location: buffer.read_resource_location()?,
            fixed_range: buffer.read_optional(|buffer| buffer.read_f32())?,
        })
    },
);

/// Either a registry id or an inline definition. On the wire a registered sound is its id
/// plus one; zero introduces an inline definition.
#[derive(Debug, Clone, PartialEq)]
pub enum SoundHolder {
    Registered(i32),
    Direct(SoundEvent),
}

impl PacketBuffer {
    pub fn write_sound_holder(&mut self, holder: &SoundHolder) -> Result<()> {
        match holder {
            SoundHolder::Registered(id) => {
                let wire_id = u32::try_from(*id)
                    .ok()
                    .and_then(|id| i32::try_from(id + 1).ok())
                    .ok_or(ProtocolError::UnknownRegistryId {
                        registry: SOUND_REGISTRY,
                        id: *id,
                    })?;
                self.write_varint(wire_id);
                Ok(())
            }
            SoundHolder::Direct(event) => {
                self.write_varint(0);
                self.write_nested(event, &SOUND_EVENT)
            }
        }
    }

    pub fn read_sound_holder(&mut self) -> Result<SoundHolder> {
        match self.read_varint()? {
            0 => Ok(SoundHolder::Direct(self.read_nested(&SOUND_EVENT)?)),
            id if id > 0 => Ok(SoundHolder::Registered(id - 1)),
            id => Err(ProtocolError::UnknownRegistryId {
                registry: SOUND_REGISTRY,
                id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSource {
    Master,
    Music,
    Records,
    Weather,
    Blocks,
    Hostile,
    Neutral,
    Players,
    Ambient,
    Voice,
}

impl ProtocolEnum for SoundSource {
    const NAME: &'static str = "SoundSource";
    const VALUES: &'static [Self] = &[
        SoundSource::Master,
        SoundSource::Music,
        SoundSource::Records,
        SoundSource::Weather,
        SoundSource::Blocks,
        SoundSource::Hostile,
        SoundSource::Neutral,
        SoundSource::Players,
        SoundSource::Ambient,
        SoundSource::Voice,
    ];
}

/// Plays a sound at a world position, quantised to eighths of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundPacket {
    pub sound: SoundHolder,
    pub source: SoundSource,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub volume: f32,
    pub pitch: f32,
    pub seed: i64,
}

impl SoundPacket {
    pub fn new(
        sound: SoundHolder,
        source: SoundSource,
        position: Vec3,
        volume: f32,
        pitch: f32,
        seed: i64,
    ) -> Self {
        Self {
            sound,
            source,
            x: pack_sound_coordinate(position.x),
            y: pack_sound_coordinate(position.y),
            z: pack_sound_coordinate(position.z),
            volume,
            pitch,
            seed,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            unpack_sound_coordinate(self.x),
            unpack_sound_coordinate(self.y),
            unpack_sound_coordinate(self.z),
        )
    }
}

impl Packet for SoundPacket {
    const NAME: &'static str = "sound";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            sound: buffer.read_sound_holder()?,
            source: buffer.read_enum()?,
            x: buffer.read_i32()?,
            y: buffer.read_i32()?,
            z: buffer.read_i32()?,
            volume: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            seed: buffer.read_i64()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_sound_holder(&self.sound)?;
        buffer.write_enum(self.source);
        buffer.write_i32(self.x);
        buffer.write_i32(self.y);
        buffer.write_i32(self.z);
        buffer.write_f32(self.volume);
        buffer.write_f32(self.pitch);
        buffer.write_i64(self.seed);
        Ok(())
    }
}
