use crate::bitset::BitSet;
use crate::buffer::PacketBuffer;
use crate::chunk_data::ChunkSnapshot;
use crate::light_data::LightData;
use crate::packet::Packet;
use crate::world::{ChunkColumnSource, LightSource};
use tessera_common::{BlockPos, ChunkPos, Result};

/// A full column: blocks and light together.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelChunkWithLightPacket {
    pub pos: ChunkPos,
    pub chunk_data: ChunkSnapshot,
    pub light_data: LightData,
}

impl LevelChunkWithLightPacket {
    pub fn new<C, L>(column: &C, light: &L) -> Result<Self>
    where
        C: ChunkColumnSource,
        L: LightSource,
    {
        Ok(Self {
            pos: column.pos(),
            chunk_data: ChunkSnapshot::from_column(column)?,
            light_data: LightData::from_source(light, None, None, true),
        })
    }
}

impl Packet for LevelChunkWithLightPacket {
    const NAME: &'static str = "level_chunk_with_light";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let x = buffer.read_i32()?;
        let z = buffer.read_i32()?;
        Ok(Self {
            pos: ChunkPos::new(x, z),
            chunk_data: ChunkSnapshot::read(buffer)?,
            light_data: LightData::read(buffer)?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i32(self.pos.x);
        buffer.write_i32(self.pos.z);
        self.chunk_data.write(buffer)?;
        self.light_data.write(buffer);
        Ok(())
    }
}

/// Light changes for a column the client already has.
#[derive(Debug, Clone, PartialEq)]
pub struct LightUpdatePacket {
    pub pos: ChunkPos,
    pub light_data: LightData,
}

impl LightUpdatePacket {
    pub fn new<L: LightSource>(
        pos: ChunkPos,
        light: &L,
        sky_changed: Option<&BitSet>,
        block_changed: Option<&BitSet>,
        trust_edges: bool,
    ) -> Self {
        Self {
            pos,
            light_data: LightData::from_source(light, sky_changed, block_changed, trust_edges),
        }
    }
}

impl Packet for LightUpdatePacket {
    const NAME: &'static str = "light_update";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        let x = buffer.read_varint()?;
        let z = buffer.read_varint()?;
        Ok(Self {
            pos: ChunkPos::new(x, z),
            light_data: LightData::read(buffer)?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.pos.x);
        buffer.write_varint(self.pos.z);
        self.light_data.write(buffer);
        Ok(())
    }
}

/// Unload a column on the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgetLevelChunkPacket {
    pub pos: ChunkPos,
}

impl Packet for ForgetLevelChunkPacket {
    const NAME: &'static str = "forget_level_chunk";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            pos: buffer.read_chunk_pos()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_chunk_pos(self.pos);
        Ok(())
    }
}

/// Update view position
#[derive(Debug, Clone, PartialEq)]
pub struct SetChunkCacheCenterPacket {
    pub x: i32,
    pub z: i32,
}

impl Packet for SetChunkCacheCenterPacket {
    const NAME: &'static str = "set_chunk_cache_center";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            x: buffer.read_varint()?,
            z: buffer.read_varint()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.x);
        buffer.write_varint(self.z);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockUpdatePacket {
    pub pos: BlockPos,
    /// Global block state id.
    pub block_state: i32,
}

impl Packet for BlockUpdatePacket {
    const NAME: &'static str = "block_update";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            pos: buffer.read_block_pos()?,
            block_state: buffer.read_varint()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_block_pos(self.pos);
        buffer.write_varint(self.block_state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forget_level_chunk_packs_position() {
        let packet = ForgetLevelChunkPacket {
            pos: ChunkPos::new(-3, 7),
        };
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(ForgetLevelChunkPacket::read_from_buffer(&mut buffer).unwrap(), packet);
    }

    #[test]
    fn test_block_update_negative_position() {
        let packet = BlockUpdatePacket {
            pos: BlockPos::new(-30_000_000, -64, 29_999_999),
            block_state: 1,
        };
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();
        assert_eq!(BlockUpdatePacket::read_from_buffer(&mut buffer).unwrap(), packet);
    }
}
