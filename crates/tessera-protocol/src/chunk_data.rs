use crate::buffer::PacketBuffer;
use crate::world::{BlockEntitySource, ChunkColumnSource, ChunkSection};
use bytes::Bytes;
use std::collections::BTreeMap;
use tessera_common::{BlockPos, ChunkPos, ProtocolError, Result};
use tessera_nbt::{Compound, Tag};

/// The named height curves a column may track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeightmapKind {
    WorldSurfaceWg,
    WorldSurface,
    OceanFloorWg,
    OceanFloor,
    MotionBlocking,
    MotionBlockingNoLeaves,
}

impl HeightmapKind {
    pub const ALL: [HeightmapKind; 6] = [
        HeightmapKind::WorldSurfaceWg,
        HeightmapKind::WorldSurface,
        HeightmapKind::OceanFloorWg,
        HeightmapKind::OceanFloor,
        HeightmapKind::MotionBlocking,
        HeightmapKind::MotionBlockingNoLeaves,
    ];

    pub fn key(self) -> &'static str {
        match self {
            HeightmapKind::WorldSurfaceWg => "WORLD_SURFACE_WG",
            HeightmapKind::WorldSurface => "WORLD_SURFACE",
            HeightmapKind::OceanFloorWg => "OCEAN_FLOOR_WG",
            HeightmapKind::OceanFloor => "OCEAN_FLOOR",
            HeightmapKind::MotionBlocking => "MOTION_BLOCKING",
            HeightmapKind::MotionBlockingNoLeaves => "MOTION_BLOCKING_NO_LEAVES",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Whether the client receives this curve. Worldgen-only curves stay on the server.
    pub fn sends_to_client(self) -> bool {
        matches!(
            self,
            HeightmapKind::WorldSurface
                | HeightmapKind::MotionBlocking
                | HeightmapKind::MotionBlockingNoLeaves
        )
    }
}

pub type Heightmaps = BTreeMap<HeightmapKind, Vec<i64>>;

/// A block entity as sent inside a chunk snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntityInfo {
    /// Section-relative x in the high nibble, z in the low nibble.
    pub packed_xz: u8,
    pub y: i16,
    pub type_id: i32,
    /// Never `Some` of an empty compound.
    pub tag: Option<Compound>,
}

impl BlockEntityInfo {
    pub fn new(pos: BlockPos, type_id: i32, tag: Compound) -> Self {
        Self {
            packed_xz: (pos.relative_x() << 4) | pos.relative_z(),
            y: pos.y as i16,
            type_id,
            tag: Some(tag).filter(|tag| !tag.is_empty()),
        }
    }

    pub fn relative_x(&self) -> u8 {
        self.packed_xz >> 4
    }

    pub fn relative_z(&self) -> u8 {
        self.packed_xz & 15
    }

    /// Absolute position inside the column at `chunk`.
    pub fn position(&self, chunk: ChunkPos) -> BlockPos {
        BlockPos::new(
            chunk.min_block_x() + self.relative_x() as i32,
            self.y as i32,
            chunk.min_block_z() + self.relative_z() as i32,
        )
    }

    fn write(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_u8(self.packed_xz);
        buffer.write_i16(self.y);
        buffer.write_varint(self.type_id);
        buffer.write_nbt(self.tag.as_ref())
    }

    fn read(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            packed_xz: buffer.read_u8()?,
            y: buffer.read_i16()?,
            type_id: buffer.read_varint()?,
            tag: buffer.read_nbt()?.filter(|tag| !tag.is_empty()),
        })
    }
}

/// One column's blocks as sent to the client: client-visible heightmaps, the concatenated
/// section bytes, and the block entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSnapshot {
    heightmaps: Heightmaps,
    buffer: Bytes,
    block_entities: Vec<BlockEntityInfo>,
}

impl ChunkSnapshot {
    pub fn new(heightmaps: Heightmaps, buffer: Bytes, block_entities: Vec<BlockEntityInfo>) -> Self {
        Self {
            heightmaps,
            buffer,
            block_entities,
        }
    }

    /// Serializes a column. The section buffer is sized up front from the sections' own
    /// reported sizes, and each section must write exactly what it reported.
    pub fn from_column<C: ChunkColumnSource>(column: &C) -> Result<Self> {
        let sections = column.sections();
        let size = sections.iter().map(|section| section.serialized_size()).sum();

        let mut buffer = PacketBuffer::with_capacity(size);
        for section in sections {
            let start = buffer.len();
            section.write(&mut buffer)?;
            let written = buffer.len() - start;
            if written != section.serialized_size() {
                return Err(ProtocolError::SectionSizeMismatch {
                    expected: section.serialized_size(),
                    actual: written,
                });
            }
        }

        let heightmaps = HeightmapKind::ALL
            .into_iter()
            .filter(|kind| kind.sends_to_client())
            .filter_map(|kind| column.heightmap(kind).map(|data| (kind, data)))
            .collect();

        let block_entities = column
            .block_entities()
            .map(|(pos, entity)| BlockEntityInfo::new(pos, entity.type_id(), entity.update_tag()))
            .collect();

        Ok(Self {
            heightmaps,
            buffer: buffer.into_bytes(),
            block_entities,
        })
    }

    pub fn heightmaps(&self) -> &Heightmaps {
        &self.heightmaps
    }

    /// Section bytes, back to back.
    pub fn section_data(&self) -> &Bytes {
        &self.buffer
    }

    pub fn block_entities(&self) -> &[BlockEntityInfo] {
        &self.block_entities
    }

    pub fn write(&self, buffer: &mut PacketBuffer) -> Result<()> {
        let compound: Compound = self
            .heightmaps
            .iter()
            .filter(|(kind, _)| kind.sends_to_client())
            .map(|(kind, data)| (kind.key().to_string(), Tag::LongArray(data.clone())))
            .collect();
        buffer.write_nbt(Some(&compound))?;

        buffer.write_byte_array(&self.buffer)?;

        buffer.write_collection(&self.block_entities, |buffer, entity| entity.write(buffer))
    }

    pub fn read(buffer: &mut PacketBuffer) -> Result<Self> {
        let compound = buffer
            .read_nbt()?
            .ok_or(ProtocolError::MissingRequiredField("heightmaps"))?;
        let heightmaps = read_heightmaps(compound);

        let length = buffer.read_varint()?;
        if length < 0 {
            return Err(ProtocolError::NegativeLength(length));
        }
        let length = length as usize;
        let max = buffer.config().max_chunk_payload;
        if length > max {
            return Err(ProtocolError::ChunkTooLarge { length, max });
        }
        let data = buffer.read_bytes(length)?;

        // Each entry takes at least five bytes
        let max_entities = buffer.readable_bytes() / 5;
        let block_entities = buffer.read_collection(max_entities, BlockEntityInfo::read)?;

        Ok(Self {
            heightmaps,
            buffer: data,
            block_entities,
        })
    }
}

fn read_heightmaps(compound: Compound) -> Heightmaps {
    compound
        .into_iter()
        .filter_map(|(key, tag)| {
            let kind = HeightmapKind::from_key(&key).filter(|kind| kind.sends_to_client())?;
            match tag {
                Tag::LongArray(data) => Some((kind, data)),
                _ => None,
            }
        })
        .collect()
}
