//! What the chunk and light codecs need from world storage.

use crate::buffer::PacketBuffer;
use crate::chunk_data::HeightmapKind;
use tessera_common::{BlockPos, ChunkPos, LightChannel, Result};
use tessera_nbt::Compound;

/// Bytes in one nibble array: 4 bits for each of the 16³ voxels of a section.
pub const LIGHT_ARRAY_SIZE: usize = 2048;

/// One 16³ vertical section, able to serialize itself.
pub trait ChunkSection {
    /// Exact number of bytes `write` will append.
    fn serialized_size(&self) -> usize;

    fn write(&self, buffer: &mut PacketBuffer) -> Result<()>;
}

pub trait BlockEntitySource {
    /// Block entity type id in the block entity type registry.
    fn type_id(&self) -> i32;

    /// Data the client needs to render the block entity. May be empty.
    fn update_tag(&self) -> Compound;
}

/// A column as stored by the world, read when building a chunk snapshot.
pub trait ChunkColumnSource {
    type Section: ChunkSection;
    type BlockEntity: BlockEntitySource;

    fn pos(&self) -> ChunkPos;

    /// Packed heightmap data, `None` when the column does not track that kind.
    fn heightmap(&self, kind: HeightmapKind) -> Option<Vec<i64>>;

    /// Sections from the bottom of the world up.
    fn sections(&self) -> &[Self::Section];

    fn block_entities(&self) -> impl Iterator<Item = (BlockPos, &Self::BlockEntity)> + '_;
}

pub trait LightLayer {
    /// True when every voxel of the layer is zero.
    fn is_empty(&self) -> bool;

    fn as_bytes(&self) -> &[u8; LIGHT_ARRAY_SIZE];
}

/// Per-channel light storage over the light sections of one column. Light sections extend
/// one section below and one above the block sections.
pub trait LightSource {
    type Layer: LightLayer;

    fn light_section_count(&self) -> usize;

    fn min_light_section(&self) -> i32;

    /// Layer at absolute section `section_y`, `None` when nothing is stored there.
    fn layer_data(&self, channel: LightChannel, section_y: i32) -> Option<&Self::Layer>;
}
