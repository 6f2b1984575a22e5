use crate::block::BlockState;
use crate::palette::{PaletteStrategy, PalettedContainer};
use crate::Result;
use tessera_protocol::world::ChunkSection;
use tessera_protocol::PacketBuffer;

/// One 16×16×16 slice of a column: block states, 4×4×4 biome cells and the count of
/// non-air blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChunkSection {
    non_empty_block_count: u16,
    states: PalettedContainer,
    biomes: PalettedContainer,
}

impl LevelChunkSection {
    /// An all-air section in a single biome.
    pub fn new(biome: u32) -> Self {
        Self {
            non_empty_block_count: 0,
            states: PalettedContainer::new(PaletteStrategy::BlockStates, BlockState::AIR.id()),
            biomes: PalettedContainer::new(PaletteStrategy::Biomes, biome),
        }
    }

    pub fn non_empty_block_count(&self) -> u16 {
        self.non_empty_block_count
    }

    pub fn has_only_air(&self) -> bool {
        self.non_empty_block_count == 0
    }

    pub fn states(&self) -> &PalettedContainer {
        &self.states
    }

    pub fn biomes(&self) -> &PalettedContainer {
        &self.biomes
    }

    /// Coordinates are section-relative, 0..16.
    pub fn get_block_state(&self, x: usize, y: usize, z: usize) -> BlockState {
        BlockState(self.states.get(PaletteStrategy::BlockStates.index(x, y, z)))
    }

    /// Replaces a block and returns the previous state.
    pub fn set_block_state(&mut self, x: usize, y: usize, z: usize, state: BlockState) -> Result<BlockState> {
        let index = PaletteStrategy::BlockStates.index(x, y, z);
        let previous = BlockState(self.states.set(index, state.id())?);
        if previous.is_air() && !state.is_air() {
            self.non_empty_block_count += 1;
        } else if !previous.is_air() && state.is_air() {
            self.non_empty_block_count -= 1;
        }
        Ok(previous)
    }

    /// Coordinates are in biome cells, 0..4.
    pub fn get_biome(&self, x: usize, y: usize, z: usize) -> u32 {
        self.biomes.get(PaletteStrategy::Biomes.index(x, y, z))
    }

    pub fn set_biome(&mut self, x: usize, y: usize, z: usize, biome: u32) -> Result<u32> {
        self.biomes.set(PaletteStrategy::Biomes.index(x, y, z), biome)
    }

    /// Reads a section as written by `write`. The block count is recomputed, not trusted.
    pub fn read(buffer: &mut PacketBuffer) -> tessera_common::Result<Self> {
        let _ = buffer.read_i16()?;
        let states = PalettedContainer::read(PaletteStrategy::BlockStates, buffer)?;
        let biomes = PalettedContainer::read(PaletteStrategy::Biomes, buffer)?;
        let non_empty_block_count = states.count(|state| !BlockState(state).is_air()) as u16;
        Ok(Self {
            non_empty_block_count,
            states,
            biomes,
        })
    }
}

impl ChunkSection for LevelChunkSection {
    fn serialized_size(&self) -> usize {
        2 + self.states.serialized_size() + self.biomes.serialized_size()
    }

    fn write(&self, buffer: &mut PacketBuffer) -> tessera_common::Result<()> {
        buffer.write_i16(self.non_empty_block_count as i16);
        self.states.write(buffer);
        self.biomes.write(buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_tracking() {
        let mut section = LevelChunkSection::new(0);
        assert!(section.has_only_air());

        section.set_block_state(1, 2, 3, BlockState(1)).unwrap();
        section.set_block_state(1, 2, 3, BlockState(2)).unwrap();
        section.set_block_state(0, 0, 0, BlockState(9)).unwrap();
        assert_eq!(section.non_empty_block_count(), 2);
        assert_eq!(section.get_block_state(1, 2, 3), BlockState(2));

        let previous = section.set_block_state(1, 2, 3, BlockState::AIR).unwrap();
        assert_eq!(previous, BlockState(2));
        assert_eq!(section.non_empty_block_count(), 1);
    }

    #[test]
    fn test_empty_section_bytes() {
        let section = LevelChunkSection::new(39);
        let mut buffer = PacketBuffer::new();
        section.write(&mut buffer).unwrap();
        assert_eq!(buffer.get_buffer(), &[0, 0, 0, 0, 0, 0, 39, 0]);
        assert_eq!(section.serialized_size(), 8);
    }

    #[test]
    fn test_size_matches_written_bytes() {
        let mut section = LevelChunkSection::new(0);
        for i in 0..40 {
            section.set_block_state(i % 16, i / 16, 0, BlockState(i as u32 + 1)).unwrap();
        }
        section.set_biome(3, 3, 3, 12).unwrap();

        let mut buffer = PacketBuffer::new();
        section.write(&mut buffer).unwrap();
        assert_eq!(buffer.len(), section.serialized_size());

        let decoded = LevelChunkSection::read(&mut buffer).unwrap();
        assert_eq!(decoded, section);
    }
}
