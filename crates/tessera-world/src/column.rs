use crate::block::{BlockEntity, BlockState};
use crate::heightmap::Heightmap;
use crate::section::LevelChunkSection;
use crate::{Result, WorldError};
use std::collections::BTreeMap;
use tessera_common::{BlockPos, ChunkPos, WorldHeight};
use tessera_protocol::chunk_data::HeightmapKind;
use tessera_protocol::world::ChunkColumnSource;

/// Heightmaps a column maintains. They all track the topmost non-air block.
const TRACKED_HEIGHTMAPS: [HeightmapKind; 3] = [
    HeightmapKind::WorldSurface,
    HeightmapKind::MotionBlocking,
    HeightmapKind::MotionBlockingNoLeaves,
];

/// A full-height column of sections with its heightmaps and block entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkColumn {
    pos: ChunkPos,
    world: WorldHeight,
    sections: Vec<LevelChunkSection>,
    heightmaps: BTreeMap<HeightmapKind, Heightmap>,
    block_entities: BTreeMap<BlockPos, BlockEntity>,
}

fn block_in(sections: &[LevelChunkSection], world: WorldHeight, x: usize, y: i32, z: usize) -> BlockState {
    let index = ((y >> 4) - world.min_section()) as usize;
    sections
        .get(index)
        .map_or(BlockState::AIR, |section| section.get_block_state(x, (y & 15) as usize, z))
}

impl ChunkColumn {
    /// An all-air column filled with one biome.
    pub fn new(pos: ChunkPos, world: WorldHeight, biome: u32) -> Self {
        Self {
            pos,
            world,
            sections: vec![LevelChunkSection::new(biome); world.section_count()],
            heightmaps: TRACKED_HEIGHTMAPS
                .into_iter()
                .map(|kind| (kind, Heightmap::new(world)))
                .collect(),
            block_entities: BTreeMap::new(),
        }
    }

    pub fn world(&self) -> WorldHeight {
        self.world
    }

    pub fn section(&self, section_y: i32) -> Option<&LevelChunkSection> {
        let index = usize::try_from(section_y - self.world.min_section()).ok()?;
        self.sections.get(index)
    }

    fn check(&self, pos: BlockPos) -> Result<usize> {
        if pos.chunk_pos() != self.pos {
            return Err(WorldError::WrongColumn { pos });
        }
        if pos.y < self.world.min_y || pos.y > self.world.max_y() {
            return Err(WorldError::OutOfWorld {
                y: pos.y,
                min_y: self.world.min_y,
                max_y: self.world.max_y(),
            });
        }
        Ok(((pos.y >> 4) - self.world.min_section()) as usize)
    }

    /// Air for positions outside this column.
    pub fn get_block_state(&self, pos: BlockPos) -> BlockState {
        match self.check(pos) {
            Ok(_) => block_in(
                &self.sections,
                self.world,
                pos.relative_x() as usize,
                pos.y,
                pos.relative_z() as usize,
            ),
            Err(_) => BlockState::AIR,
        }
    }

    /// Places a block and keeps the heightmaps current. A block entity at the position is
    /// dropped when the state changes.
    pub fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> Result<BlockState> {
        let index = self.check(pos)?;
        let (x, z) = (pos.relative_x() as usize, pos.relative_z() as usize);
        let previous = self.sections[index].set_block_state(x, (pos.y & 15) as usize, z, state)?;
        if previous == state {
            return Ok(previous);
        }

        let world = self.world;
        let sections = &self.sections;
        for heightmap in self.heightmaps.values_mut() {
            heightmap.update(x, pos.y, z, state, |y| block_in(sections, world, x, y, z));
        }
        self.block_entities.remove(&pos);
        Ok(previous)
    }

    pub fn set_block_entity(&mut self, pos: BlockPos, entity: BlockEntity) -> Result<()> {
        self.check(pos)?;
        self.block_entities.insert(pos, entity);
        Ok(())
    }

    pub fn block_entity(&self, pos: BlockPos) -> Option<&BlockEntity> {
        self.block_entities.get(&pos)
    }

    pub fn remove_block_entity(&mut self, pos: BlockPos) -> Option<BlockEntity> {
        self.block_entities.remove(&pos)
    }

    pub fn get_heightmap(&self, kind: HeightmapKind) -> Option<&Heightmap> {
        self.heightmaps.get(&kind)
    }
}

impl ChunkColumnSource for ChunkColumn {
    type Section = LevelChunkSection;
    type BlockEntity = BlockEntity;

    fn pos(&self) -> ChunkPos {
        self.pos
    }

    fn heightmap(&self, kind: HeightmapKind) -> Option<Vec<i64>> {
        self.heightmaps.get(&kind).map(Heightmap::raw)
    }

    fn sections(&self) -> &[LevelChunkSection] {
        &self.sections
    }

    fn block_entities(&self) -> impl Iterator<Item = (BlockPos, &BlockEntity)> + '_ {
        self.block_entities.iter().map(|(pos, entity)| (*pos, entity))
    }
}
