#![allow(dead_code)]

use tessera_common::{BlockPos, ChunkPos, LightChannel, WorldHeight};
use tessera_nbt::{Compound, Tag};
use tessera_world::{BlockEntity, BlockState, ChunkColumn, DataLayer, LevelLight};

pub const STONE: BlockState = BlockState(1);
pub const SIGN_TYPE: i32 = 7;

pub fn sign_data() -> Compound {
    let mut data = Compound::new();
    data.insert("is_waxed".to_string(), Tag::Byte(1));
    data
}

/// A column with a single stone block and a sign block entity at (3, 64, 9).
pub fn sample_column() -> ChunkColumn {
    let mut column = ChunkColumn::new(ChunkPos::new(0, 0), WorldHeight::default(), 0);
    let pos = BlockPos::new(3, 64, 9);
    column.set_block_state(pos, STONE).unwrap();
    column
        .set_block_entity(pos, BlockEntity::new(SIGN_TYPE, sign_data()))
        .unwrap();
    column
}

/// Full sky light above y = 64, one torch-lit voxel next to the stone.
pub fn sample_light() -> LevelLight {
    let world = WorldHeight::default();
    let mut light = LevelLight::new(world);
    for section_y in 5..=world.min_light_section() + world.light_section_count() as i32 - 1 {
        light
            .set_layer(LightChannel::Sky, section_y, Some(DataLayer::filled(15)))
            .unwrap();
    }
    light
        .set_layer(LightChannel::Sky, -5, Some(DataLayer::new()))
        .unwrap();
    light
        .set_light(LightChannel::Block, BlockPos::new(4, 64, 9), 14)
        .unwrap();
    light
}
