use crate::{Result, WorldError};
use tessera_common::{BlockPos, LightChannel, WorldHeight};
use tessera_protocol::world::{LightLayer, LightSource, LIGHT_ARRAY_SIZE};

static ZERO_LAYER: [u8; LIGHT_ARRAY_SIZE] = [0; LIGHT_ARRAY_SIZE];

/// Light levels 0..=15 of one section, two voxels per byte with the even index in the low
/// nibble. Storage is allocated on the first non-zero write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataLayer {
    data: Option<Box<[u8; LIGHT_ARRAY_SIZE]>>,
}

impl DataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every voxel at `level`.
    pub fn filled(level: u8) -> Self {
        let level = level & 15;
        if level == 0 {
            return Self::new();
        }
        Self {
            data: Some(Box::new([level | (level << 4); LIGHT_ARRAY_SIZE])),
        }
    }

    pub fn from_bytes(bytes: [u8; LIGHT_ARRAY_SIZE]) -> Self {
        Self {
            data: Some(Box::new(bytes)),
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        (y << 8) | (z << 4) | x
    }

    /// Coordinates are section-relative, 0..16.
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        let Some(data) = &self.data else {
            return 0;
        };
        let index = Self::index(x, y, z);
        (data[index >> 1] >> ((index & 1) * 4)) & 15
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, level: u8) {
        if self.data.is_none() && level & 15 == 0 {
            return;
        }
        let index = Self::index(x, y, z);
        let data = self.data.get_or_insert_with(|| Box::new([0; LIGHT_ARRAY_SIZE]));
        let shift = (index & 1) * 4;
        let byte = &mut data[index >> 1];
        *byte = (*byte & !(15 << shift)) | ((level & 15) << shift);
    }
}

impl LightLayer for DataLayer {
    fn is_empty(&self) -> bool {
        self.data
            .as_ref()
            .map_or(true, |data| data.iter().all(|&byte| byte == 0))
    }

    fn as_bytes(&self) -> &[u8; LIGHT_ARRAY_SIZE] {
        self.data.as_deref().unwrap_or(&ZERO_LAYER)
    }
}

/// Both light channels of one column, over the light sections: one below and one above the
/// block sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLight {
    world: WorldHeight,
    sky: Vec<Option<DataLayer>>,
    block: Vec<Option<DataLayer>>,
}

impl LevelLight {
    pub fn new(world: WorldHeight) -> Self {
        let count = world.light_section_count();
        Self {
            world,
            sky: vec![None; count],
            block: vec![None; count],
        }
    }

    fn layers(&self, channel: LightChannel) -> &[Option<DataLayer>] {
        match channel {
            LightChannel::Sky => &self.sky,
            LightChannel::Block => &self.block,
        }
    }

    fn layers_mut(&mut self, channel: LightChannel) -> &mut [Option<DataLayer>] {
        match channel {
            LightChannel::Sky => &mut self.sky,
            LightChannel::Block => &mut self.block,
        }
    }

    fn slot(&self, section_y: i32) -> Result<usize> {
        usize::try_from(section_y - self.world.min_light_section())
            .ok()
            .filter(|&index| index < self.world.light_section_count())
            .ok_or(WorldError::LightSectionOutOfRange { section_y })
    }

    /// Stores a layer at absolute section `section_y`; `None` clears it.
    pub fn set_layer(&mut self, channel: LightChannel, section_y: i32, layer: Option<DataLayer>) -> Result<()> {
        let slot = self.slot(section_y)?;
        self.layers_mut(channel)[slot] = layer;
        Ok(())
    }

    pub fn get_light(&self, channel: LightChannel, pos: BlockPos) -> u8 {
        let Ok(slot) = self.slot(pos.y >> 4) else {
            return 0;
        };
        self.layers(channel)[slot].as_ref().map_or(0, |layer| {
            layer.get(pos.relative_x() as usize, (pos.y & 15) as usize, pos.relative_z() as usize)
        })
    }

    pub fn set_light(&mut self, channel: LightChannel, pos: BlockPos, level: u8) -> Result<()> {
        let slot = self.slot(pos.y >> 4)?;
        self.layers_mut(channel)[slot].get_or_insert_with(DataLayer::new).set(
            pos.relative_x() as usize,
            (pos.y & 15) as usize,
            pos.relative_z() as usize,
            level,
        );
        Ok(())
    }
}

impl LightSource for LevelLight {
    type Layer = DataLayer;

    fn light_section_count(&self) -> usize {
        self.world.light_section_count()
    }

    fn min_light_section(&self) -> i32 {
        self.world.min_light_section()
    }

    fn layer_data(&self, channel: LightChannel, section_y: i32) -> Option<&DataLayer> {
        let slot = self.slot(section_y).ok()?;
        self.layers(channel)[slot].as_ref()
    }
}
