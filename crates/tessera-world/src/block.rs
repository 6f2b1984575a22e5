use tessera_nbt::Compound;
use tessera_protocol::world::BlockEntitySource;

/// A block state, by its id in the global block state registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockState(pub u32);

impl BlockState {
    pub const AIR: BlockState = BlockState(0);

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// Server-side data attached to a block, such as sign text or chest contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockEntity {
    /// Id in the block entity type registry
    pub type_id: i32,
    pub data: Compound,
}

impl BlockEntity {
    pub fn new(type_id: i32, data: Compound) -> Self {
        Self { type_id, data }
    }
}

impl BlockEntitySource for BlockEntity {
    fn type_id(&self) -> i32 {
        self.type_id
    }

    fn update_tag(&self) -> Compound {
        self.data.clone()
    }
}
