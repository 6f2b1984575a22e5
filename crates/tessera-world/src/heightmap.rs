use crate::block::BlockState;
use crate::storage::BitStorage;
use tessera_common::WorldHeight;

/// Per (x, z) first free y above the topmost non-air block, stored relative to the bottom of
/// the world so an empty column reads as `min_y`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    min_y: i32,
    storage: BitStorage,
}

impl Heightmap {
    pub fn new(world: WorldHeight) -> Self {
        // Values range over 0..=height
        let bits = (u32::BITS - world.height.leading_zeros()) as u8;
        Self {
            min_y: world.min_y,
            storage: BitStorage::new(bits, 256),
        }
    }

    pub fn first_available(&self, x: usize, z: usize) -> i32 {
        self.storage.get(x + z * 16) as i32 + self.min_y
    }

    pub fn set_first_available(&mut self, x: usize, z: usize, y: i32) {
        self.storage.set(x + z * 16, (y - self.min_y) as u32);
    }

    /// Accounts for `state` having been placed at `y`. `block_at` looks up the current state
    /// of the same (x, z) column, used to find the next surface when the top block is removed.
    pub fn update(
        &mut self,
        x: usize,
        y: i32,
        z: usize,
        state: BlockState,
        block_at: impl Fn(i32) -> BlockState,
    ) -> bool {
        let first = self.first_available(x, z);
        if y <= first - 2 {
            return false;
        }
        if !state.is_air() {
            if y >= first {
                self.set_first_available(x, z, y + 1);
                return true;
            }
        } else if first - 1 == y {
            let surface = (self.min_y..y).rev().find(|&below| !block_at(below).is_air());
            self.set_first_available(x, z, surface.map_or(self.min_y, |below| below + 1));
            return true;
        }
        false
    }

    /// Packed longs as sent in a chunk snapshot.
    pub fn raw(&self) -> Vec<i64> {
        self.storage.raw().iter().map(|&long| long as i64).collect()
    }
}
