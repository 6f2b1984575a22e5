//! In-memory chunk storage that can be streamed through the tessera chunk and light codecs.

pub mod block;
pub mod column;
pub mod error;
pub mod heightmap;
pub mod light;
pub mod palette;
pub mod section;
pub mod storage;

pub use block::{BlockEntity, BlockState};
pub use column::ChunkColumn;
pub use error::WorldError;
pub use heightmap::Heightmap;
pub use light::{DataLayer, LevelLight};
pub use palette::{PaletteStrategy, PalettedContainer};
pub use section::LevelChunkSection;
pub use storage::BitStorage;

pub type Result<T> = std::result::Result<T, WorldError>;
