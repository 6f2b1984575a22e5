pub mod config;
pub mod error;
pub mod types;

pub use config::{CodecConfig, WorldHeight};
pub use error::ProtocolError;
pub use types::{BlockPos, ChunkPos, ConnectionProtocol, LightChannel, PacketFlow, Vec3};

pub type Result<T> = std::result::Result<T, ProtocolError>;
