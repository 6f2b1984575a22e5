//! Wire protocol for streaming a chunked voxel world: primitive and composite codecs, chunk and
//! light payloads, per-phase packet tables and the connection plumbing that drives them.

pub mod bitset;
pub mod buffer;
pub mod chunk_data;
pub mod codec;
pub mod connection;
pub mod frame;
pub mod handler;
pub mod light_data;
pub mod packet;
pub mod packets;
pub mod protocol;
pub mod quantize;
pub mod registry;
pub mod world;

pub use bitset::BitSet;
pub use buffer::PacketBuffer;
pub use chunk_data::{BlockEntityInfo, ChunkSnapshot, HeightmapKind, Heightmaps};
pub use codec::{FieldCodec, ProtocolEnum};
pub use connection::{PacketReader, PacketSender, PacketWriter};
pub use frame::FrameCodec;
pub use handler::{ClientboundHandler, ServerboundHandler};
pub use light_data::{ChannelLight, LightArray, LightData};
pub use packet::{DispatchEntry, DispatchTable, Packet};
pub use protocol::{ClientboundPacket, DirectionalPacket, ServerboundPacket};
pub use registry::{IdMap, ResourceLocation};
pub use world::{
    BlockEntitySource, ChunkColumnSource, ChunkSection, LightLayer, LightSource, LIGHT_ARRAY_SIZE,
};

pub use tessera_common::{ProtocolError, Result};
