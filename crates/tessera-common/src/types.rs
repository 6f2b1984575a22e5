use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol phase a connection is in. Each phase has its own packet id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionProtocol {
    Handshake,
    Status,
    Login,
    Configuration,
    Play,
}

impl fmt::Display for ConnectionProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionProtocol::Handshake => write!(f, "handshake"),
            ConnectionProtocol::Status => write!(f, "status"),
            ConnectionProtocol::Login => write!(f, "login"),
            ConnectionProtocol::Configuration => write!(f, "configuration"),
            ConnectionProtocol::Play => write!(f, "play"),
        }
    }
}

/// Direction a packet travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketFlow {
    /// Server to client
    Clientbound,
    /// Client to server
    Serverbound,
}

impl fmt::Display for PacketFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketFlow::Clientbound => write!(f, "clientbound"),
            PacketFlow::Serverbound => write!(f, "serverbound"),
        }
    }
}

/// The two independently propagated light channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightChannel {
    Sky,
    Block,
}

impl fmt::Display for LightChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightChannel::Sky => write!(f, "sky"),
            LightChannel::Block => write!(f, "block"),
        }
    }
}

/// Column coordinates, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Packs both coordinates into one long, x in the low half.
    pub fn to_long(self) -> i64 {
        (self.x as u32 as i64) | ((self.z as u32 as i64) << 32)
    }

    pub fn from_long(value: i64) -> Self {
        Self {
            x: value as i32,
            z: (value >> 32) as i32,
        }
    }

    /// Lowest block x coordinate of this column
    pub fn min_block_x(self) -> i32 {
        self.x << 4
    }

    /// Lowest block z coordinate of this column
    pub fn min_block_z(self) -> i32 {
        self.z << 4
    }
}

/// Absolute block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

const PACKED_XZ_BITS: u32 = 26;
const PACKED_Y_BITS: u32 = 12;
const PACKED_XZ_MASK: i64 = (1 << PACKED_XZ_BITS) - 1;
const PACKED_Y_MASK: i64 = (1 << PACKED_Y_BITS) - 1;

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Packs the position as x:26 | z:26 | y:12, x in the high bits.
    pub fn to_long(self) -> i64 {
        ((self.x as i64 & PACKED_XZ_MASK) << (PACKED_XZ_BITS + PACKED_Y_BITS))
            | ((self.z as i64 & PACKED_XZ_MASK) << PACKED_Y_BITS)
            | (self.y as i64 & PACKED_Y_MASK)
    }

    pub fn from_long(value: i64) -> Self {
        // Arithmetic shifts sign-extend each field
        let x = (value >> (PACKED_XZ_BITS + PACKED_Y_BITS)) as i32;
        let z = ((value << (64 - PACKED_Y_BITS - PACKED_XZ_BITS)) >> (64 - PACKED_XZ_BITS)) as i32;
        let y = ((value << (64 - PACKED_Y_BITS)) >> (64 - PACKED_Y_BITS)) as i32;
        Self { x, y, z }
    }

    pub fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(self.x >> 4, self.z >> 4)
    }

    /// Section-relative x (0..16)
    pub fn relative_x(self) -> u8 {
        (self.x & 15) as u8
    }

    /// Section-relative z (0..16)
    pub fn relative_z(self) -> u8 {
        (self.z & 15) as u8
    }
}

/// A double precision vector, used for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
