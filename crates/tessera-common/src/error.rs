use crate::types::{ConnectionProtocol, LightChannel, PacketFlow};
use tessera_nbt::NbtError;
use thiserror::Error;

/// Every error a codec operation can produce.
///
/// All of them are fatal to the connection: each packet must consume exactly its own bytes
/// of an ordered stream, so after any failure the remaining bytes can no longer be framed
/// reliably and the only safe recovery is closing the connection.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("VarInt too big")]
    MalformedVarint,

    #[error("VarLong too big")]
    MalformedVarlong,

    #[error("string of {length} exceeds maximum length {max}")]
    StringTooLong { length: usize, max: usize },

    #[error("payload of {length} bytes exceeds maximum of {max}")]
    PayloadTooLarge { length: usize, max: usize },

    #[error("chunk payload of {length} bytes exceeds maximum of {max}")]
    ChunkTooLarge { length: usize, max: usize },

    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("unknown packet id 0x{id:02x} in {phase} {flow}")]
    UnknownPacketId {
        id: i32,
        phase: ConnectionProtocol,
        flow: PacketFlow,
    },

    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("collection of {length} elements exceeds maximum of {max}")]
    CollectionTooLarge { length: usize, max: usize },

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("invalid ordinal {ordinal} for {name}")]
    InvalidEnumOrdinal { name: &'static str, ordinal: i32 },

    #[error("id {id} is not present in registry {registry}")]
    UnknownRegistryId { registry: &'static str, id: i32 },

    #[error("value is not present in registry {0}")]
    UnknownRegistryValue(&'static str),

    #[error("registry {registry} lists one value at both id {first} and id {duplicate}")]
    DuplicateRegistryValue {
        registry: &'static str,
        first: i32,
        duplicate: i32,
    },

    #[error("invalid resource location: {0}")]
    InvalidResourceLocation(String),

    #[error("section declared {expected} bytes but wrote {actual}")]
    SectionSizeMismatch { expected: usize, actual: usize },

    #[error("palette of {bits} bits per entry, expected at most {direct_bits}")]
    InvalidPaletteBits { bits: u8, direct_bits: u8 },

    #[error("palette value {value} does not fit in {bits} bits")]
    PaletteValueOutOfRange { value: i64, bits: u8 },

    #[error("{channel} light mask has {expected} sections but {actual} arrays were sent")]
    LightPayloadMismatch {
        channel: LightChannel,
        expected: usize,
        actual: usize,
    },

    #[error("{channel} light section {section} is marked both present and empty")]
    ConflictingLightMasks { channel: LightChannel, section: usize },

    #[error("{channel} light section {section} is outside the {count} light sections")]
    LightSectionOutOfRange {
        channel: LightChannel,
        section: usize,
        count: usize,
    },

    #[error("packet {packet} was larger than expected, found {remaining} bytes extra")]
    TrailingBytes {
        packet: &'static str,
        remaining: usize,
    },

    #[error("frame of {length} bytes exceeds maximum of {max}")]
    FrameTooLarge { length: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("NBT error: {0}")]
    Nbt(#[from] NbtError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
