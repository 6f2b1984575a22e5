use crate::Result;
use serde::{Deserialize, Serialize};

/// Hard cap on a chunk snapshot's declared section payload.
pub const DEFAULT_MAX_CHUNK_PAYLOAD: usize = 2_097_152;
/// Largest length a 3-byte VarInt frame header can describe.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 2_097_151;
pub const DEFAULT_NBT_QUOTA: u64 = 2_097_152;
pub const DEFAULT_NBT_DEPTH: usize = 512;
pub const DEFAULT_MAX_CLIENTBOUND_CUSTOM_PAYLOAD: usize = 1_048_576;
pub const DEFAULT_MAX_SERVERBOUND_CUSTOM_PAYLOAD: usize = 32_767;

/// Worst case bytes one section can serialize to: a direct block-state container at 15 bits,
/// a direct biome container at 6 bits, plus headers.
pub const MAX_SECTION_BYTES: usize = 2 + (1 + 5 + 1024 * 8) + (1 + 5 + 7 * 8);

/// Vertical extent of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldHeight {
    /// Lowest block y coordinate, a multiple of 16
    pub min_y: i32,
    /// Number of block layers, a multiple of 16
    pub height: u32,
}

impl Default for WorldHeight {
    fn default() -> Self {
        Self {
            min_y: -64,
            height: 384,
        }
    }
}

impl WorldHeight {
    pub fn new(min_y: i32, height: u32) -> Self {
        Self { min_y, height }
    }

    pub fn section_count(&self) -> usize {
        (self.height / 16) as usize
    }

    pub fn min_section(&self) -> i32 {
        self.min_y >> 4
    }

    /// Light is tracked one section beyond the world on each side.
    pub fn light_section_count(&self) -> usize {
        self.section_count() + 2
    }

    pub fn min_light_section(&self) -> i32 {
        self.min_section() - 1
    }

    pub fn max_y(&self) -> i32 {
        self.min_y + self.height as i32 - 1
    }
}

/// Limits and world geometry every decode is performed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub world: WorldHeight,
    pub max_chunk_payload: usize,
    pub max_frame_length: usize,
    pub max_nbt_bytes: u64,
    pub max_nbt_depth: usize,
    pub max_clientbound_custom_payload: usize,
    pub max_serverbound_custom_payload: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            world: WorldHeight::default(),
            max_chunk_payload: DEFAULT_MAX_CHUNK_PAYLOAD,
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            max_nbt_bytes: DEFAULT_NBT_QUOTA,
            max_nbt_depth: DEFAULT_NBT_DEPTH,
            max_clientbound_custom_payload: DEFAULT_MAX_CLIENTBOUND_CUSTOM_PAYLOAD,
            max_serverbound_custom_payload: DEFAULT_MAX_SERVERBOUND_CUSTOM_PAYLOAD,
        }
    }
}

impl CodecConfig {
    /// Config for a world of the given height. The chunk cap never drops below the default, and
    /// grows when the sections of a taller world could legitimately exceed it.
    pub fn for_world(world: WorldHeight) -> Self {
        Self {
            world,
            max_chunk_payload: DEFAULT_MAX_CHUNK_PAYLOAD
                .max(world.section_count() * MAX_SECTION_BYTES),
            ..Self::default()
        }
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProtocolError;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_world_geometry() {
        let world = WorldHeight::default();
        assert_eq!(world.section_count(), 24);
        assert_eq!(world.min_section(), -4);
        assert_eq!(world.light_section_count(), 26);
        assert_eq!(world.min_light_section(), -5);
        assert_eq!(world.max_y(), 319);
    }

    #[test]
    fn test_for_world_keeps_default_cap() {
        let config = CodecConfig::for_world(WorldHeight::new(0, 256));
        assert_eq!(config.max_chunk_payload, DEFAULT_MAX_CHUNK_PAYLOAD);
    }

    #[test]
    fn test_for_world_grows_cap_for_tall_worlds() {
        let world = WorldHeight::new(-2032, 4064);
        let config = CodecConfig::for_world(world);
        assert_eq!(config.max_chunk_payload, 254 * MAX_SECTION_BYTES);
        assert!(config.max_chunk_payload > DEFAULT_MAX_CHUNK_PAYLOAD);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            CodecConfig::from_json(r#"{ "world": { "min_y": 0, "height": 256 }, "max_nbt_depth": 64 }"#)
                .unwrap();
        assert_eq!(config.world, WorldHeight::new(0, 256));
        assert_eq!(config.max_nbt_depth, 64);
        assert_eq!(config.max_chunk_payload, DEFAULT_MAX_CHUNK_PAYLOAD);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CodecConfig::for_world(WorldHeight::new(-128, 512));
        let json = config.to_json().unwrap();
        assert_eq!(CodecConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_invalid() {
        assert_matches!(CodecConfig::from_json("{ nope"), Err(ProtocolError::Json(_)));
    }
}
