//! Fixed-point conversions for the fields the wire carries lossily.

use tessera_common::Vec3;

/// Largest velocity component, in blocks per tick, that survives quantisation.
pub const MAX_VELOCITY: f64 = 3.9;
/// Velocity units per block per tick.
pub const VELOCITY_SCALE: f64 = 8000.0;
/// Sound positions travel in eighths of a block.
pub const SOUND_POSITION_SCALE: f64 = 8.0;

pub fn pack_velocity(value: f64) -> i16 {
    (value.clamp(-MAX_VELOCITY, MAX_VELOCITY) * VELOCITY_SCALE) as i16
}

pub fn unpack_velocity(value: i16) -> f64 {
    value as f64 / VELOCITY_SCALE
}

/// Packs a velocity vector component-wise.
pub fn pack_motion(motion: Vec3) -> [i16; 3] {
    [
        pack_velocity(motion.x),
        pack_velocity(motion.y),
        pack_velocity(motion.z),
    ]
}

pub fn unpack_motion(packed: [i16; 3]) -> Vec3 {
    Vec3::new(
        unpack_velocity(packed[0]),
        unpack_velocity(packed[1]),
        unpack_velocity(packed[2]),
    )
}

/// Degrees to a 1/256 turn. Wraps, so 360 packs to the same byte as 0.
pub fn pack_degrees(degrees: f32) -> i8 {
    (degrees * 256.0 / 360.0).floor() as i32 as i8
}

pub fn unpack_degrees(packed: i8) -> f32 {
    packed as f32 * 360.0 / 256.0
}

pub fn pack_sound_coordinate(value: f64) -> i32 {
    (value * SOUND_POSITION_SCALE) as i32
}

pub fn unpack_sound_coordinate(value: i32) -> f64 {
    value as f64 / SOUND_POSITION_SCALE
}
