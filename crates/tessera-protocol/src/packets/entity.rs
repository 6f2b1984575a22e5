use crate::buffer::PacketBuffer;
use crate::packet::Packet;
use crate::quantize::{pack_degrees, pack_motion, unpack_degrees, unpack_motion};
use tessera_common::{Result, Vec3};
use uuid::Uuid;

/// Spawns an entity on the client. Rotations and velocity are quantised.
#[derive(Debug, Clone, PartialEq)]
pub struct AddEntityPacket {
    pub id: i32,
    pub uuid: Uuid,
    /// Entity type registry id.
    pub entity_type: i32,
    pub position: Vec3,
    pub x_rot: i8,
    pub y_rot: i8,
    pub y_head_rot: i8,
    /// Type-specific extra value.
    pub data: i32,
    pub motion: [i16; 3],
}

impl AddEntityPacket {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        uuid: Uuid,
        entity_type: i32,
        position: Vec3,
        pitch: f32,
        yaw: f32,
        head_yaw: f32,
        data: i32,
        motion: Vec3,
    ) -> Self {
        Self {
            id,
            uuid,
            entity_type,
            position,
            x_rot: pack_degrees(pitch),
            y_rot: pack_degrees(yaw),
            y_head_rot: pack_degrees(head_yaw),
            data,
            motion: pack_motion(motion),
        }
    }

    pub fn pitch(&self) -> f32 {
        unpack_degrees(self.x_rot)
    }

    pub fn yaw(&self) -> f32 {
        unpack_degrees(self.y_rot)
    }

    pub fn head_yaw(&self) -> f32 {
        unpack_degrees(self.y_head_rot)
    }

    pub fn velocity(&self) -> Vec3 {
        unpack_motion(self.motion)
    }
}

impl Packet for AddEntityPacket {
    const NAME: &'static str = "add_entity";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            id: buffer.read_varint()?,
            uuid: buffer.read_uuid()?,
            entity_type: buffer.read_varint()?,
            position: Vec3::new(buffer.read_f64()?, buffer.read_f64()?, buffer.read_f64()?),
            x_rot: buffer.read_i8()?,
            y_rot: buffer.read_i8()?,
            y_head_rot: buffer.read_i8()?,
            data: buffer.read_varint()?,
            motion: [buffer.read_i16()?, buffer.read_i16()?, buffer.read_i16()?],
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.id);
        buffer.write_uuid(self.uuid);
        buffer.write_varint(self.entity_type);
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_i8(self.x_rot);
        buffer.write_i8(self.y_rot);
        buffer.write_i8(self.y_head_rot);
        buffer.write_varint(self.data);
        for component in self.motion {
            buffer.write_i16(component);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveEntityRotPacket {
    pub entity_id: i32,
    pub y_rot: i8,
    pub x_rot: i8,
    pub on_ground: bool,
}

impl MoveEntityRotPacket {
    pub fn new(entity_id: i32, yaw: f32, pitch: f32, on_ground: bool) -> Self {
        Self {
            entity_id,
            y_rot: pack_degrees(yaw),
            x_rot: pack_degrees(pitch),
            on_ground,
        }
    }
}

impl Packet for MoveEntityRotPacket {
    const NAME: &'static str = "move_entity_rot";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            entity_id: buffer.read_varint()?,
            y_rot: buffer.read_i8()?,
            x_rot: buffer.read_i8()?,
            on_ground: buffer.read_bool()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.entity_id);
        buffer.write_i8(self.y_rot);
        buffer.write_i8(self.x_rot);
        buffer.write_bool(self.on_ground);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetEntityMotionPacket {
    pub entity_id: i32,
    pub motion: [i16; 3],
}

impl SetEntityMotionPacket {
    pub fn new(entity_id: i32, velocity: Vec3) -> Self {
        Self {
            entity_id,
            motion: pack_motion(velocity),
        }
    }

    pub fn velocity(&self) -> Vec3 {
        unpack_motion(self.motion)
    }
}

impl Packet for SetEntityMotionPacket {
    const NAME: &'static str = "set_entity_motion";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            entity_id: buffer.read_varint()?,
            motion: [buffer.read_i16()?, buffer.read_i16()?, buffer.read_i16()?],
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.entity_id);
        for component in self.motion {
            buffer.write_i16(component);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetHealthPacket {
    pub health: f32,
    pub food: i32,
    pub saturation: f32,
}

impl Packet for SetHealthPacket {
    const NAME: &'static str = "set_health";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            health: buffer.read_f32()?,
            food: buffer.read_varint()?,
            saturation: buffer.read_f32()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_f32(self.health);
        buffer.write_varint(self.food);
        buffer.write_f32(self.saturation);
        Ok(())
    }
}
