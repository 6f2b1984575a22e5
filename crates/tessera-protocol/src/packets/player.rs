use crate::buffer::PacketBuffer;
use crate::packet::Packet;
use tessera_common::{Result, Vec3};

/// Player position
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlayerPosPacket {
    pub position: Vec3,
    pub on_ground: bool,
}

impl Packet for MovePlayerPosPacket {
    const NAME: &'static str = "move_player_pos";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            position: Vec3::new(buffer.read_f64()?, buffer.read_f64()?, buffer.read_f64()?),
            on_ground: buffer.read_bool()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_bool(self.on_ground);
        Ok(())
    }
}

/// Held item change
#[derive(Debug, Clone, PartialEq)]
pub struct SetCarriedItemPacket {
    /// Hotbar slot, 0 to 8.
    pub slot: i16,
}

impl Packet for SetCarriedItemPacket {
    const NAME: &'static str = "set_carried_item";

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(Self {
            slot: buffer.read_i16()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i16(self.slot);
        Ok(())
    }
}
