use crate::storage::BitStorage;
use crate::{Result, WorldError};
use tessera_common::ProtocolError;
use tessera_protocol::PacketBuffer;

/// Sizing rules of a paletted container: how many entries it holds and which encoding each
/// bit width uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteStrategy {
    /// 16×16×16 block states of one section
    BlockStates,
    /// 4×4×4 biome cells of one section
    Biomes,
}

impl PaletteStrategy {
    pub fn size(self) -> usize {
        match self {
            PaletteStrategy::BlockStates => 4096,
            PaletteStrategy::Biomes => 64,
        }
    }

    /// Width of the global registry ids stored when no palette is used.
    pub fn direct_bits(self) -> u8 {
        match self {
            PaletteStrategy::BlockStates => 15,
            PaletteStrategy::Biomes => 6,
        }
    }

    fn min_indirect_bits(self) -> u8 {
        match self {
            PaletteStrategy::BlockStates => 4,
            PaletteStrategy::Biomes => 1,
        }
    }

    fn max_indirect_bits(self) -> u8 {
        match self {
            PaletteStrategy::BlockStates => 8,
            PaletteStrategy::Biomes => 3,
        }
    }

    /// Entry index of the cell at the given coordinates, each in `0..edge`.
    pub fn index(self, x: usize, y: usize, z: usize) -> usize {
        match self {
            PaletteStrategy::BlockStates => (y << 8) | (z << 4) | x,
            PaletteStrategy::Biomes => (y << 4) | (z << 2) | x,
        }
    }

    /// Bit width for a container holding `distinct` different values.
    fn bits_for(self, distinct: usize) -> u8 {
        let needed = usize::BITS - distinct.saturating_sub(1).leading_zeros();
        let needed = needed as u8;
        if needed == 0 {
            0
        } else if needed <= self.max_indirect_bits() {
            needed.max(self.min_indirect_bits())
        } else {
            self.direct_bits()
        }
    }

    fn is_indirect(self, bits: u8) -> bool {
        bits > 0 && bits <= self.max_indirect_bits()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Palette {
    Single(u32),
    /// Ids index into this list of global values
    Linear(Vec<u32>),
    /// Ids are the global values
    Global,
}

/// Values of one section, stored as palette ids. The encoding widens as distinct values are
/// added: a single value needs no storage, a few use a small linear palette, and beyond that
/// the global ids are stored directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedContainer {
    strategy: PaletteStrategy,
    palette: Palette,
    storage: BitStorage,
}

impl PalettedContainer {
    /// A container where every entry is `value`.
    pub fn new(strategy: PaletteStrategy, value: u32) -> Self {
        Self {
            strategy,
            palette: Palette::Single(value),
            storage: BitStorage::new(0, strategy.size()),
        }
    }

    pub fn strategy(&self) -> PaletteStrategy {
        self.strategy
    }

    pub fn bits(&self) -> u8 {
        self.storage.bits()
    }

    pub fn get(&self, index: usize) -> u32 {
        let id = self.storage.get(index);
        self.value_of(id)
    }

    /// Replaces the value at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, value: u32) -> Result<u32> {
        let direct_bits = self.strategy.direct_bits();
        if value >> direct_bits != 0 {
            return Err(WorldError::ValueOutOfRange {
                value,
                bits: direct_bits,
            });
        }
        let id = self.id_for(value);
        let previous = self.storage.set(index, id);
        Ok(self.value_of(previous))
    }

    /// Every value in index order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.strategy.size()).map(|index| self.get(index))
    }

    pub fn count(&self, mut predicate: impl FnMut(u32) -> bool) -> usize {
        match &self.palette {
            Palette::Single(value) if predicate(*value) => self.strategy.size(),
            Palette::Single(_) => 0,
            _ => self.iter().filter(|&value| predicate(value)).count(),
        }
    }

    fn value_of(&self, id: u32) -> u32 {
        match &self.palette {
            Palette::Single(value) => *value,
            Palette::Linear(values) => values.get(id as usize).copied().unwrap_or_default(),
            Palette::Global => id,
        }
    }

    fn id_for(&mut self, value: u32) -> u32 {
        let distinct = match &mut self.palette {
            Palette::Single(current) if *current == value => return 0,
            Palette::Single(_) => 2,
            Palette::Linear(values) => {
                if let Some(id) = values.iter().position(|&v| v == value) {
                    return id as u32;
                }
                if values.len() < 1 << self.storage.bits() {
                    values.push(value);
                    return (values.len() - 1) as u32;
                }
                values.len() + 1
            }
            Palette::Global => return value,
        };
        self.resize(self.strategy.bits_for(distinct));
        self.id_for(value)
    }

    /// Re-encodes every entry at `bits`, keeping the current values.
    fn resize(&mut self, bits: u8) {
        let values: Vec<u32> = self.iter().collect();
        let palette = if self.strategy.is_indirect(bits) {
            match &self.palette {
                Palette::Single(value) => Palette::Linear(vec![*value]),
                Palette::Linear(values) => Palette::Linear(values.clone()),
                Palette::Global => Palette::Linear(Vec::new()),
            }
        } else {
            Palette::Global
        };

        self.palette = palette;
        self.storage = BitStorage::new(bits, self.strategy.size());
        for (index, value) in values.into_iter().enumerate() {
            let id = match &self.palette {
                Palette::Linear(values) => values.iter().position(|&v| v == value).unwrap_or(0) as u32,
                _ => value,
            };
            self.storage.set(index, id);
        }
    }

    fn palette_size(&self) -> usize {
        match &self.palette {
            Palette::Single(value) => PacketBuffer::varint_size(*value as i32),
            Palette::Linear(values) => {
                PacketBuffer::varint_size(values.len() as i32)
                    + values
                        .iter()
                        .map(|&value| PacketBuffer::varint_size(value as i32))
                        .sum::<usize>()
            }
            Palette::Global => 0,
        }
    }

    /// Exact number of bytes `write` appends.
    pub fn serialized_size(&self) -> usize {
        let longs = self.storage.raw().len();
        1 + self.palette_size() + PacketBuffer::varint_size(longs as i32) + longs * 8
    }

    pub fn write(&self, buffer: &mut PacketBuffer) {
        buffer.write_u8(self.storage.bits());
        match &self.palette {
            Palette::Single(value) => buffer.write_varint(*value as i32),
            Palette::Linear(values) => {
                buffer.write_varint(values.len() as i32);
                for &value in values {
                    buffer.write_varint(value as i32);
                }
            }
            Palette::Global => {}
        }
        buffer.write_varint(self.storage.raw().len() as i32);
        for &long in self.storage.raw() {
            buffer.write_u64(long);
        }
    }

    pub fn read(strategy: PaletteStrategy, buffer: &mut PacketBuffer) -> tessera_common::Result<Self> {
        let bits = buffer.read_u8()?;
        let direct_bits = strategy.direct_bits();
        let palette = if bits == 0 {
            Palette::Single(read_value(buffer, direct_bits)?)
        } else if strategy.is_indirect(bits) {
            let max = 1usize << bits;
            Palette::Linear(buffer.read_collection(max, |buffer| read_value(buffer, direct_bits))?)
        } else if bits == direct_bits {
            Palette::Global
        } else {
            return Err(ProtocolError::InvalidPaletteBits { bits, direct_bits });
        };

        let expected = BitStorage::new(bits, strategy.size()).raw().len();
        let longs = buffer.read_collection(expected, |buffer| buffer.read_u64())?;
        let actual = longs.len();
        let storage = BitStorage::from_raw(bits, strategy.size(), longs).ok_or(
            ProtocolError::SectionSizeMismatch {
                expected: expected * 8,
                actual: actual * 8,
            },
        )?;

        if let Palette::Linear(values) = &palette {
            if let Some(id) = storage.iter().find(|&id| id as usize >= values.len()) {
                return Err(ProtocolError::PaletteValueOutOfRange {
                    value: i64::from(id),
                    bits,
                });
            }
        }

        Ok(Self {
            strategy,
            palette,
            storage,
        })
    }
}

/// Reads one registry id of a palette, which must fit in `bits`.
fn read_value(buffer: &mut PacketBuffer, bits: u8) -> tessera_common::Result<u32> {
    let value = buffer.read_varint()?;
    u32::try_from(value)
        .ok()
        .filter(|value| value >> bits == 0)
        .ok_or(ProtocolError::PaletteValueOutOfRange {
            value: i64::from(value),
            bits,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn written(container: &PalettedContainer) -> PacketBuffer {
        let mut buffer = PacketBuffer::new();
        container.write(&mut buffer);
        assert_eq!(buffer.len(), container.serialized_size());
        buffer
    }

    #[test]
    fn test_single_value() {
        let container = PalettedContainer::new(PaletteStrategy::BlockStates, 0);
        assert_eq!(container.bits(), 0);
        assert_eq!(container.serialized_size(), 3);
        assert_eq!(written(&container).get_buffer(), &[0, 0, 0]);
        assert_eq!(container.count(|value| value == 0), 4096);
    }

    #[test]
    fn test_grows_to_linear() {
        let mut container = PalettedContainer::new(PaletteStrategy::BlockStates, 0);
        assert_eq!(container.set(5, 1).unwrap(), 0);
        assert_eq!(container.bits(), 4);
        assert_eq!(container.get(5), 1);
        assert_eq!(container.get(4), 0);

        // 4 bits: 16 per long, 256 longs
        let buffer = written(&container);
        assert_eq!(&buffer.get_buffer()[..6], &[4, 2, 0, 1, 0x80, 0x02]);
    }

    #[test]
    fn test_grows_past_linear_palette() {
        let mut container = PalettedContainer::new(PaletteStrategy::BlockStates, 0);
        for value in 1..=16 {
            container.set(value as usize, value).unwrap();
        }
        assert_eq!(container.bits(), 5);
        for value in 0..=16 {
            assert_eq!(container.get(value as usize), value);
        }

        for value in 17..=256 {
            container.set(value as usize, value).unwrap();
        }
        assert_eq!(container.bits(), 15);
        assert_eq!(container.get(256), 256);
        assert_eq!(container.get(4095), 0);
        written(&container);
    }

    #[test]
    fn test_biomes() {
        let mut container = PalettedContainer::new(PaletteStrategy::Biomes, 3);
        container.set(PaletteStrategy::Biomes.index(1, 2, 3), 9).unwrap();
        assert_eq!(container.bits(), 1);
        assert_eq!(container.get(PaletteStrategy::Biomes.index(1, 2, 3)), 9);
        assert_eq!(container.count(|value| value == 3), 63);
        written(&container);
    }

    #[test]
    fn test_value_out_of_range() {
        let mut container = PalettedContainer::new(PaletteStrategy::Biomes, 0);
        assert_matches!(
            container.set(0, 64),
            Err(WorldError::ValueOutOfRange { value: 64, bits: 6 })
        );
    }

    #[test]
    fn test_read_back() {
        let mut container = PalettedContainer::new(PaletteStrategy::BlockStates, 0);
        container.set(0, 7).unwrap();
        container.set(4095, 300).unwrap();
        let mut buffer = written(&container);
        let decoded = PalettedContainer::read(PaletteStrategy::BlockStates, &mut buffer).unwrap();
        assert_eq!(decoded, container);
        assert_eq!(buffer.readable_bytes(), 0);
    }

    #[test]
    fn test_read_rejects_wrong_long_count() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(4);
        buffer.write_varint(1);
        buffer.write_varint(0);
        buffer.write_varint(3);
        for _ in 0..3 {
            buffer.write_u64(0);
        }
        assert_matches!(
            PalettedContainer::read(PaletteStrategy::BlockStates, &mut buffer),
            Err(ProtocolError::SectionSizeMismatch {
                expected: 2048,
                actual: 24
            })
        );
    }

    #[test]
    fn test_read_rejects_unknown_width() {
        for bits in [20, 200] {
            let mut buffer = PacketBuffer::new();
            buffer.write_u8(bits);
            buffer.write_varint(0);
            assert_matches!(
                PalettedContainer::read(PaletteStrategy::BlockStates, &mut buffer),
                Err(ProtocolError::InvalidPaletteBits { bits: b, direct_bits: 15 }) if b == bits
            );
        }

        let mut buffer = PacketBuffer::new();
        buffer.write_u8(15);
        assert_matches!(
            PalettedContainer::read(PaletteStrategy::Biomes, &mut buffer),
            Err(ProtocolError::InvalidPaletteBits { bits: 15, direct_bits: 6 })
        );
    }

    #[test]
    fn test_read_rejects_id_past_palette() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(4);
        buffer.write_varint(2);
        buffer.write_varint(0);
        buffer.write_varint(1);
        buffer.write_varint(256);
        buffer.write_u64(5);
        for _ in 1..256 {
            buffer.write_u64(0);
        }
        assert_matches!(
            PalettedContainer::read(PaletteStrategy::BlockStates, &mut buffer),
            Err(ProtocolError::PaletteValueOutOfRange { value: 5, bits: 4 })
        );
    }

    #[test]
    fn test_read_rejects_value_outside_registry() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(0);
        buffer.write_varint(64);
        buffer.write_varint(0);
        assert_matches!(
            PalettedContainer::read(PaletteStrategy::Biomes, &mut buffer),
            Err(ProtocolError::PaletteValueOutOfRange { value: 64, bits: 6 })
        );

        let mut buffer = PacketBuffer::new();
        buffer.write_u8(4);
        buffer.write_varint(1);
        buffer.write_varint(-1);
        assert_matches!(
            PalettedContainer::read(PaletteStrategy::BlockStates, &mut buffer),
            Err(ProtocolError::PaletteValueOutOfRange { value: -1, bits: 15 })
        );
    }
}
