use crate::bitset::BitSet;
use crate::buffer::PacketBuffer;
use crate::world::{LightLayer, LightSource, LIGHT_ARRAY_SIZE};
use tessera_common::{LightChannel, ProtocolError, Result};

pub type LightArray = Box<[u8; LIGHT_ARRAY_SIZE]>;

/// One channel of a light update. Every light section index is in at most one of the two
/// masks; each set bit of the present mask has exactly one array, in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelLight {
    present_mask: BitSet,
    empty_mask: BitSet,
    arrays: Vec<LightArray>,
}

impl ChannelLight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `index` as carrying `array`, replacing whatever was recorded for it.
    pub fn set_present(&mut self, index: usize, array: LightArray) {
        self.empty_mask.clear(index);
        let position = self.rank(index);
        if self.present_mask.get(index) {
            self.arrays[position] = array;
        } else {
            self.present_mask.set(index);
            self.arrays.insert(position, array);
        }
    }

    /// Marks `index` as uniformly dark, replacing whatever was recorded for it.
    pub fn set_empty(&mut self, index: usize) {
        if self.present_mask.get(index) {
            let position = self.rank(index);
            self.arrays.remove(position);
            self.present_mask.clear(index);
        }
        self.empty_mask.set(index);
    }

    pub fn present_mask(&self) -> &BitSet {
        &self.present_mask
    }

    pub fn empty_mask(&self) -> &BitSet {
        &self.empty_mask
    }

    pub fn arrays(&self) -> &[LightArray] {
        &self.arrays
    }

    /// Light section index and its array, in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u8; LIGHT_ARRAY_SIZE])> + '_ {
        self.present_mask
            .iter_ones()
            .zip(self.arrays.iter().map(|array| &**array))
    }

    pub fn get(&self, index: usize) -> Option<&[u8; LIGHT_ARRAY_SIZE]> {
        if self.present_mask.get(index) {
            self.arrays.get(self.rank(index)).map(|array| &**array)
        } else {
            None
        }
    }

    fn rank(&self, index: usize) -> usize {
        self.present_mask.iter_ones().take_while(|&bit| bit < index).count()
    }

    fn collect<S: LightSource>(source: &S, channel: LightChannel, changed: Option<&BitSet>) -> Self {
        let mut light = Self::new();
        for index in 0..source.light_section_count() {
            if changed.is_some_and(|changed| !changed.get(index)) {
                continue;
            }
            let section_y = source.min_light_section() + index as i32;
            match source.layer_data(channel, section_y) {
                Some(layer) if layer.is_empty() => light.empty_mask.set(index),
                Some(layer) => {
                    light.present_mask.set(index);
                    light.arrays.push(Box::new(*layer.as_bytes()));
                }
                None => {}
            }
        }
        light
    }

    fn write_arrays(&self, buffer: &mut PacketBuffer) {
        buffer.write_varint(self.arrays.len() as i32);
        for array in &self.arrays {
            buffer.write_bytes_raw(&array[..]);
        }
    }

    fn validate_masks(&self, channel: LightChannel, count: usize) -> Result<()> {
        for mask in [&self.present_mask, &self.empty_mask] {
            if mask.length() > count {
                return Err(ProtocolError::LightSectionOutOfRange {
                    channel,
                    section: mask.length() - 1,
                    count,
                });
            }
        }
        if !self.present_mask.intersects(&self.empty_mask) {
            return Ok(());
        }
        let section = self
            .present_mask
            .iter_ones()
            .find(|&index| self.empty_mask.get(index))
            .unwrap_or_default();
        Err(ProtocolError::ConflictingLightMasks { channel, section })
    }

    fn read_arrays(&mut self, buffer: &mut PacketBuffer, channel: LightChannel) -> Result<()> {
        let count = buffer.read_length()?;
        let expected = self.present_mask.cardinality();
        if count != expected {
            return Err(ProtocolError::LightPayloadMismatch {
                channel,
                expected,
                actual: count,
            });
        }
        buffer.ensure_readable(count * LIGHT_ARRAY_SIZE)?;
        self.arrays = Vec::with_capacity(count);
        for _ in 0..count {
            let mut array = Box::new([0u8; LIGHT_ARRAY_SIZE]);
            array.copy_from_slice(buffer.read_slice(LIGHT_ARRAY_SIZE)?);
            self.arrays.push(array);
        }
        Ok(())
    }
}

/// Incremental lighting for one column, both channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightData {
    trust_edges: bool,
    sky: ChannelLight,
    block: ChannelLight,
}

impl LightData {
    pub fn new(trust_edges: bool, sky: ChannelLight, block: ChannelLight) -> Self {
        Self {
            trust_edges,
            sky,
            block,
        }
    }

    /// Collects the stored layers of both channels. A changed mask restricts its channel to
    /// the light section indices set in it; `None` takes every section.
    pub fn from_source<S: LightSource>(
        source: &S,
        sky_changed: Option<&BitSet>,
        block_changed: Option<&BitSet>,
        trust_edges: bool,
    ) -> Self {
        Self {
            trust_edges,
            sky: ChannelLight::collect(source, LightChannel::Sky, sky_changed),
            block: ChannelLight::collect(source, LightChannel::Block, block_changed),
        }
    }

    pub fn trust_edges(&self) -> bool {
        self.trust_edges
    }

    pub fn channel(&self, channel: LightChannel) -> &ChannelLight {
        match channel {
            LightChannel::Sky => &self.sky,
            LightChannel::Block => &self.block,
        }
    }

    pub fn channel_mut(&mut self, channel: LightChannel) -> &mut ChannelLight {
        match channel {
            LightChannel::Sky => &mut self.sky,
            LightChannel::Block => &mut self.block,
        }
    }

    pub fn write(&self, buffer: &mut PacketBuffer) {
        buffer.write_bool(self.trust_edges);
        buffer.write_bitset(&self.sky.present_mask);
        buffer.write_bitset(&self.block.present_mask);
        buffer.write_bitset(&self.sky.empty_mask);
        buffer.write_bitset(&self.block.empty_mask);
        self.sky.write_arrays(buffer);
        self.block.write_arrays(buffer);
    }

    /// Reads a light update, rejecting masks that reach past the configured light section
    /// count or mark a section both present and empty.
    pub fn read(buffer: &mut PacketBuffer) -> Result<Self> {
        let count = buffer.config().world.light_section_count();
        let trust_edges = buffer.read_bool()?;

        let mut sky = ChannelLight::new();
        let mut block = ChannelLight::new();
        sky.present_mask = buffer.read_bitset()?;
        block.present_mask = buffer.read_bitset()?;
        sky.empty_mask = buffer.read_bitset()?;
        block.empty_mask = buffer.read_bitset()?;

        sky.validate_masks(LightChannel::Sky, count)?;
        block.validate_masks(LightChannel::Block, count)?;

        sky.read_arrays(buffer, LightChannel::Sky)?;
        block.read_arrays(buffer, LightChannel::Block)?;

        Ok(Self {
            trust_edges,
            sky,
            block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    struct Layer([u8; LIGHT_ARRAY_SIZE]);

    impl LightLayer for Layer {
        fn is_empty(&self) -> bool {
            self.0.iter().all(|&b| b == 0)
        }

        fn as_bytes(&self) -> &[u8; LIGHT_ARRAY_SIZE] {
            &self.0
        }
    }

    struct Source {
        sky: HashMap<i32, Layer>,
        block: HashMap<i32, Layer>,
    }

    impl LightSource for Source {
        type Layer = Layer;

        fn light_section_count(&self) -> usize {
            26
        }

        fn min_light_section(&self) -> i32 {
            -5
        }

        fn layer_data(&self, channel: LightChannel, section_y: i32) -> Option<&Layer> {
            match channel {
                LightChannel::Sky => self.sky.get(&section_y),
                LightChannel::Block => self.block.get(&section_y),
            }
        }
    }

    fn source() -> Source {
        let mut sky = HashMap::new();
        sky.insert(-5, Layer([0; LIGHT_ARRAY_SIZE]));
        sky.insert(3, Layer([0xff; LIGHT_ARRAY_SIZE]));
        sky.insert(-1, Layer([0x11; LIGHT_ARRAY_SIZE]));
        let mut block = HashMap::new();
        block.insert(0, Layer([0x0f; LIGHT_ARRAY_SIZE]));
        Source { sky, block }
    }

    fn array(value: u8) -> LightArray {
        Box::new([value; LIGHT_ARRAY_SIZE])
    }

    #[test]
    fn test_from_source_classifies_sections() {
        let light = LightData::from_source(&source(), None, None, true);
        let sky = light.channel(LightChannel::Sky);

        assert_eq!(sky.empty_mask().iter_ones().collect::<Vec<_>>(), vec![0]);
        assert_eq!(sky.present_mask().iter_ones().collect::<Vec<_>>(), vec![4, 8]);
        let arrays: Vec<_> = sky.iter().map(|(index, array)| (index, array[0])).collect();
        assert_eq!(arrays, vec![(4, 0x11), (8, 0xff)]);

        let block = light.channel(LightChannel::Block);
        assert_eq!(block.present_mask().iter_ones().collect::<Vec<_>>(), vec![5]);
        assert!(block.empty_mask().is_empty());
    }

    #[test]
    fn test_from_source_changed_filter() {
        let changed: BitSet = [8].into_iter().collect();
        let light = LightData::from_source(&source(), Some(&changed), Some(&BitSet::new()), false);
        assert_eq!(
            light.channel(LightChannel::Sky).present_mask().iter_ones().collect::<Vec<_>>(),
            vec![8]
        );
        assert!(light.channel(LightChannel::Sky).empty_mask().is_empty());
        assert!(light.channel(LightChannel::Block).arrays().is_empty());
    }

    #[test]
    fn test_set_present_keeps_order() {
        let mut channel = ChannelLight::new();
        channel.set_present(9, array(9));
        channel.set_present(2, array(2));
        channel.set_empty(5);
        channel.set_present(5, array(5));
        channel.set_present(9, array(10));

        let order: Vec<_> = channel.iter().map(|(index, array)| (index, array[0])).collect();
        assert_eq!(order, vec![(2, 2), (5, 5), (9, 10)]);
        assert!(channel.empty_mask().is_empty());

        channel.set_empty(2);
        assert_eq!(channel.get(2), None);
        assert_eq!(channel.get(5).map(|array| array[0]), Some(5));
        assert_eq!(channel.arrays().len(), channel.present_mask().cardinality());
    }

    #[test]
    fn test_wire_layout() {
        let mut light = LightData::new(true, ChannelLight::new(), ChannelLight::new());
        light.channel_mut(LightChannel::Sky).set_present(1, array(7));
        light.channel_mut(LightChannel::Block).set_empty(0);

        let mut buffer = PacketBuffer::new();
        light.write(&mut buffer);

        let bytes = buffer.get_buffer();
        assert_eq!(bytes[0], 1);
        // sky present: one word with bit 1
        assert_eq!(&bytes[1..10], &[1, 0, 0, 0, 0, 0, 0, 0, 2]);
        // block present: empty
        assert_eq!(bytes[10], 0);
        // sky empty: empty
        assert_eq!(bytes[11], 0);
        // block empty: bit 0
        assert_eq!(&bytes[12..21], &[1, 0, 0, 0, 0, 0, 0, 0, 1]);
        // sky list: one array, no per-array length
        assert_eq!(bytes[21], 1);
        assert!(bytes[22..22 + LIGHT_ARRAY_SIZE].iter().all(|&b| b == 7));
        // block list: none
        assert_eq!(bytes[22 + LIGHT_ARRAY_SIZE], 0);
        assert_eq!(bytes.len(), 23 + LIGHT_ARRAY_SIZE);

        assert_eq!(LightData::read(&mut buffer).unwrap(), light);
    }

    #[test]
    fn test_payload_count_must_match_mask() {
        let mut buffer = PacketBuffer::new();
        buffer.write_bool(false);
        buffer.write_bitset(&[1, 2].into_iter().collect());
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&BitSet::new());
        buffer.write_varint(1);
        buffer.write_bytes_raw(&[0; LIGHT_ARRAY_SIZE]);

        assert_matches!(
            LightData::read(&mut buffer),
            Err(ProtocolError::LightPayloadMismatch {
                channel: LightChannel::Sky,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_conflicting_masks_rejected() {
        let mut buffer = PacketBuffer::new();
        buffer.write_bool(false);
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&[3].into_iter().collect());
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&[3].into_iter().collect());

        assert_matches!(
            LightData::read(&mut buffer),
            Err(ProtocolError::ConflictingLightMasks {
                channel: LightChannel::Block,
                section: 3
            })
        );
    }

    #[test]
    fn test_section_out_of_range() {
        // Default world: 24 sections, 26 light sections
        let mut buffer = PacketBuffer::new();
        buffer.write_bool(false);
        buffer.write_bitset(&[26].into_iter().collect());
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&BitSet::new());
        buffer.write_bitset(&BitSet::new());

        assert_matches!(
            LightData::read(&mut buffer),
            Err(ProtocolError::LightSectionOutOfRange {
                channel: LightChannel::Sky,
                section: 26,
                count: 26
            })
        );
    }
}
