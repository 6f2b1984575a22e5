//! Composite field codecs built on the primitive cursor operations.

use crate::bitset::BitSet;
use crate::buffer::PacketBuffer;
use tessera_common::{ProtocolError, Result};
use tessera_nbt::{Compound, NbtAccounter, Tag};

/// An explicit encode/decode pair for a nested structure.
///
/// Nested values are never discovered by reflection: whoever reads or writes a structure
/// passes the pair that knows its layout.
pub struct FieldCodec<T> {
    pub encode: fn(&mut PacketBuffer, &T) -> Result<()>,
    pub decode: fn(&mut PacketBuffer) -> Result<T>,
}

impl<T> FieldCodec<T> {
    pub const fn new(
        encode: fn(&mut PacketBuffer, &T) -> Result<()>,
        decode: fn(&mut PacketBuffer) -> Result<T>,
    ) -> Self {
        Self { encode, decode }
    }
}

/// An enum written as a VarInt index into a fixed, ordered list of its values.
///
/// Reordering `VALUES` changes the wire format.
pub trait ProtocolEnum: Copy + PartialEq + 'static {
    const NAME: &'static str;
    const VALUES: &'static [Self];

    fn ordinal(self) -> i32 {
        Self::VALUES
            .iter()
            .position(|value| *value == self)
            .map_or(-1, |index| index as i32)
    }

    fn by_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::VALUES.get(index).copied())
    }
}

impl PacketBuffer {
    /// Writes a VarInt count followed by each element.
    pub fn write_collection<T>(
        &mut self,
        items: &[T],
        mut write: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        let length = i32::try_from(items.len()).map_err(|_| ProtocolError::CollectionTooLarge {
            length: items.len(),
            max: i32::MAX as usize,
        })?;
        self.write_varint(length);
        for item in items {
            write(self, item)?;
        }
        Ok(())
    }

    /// Reads a VarInt count followed by that many elements. Counts above `max` are rejected
    /// before anything is allocated.
    pub fn read_collection<T>(
        &mut self,
        max: usize,
        mut read: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_length()?;
        if count > max {
            return Err(ProtocolError::CollectionTooLarge { length: count, max });
        }
        // Every element takes at least one byte, which bounds the up-front reservation
        let mut items = Vec::with_capacity(count.min(self.readable_bytes()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    pub fn write_list<T>(&mut self, items: &[T], codec: &FieldCodec<T>) -> Result<()> {
        self.write_collection(items, |buffer, item| (codec.encode)(buffer, item))
    }

    pub fn read_list<T>(&mut self, max: usize, codec: &FieldCodec<T>) -> Result<Vec<T>> {
        self.read_collection(max, |buffer| (codec.decode)(buffer))
    }

    /// Writes a presence flag, then the value when present.
    pub fn write_optional<T>(
        &mut self,
        value: Option<&T>,
        write: impl FnOnce(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        match value {
            Some(value) => {
                self.write_bool(true);
                write(self, value)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    pub fn read_optional<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.read_bool()? {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn write_nested<T>(&mut self, value: &T, codec: &FieldCodec<T>) -> Result<()> {
        (codec.encode)(self, value)
    }

    pub fn read_nested<T>(&mut self, codec: &FieldCodec<T>) -> Result<T> {
        (codec.decode)(self)
    }

    pub fn write_enum<E: ProtocolEnum>(&mut self, value: E) {
        self.write_varint(value.ordinal());
    }

    pub fn read_enum<E: ProtocolEnum>(&mut self) -> Result<E> {
        let ordinal = self.read_varint()?;
        E::by_ordinal(ordinal).ok_or(ProtocolError::InvalidEnumOrdinal {
            name: E::NAME,
            ordinal,
        })
    }

    /// Writes a VarInt word count then each 64-bit word.
    pub fn write_bitset(&mut self, set: &BitSet) {
        self.write_varint(set.words().len() as i32);
        for &word in set.words() {
            self.write_u64(word);
        }
    }

    pub fn read_bitset(&mut self) -> Result<BitSet> {
        let count = self.read_length()?;
        self.ensure_readable(count.saturating_mul(8))?;
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.read_u64()?);
        }
        Ok(BitSet::from_words(words))
    }

    /// Writes an optional compound in network form; `None` is a single `End` byte.
    pub fn write_nbt(&mut self, compound: Option<&Compound>) -> Result<()> {
        tessera_nbt::write_network_compound(self, compound)?;
        Ok(())
    }

    /// Reads an optional compound, charging it against the configured NBT quota and depth.
    pub fn read_nbt(&mut self) -> Result<Option<Compound>> {
        let mut accounter = NbtAccounter::new(self.config().max_nbt_bytes, self.config().max_nbt_depth);
        Ok(tessera_nbt::read_network_compound(self, &mut accounter)?)
    }

    /// Writes an optional tag of any kind in network form.
    pub fn write_nbt_tag(&mut self, tag: Option<&Tag>) -> Result<()> {
        tessera_nbt::write_network(self, tag)?;
        Ok(())
    }

    pub fn read_nbt_tag(&mut self) -> Result<Option<Tag>> {
        let mut accounter = NbtAccounter::new(self.config().max_nbt_bytes, self.config().max_nbt_depth);
        Ok(tessera_nbt::read_network(self, &mut accounter)?)
    }
}
