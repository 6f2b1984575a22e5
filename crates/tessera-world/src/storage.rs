/// Fixed-width unsigned values packed into longs. Values never straddle two longs; the high
/// bits of each long that cannot hold a whole value stay zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStorage {
    bits: u8,
    size: usize,
    values_per_long: usize,
    mask: u64,
    data: Vec<u64>,
}

impl BitStorage {
    /// Storage for `size` zero values of `bits` bits each. Zero bits stores nothing; `bits`
    /// must not exceed 32.
    pub fn new(bits: u8, size: usize) -> Self {
        let values_per_long = if bits == 0 { 0 } else { 64 / bits as usize };
        let longs = if bits == 0 {
            0
        } else {
            size.div_ceil(values_per_long)
        };
        Self {
            bits,
            size,
            values_per_long,
            mask: if bits == 0 { 0 } else { u64::MAX >> (64 - bits) },
            data: vec![0; longs],
        }
    }

    /// Wraps longs read from the wire. `None` when the count does not match `bits` and `size`,
    /// or when `bits` is wider than a value.
    pub fn from_raw(bits: u8, size: usize, data: Vec<u64>) -> Option<Self> {
        if u32::from(bits) > u32::BITS {
            return None;
        }
        let mut storage = Self::new(bits, size);
        if storage.data.len() != data.len() {
            return None;
        }
        storage.data = data;
        Some(storage)
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn raw(&self) -> &[u64] {
        &self.data
    }

    pub fn get(&self, index: usize) -> u32 {
        if self.bits == 0 {
            return 0;
        }
        let (cell, offset) = self.locate(index);
        ((self.data[cell] >> offset) & self.mask) as u32
    }

    /// Stores `value` at `index`, returning what was there. Bits above the width are dropped.
    pub fn set(&mut self, index: usize, value: u32) -> u32 {
        if self.bits == 0 {
            return 0;
        }
        let (cell, offset) = self.locate(index);
        let previous = ((self.data[cell] >> offset) & self.mask) as u32;
        self.data[cell] = (self.data[cell] & !(self.mask << offset)) | ((value as u64 & self.mask) << offset);
        previous
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.size).map(|index| self.get(index))
    }

    fn locate(&self, index: usize) -> (usize, usize) {
        let cell = index / self.values_per_long;
        let offset = (index % self.values_per_long) * self.bits as usize;
        (cell, offset)
    }
}
