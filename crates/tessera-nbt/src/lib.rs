//! Structured tag format carried inside packets.
//!
//! Only the network form is implemented: a type byte followed by the unnamed root payload.
//! A lone `End` type byte stands for "no tag", which is how optional tags travel.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::io::{self, Read, Write};
use thiserror::Error;

pub type Compound = HashMap<String, Tag>;

pub type Result<T> = std::result::Result<T, NbtError>;

#[derive(Error, Debug)]
pub enum NbtError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid tag type: {0}")]
    InvalidTagType(u8),

    #[error("root tag must be a compound, found type {0}")]
    RootNotCompound(u8),

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("invalid UTF-8 in string")]
    InvalidUtf8,

    #[error("tag needs {requested} bytes but only {quota} are allowed")]
    QuotaExceeded { requested: u64, quota: u64 },

    #[error("tag nesting deeper than {0}")]
    TooDeep(usize),

    #[error("string of {0} bytes is too long")]
    StringTooLong(usize),

    #[error("array or list of {0} elements is too long")]
    ArrayTooLong(usize),

    #[error("list elements must share one tag type")]
    MixedList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// Tracks how many bytes and how much nesting a tag read has consumed, so a peer cannot make
/// the decoder allocate unbounded memory or recurse without limit.
#[derive(Debug, Clone)]
pub struct NbtAccounter {
    quota: u64,
    used: u64,
    max_depth: usize,
    depth: usize,
}

impl NbtAccounter {
    pub fn new(quota: u64, max_depth: usize) -> Self {
        Self {
            quota,
            used: 0,
            max_depth,
            depth: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX, usize::MAX)
    }

    /// Charges `bytes` against the quota. Called before the matching allocation.
    pub fn account_bytes(&mut self, bytes: u64) -> Result<()> {
        let requested = self.used.saturating_add(bytes);
        if requested > self.quota {
            return Err(NbtError::QuotaExceeded {
                requested,
                quota: self.quota,
            });
        }
        self.used = requested;
        Ok(())
    }

    pub fn push_depth(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(NbtError::TooDeep(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn pop_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn used(&self) -> u64 {
        self.used
    }
}

impl Tag {
    pub fn get_type_id(&self) -> u8 {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    fn read_payload<R: Read>(
        reader: &mut R,
        type_id: u8,
        accounter: &mut NbtAccounter,
    ) -> Result<Tag> {
        match type_id {
            0 => Ok(Tag::End),
            1 => {
                accounter.account_bytes(1)?;
                Ok(Tag::Byte(reader.read_i8()?))
            }
            2 => {
                accounter.account_bytes(2)?;
                Ok(Tag::Short(reader.read_i16::<BigEndian>()?))
            }
            3 => {
                accounter.account_bytes(4)?;
                Ok(Tag::Int(reader.read_i32::<BigEndian>()?))
            }
            4 => {
                accounter.account_bytes(8)?;
                Ok(Tag::Long(reader.read_i64::<BigEndian>()?))
            }
            5 => {
                accounter.account_bytes(4)?;
                Ok(Tag::Float(reader.read_f32::<BigEndian>()?))
            }
            6 => {
                accounter.account_bytes(8)?;
                Ok(Tag::Double(reader.read_f64::<BigEndian>()?))
            }
            7 => {
                let length = read_array_length(reader, 1, accounter)?;
                let mut bytes = vec![0u8; length];
                reader.read_exact(&mut bytes)?;
                Ok(Tag::ByteArray(bytes.into_iter().map(|b| b as i8).collect()))
            }
            8 => Ok(Tag::String(read_string(reader, accounter)?)),
            9 => {
                let list_type = reader.read_u8()?;
                let length = read_array_length(reader, 4, accounter)?;
                if list_type == 0 && length > 0 {
                    return Err(NbtError::InvalidTagType(0));
                }
                accounter.push_depth()?;
                let mut list = Vec::with_capacity(length);
                for _ in 0..length {
                    list.push(Tag::read_payload(reader, list_type, accounter)?);
                }
                accounter.pop_depth();
                Ok(Tag::List(list))
            }
            10 => Ok(Tag::Compound(read_compound_payload(reader, accounter)?)),
            11 => {
                let length = read_array_length(reader, 4, accounter)?;
                let mut ints = Vec::with_capacity(length);
                for _ in 0..length {
                    ints.push(reader.read_i32::<BigEndian>()?);
                }
                Ok(Tag::IntArray(ints))
            }
            12 => {
                let length = read_array_length(reader, 8, accounter)?;
                let mut longs = Vec::with_capacity(length);
                for _ in 0..length {
                    longs.push(reader.read_i64::<BigEndian>()?);
                }
                Ok(Tag::LongArray(longs))
            }
            _ => Err(NbtError::InvalidTagType(type_id)),
        }
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Tag::End => {}
            Tag::Byte(v) => writer.write_i8(*v)?,
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v)?,
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v)?,
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v)?,
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v)?,
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v)?,
            Tag::ByteArray(v) => {
                write_length(writer, v.len())?;
                for &b in v {
                    writer.write_i8(b)?;
                }
            }
            Tag::String(v) => write_string(writer, v)?,
            Tag::List(v) => {
                let list_type = v.first().map_or(0, Tag::get_type_id);
                if v.iter().any(|tag| tag.get_type_id() != list_type) {
                    return Err(NbtError::MixedList);
                }
                writer.write_u8(list_type)?;
                write_length(writer, v.len())?;
                for tag in v {
                    tag.write_payload(writer)?;
                }
            }
            Tag::Compound(v) => write_compound_payload(writer, v)?,
            Tag::IntArray(v) => {
                write_length(writer, v.len())?;
                for &i in v {
                    writer.write_i32::<BigEndian>(i)?;
                }
            }
            Tag::LongArray(v) => {
                write_length(writer, v.len())?;
                for &l in v {
                    writer.write_i64::<BigEndian>(l)?;
                }
            }
        }
        Ok(())
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Tag>> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(longs) => Some(longs),
            _ => None,
        }
    }
}

fn read_array_length<R: Read>(
    reader: &mut R,
    element_size: u64,
    accounter: &mut NbtAccounter,
) -> Result<usize> {
    let length = reader.read_i32::<BigEndian>()?;
    if length < 0 {
        return Err(NbtError::NegativeLength(length));
    }
    accounter.account_bytes(4 + element_size * length as u64)?;
    Ok(length as usize)
}

fn read_string<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> Result<String> {
    let length = reader.read_u16::<BigEndian>()?;
    accounter.account_bytes(2 + length as u64)?;
    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| NbtError::InvalidUtf8)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    let length = u16::try_from(value.len()).map_err(|_| NbtError::StringTooLong(value.len()))?;
    writer.write_u16::<BigEndian>(length)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

fn read_compound_payload<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> Result<Compound> {
    accounter.push_depth()?;
    let mut compound = HashMap::new();
    loop {
        let type_id = reader.read_u8()?;
        accounter.account_bytes(1)?;
        if type_id == 0 {
            break;
        }
        let name = read_string(reader, accounter)?;
        let tag = Tag::read_payload(reader, type_id, accounter)?;
        compound.insert(name, tag);
    }
    accounter.pop_depth();
    Ok(compound)
}

fn write_compound_payload<W: Write>(writer: &mut W, compound: &Compound) -> Result<()> {
    // Sorted so equal compounds always produce identical bytes
    let mut entries: Vec<_> = compound.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (name, tag) in entries {
        writer.write_u8(tag.get_type_id())?;
        write_string(writer, name)?;
        tag.write_payload(writer)?;
    }
    writer.write_u8(0)?;
    Ok(())
}

/// Reads an unnamed root tag of any type. `None` when the stream holds a lone `End` byte.
pub fn read_network<R: Read>(reader: &mut R, accounter: &mut NbtAccounter) -> Result<Option<Tag>> {
    let type_id = reader.read_u8()?;
    accounter.account_bytes(1)?;
    if type_id == 0 {
        return Ok(None);
    }
    Tag::read_payload(reader, type_id, accounter).map(Some)
}

/// Reads an unnamed root compound. `None` when the stream holds a lone `End` byte.
pub fn read_network_compound<R: Read>(
    reader: &mut R,
    accounter: &mut NbtAccounter,
) -> Result<Option<Compound>> {
    let type_id = reader.read_u8()?;
    accounter.account_bytes(1)?;
    match type_id {
        0 => Ok(None),
        10 => read_compound_payload(reader, accounter).map(Some),
        other => Err(NbtError::RootNotCompound(other)),
    }
}

/// Writes an unnamed root tag, or a lone `End` byte for `None`.
pub fn write_network<W: Write>(writer: &mut W, tag: Option<&Tag>) -> Result<()> {
    match tag {
        Some(tag) => {
            writer.write_u8(tag.get_type_id())?;
            tag.write_payload(writer)
        }
        None => Ok(writer.write_u8(0)?),
    }
}

/// Writes an unnamed root compound, or a lone `End` byte for `None`.
pub fn write_network_compound<W: Write>(writer: &mut W, compound: Option<&Compound>) -> Result<()> {
    match compound {
        Some(compound) => {
            writer.write_u8(10)?;
            write_compound_payload(writer, compound)
        }
        None => Ok(writer.write_u8(0)?),
    }
}

/// Writes the i32 element count of an array or list.
fn write_length<W: Write>(writer: &mut W, length: usize) -> Result<()> {
    let length = i32::try_from(length).map_err(|_| NbtError::ArrayTooLong(length))?;
    writer.write_i32::<BigEndian>(length)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn round_trip(tag: &Tag) -> Tag {
        let mut buffer = Vec::new();
        write_network(&mut buffer, Some(tag)).unwrap();
        let mut cursor = Cursor::new(buffer);
        read_network(&mut cursor, &mut NbtAccounter::unlimited())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_tag_type_ids() {
        assert_eq!(Tag::End.get_type_id(), 0);
        assert_eq!(Tag::Byte(0).get_type_id(), 1);
        assert_eq!(Tag::Short(0).get_type_id(), 2);
        assert_eq!(Tag::Int(0).get_type_id(), 3);
        assert_eq!(Tag::Long(0).get_type_id(), 4);
        assert_eq!(Tag::Float(0.0).get_type_id(), 5);
        assert_eq!(Tag::Double(0.0).get_type_id(), 6);
        assert_eq!(Tag::ByteArray(vec![]).get_type_id(), 7);
        assert_eq!(Tag::String("".to_string()).get_type_id(), 8);
        assert_eq!(Tag::List(vec![]).get_type_id(), 9);
        assert_eq!(Tag::Compound(HashMap::new()).get_type_id(), 10);
        assert_eq!(Tag::IntArray(vec![]).get_type_id(), 11);
        assert_eq!(Tag::LongArray(vec![]).get_type_id(), 12);
    }

    #[test]
    fn test_tag_read_write() {
        let test_cases = vec![
            Tag::Byte(42),
            Tag::Short(1234),
            Tag::Int(12345678),
            Tag::Long(123456789012),
            Tag::Float(3.5),
            Tag::Double(-0.125),
            Tag::ByteArray(vec![1, -2, 3]),
            Tag::String("Hello, World!".to_string()),
            Tag::List(vec![Tag::Int(1), Tag::Int(2), Tag::Int(3)]),
            Tag::List(vec![]),
            Tag::IntArray(vec![1, 2, 3]),
            Tag::LongArray(vec![1, -2, i64::MAX]),
        ];

        for tag in test_cases {
            assert_eq!(round_trip(&tag), tag);
        }
    }

    #[test]
    fn test_compound_read_write() {
        let mut inner = HashMap::new();
        inner.insert("x".to_string(), Tag::Int(3));
        let mut compound = HashMap::new();
        compound.insert("byte".to_string(), Tag::Byte(42));
        compound.insert("string".to_string(), Tag::String("test".to_string()));
        compound.insert("list".to_string(), Tag::List(vec![Tag::Int(1), Tag::Int(2)]));
        compound.insert("inner".to_string(), Tag::Compound(inner));

        let mut buffer = Vec::new();
        write_network_compound(&mut buffer, Some(&compound)).unwrap();
        let read = read_network_compound(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited())
            .unwrap();

        assert_eq!(read, Some(compound));
    }

    #[test]
    fn test_compound_bytes_are_deterministic() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..16 {
            first.insert(format!("key{}", i), Tag::Int(i));
        }
        for i in (0..16).rev() {
            second.insert(format!("key{}", i), Tag::Int(i));
        }

        let mut a = Vec::new();
        let mut b = Vec::new();
        write_network_compound(&mut a, Some(&first)).unwrap();
        write_network_compound(&mut b, Some(&second)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_absent_tag() {
        let mut buffer = Vec::new();
        write_network_compound(&mut buffer, None).unwrap();
        assert_eq!(buffer, vec![0]);

        let read = read_network_compound(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited())
            .unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_root_not_compound() {
        let mut buffer = Vec::new();
        write_network(&mut buffer, Some(&Tag::Int(7))).unwrap();
        let result = read_network_compound(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited());
        assert_matches!(result, Err(NbtError::RootNotCompound(3)));
    }

    #[test]
    fn test_invalid_tag_type() {
        let buffer = vec![255];
        let result = read_network(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited());
        assert_matches!(result, Err(NbtError::InvalidTagType(255)));
    }

    #[test]
    fn test_quota_checked_before_allocation() {
        // Long array claiming i32::MAX elements, with no element bytes behind it
        let mut buffer = vec![12];
        buffer.extend_from_slice(&i32::MAX.to_be_bytes());
        let result = read_network(&mut Cursor::new(buffer), &mut NbtAccounter::new(2_097_152, 512));
        assert_matches!(result, Err(NbtError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_negative_array_length() {
        let mut buffer = vec![11];
        buffer.extend_from_slice(&(-1i32).to_be_bytes());
        let result = read_network(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited());
        assert_matches!(result, Err(NbtError::NegativeLength(-1)));
    }

    #[test]
    fn test_depth_limit() {
        let mut tag = Tag::Int(0);
        for _ in 0..8 {
            tag = Tag::List(vec![tag]);
        }
        let mut buffer = Vec::new();
        write_network(&mut buffer, Some(&tag)).unwrap();

        let result = read_network(&mut Cursor::new(buffer.clone()), &mut NbtAccounter::new(u64::MAX, 4));
        assert_matches!(result, Err(NbtError::TooDeep(4)));

        let result = read_network(&mut Cursor::new(buffer), &mut NbtAccounter::new(u64::MAX, 8));
        assert_eq!(result.unwrap(), Some(tag));
    }

    #[test]
    fn test_length_past_i32_rejected() {
        let mut bytes = Vec::new();
        write_length(&mut bytes, i32::MAX as usize).unwrap();
        assert_eq!(bytes, [0x7f, 0xff, 0xff, 0xff]);

        let mut bytes = Vec::new();
        let too_long = i32::MAX as usize + 1;
        assert_matches!(
            write_length(&mut bytes, too_long),
            Err(NbtError::ArrayTooLong(length)) if length == too_long
        );
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_mixed_list_rejected() {
        let tag = Tag::List(vec![Tag::Int(1), Tag::Byte(2)]);
        let mut buffer = Vec::new();
        assert_matches!(write_network(&mut buffer, Some(&tag)), Err(NbtError::MixedList));
    }

    #[test]
    fn test_truncated_input() {
        let buffer = vec![10, 3, 0];
        let result = read_network_compound(&mut Cursor::new(buffer), &mut NbtAccounter::unlimited());
        assert_matches!(result, Err(NbtError::Io(_)));
    }

    #[test]
    fn test_tag_as_methods() {
        let mut map = HashMap::new();
        map.insert("test".to_string(), Tag::Int(42));
        let compound = Tag::Compound(map);
        assert_eq!(compound.as_compound().unwrap().get("test"), Some(&Tag::Int(42)));
        assert!(Tag::Int(0).as_compound().is_none());

        let list = Tag::List(vec![Tag::Int(1), Tag::Int(2)]);
        assert_eq!(list.as_list().unwrap().len(), 2);
        assert_eq!(Tag::String("test".to_string()).as_string().unwrap(), "test");
        assert_eq!(Tag::Int(42).as_i32(), Some(42));
        assert_eq!(Tag::LongArray(vec![5]).as_long_array(), Some(&[5i64][..]));
        assert!(Tag::Int(0).as_long_array().is_none());
    }
}
