//! Read-only id ↔ value lookup tables for the numeric ids carried inside packets.
//!
//! Tables are populated by the caller and never change afterwards; the codec only encodes an
//! id and decodes through a lookup.

use crate::buffer::{PacketBuffer, MAX_STRING_LEN};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use tessera_common::{ProtocolError, Result};

pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// A namespaced identifier such as `minecraft:stone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    namespace: String,
    path: String,
}

impl ResourceLocation {
    pub fn new(namespace: &str, path: &str) -> Result<Self> {
        if !namespace.chars().all(valid_namespace_char) || !path.chars().all(valid_path_char) {
            return Err(ProtocolError::InvalidResourceLocation(format!(
                "{namespace}:{path}"
            )));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    pub fn minecraft(path: &str) -> Result<Self> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl FromStr for ResourceLocation {
    type Err = ProtocolError;

    /// A missing namespace means `minecraft`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((namespace, path)) if !namespace.is_empty() => Self::new(namespace, path),
            Some((_, path)) => Self::minecraft(path),
            None => Self::minecraft(s),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// An immutable bijection between dense numeric ids and values, ids assigned in list order.
#[derive(Debug, Clone)]
pub struct IdMap<T> {
    name: &'static str,
    by_id: Vec<T>,
    ids: HashMap<T, i32>,
}

impl<T: Clone + Eq + Hash> IdMap<T> {
    /// Builds the map. A value listed twice would leave one of its ids unreachable, so
    /// duplicates are rejected.
    pub fn new(name: &'static str, values: impl IntoIterator<Item = T>) -> Result<Self> {
        let by_id: Vec<T> = values.into_iter().collect();
        let mut ids = HashMap::with_capacity(by_id.len());
        for (index, value) in by_id.iter().enumerate() {
            let id = i32::try_from(index).map_err(|_| ProtocolError::CollectionTooLarge {
                length: by_id.len(),
                max: i32::MAX as usize,
            })?;
            if let Some(first) = ids.insert(value.clone(), id) {
                return Err(ProtocolError::DuplicateRegistryValue {
                    registry: name,
                    first,
                    duplicate: id,
                });
            }
        }
        Ok(Self { name, by_id, ids })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn id_of(&self, value: &T) -> Option<i32> {
        self.ids.get(value).copied()
    }

    pub fn by_id(&self, id: i32) -> Option<&T> {
        usize::try_from(id).ok().and_then(|index| self.by_id.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> {
        self.by_id.iter().enumerate().map(|(id, value)| (id as i32, value))
    }

    /// Resolves an id read off the wire.
    pub fn resolve(&self, id: i32) -> Result<&T> {
        self.by_id(id).ok_or(ProtocolError::UnknownRegistryId {
            registry: self.name,
            id,
        })
    }
}

impl PacketBuffer {
    pub fn write_registry_value<T: Clone + Eq + Hash>(
        &mut self,
        registry: &IdMap<T>,
        value: &T,
    ) -> Result<()> {
        let id = registry
            .id_of(value)
            .ok_or(ProtocolError::UnknownRegistryValue(registry.name()))?;
        self.write_varint(id);
        Ok(())
    }

    pub fn read_registry_value<'a, T: Clone + Eq + Hash>(
        &mut self,
        registry: &'a IdMap<T>,
    ) -> Result<&'a T> {
        let id = self.read_varint()?;
        registry.resolve(id)
    }

    pub fn write_resource_location(&mut self, location: &ResourceLocation) -> Result<()> {
        self.write_string(&location.to_string(), MAX_STRING_LEN)
    }

    pub fn read_resource_location(&mut self) -> Result<ResourceLocation> {
        self.read_string(MAX_STRING_LEN)?.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn blocks() -> IdMap<ResourceLocation> {
        IdMap::new(
            "block",
            ["air", "stone", "grass_block"]
                .into_iter()
                .map(|path| ResourceLocation::minecraft(path).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_resource_location_parse() {
        let location: ResourceLocation = "stone".parse().unwrap();
        assert_eq!(location.to_string(), "minecraft:stone");

        let location: ResourceLocation = "tessera:ui/button".parse().unwrap();
        assert_eq!(location.namespace(), "tessera");
        assert_eq!(location.path(), "ui/button");

        assert_matches!(
            "Bad:Name".parse::<ResourceLocation>(),
            Err(ProtocolError::InvalidResourceLocation(_))
        );
    }

    #[test]
    fn test_id_map_bijection() {
        let registry = blocks();
        assert_eq!(registry.len(), 3);
        for (id, value) in registry.iter() {
            assert_eq!(registry.id_of(value), Some(id));
            assert_eq!(registry.by_id(id), Some(value));
        }
        assert_eq!(registry.by_id(-1), None);
        assert_eq!(registry.by_id(3), None);
    }

    #[test]
    fn test_id_map_rejects_duplicates() {
        let result = IdMap::new("biome", ["plains", "desert", "plains"]);
        assert_matches!(
            result,
            Err(ProtocolError::DuplicateRegistryValue {
                registry: "biome",
                first: 0,
                duplicate: 2
            })
        );
    }

    #[test]
    fn test_registry_value_on_wire() {
        let registry = blocks();
        let stone = ResourceLocation::minecraft("stone").unwrap();

        let mut buffer = PacketBuffer::new();
        buffer.write_registry_value(&registry, &stone).unwrap();
        assert_eq!(buffer.get_buffer(), &[1]);
        assert_eq!(buffer.read_registry_value(&registry).unwrap(), &stone);

        let mut buffer = PacketBuffer::new();
        buffer.write_varint(9);
        assert_matches!(
            buffer.read_registry_value(&registry),
            Err(ProtocolError::UnknownRegistryId { registry: "block", id: 9 })
        );

        let unknown = ResourceLocation::minecraft("dirt").unwrap();
        assert_matches!(
            PacketBuffer::new().write_registry_value(&registry, &unknown),
            Err(ProtocolError::UnknownRegistryValue("block"))
        );
    }

    #[test]
    fn test_resource_location_on_wire() {
        let location = ResourceLocation::new("tessera", "hello").unwrap();
        let mut buffer = PacketBuffer::new();
        buffer.write_resource_location(&location).unwrap();
        assert_eq!(buffer.read_resource_location().unwrap(), location);
    }
}
