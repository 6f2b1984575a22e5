use crate::buffer::PacketBuffer;
use tessera_common::{ConnectionProtocol, PacketFlow, ProtocolError, Result};

/// Packet trait. A packet knows how to read and write its own fields; its numeric id belongs
/// to the dispatch table of the phase it is registered in.
pub trait Packet: Sized {
    /// Packet name, used in logs and errors.
    const NAME: &'static str;

    /// Reads the packet body. The id has already been consumed.
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self>;

    /// Writes the packet body, without the id.
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()>;
}

/// Maps one numeric id to the constructor that decodes it.
pub struct DispatchEntry<P> {
    pub id: i32,
    pub name: &'static str,
    pub decode: fn(&mut PacketBuffer) -> Result<P>,
}

/// Id ↔ packet type table of one protocol phase in one direction. Built once and never
/// modified.
pub struct DispatchTable<P> {
    phase: ConnectionProtocol,
    flow: PacketFlow,
    entries: Vec<Option<DispatchEntry<P>>>,
}

impl<P> DispatchTable<P> {
    pub fn new(
        phase: ConnectionProtocol,
        flow: PacketFlow,
        entries: impl IntoIterator<Item = DispatchEntry<P>>,
    ) -> Self {
        let mut slots: Vec<Option<DispatchEntry<P>>> = Vec::new();
        for entry in entries {
            let index = entry.id as usize;
            if index >= slots.len() {
                slots.resize_with(index + 1, || None);
            }
            slots[index] = Some(entry);
        }
        Self {
            phase,
            flow,
            entries: slots,
        }
    }

    pub fn phase(&self) -> ConnectionProtocol {
        self.phase
    }

    pub fn flow(&self) -> PacketFlow {
        self.flow
    }

    /// Number of registered packet types.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entry(&self, id: i32) -> Option<&DispatchEntry<P>> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.entries.get(index))
            .and_then(Option::as_ref)
    }

    pub fn id_of(&self, name: &str) -> Option<i32> {
        self.iter().find(|entry| entry.name == name).map(|entry| entry.id)
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &DispatchEntry<P>> {
        self.entries.iter().flatten()
    }

    /// Decodes one whole frame: the id, then the body of the packet registered under it.
    ///
    /// An unregistered id fails before anything past the id is read. A body that leaves bytes
    /// unread fails as well, since the frame boundary and the packet disagree.
    pub fn decode(&self, buffer: &mut PacketBuffer) -> Result<P> {
        let id = buffer.read_varint()?;
        let entry = self.entry(id).ok_or(ProtocolError::UnknownPacketId {
            id,
            phase: self.phase,
            flow: self.flow,
        })?;

        let packet = (entry.decode)(buffer)?;
        if buffer.readable_bytes() > 0 {
            return Err(ProtocolError::TrailingBytes {
                packet: entry.name,
                remaining: buffer.readable_bytes(),
            });
        }
        Ok(packet)
    }
}

/// Declares the tagged union of every packet of one phase and direction, along with its
/// dispatch table and the routing of each variant to one handler method.
macro_rules! packet_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($phase:expr, $flow:expr) dispatches to $handler:ident {
            $($id:literal => $variant:ident($packet:ty) => $method:ident,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $($variant($packet),)*
        }

        impl $name {
            pub const PHASE: tessera_common::ConnectionProtocol = $phase;
            pub const FLOW: tessera_common::PacketFlow = $flow;

            pub fn packet_id(&self) -> i32 {
                match self {
                    $(Self::$variant(_) => $id,)*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$packet as $crate::packet::Packet>::NAME,)*
                }
            }

            /// Writes the id followed by the packet body.
            pub fn encode(
                &self,
                buffer: &mut $crate::buffer::PacketBuffer,
            ) -> tessera_common::Result<()> {
                buffer.write_varint(self.packet_id());
                match self {
                    $(Self::$variant(packet) => $crate::packet::Packet::write_to_buffer(packet, buffer),)*
                }
            }

            /// Hands the packet to exactly one handler method, then drops it.
            pub fn dispatch<H: $handler + ?Sized>(self, handler: &mut H) {
                match self {
                    $(Self::$variant(packet) => handler.$method(&packet),)*
                }
            }

            pub fn table() -> &'static $crate::packet::DispatchTable<$name> {
                static TABLE: once_cell::sync::Lazy<$crate::packet::DispatchTable<$name>> =
                    once_cell::sync::Lazy::new(|| {
                        $crate::packet::DispatchTable::new($phase, $flow, [
                            $($crate::packet::DispatchEntry {
                                id: $id,
                                name: <$packet as $crate::packet::Packet>::NAME,
                                decode: |buffer| {
                                    <$packet as $crate::packet::Packet>::read_from_buffer(buffer)
                                        .map($name::$variant)
                                },
                            },)*
                        ])
                    });
                &TABLE
            }

            pub fn decode(
                buffer: &mut $crate::buffer::PacketBuffer,
            ) -> tessera_common::Result<Self> {
                Self::table().decode(buffer)
            }
        }

        $(
            impl From<$packet> for $name {
                fn from(packet: $packet) -> Self {
                    Self::$variant(packet)
                }
            }
        )*
    };
}

pub(crate) use packet_set;
