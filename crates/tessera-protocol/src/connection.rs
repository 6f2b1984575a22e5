//! Per-connection plumbing: an ordered inbound reader and a single FIFO outbound writer.

use crate::buffer::PacketBuffer;
use crate::frame::FrameCodec;
use crate::protocol::DirectionalPacket;
use futures::{SinkExt, StreamExt};
use std::marker::PhantomData;
use tessera_common::{CodecConfig, ConnectionProtocol, ProtocolError, Result};
use tessera_logger::{log, LogSeverity};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use LogSeverity::*;

/// Reads frames in arrival order and decodes them under the current phase.
///
/// Any error is fatal: once a frame fails to decode, the position of every later packet in
/// the stream is unknown and the caller has to close the connection.
pub struct PacketReader<R, P> {
    frames: FramedRead<R, FrameCodec>,
    phase: ConnectionProtocol,
    config: CodecConfig,
    _packets: PhantomData<fn() -> P>,
}

impl<R, P> PacketReader<R, P>
where
    R: AsyncRead + Unpin,
    P: DirectionalPacket,
{
    /// Creates a reader for a fresh connection, starting in the handshake phase.
    pub fn new(reader: R, config: CodecConfig) -> Self {
        Self::with_phase(reader, config, ConnectionProtocol::Handshake)
    }

    pub fn with_phase(reader: R, config: CodecConfig, phase: ConnectionProtocol) -> Self {
        Self {
            frames: FramedRead::new(reader, FrameCodec::new(config.max_frame_length)),
            phase,
            config,
            _packets: PhantomData,
        }
    }

    pub fn phase(&self) -> ConnectionProtocol {
        self.phase
    }

    /// Reads the next packet. `None` once the peer has closed the stream cleanly.
    pub async fn next_packet(&mut self) -> Result<Option<P>> {
        let frame = match self.frames.next().await {
            Some(frame) => frame.inspect_err(|error| {
                log(format!("Failed to read frame: {}", error), Error);
            })?,
            None => return Ok(None),
        };

        let mut buffer = PacketBuffer::from_bytes_with_config(frame.to_vec(), self.config);
        let packet = P::decode(self.phase, &mut buffer).inspect_err(|error| {
            log(
                format!("Failed to decode {} {} packet: {}", self.phase, P::FLOW, error),
                Error,
            );
        })?;

        if let Some(next) = packet.next_phase() {
            log(
                format!("Switching protocol from {} to {} after {}", self.phase, next, packet.name()),
                Debug,
            );
            self.phase = next;
        }
        Ok(Some(packet))
    }

    /// Dispatches every packet to `handler` until the stream ends or an error occurs.
    pub async fn drive(&mut self, handler: &mut P::Handler) -> Result<()> {
        while let Some(packet) = self.next_packet().await? {
            packet.dispatch(handler);
        }
        Ok(())
    }
}

/// Queues packets for a connection's writer. Cheap to clone; every clone feeds the same queue.
pub struct PacketSender<P> {
    sender: mpsc::UnboundedSender<P>,
}

impl<P> Clone for PacketSender<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P> PacketSender<P> {
    pub fn send(&self, packet: impl Into<P>) -> Result<()> {
        self.sender
            .send(packet.into())
            .map_err(|_| ProtocolError::ConnectionClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Owns the write half of a connection. Packets are encoded and written one whole frame at a
/// time, in the order they were queued.
pub struct PacketWriter<W, P> {
    frames: FramedWrite<W, FrameCodec>,
    receiver: mpsc::UnboundedReceiver<P>,
    config: CodecConfig,
}

impl<W, P> PacketWriter<W, P>
where
    W: AsyncWrite + Unpin,
    P: DirectionalPacket,
{
    pub fn new(writer: W, config: CodecConfig) -> (Self, PacketSender<P>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let writer = Self {
            frames: FramedWrite::new(writer, FrameCodec::new(config.max_frame_length)),
            receiver,
            config,
        };
        (writer, PacketSender { sender })
    }

    /// Writes queued packets until every sender is dropped, then flushes. Returns the first
    /// encode or write error.
    pub async fn run(mut self) -> Result<()> {
        while let Some(packet) = self.receiver.recv().await {
            let mut buffer = PacketBuffer::with_config(self.config);
            packet.encode(&mut buffer).inspect_err(|error| {
                log(format!("Failed to encode {}: {}", packet.name(), error), Error);
            })?;
            self.frames.send(buffer.into_bytes()).await?;
        }
        self.frames.flush().await?;
        Ok(())
    }
}
