use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_packet, Packet};
use crate::error::{Result, WireError};
use crate::io::write_exact;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete packets to any `Write` stream.
///
/// Each send encodes into a reused buffer, writes the whole frame with the
/// exact-write discipline, and flushes, so a returned `Ok` means the frame
/// left this layer intact.
pub struct PacketWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> PacketWriter<T> {
    /// Create a new packet writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Send a packet (blocking). Returns the wire size written.
    pub fn send(&mut self, packet: &Packet) -> Result<usize> {
        self.send_bytes(packet.tag, packet.payload.as_ref())
    }

    /// Encode and send a tag with a payload. Returns the wire size written.
    pub fn send_bytes(&mut self, tag: u8, payload: &[u8]) -> Result<usize> {
        self.buf.clear();
        encode_packet(tag, payload, &mut self.buf)?;
        write_exact(&mut self.inner, &self.buf)?;
        self.flush()?;
        Ok(self.buf.len())
    }

    /// Encode and send a message packet. Returns the wire size written.
    ///
    /// Same layout as [`Packet::message`]: zero magnitude is a bare tag,
    /// anything else two little-endian bytes.
    pub fn send_message(&mut self, tag: u8, magnitude: u16) -> Result<usize> {
        if magnitude == 0 {
            self.send_bytes(tag, &[])
        } else {
            self.send_bytes(tag, &magnitude.to_le_bytes())
        }
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::{MAX_PAYLOAD, MESSAGE_VALUE_SIZE};
    use crate::reader::PacketReader;

    #[test]
    fn send_writes_length_tag_payload() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_bytes(0x2A, b"hi").unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, vec![0x03, 0x00, 0x2A, b'h', b'i']);
    }

    #[test]
    fn send_returns_wire_size() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let written = writer.send_bytes(1, b"hello").unwrap();
        assert_eq!(written, 8);
    }

    #[test]
    fn send_packet_matches_send_bytes() {
        let mut by_packet = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let mut by_bytes = PacketWriter::new(Cursor::new(Vec::<u8>::new()));

        let packet = Packet::new(6, &b"same"[..]);
        by_packet.send(&packet).unwrap();
        by_bytes.send_bytes(6, b"same").unwrap();

        assert_eq!(
            by_packet.into_inner().into_inner(),
            by_bytes.into_inner().into_inner()
        );
    }

    #[test]
    fn message_zero_is_bare_tag_on_wire() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let written = writer.send_message(0xFA, 0).unwrap();

        assert_eq!(written, 3);
        assert_eq!(writer.into_inner().into_inner(), vec![0x01, 0x00, 0xFA]);
    }

    #[test]
    fn message_value_is_little_endian() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let written = writer.send_message(0x10, 300).unwrap();

        assert_eq!(written, 3 + MESSAGE_VALUE_SIZE);
        assert_eq!(
            writer.into_inner().into_inner(),
            vec![0x03, 0x00, 0x10, 0x2C, 0x01]
        );
    }

    #[test]
    fn oversized_payload_rejected_before_any_write() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let payload = vec![0u8; MAX_PAYLOAD + 1];

        let err = writer.send_bytes(1, &payload).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { .. }));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn zero_write_is_connection_lost() {
        let mut writer = PacketWriter::new(ZeroWriter);
        let err = writer.send_bytes(1, b"x").unwrap_err();
        assert!(matches!(err, WireError::ConnectionLost));
    }

    #[test]
    fn interrupted_write_and_flush_retry() {
        let stream = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        let mut writer = PacketWriter::new(stream);
        writer.send_bytes(5, b"retry").unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), 3 + 5);
    }

    #[test]
    fn flush_propagates_to_stream() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = PacketWriter::new(sink);

        writer.send_bytes(1, b"x").unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[test]
    fn written_bytes_decode() {
        let mut writer = PacketWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send_bytes(3, b"z").unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = PacketReader::new(Cursor::new(wire));
        let packet = reader.recv().unwrap().into_packet();

        assert_eq!(packet.tag, 3);
        assert_eq!(packet.payload.as_ref(), b"z");
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
