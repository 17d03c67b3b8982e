//! Minimal echo server — accepts one peer and echoes packets back.
//!
//! Run with:
//!   cargo run --example echo-server
//!
//! In another terminal:
//!   cargo run --example echo-client -- hello world

use framelink::session::Listener;
use framelink::wire::{PacketReader, PacketWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(4711);

    let listener = Listener::install(port, None)?;
    eprintln!("Listening on port {}", listener.local_port());

    // Accept one peer and echo packets until disconnect.
    let conn = listener.accept(None)?;
    eprintln!(
        "Peer connected: {}:{}",
        conn.peer_ip()?,
        conn.peer_port()?
    );

    let mut reader = PacketReader::new(conn.try_clone()?);
    let mut writer = PacketWriter::new(conn);

    loop {
        match reader.recv() {
            Ok(received) => {
                let packet = received.packet();
                eprintln!(
                    "Received {} bytes with tag {}",
                    packet.payload.len(),
                    packet.tag
                );
                writer.send(packet)?;
            }
            Err(e) => {
                eprintln!("Peer disconnected: {e}");
                break;
            }
        }
    }

    Ok(())
}
