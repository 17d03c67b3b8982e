//! Echo client — sends each argument as a packet and prints the echoes.
//!
//! Run with:
//!   cargo run --example echo-client -- hello world

use framelink::session::Connection;
use framelink::wire::{PacketReader, PacketWriter};

const ECHO: u8 = 1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let words: Vec<String> = std::env::args().skip(1).collect();
    let words = if words.is_empty() {
        vec!["ping".to_string()]
    } else {
        words
    };

    let conn = Connection::connect("127.0.0.1", 4711)?;
    eprintln!("Connected from local port {}", conn.local_port()?);

    let mut writer = PacketWriter::new(conn.try_clone()?);
    let mut reader = PacketReader::new(conn);

    for word in words {
        writer.send_bytes(ECHO, word.as_bytes())?;
        let reply = reader.recv()?.into_packet();
        println!("{}", String::from_utf8_lossy(&reply.payload));
    }

    Ok(())
}
