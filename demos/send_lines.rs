//! LineLog Client Demo
//!
//! Connects to a freshly started linelogd, sends a few lines, and prints the
//! full accumulated reply received after each one.
//!
//! Run the server first: `cargo run --bin linelogd -- --bind 127.0.0.1`

use std::env;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9000".to_string());

    println!("Connecting to {}", addr);
    let mut stream = TcpStream::connect(&addr).await?;

    let mut accumulated = 0usize;
    for line in ["hello from the demo\n", "a second line\n", "and a third\n"] {
        stream.write_all(line.as_bytes()).await?;
        accumulated += line.len();

        // The server answers every completed line with the entire store.
        let mut reply = vec![0u8; accumulated];
        stream.read_exact(&mut reply).await?;
        println!("--- reply ({} bytes) ---", reply.len());
        print!("{}", String::from_utf8_lossy(&reply));
    }

    println!("Done");
    Ok(())
}
