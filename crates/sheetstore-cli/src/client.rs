//! Line-protocol client.
//!
//! One-shot request/response over TCP: connect, send one JSON line,
//! read one JSON line back.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::{bail, Context, Result};

use sheetstore_proto::{Request, Response};

/// A client for one sheetstore server address.
pub struct Client {
    addr: String,
}

impl Client {
    /// Creates a client for `host:port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
        }
    }

    /// Sends one request and waits for its response.
    pub fn send(&self, request: &Request) -> Result<Response> {
        let mut stream = TcpStream::connect(&self.addr)
            .with_context(|| format!("Failed to connect to {}", self.addr))?;

        let mut line = serde_json::to_string(request).context("Failed to encode request")?;
        line.push('\n');
        stream
            .write_all(line.as_bytes())
            .context("Failed to send request")?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut response_line = String::new();
        let read = reader
            .read_line(&mut response_line)
            .context("Failed to read response")?;
        if read == 0 {
            bail!("Server closed the connection without responding");
        }

        serde_json::from_str(response_line.trim()).context("Failed to decode response")
    }
}
