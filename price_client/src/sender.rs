//! Sending requests to the price server over TCP.
//!
//! One request, one response: the helper writes a JSON line and waits for the
//! matching JSON line back.
use std::io::BufReader;
use std::net::TcpStream;
use std::time::Duration;

use log::{debug, info};
use price_common::protocol::{read_message, write_message};
use price_common::{PriceError, Request, Response, Result};

/// How long to wait for the server's answer. Polls may hit slow upstreams.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Helper type for talking to the server.
pub struct RequestSender;

impl RequestSender {
    /// Connect to `server`, send `request` and return the server's response.
    pub fn send(server: &str, request: &Request) -> Result<Response> {
        info!("Connecting to TCP server at {}", server);
        let stream = TcpStream::connect(server)
            .map_err(|e| PriceError::Format(format!("Failed to connect to server: {}", e)))?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = stream;

        debug!("Sending request: {:?}", request);
        write_message(&mut writer, request)?;

        read_message(&mut reader)?.ok_or_else(|| {
            PriceError::Format("Server closed the connection without answering".to_string())
        })
    }
}
