//! Shared networking constants and helpers used by client and server.

/// TCP port for the request channel (client -> server).
pub const COMMAND_PORT: u16 = 8090;

/// Upper bound for a single request or response line, in bytes.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
