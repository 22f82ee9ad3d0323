//! Shared protocol types used by client and server.
//!
//! Requests and responses are JSON objects, one per line, tagged by a
//! `command` (requests) or `status` (responses) field. A connection may carry
//! any number of request/response pairs.
use std::io::{BufRead, Read, Write};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PriceError;
use crate::net::MAX_LINE_BYTES;
use crate::price::PriceView;

/// Message returned for `best`/`poll` requests without a usable symbol.
pub const MISSING_SYMBOL_MESSAGE: &str = "Symbol cannot be null or empty";

/// Request payload sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Current best price for one symbol.
    Best {
        /// Symbol to look up (case-insensitive).
        symbol: String,
    },
    /// Current best prices for every known symbol.
    All,
    /// Every symbol that currently has a best price.
    Symbols,
    /// Poll all configured sources for `symbol`, then report its best price.
    Poll {
        /// Symbol to poll (case-insensitive).
        symbol: String,
    },
    /// Archived best prices, optionally narrowed by symbol and time range.
    History {
        /// Restrict to one symbol.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        symbol: Option<String>,
        /// Inclusive lower bound on the observation time.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<DateTime<Utc>>,
        /// Inclusive upper bound on the observation time.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<DateTime<Utc>>,
    },
}

/// Response payload sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// A single best price.
    Found {
        /// The price found.
        price: PriceView,
    },
    /// A list of prices (may be empty).
    Prices {
        /// Prices in symbol order (current) or archive order (history).
        prices: Vec<PriceView>,
    },
    /// A list of symbols (may be empty).
    Symbols {
        /// Symbols in ascending order.
        symbols: Vec<String>,
    },
    /// The requested symbol has no best price.
    NotFound {
        /// Human-readable explanation.
        message: String,
    },
    /// The request itself was unusable.
    BadRequest {
        /// Human-readable explanation.
        message: String,
    },
    /// The server could not complete a valid request.
    Failed {
        /// Human-readable explanation.
        message: String,
    },
}

impl Response {
    /// `not_found` response for `symbol`.
    pub fn not_found(symbol: &str) -> Self {
        Response::NotFound {
            message: format!("Symbol not found with name: {}", symbol),
        }
    }

    /// `bad_request` response with `message`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::BadRequest {
            message: message.into(),
        }
    }
}

/// Writes `message` as a single JSON line and flushes the writer.
pub fn write_message<W: Write, T: Serialize>(
    writer: &mut W,
    message: &T,
) -> Result<(), PriceError> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Reads one raw line, without the trailing newline.
///
/// Returns `Ok(None)` when the peer closed the connection. Lines longer than
/// [`MAX_LINE_BYTES`] are rejected with [`PriceError::LineTooLong`] and leave
/// the reader mid-line. A complete line that is not UTF-8 is consumed and
/// reported as [`PriceError::Format`], so the next line can still be read.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, PriceError> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_BYTES as u64 + 1)
        .read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_BYTES {
        return Err(PriceError::LineTooLong {
            limit: MAX_LINE_BYTES,
        });
    }
    let line = String::from_utf8(buf).map_err(|e| PriceError::Format(e.to_string()))?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Reads and decodes one JSON line. Returns `Ok(None)` at end of stream.
pub fn read_message<R: BufRead, T: DeserializeOwned>(
    reader: &mut R,
) -> Result<Option<T>, PriceError> {
    match read_line(reader)? {
        Some(line) => Ok(Some(serde_json::from_str(&line)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn request_uses_command_tag() {
        let json = serde_json::to_string(&Request::Best {
            symbol: "BTCUSD".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"command":"best","symbol":"BTCUSD"}"#);

        let all: Request = serde_json::from_str(r#"{"command":"all"}"#).unwrap();
        assert_eq!(all, Request::All);
    }

    #[test]
    fn history_bounds_are_optional() {
        let req: Request =
            serde_json::from_str(r#"{"command":"history","symbol":"ethusd"}"#).unwrap();
        assert_eq!(
            req,
            Request::History {
                symbol: Some("ethusd".into()),
                start: None,
                end: None
            }
        );
    }

    #[test]
    fn not_found_message_names_symbol() {
        let json = serde_json::to_value(Response::not_found("BTCUSD")).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["message"], "Symbol not found with name: BTCUSD");
    }

    #[test]
    fn messages_are_newline_delimited() {
        let mut out = Vec::new();
        write_message(&mut out, &Request::Symbols).unwrap();
        write_message(&mut out, &Request::Poll { symbol: "x".into() }).unwrap();

        let mut reader = Cursor::new(out);
        let first: Option<Request> = read_message(&mut reader).unwrap();
        let second: Option<Request> = read_message(&mut reader).unwrap();
        let third: Option<Request> = read_message(&mut reader).unwrap();
        assert_eq!(first, Some(Request::Symbols));
        assert_eq!(second, Some(Request::Poll { symbol: "x".into() }));
        assert_eq!(third, None);
    }

    #[test]
    fn oversized_line_is_rejected() {
        let mut reader = Cursor::new(vec![b'a'; MAX_LINE_BYTES + 10]);
        assert!(matches!(
            read_line(&mut reader),
            Err(PriceError::LineTooLong { limit: MAX_LINE_BYTES })
        ));
    }

    #[test]
    fn invalid_utf8_line_is_consumed() {
        let mut reader = Cursor::new(b"\xff\xfe\n{\"command\":\"all\"}\n".to_vec());
        assert!(matches!(read_line(&mut reader), Err(PriceError::Format(_))));
        let next: Option<Request> = read_message(&mut reader).unwrap();
        assert_eq!(next, Some(Request::All));
    }
}
