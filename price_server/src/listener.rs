//! TCP front end.
//!
//! `CommandListener` accepts connections and hands them to the serving loop
//! over a channel. Each connection is handled on its own thread: it reads
//! newline-delimited JSON requests and writes one JSON response per request.
//! Malformed lines get a `bad_request` answer and the connection stays open.
//! Only an oversized line or a broken socket ends a connection, and never the
//! accept loop.

use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use log::{debug, error, info, warn};
use price_common::protocol::{read_line, write_message};
use price_common::{PriceError, Request, Response, Result};

use crate::service::MarketDataService;

/// Listening socket for client requests.
pub struct CommandListener {
    socket: TcpListener,
}

impl CommandListener {
    /// Bind to `bind_addr` (e.g. `0.0.0.0:8090`; port 0 picks a free port).
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Blocking loop that forwards every accepted connection to `tx`.
    ///
    /// Returns once `tx` has no receiver left.
    pub fn accept_loop(self, tx: Sender<TcpStream>) -> Result<()> {
        info!("Request TCP server is started on {}", self.socket.local_addr()?);

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    if tx.send(stream).is_err() {
                        debug!("Serving loop is gone, accept loop stopping");
                        break;
                    }
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Serve requests on one connection until the peer hangs up.
pub fn handle_connection(stream: TcpStream, service: &MarketDataService) -> Result<()> {
    let peer = stream.peer_addr()?;
    debug!("client connected: {}", peer);
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    loop {
        let line = match read_line(&mut reader) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(PriceError::LineTooLong { limit }) => {
                warn!("Request from {} exceeds {} bytes, closing", peer, limit);
                let message = format!("Request line exceeds {} bytes", limit);
                write_message(&mut writer, &Response::bad_request(message))?;
                break;
            }
            Err(PriceError::Format(message)) => {
                warn!("Unreadable request from {}: {}", peer, message);
                let message = format!("Unreadable request: {}", message);
                write_message(&mut writer, &Response::bad_request(message))?;
                continue;
            }
            Err(e) => return Err(e),
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                info!("Received request {:?} from {}", request, peer);
                service.handle(request)
            }
            Err(e) => {
                warn!("Malformed request from {}: {}", peer, e);
                Response::bad_request(format!("Malformed request: {}", e))
            }
        };
        write_message(&mut writer, &response)?;
    }

    debug!("client disconnected: {}", peer);
    Ok(())
}

/// Accept connections on `listener` and answer them with `service` until a
/// message (or disconnect) arrives on `shutdown_rx`.
pub fn serve(
    listener: CommandListener,
    service: Arc<MarketDataService>,
    shutdown_rx: Receiver<()>,
) -> Result<()> {
    let (conn_tx, conn_rx) = unbounded::<TcpStream>();
    thread::spawn(move || {
        if let Err(e) = listener.accept_loop(conn_tx) {
            error!("Accept loop failed: {}", e);
        }
    });

    loop {
        select! {
            recv(shutdown_rx) -> _ => {
                info!("Shutdown requested, no longer accepting requests");
                break;
            },
            recv(conn_rx) -> msg => match msg {
                Ok(stream) => {
                    let service = Arc::clone(&service);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &service) {
                            error!("Client connection error: {}", e);
                        }
                    });
                },
                Err(e) => return Err(PriceError::ChannelRecv(e.to_string())),
            }
        }
    }
    Ok(())
}
