//! Best-price aggregation server.
//!
//! This binary wires the pieces from the `price_server` library together:
//!
//! - `ResolutionEngine`: keeps one best price per symbol, fed by the poller.
//! - `Poller`: asks every configured `PriceSource` for a symbol, in order.
//! - `MarketDataService`: answers client requests and archives best prices.
//! - `CommandListener`: accepts TCP clients; each connection is served on its own
//!   thread with newline-delimited JSON requests and responses.
//!
//! Concurrency and shutdown:
//! - The listener thread forwards accepted connections over a `crossbeam_channel`.
//! - The main loop `select!`s between new connections and a Ctrl+C shutdown signal.
//! - A failing connection is logged and dropped without affecting other clients.
//!
//! Network protocol (high-level):
//! - Bind address: `0.0.0.0:8090` unless `--bind` says otherwise.
//! - Requests look like `{"command":"poll","symbol":"BTCUSD"}`; responses like
//!   `{"status":"found","price":{...}}`. See `price_common::protocol`.
#![warn(missing_docs)]
use std::sync::Arc;

use clap::Parser;
use crossbeam_channel::bounded;
use log::info;
use price_common::{PriceError, Result};
use price_server::args::Args;
use price_server::clock::{Clock, SystemClock};
use price_server::config::ServerConfig;
use price_server::engine::ResolutionEngine;
use price_server::listener::{self, CommandListener};
use price_server::poller::Poller;
use price_server::query::PriceQuery;
use price_server::service::MarketDataService;
use price_server::sources::build_sources;

fn main() -> Result<(), PriceError> {
    init_logger();
    let config = ServerConfig::try_from(Args::parse())?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let engine = Arc::new(ResolutionEngine::new(config.engine, Arc::clone(&clock)));
    let sources = build_sources(&config.sources, clock, config.alpha_vantage.as_ref())?;
    let poller = Poller::new(sources, Arc::clone(&engine));
    info!(
        "Engine ready: stale_threshold={:?} outlier_pct={} sources={:?}",
        config.engine.stale_threshold,
        config.engine.outlier_percentage,
        poller.source_names()
    );

    let history = config.history.build();
    info!("History archive: {:?}", config.history);
    let service = Arc::new(MarketDataService::new(
        poller,
        PriceQuery::new(engine),
        history,
    ));

    let listener = CommandListener::bind(&config.bind)?;
    info!("Listening for requests on {}", listener.local_addr()?);

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down server...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| PriceError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    listener::serve(listener, service, shutdown_rx)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
