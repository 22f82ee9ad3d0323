//! Best-price aggregation server.
//!
//! Ticks for a symbol are pulled from several unreliable sources by the
//! [`poller::Poller`] and handed to the [`engine::ResolutionEngine`], which
//! keeps exactly one best price per symbol. Everything else in this crate is
//! plumbing around that engine:
//!
//! - `clock`: injectable time source.
//! - `model`: `Tick` and `BestPrice` values.
//! - `store`: the symbol → best price map owned by the engine.
//! - `query`: read-only facade over the store.
//! - `sources`: synthetic and HTTP price sources.
//! - `history`: optional archive of best prices.
//! - `service`: request handling for the wire protocol.
//! - `listener`: TCP accept loop and per-connection handling.
//! - `args` / `config`: command-line parsing and validated configuration.
#![warn(missing_docs)]
pub mod args;
pub mod clock;
pub mod config;
pub mod engine;
pub mod history;
pub mod listener;
pub mod model;
pub mod poller;
pub mod query;
pub mod service;
pub mod sources;
pub mod store;
