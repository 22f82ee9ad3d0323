//! Price Client: sends one request to the price server and logs the answer.
//!
//! Usage example (CLI):
//! ```bash
//! price_client --server 127.0.0.1:8090 poll BTCUSD
//! price_client best btcusd
//! price_client history --symbol BTCUSD --start 2026-01-01T00:00:00Z
//! ```
#![warn(missing_docs)]
mod args;
mod sender;

use clap::Parser;
use log::{error, info, warn};
use price_common::{PriceError, PriceView, Request, Response, Result};

use crate::args::Args;
use crate::sender::RequestSender;

fn main() -> Result<(), PriceError> {
    init_logger();
    let args = Args::parse();
    let server = args.server.trim().replace('"', "");
    let request = Request::from(args.command);

    let response = RequestSender::send(&server, &request)?;
    report(&response);
    Ok(())
}

fn report(response: &Response) {
    match response {
        Response::Found { price } => log_price(price),
        Response::Prices { prices } => {
            info!("{} price(s)", prices.len());
            prices.iter().for_each(log_price);
        }
        Response::Symbols { symbols } => info!("SYMBOLS: {}", symbols.join(", ")),
        Response::NotFound { message } => warn!("{}", message),
        Response::BadRequest { message } => error!("Bad request: {}", message),
        Response::Failed { message } => error!("Server failure: {}", message),
    }
}

fn log_price(price: &PriceView) {
    info!(
        "PRICE: {} Price={:.2} Time={} Source={}",
        price.symbol, price.price, price.observed_at, price.source
    );
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
