//! Domain values flowing through the server.
//!
//! - `tick`: one price observation produced by a source.
//! - `best_price`: the accepted best observation for a symbol.

pub mod best_price;
pub mod tick;

pub use best_price::BestPrice;
pub use tick::Tick;
