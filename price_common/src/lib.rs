//!
//! Common types and utilities shared by the price server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `PriceError` used across the workspace.
//! - `result`: handy `Result<T, PriceError>` alias.
//! - `symbol`: symbol normalisation rules shared by both sides.
//! - `price`: the `PriceView` wire shape and the price rounding rule.
//! - `protocol`: request/response payloads exchanged over TCP.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod price;
pub mod protocol;
pub mod result;
pub mod symbol;

pub use error::PriceError;
pub use price::PriceView;
pub use protocol::{Request, Response};
pub use result::Result;
