//! Price payload sent to clients and the rounding rule applied to it.
//!
//! Prices leave the server rounded to two decimals, always moving away from
//! zero when anything remains past the second decimal: `35000.656151` becomes
//! `35000.66`, `-1.234` becomes `-1.24`. Clients depend on this exact rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Distance in cents below which a scaled price counts as a whole number of cents.
///
/// `33.33 * 100.0` is `3332.9999999999995` in binary floating point and must
/// stay `33.33` instead of turning into `33.34`. Far below a tenth of a cent,
/// so a real third decimal is never mistaken for noise.
const CENT_TOLERANCE: f64 = 1e-6;

/// Scaling error allowed on top of [`CENT_TOLERANCE`], in ULPs of the scaled value.
const SCALE_ERROR_ULPS: f64 = 4.0;

/// Rounds `price` to two decimals, away from zero on any remaining fraction.
///
/// Non-finite values are returned unchanged.
pub fn round_price_up(price: f64) -> f64 {
    if !price.is_finite() {
        return price;
    }
    let scaled = price.abs() * 100.0;
    let nearest = scaled.round();
    let tolerance = CENT_TOLERANCE.max(SCALE_ERROR_ULPS * f64::EPSILON * scaled);
    let cents = if (scaled - nearest).abs() <= tolerance {
        nearest
    } else {
        scaled.ceil()
    };
    (cents / 100.0).copysign(price)
}

/// Best price for one symbol as exposed over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceView {
    /// Canonical (uppercase) symbol.
    pub symbol: String,
    /// Price rounded with [`round_price_up`].
    pub price: f64,
    /// When the underlying tick was observed by its source.
    pub observed_at: DateTime<Utc>,
    /// Name of the source that produced the tick.
    pub source: String,
}

impl PriceView {
    /// Builds a view, applying the rounding rule to `raw_price`.
    pub fn new(symbol: &str, raw_price: f64, observed_at: DateTime<Utc>, source: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: round_price_up(raw_price),
            observed_at,
            source: source.to_string(),
        }
    }
}
