//! Request handling.
//!
//! `MarketDataService` turns protocol [`Request`]s into [`Response`]s. It is
//! the only place that combines polling, querying and archiving: a `poll`
//! runs every source, archives the resulting best price (best-effort) and
//! then answers like `best`.

use log::{error, info};
use price_common::protocol::MISSING_SYMBOL_MESSAGE;
use price_common::symbol;
use price_common::{PriceView, Request, Response};

use crate::history::{HistoryArchive, HistoryFilter};
use crate::model::BestPrice;
use crate::poller::Poller;
use crate::query::PriceQuery;

/// Answers client requests against one engine.
pub struct MarketDataService {
    poller: Poller,
    query: PriceQuery,
    history: Option<Box<dyn HistoryArchive>>,
}

impl MarketDataService {
    /// Wire the service. `history` may be absent; history requests then fail
    /// with `bad_request`.
    pub fn new(
        poller: Poller,
        query: PriceQuery,
        history: Option<Box<dyn HistoryArchive>>,
    ) -> Self {
        Self {
            poller,
            query,
            history,
        }
    }

    /// Dispatch one request.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Best { symbol } => self.best(&symbol),
            Request::All => Response::Prices {
                prices: self.query.all_best().iter().map(|r| r.to_view()).collect(),
            },
            Request::Symbols => Response::Symbols {
                symbols: self.query.symbols(),
            },
            Request::Poll { symbol } => self.poll(&symbol),
            Request::History { symbol, start, end } => {
                if matches!((start, end), (Some(s), Some(e)) if s > e) {
                    return Response::bad_request("History range start must not be after end");
                }
                let mut filter = HistoryFilter::all().between(start, end);
                if let Some(symbol) = symbol {
                    filter = filter.with_symbol(&symbol);
                }
                self.history(&filter)
            }
        }
    }

    fn best(&self, raw: &str) -> Response {
        if symbol::is_missing(raw) {
            return Response::bad_request(MISSING_SYMBOL_MESSAGE);
        }
        match self.query.best(raw) {
            Some(record) => Response::Found {
                price: record.to_view(),
            },
            None => Response::not_found(raw),
        }
    }

    fn poll(&self, raw: &str) -> Response {
        if symbol::is_missing(raw) {
            return Response::bad_request(MISSING_SYMBOL_MESSAGE);
        }
        self.poller.poll_once(raw);
        if let Some(record) = self.query.best(raw) {
            self.archive(&record);
        }
        self.best(raw)
    }

    fn archive(&self, record: &BestPrice) {
        let Some(history) = &self.history else {
            return;
        };
        match history.append(record) {
            Ok(()) => info!(
                "Archived best price for symbol={} price={} source={}",
                record.symbol(),
                record.price(),
                record.source()
            ),
            Err(e) => error!(
                "Failed to archive best price for symbol={}: {}",
                record.symbol(),
                e
            ),
        }
    }

    fn history(&self, filter: &HistoryFilter) -> Response {
        let Some(history) = &self.history else {
            return Response::bad_request("Price history is disabled on this server");
        };
        match history.query(filter) {
            Ok(records) => Response::Prices {
                prices: records.iter().map(BestPrice::to_view).collect::<Vec<PriceView>>(),
            },
            Err(e) => {
                error!("History query failed: {}", e);
                Response::Failed {
                    message: format!("History unavailable: {}", e),
                }
            }
        }
    }
}
