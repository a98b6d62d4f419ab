//! BTC-e normalized into the canonical [`ExchangeAdapter`] surface.
//!
//! Every operation is one upstream call reshaped into an [`Envelope`]; the
//! adapter keeps no state between calls beyond its client handle. Only the
//! operations declared on the trait exist here — nothing of the upstream
//! client's surface leaks through.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinbridge_core::pair;
use coinbridge_core::*;
use std::sync::Arc;
use tracing::debug;

use crate::api::{BtceApi, TradeHistoryQuery};
use crate::client::{BtceClient, BtceConfig};

/// Error message BTC-e's `ActiveOrders` call reports when the account has
/// no resting orders. Not a failure: an empty book is a valid answer.
const NO_ORDERS_MSG: &str = "no orders";

/// How far back `trades` reaches: the last 24 hours.
const TRADE_WINDOW_SECS: i64 = 24 * 60 * 60;

pub struct BtceAdapter {
    api: Arc<dyn BtceApi>,
}

impl BtceAdapter {
    /// Build an adapter over the production HTTP client. Credentials are
    /// optional; without them the signed operations go out unauthenticated
    /// and the exchange rejects them at call time.
    pub fn new(config: BtceConfig) -> Self {
        Self {
            api: Arc::new(BtceClient::new(config)),
        }
    }

    /// Build an adapter over an externally supplied client.
    pub fn with_api(api: Arc<dyn BtceApi>) -> Self {
        Self { api }
    }

    async fn post_order(&self, side: Side, order: &OrderSpec) -> Envelope<PlacedOrder> {
        let exchange_pair = order.pair.as_deref().map(|p| pair::to_exchange(Some(p)));
        match self
            .api
            .place_trade(exchange_pair.as_deref(), side, order.rate, order.amount)
            .await
        {
            Ok(receipt) => Envelope::success(
                timestamp_now(),
                vec![PlacedOrder {
                    order_id: receipt.order_id.to_string(),
                    // BTC-e never reports a creation timestamp.
                    created_at: String::new(),
                }],
            ),
            Err(e) => Envelope::failure(e.to_string()),
        }
    }
}

#[async_trait]
impl ExchangeAdapter for BtceAdapter {
    fn properties(&self) -> ExchangeProperties {
        btce_properties()
    }

    async fn ticker(&self, requested: Option<&str>) -> Envelope<Ticker> {
        match self.api.ticker(&pair::to_exchange(requested)).await {
            Ok(t) => Envelope::success(
                t.updated,
                vec![Ticker {
                    pair: pair::to_display(requested),
                    last: t.last,
                    // v2 naming is from the counterparty's side: their
                    // `sell` is our bid, their `buy` is our ask.
                    bid: t.sell,
                    ask: t.buy,
                    volume: t.vol_cur,
                }],
            ),
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn rate(&self, requested: Option<&str>) -> Envelope<Rate> {
        let ticker = self.ticker(requested).await;
        let mut envelope = Envelope {
            timestamp: ticker.timestamp,
            error: ticker.error,
            data: Vec::new(),
        };
        if envelope.error.is_empty() {
            if let Some(t) = ticker.data.first() {
                envelope.data.push(Rate {
                    pair: t.pair.clone(),
                    rate: t.last,
                });
            }
        }
        envelope
    }

    async fn order_book(&self, requested: Option<&str>) -> Envelope<OrderBook> {
        match self.api.depth(&pair::to_exchange(requested)).await {
            Ok(depth) => {
                let level = |(price, volume): (_, _)| BookEntry { price, volume };
                Envelope::success(
                    timestamp_now(),
                    vec![OrderBook {
                        pair: pair::to_display(requested),
                        asks: depth.asks.into_iter().map(level).collect(),
                        bids: depth.bids.into_iter().map(level).collect(),
                    }],
                )
            }
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn fee(&self, requested: Option<&str>) -> Envelope<Fee> {
        match self.api.fee(&pair::to_exchange(requested)).await {
            Ok(fee) => {
                // The exchange quotes one percentage for both sides.
                let fraction = fee.trade / rust_decimal::Decimal::ONE_HUNDRED;
                Envelope::success(
                    timestamp_now(),
                    vec![Fee {
                        pair: pair::to_display(requested),
                        maker_fee: fraction,
                        taker_fee: fraction,
                    }],
                )
            }
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn trades(&self, requested: Option<&str>) -> Envelope<TradeHistory> {
        let query = TradeHistoryQuery {
            since: Some(timestamp_now() - TRADE_WINDOW_SECS),
            order: Some("DESC".to_string()),
            pair: Some(pair::to_exchange(requested)),
            ..TradeHistoryQuery::default()
        };
        match self.api.trade_history(&query).await {
            Ok(records) => {
                let mut trades: Vec<Trade> = records
                    .iter()
                    .map(|(_, r)| Trade {
                        trade_id: r.order_id.to_string(),
                        side: r.side,
                        amount: r.amount,
                        price: r.rate,
                        timestamp: DateTime::<Utc>::from_timestamp(r.timestamp, 0)
                            .unwrap_or_default(),
                    })
                    .collect();
                // Upstream is queried newest-first and the reversal emits
                // oldest-first. Preserved from the reference behavior;
                // consumers may depend on it, so change both sides or
                // neither.
                trades.reverse();
                Envelope::success(
                    timestamp_now(),
                    vec![TradeHistory {
                        pair: requested.unwrap_or("").to_string(),
                        trades,
                    }],
                )
            }
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn open_orders(&self, requested: Option<&str>) -> Envelope<OpenOrder> {
        match self.api.active_orders(&pair::to_exchange(requested)).await {
            Ok(orders) => Envelope::success(
                timestamp_now(),
                orders
                    .iter()
                    .map(|(id, o)| OpenOrder {
                        order_id: id.clone(),
                        pair: o.pair.to_uppercase(),
                        side: o.side,
                        amount: o.amount,
                        rate: o.rate,
                        margin: false,
                        status: o.status.to_string(),
                        created_at: DateTime::<Utc>::from_timestamp(o.timestamp_created, 0)
                            .unwrap_or_default(),
                    })
                    .collect(),
            ),
            Err(ExchangeError::Api(message)) if message == NO_ORDERS_MSG => {
                debug!("no open orders for {:?}", requested);
                Envelope::success(timestamp_now(), Vec::new())
            }
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn buy_order(&self, order: &OrderSpec) -> Envelope<PlacedOrder> {
        self.post_order(Side::Buy, order).await
    }

    async fn sell_order(&self, order: &OrderSpec) -> Envelope<PlacedOrder> {
        self.post_order(Side::Sell, order).await
    }

    async fn cancel_order(&self, order_id: &str) -> Envelope<PlacedOrder> {
        match self.api.cancel_order(order_id).await {
            Ok(_) => Envelope::success(timestamp_now(), Vec::new()),
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn balance(&self) -> Envelope<Balance> {
        match self.api.get_info().await {
            Ok(info) => {
                let available = info
                    .funds
                    .into_iter()
                    .map(|(currency, amount)| CurrencyAmount {
                        currency: if currency.eq_ignore_ascii_case("btc") {
                            "XBT".to_string()
                        } else {
                            currency.to_uppercase()
                        },
                        amount,
                    })
                    .collect();
                Envelope::success(
                    timestamp_now(),
                    vec![Balance {
                        account_id: "exchange".to_string(),
                        // The exchange only reports the available side.
                        total: Vec::new(),
                        available,
                    }],
                )
            }
            Err(e) => Envelope::failure(e.to_string()),
        }
    }

    async fn transactions(&self) -> Envelope<Transaction> {
        // No upstream endpoint carries this; fail without calling out.
        Envelope::failure(ExchangeError::NotImplemented.to_string())
    }
}

/// BTC-e's capability descriptor. The method name strings are the
/// host-facing operation names and must stay stable for discovery.
fn btce_properties() -> ExchangeProperties {
    let strings = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
    ExchangeProperties {
        name: "BTC-e".to_string(),
        slug: "btce".to_string(),
        methods: MethodSupport {
            implemented: strings(&[
                "getRate",
                "getTicker",
                "getOrderBook",
                "getFee",
                "getOpenOrders",
                "postSellOrder",
                "postBuyOrder",
                "cancelOrder",
                "getBalance",
                "getTrades",
            ]),
            not_supported: strings(&[
                "getMarginPositions",
                "getLendBook",
                "getActiveOffers",
                "postOffer",
                "cancelOffer",
            ]),
        },
        instruments: vec![Instrument {
            pair: "XBT_USD".to_string(),
        }],
        public_api: ApiAccess {
            supported: true,
            requires: Vec::new(),
        },
        private_api: ApiAccess {
            supported: true,
            requires: strings(&["key", "secret"]),
        },
        market_order: false,
        infinity_order: false,
        monitor_error: String::new(),
        trade_error: String::new(),
    }
}
