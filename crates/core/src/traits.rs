use crate::models::*;
use crate::properties::ExchangeProperties;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors arising from an upstream exchange call, normalized once at the
/// client seam: transport failures and error payloads inside 200 responses
/// both end up here before any reshaping happens.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// Transport-level failure (connect, TLS, read).
    #[error("network error: {0}")]
    Network(String),
    /// An error the exchange itself reported, verbatim.
    #[error("{0}")]
    Api(String),
    /// Response body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// The operation exists in the canonical surface but this exchange
    /// cannot serve it.
    #[error("Method not implemented")]
    NotImplemented,
}

// ---------------------------------------------------------------------------
// Adapter Trait
// ---------------------------------------------------------------------------

/// An exchange normalized into the canonical schema.
///
/// Every method issues at most one upstream request (`rate` delegates
/// through `ticker`) and returns a fresh [`Envelope`]; the envelope's
/// `error` field is the single error channel. Implementations hold only
/// immutable construction state, so one adapter can be shared across tasks
/// freely.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Static capability descriptor for host-system discovery.
    fn properties(&self) -> ExchangeProperties;

    /// Last/bid/ask/volume for one pair.
    async fn ticker(&self, pair: Option<&str>) -> Envelope<Ticker>;

    /// The last-trade rate for one pair (a reduced ticker).
    async fn rate(&self, pair: Option<&str>) -> Envelope<Rate>;

    /// Full order book snapshot, best price first.
    async fn order_book(&self, pair: Option<&str>) -> Envelope<OrderBook>;

    /// Maker/taker fee fractions for one pair.
    async fn fee(&self, pair: Option<&str>) -> Envelope<Fee>;

    /// The account's trades for the last 24 hours on one pair.
    async fn trades(&self, pair: Option<&str>) -> Envelope<TradeHistory>;

    /// Orders currently resting on the exchange for one pair.
    async fn open_orders(&self, pair: Option<&str>) -> Envelope<OpenOrder>;

    /// Place a buy order.
    async fn buy_order(&self, order: &OrderSpec) -> Envelope<PlacedOrder>;

    /// Place a sell order.
    async fn sell_order(&self, order: &OrderSpec) -> Envelope<PlacedOrder>;

    /// Cancel a resting order by its exchange-assigned id. Success is an
    /// empty-data envelope.
    async fn cancel_order(&self, order_id: &str) -> Envelope<PlacedOrder>;

    /// Available funds per currency. `total` stays empty on exchanges that
    /// only report the available side.
    async fn balance(&self) -> Envelope<Balance>;

    /// Deposit/withdrawal ledger.
    async fn transactions(&self) -> Envelope<Transaction>;
}
