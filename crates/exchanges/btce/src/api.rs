//! The upstream BTC-e API surface and its wire shapes.
//!
//! [`BtceApi`] is the seam between the adapter and the network: the adapter
//! only ever talks to this trait, so tests can substitute a scripted double
//! for the real [`crate::client::BtceClient`]. Every method already returns
//! a normalized `Result` — transport errors and error payloads inside 200
//! responses are collapsed by the implementation, never by callers.

use async_trait::async_trait;
use coinbridge_core::{ExchangeError, Side};
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

// ---------------------------------------------------------------------------
// Public API (v2) wire shapes
// ---------------------------------------------------------------------------

/// `GET /api/2/{pair}/ticker`, inner `ticker` object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickerInfo {
    pub high: Decimal,
    pub low: Decimal,
    pub avg: Decimal,
    /// Volume in the quote currency.
    pub vol: Decimal,
    /// Volume in the base currency.
    pub vol_cur: Decimal,
    pub last: Decimal,
    /// Price a buyer currently pays (the exchange's naming, not ours).
    pub buy: Decimal,
    /// Price a seller currently gets.
    pub sell: Decimal,
    /// Unix seconds of the last update.
    pub updated: i64,
}

/// `GET /api/2/{pair}/depth`. Each level is a `[price, volume]` tuple,
/// best price first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Depth {
    pub asks: Vec<(Decimal, Decimal)>,
    pub bids: Vec<(Decimal, Decimal)>,
}

/// `GET /api/2/{pair}/fee`. One percentage applied to both sides of a trade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeeInfo {
    pub trade: Decimal,
}

// ---------------------------------------------------------------------------
// Trade API wire shapes
// ---------------------------------------------------------------------------

/// One record from the `TradeHistory` method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryTrade {
    pub pair: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub amount: Decimal,
    pub rate: Decimal,
    pub order_id: u64,
    #[serde(default)]
    pub is_your_order: u8,
    /// Unix seconds.
    pub timestamp: i64,
}

/// One record from the `ActiveOrders` method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActiveOrder {
    pub pair: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub amount: Decimal,
    pub rate: Decimal,
    /// Unix seconds.
    pub timestamp_created: i64,
    pub status: i64,
}

/// `getInfo` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountInfo {
    /// Currency code -> held amount, document order preserved.
    #[serde(deserialize_with = "keyed_entries")]
    pub funds: Vec<(String, Decimal)>,
    #[serde(default)]
    pub rights: AccountRights,
    #[serde(default)]
    pub open_orders: i64,
    #[serde(default)]
    pub transaction_count: i64,
    #[serde(default)]
    pub server_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountRights {
    #[serde(default)]
    pub info: u8,
    #[serde(default)]
    pub trade: u8,
    #[serde(default)]
    pub withdraw: u8,
}

/// `Trade` method acknowledgement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeReceipt {
    pub received: Decimal,
    pub remains: Decimal,
    /// 0 when the order executed in full immediately.
    pub order_id: u64,
    #[serde(deserialize_with = "keyed_entries")]
    pub funds: Vec<(String, Decimal)>,
}

/// `CancelOrder` method acknowledgement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CancelReceipt {
    pub order_id: u64,
    #[serde(deserialize_with = "keyed_entries")]
    pub funds: Vec<(String, Decimal)>,
}

/// Filters for the `TradeHistory` method. Absent fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeHistoryQuery {
    pub from: Option<u64>,
    pub count: Option<u64>,
    pub from_id: Option<u64>,
    pub end_id: Option<u64>,
    /// "ASC" or "DESC".
    pub order: Option<String>,
    /// Unix seconds lower bound.
    pub since: Option<i64>,
    /// Unix seconds upper bound.
    pub end: Option<i64>,
    pub pair: Option<String>,
}

// ---------------------------------------------------------------------------
// Keyed payloads
// ---------------------------------------------------------------------------

/// A TAPI `return` object keyed by record id, as `(id, record)` entries in
/// document order. BTC-e's ordering (e.g. a DESC trade history) lives in the
/// key order of the JSON object, so a plain map type would lose it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Keyed<T>(#[serde(deserialize_with = "keyed_entries")] pub Vec<(String, T)>);

fn keyed_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct Entries<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for Entries<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object keyed by record id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, T>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(Entries(PhantomData))
}

// ---------------------------------------------------------------------------
// The upstream collaborator
// ---------------------------------------------------------------------------

/// The BTC-e API as the adapter consumes it.
///
/// Mirrors the exchange's own method set: three unauthenticated v2 calls and
/// five signed Trade API calls. Credentials are an implementation concern —
/// an unauthenticated implementation still accepts the signed-method calls
/// and lets the exchange reject them (fail-lazily, by design of the
/// adapter's construction contract).
#[async_trait]
pub trait BtceApi: Send + Sync {
    async fn ticker(&self, pair: &str) -> Result<TickerInfo, ExchangeError>;

    async fn depth(&self, pair: &str) -> Result<Depth, ExchangeError>;

    async fn fee(&self, pair: &str) -> Result<FeeInfo, ExchangeError>;

    /// `TradeHistory`: executed trades, keyed by trade id.
    async fn trade_history(
        &self,
        query: &TradeHistoryQuery,
    ) -> Result<Vec<(String, HistoryTrade)>, ExchangeError>;

    /// `getInfo`: funds and account flags.
    async fn get_info(&self) -> Result<AccountInfo, ExchangeError>;

    /// `ActiveOrders`: resting orders for one pair, keyed by order id.
    /// Reports the error `"no orders"` when none exist.
    async fn active_orders(&self, pair: &str)
        -> Result<Vec<(String, ActiveOrder)>, ExchangeError>;

    /// `Trade`: place an order. Absent pair/rate/amount are not sent;
    /// their meaning is the exchange's business.
    async fn place_trade(
        &self,
        pair: Option<&str>,
        side: Side,
        rate: Option<Decimal>,
        amount: Option<Decimal>,
    ) -> Result<TradeReceipt, ExchangeError>;

    /// `CancelOrder` by exchange-assigned id.
    async fn cancel_order(&self, order_id: &str) -> Result<CancelReceipt, ExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn keyed_entries_preserve_document_order() {
        let json = r#"{
            "300": {"pair":"btc_usd","type":"sell","amount":"1.0","rate":"450.0","order_id":300,"is_your_order":1,"timestamp":1400000300},
            "100": {"pair":"btc_usd","type":"buy","amount":"2.0","rate":"440.0","order_id":100,"is_your_order":1,"timestamp":1400000100},
            "200": {"pair":"btc_usd","type":"buy","amount":"0.5","rate":"445.0","order_id":200,"is_your_order":1,"timestamp":1400000200}
        }"#;
        let Keyed(entries): Keyed<HistoryTrade> = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = entries.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["300", "100", "200"]);
        assert_eq!(entries[0].1.rate, dec!(450.0));
    }

    #[test]
    fn ticker_info_decodes_numeric_fields_exactly() {
        let json = r#"{"high":105.3,"low":95.1,"avg":100.2,"vol":500000.0,
                       "vol_cur":5000,"last":100,"buy":101,"sell":99,
                       "updated":1700000000}"#;
        let info: TickerInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.last, dec!(100));
        assert_eq!(info.sell, dec!(99));
        assert_eq!(info.buy, dec!(101));
        assert_eq!(info.vol_cur, dec!(5000));
        assert_eq!(info.updated, 1_700_000_000);
    }

    #[test]
    fn depth_levels_decode_as_price_volume_tuples() {
        let json = r#"{"asks":[[104.67,0.5],[104.75,1.2]],"bids":[[104.2,2.0]]}"#;
        let depth: Depth = serde_json::from_str(json).unwrap();
        assert_eq!(depth.asks[0], (dec!(104.67), dec!(0.5)));
        assert_eq!(depth.bids.len(), 1);
    }

    #[test]
    fn account_info_keeps_funds_order() {
        let json = r#"{"funds":{"usd":325,"btc":2.498,"ltc":0},
                       "rights":{"info":1,"trade":1,"withdraw":0},
                       "open_orders":1,"transaction_count":80,"server_time":1342448420}"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        let currencies: Vec<&str> = info.funds.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(currencies, ["usd", "btc", "ltc"]);
        assert_eq!(info.funds[1].1, dec!(2.498));
        assert_eq!(info.rights.withdraw, 0);
    }
}
