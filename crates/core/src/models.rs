use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Uniform return wrapper for every adapter operation.
///
/// An empty `error` string signals success; success does not guarantee
/// `data` is non-empty. Quantities inside `data` serialize as decimal
/// strings, never binary floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Unix seconds. Upstream-reported where the exchange provides one
    /// (e.g. ticker `updated`), otherwise the moment the reply was built.
    pub timestamp: i64,
    pub error: String,
    pub data: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn success(timestamp: i64, data: Vec<T>) -> Self {
        Self {
            timestamp,
            error: String::new(),
            data,
        }
    }

    /// A failed envelope stamped with the current time and no data.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp_now(),
            error: error.into(),
            data: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }
}

/// Current unix time in seconds.
pub fn timestamp_now() -> i64 {
    Utc::now().timestamp()
}

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

/// Order / trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last/bid/ask/volume snapshot for one canonical pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub pair: String,
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub volume: Decimal,
}

/// The last-trade rate for one canonical pair (a reduced ticker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub pair: String,
    pub rate: Decimal,
}

/// One price level of an order book side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntry {
    pub price: Decimal,
    pub volume: Decimal,
}

/// Full order book snapshot, upstream ordering preserved (best price first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub pair: String,
    pub asks: Vec<BookEntry>,
    pub bids: Vec<BookEntry>,
}

/// Maker/taker fee fractions for one canonical pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub pair: String,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

/// A single executed trade from the account's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
    /// ISO-8601.
    pub timestamp: DateTime<Utc>,
}

/// Trade history for one canonical pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeHistory {
    pub pair: String,
    pub trades: Vec<Trade>,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A held amount of one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: Decimal,
}

/// Account balance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub account_id: String,
    /// Not reported by every exchange; empty when unavailable.
    pub total: Vec<CurrencyAmount>,
    pub available: Vec<CurrencyAmount>,
}

/// A ledger entry (deposit, withdrawal, credit). Reserved: no adapter
/// currently populates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub currency: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// An order resting on the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: String,
    pub pair: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub amount: Decimal,
    pub rate: Decimal,
    /// Margin trading is unsupported; always false.
    pub margin: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Parameters for placing an order. Absent fields are forwarded as absent;
/// their semantics (e.g. market order) belong to the upstream exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub pair: Option<String>,
    pub rate: Option<Decimal>,
    pub amount: Option<Decimal>,
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: String,
    /// BTC-e never reports a creation timestamp; always empty.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn success_envelope_keeps_given_timestamp() {
        let env = Envelope::success(1_700_000_000, vec![1u8, 2]);
        assert!(env.is_ok());
        assert_eq!(env.timestamp, 1_700_000_000);
        assert_eq!(env.data, vec![1, 2]);
    }

    #[test]
    fn failure_envelope_has_message_and_no_data() {
        let env: Envelope<Ticker> = Envelope::failure("invalid pair");
        assert!(!env.is_ok());
        assert_eq!(env.error, "invalid pair");
        assert!(env.data.is_empty());
        assert!(env.timestamp > 0);
    }

    #[test]
    fn quantities_serialize_as_decimal_strings() {
        let ticker = Ticker {
            pair: "XBT_USD".to_string(),
            last: dec!(100),
            bid: dec!(99),
            ask: dec!(101),
            volume: dec!(5000),
        };
        let value = serde_json::to_value(&ticker).unwrap();
        assert_eq!(value["last"], "100");
        assert_eq!(value["bid"], "99");
        assert_eq!(value["ask"], "101");
        assert_eq!(value["volume"], "5000");
    }

    #[test]
    fn side_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(Side::Buy).unwrap(), "buy");
        assert_eq!(
            serde_json::from_value::<Side>(serde_json::json!("sell")).unwrap(),
            Side::Sell
        );
        assert_eq!(Side::Sell.to_string(), "sell");
    }
}
