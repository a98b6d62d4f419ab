use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability descriptor
// ---------------------------------------------------------------------------

/// Declarative capability metadata published by an adapter.
///
/// The host system discovers what an exchange supports by reading this
/// descriptor, matching on the host-facing method name strings (`getTicker`,
/// `postSellOrder`, ...). It is plain configuration data: adapters return an
/// immutable value and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeProperties {
    /// Proper name of the exchange (e.g. "BTC-e").
    pub name: String,
    /// Short identifier, unique across adapters.
    pub slug: String,
    pub methods: MethodSupport,
    /// All currency combinations that form a tradable market.
    pub instruments: Vec<Instrument>,
    pub public_api: ApiAccess,
    pub private_api: ApiAccess,
    /// Whether the exchange accepts market orders.
    pub market_order: bool,
    /// Whether orders larger than the balance are capped to the full
    /// balance instead of rejected.
    pub infinity_order: bool,
    /// URL describing why monitoring is unavailable; empty when it works.
    pub monitor_error: String,
    /// URL describing why trading is unavailable; empty when it works.
    pub trade_error: String,
}

/// Host-facing operation names, split by support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSupport {
    pub implemented: Vec<String>,
    pub not_supported: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub pair: String,
}

/// Whether one half of the API (public or private) is available and which
/// credential fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAccess {
    pub supported: bool,
    pub requires: Vec<String>,
}
