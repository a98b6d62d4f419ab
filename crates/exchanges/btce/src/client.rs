//! HTTP implementation of [`BtceApi`].
//!
//! Two upstream surfaces: unauthenticated v2 endpoints
//! (`GET {base}/api/2/{pair}/{method}`) and the Trade API
//! (`POST {base}/tapi`, form-urlencoded, HMAC-SHA512-signed body with
//! `Key`/`Sign` headers). BTC-e answers errors in two shapes — transport/
//! status failures and 200 responses whose payload carries an `error` field —
//! both are collapsed into [`ExchangeError`] here, immediately after the
//! call, so nothing downstream ever branches on error shape again.

use async_trait::async_trait;
use chrono::Utc;
use coinbridge_core::{ExchangeError, Side};
use hmac::{Hmac, Mac};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::api::*;

pub const DEFAULT_BASE_URL: &str = "https://btc-e.com";

/// Connection settings for [`BtceClient`].
///
/// `key`/`secret` are optional: without them the client still issues Trade
/// API calls, unsigned, and the exchange rejects them at call time. That is
/// the adapter's fail-lazily construction contract — credentials are never
/// validated up front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BtceConfig {
    pub key: Option<String>,
    pub secret: Option<String>,
    /// Override for testing; `None` means the production endpoint.
    pub base_url: Option<String>,
}

impl BtceConfig {
    pub fn with_credentials(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            secret: Some(secret.into()),
            base_url: None,
        }
    }
}

/// `reqwest`-backed BTC-e client.
pub struct BtceClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
    /// Trade API nonces must strictly increase per key; seeded from the
    /// clock and bumped per request.
    nonce: AtomicU64,
}

impl BtceClient {
    pub fn new(config: BtceConfig) -> Self {
        let credentials = match (config.key, config.secret) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        };
        Self {
            http: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            credentials,
            nonce: AtomicU64::new(Utc::now().timestamp() as u64),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    async fn public_get<T: DeserializeOwned>(
        &self,
        pair: &str,
        method: &str,
    ) -> Result<T, ExchangeError> {
        let url = format!("{}/api/2/{}/{}", self.base_url, pair, method);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        decode_public(status, &text)
    }

    async fn private_post<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<(&str, String)>,
    ) -> Result<T, ExchangeError> {
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let mut form: Vec<(&str, String)> =
            vec![("method", method.to_string()), ("nonce", nonce.to_string())];
        form.extend(params);
        let body = serde_urlencoded::to_string(&form)
            .map_err(|e| ExchangeError::Decode(e.to_string()))?;

        let mut request = self
            .http
            .post(format!("{}/tapi", self.base_url))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.clone());
        if let Some((key, secret)) = &self.credentials {
            request = request.header("Key", key).header("Sign", sign(secret, &body));
        }

        debug!("POST {}/tapi method={}", self.base_url, method);
        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        decode_tapi(status, &text)
    }
}

/// Hex HMAC-SHA512 of the form body, keyed by the API secret.
fn sign(secret: &str, body: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Normalize a v2 endpoint response. Error payloads come back with 200 and
/// an `error` field (`{"success":0,"error":"Invalid pair name: ..."}`).
fn decode_public<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
) -> Result<T, ExchangeError> {
    if !status.is_success() {
        return Err(ExchangeError::Api(format!("HTTP {}: {}", status, text)));
    }

    #[derive(Deserialize)]
    struct MaybeError {
        error: Option<String>,
    }
    if let Ok(MaybeError { error: Some(message) }) = serde_json::from_str::<MaybeError>(text) {
        return Err(ExchangeError::Api(message));
    }

    serde_json::from_str(text).map_err(|e| ExchangeError::Decode(e.to_string()))
}

/// Normalize a Trade API response: `{"success":1,"return":{...}}` or
/// `{"success":0,"error":"..."}`, both with status 200.
fn decode_tapi<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, ExchangeError> {
    if !status.is_success() {
        return Err(ExchangeError::Api(format!("HTTP {}: {}", status, text)));
    }

    #[derive(Deserialize)]
    struct TapiResponse<T> {
        success: i64,
        #[serde(rename = "return")]
        payload: Option<T>,
        error: Option<String>,
    }

    let response: TapiResponse<T> =
        serde_json::from_str(text).map_err(|e| ExchangeError::Decode(e.to_string()))?;
    if response.success == 1 {
        response
            .payload
            .ok_or_else(|| ExchangeError::Decode("success without return payload".to_string()))
    } else {
        Err(ExchangeError::Api(response.error.unwrap_or_else(|| {
            "unspecified exchange error".to_string()
        })))
    }
}

/// v2 ticker wraps the payload in a `ticker` object.
#[derive(Deserialize)]
struct TickerResponse {
    ticker: TickerInfo,
}

#[async_trait]
impl BtceApi for BtceClient {
    async fn ticker(&self, pair: &str) -> Result<TickerInfo, ExchangeError> {
        let response: TickerResponse = self.public_get(pair, "ticker").await?;
        Ok(response.ticker)
    }

    async fn depth(&self, pair: &str) -> Result<Depth, ExchangeError> {
        self.public_get(pair, "depth").await
    }

    async fn fee(&self, pair: &str) -> Result<FeeInfo, ExchangeError> {
        self.public_get(pair, "fee").await
    }

    async fn trade_history(
        &self,
        query: &TradeHistoryQuery,
    ) -> Result<Vec<(String, HistoryTrade)>, ExchangeError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(from) = query.from {
            params.push(("from", from.to_string()));
        }
        if let Some(count) = query.count {
            params.push(("count", count.to_string()));
        }
        if let Some(from_id) = query.from_id {
            params.push(("from_id", from_id.to_string()));
        }
        if let Some(end_id) = query.end_id {
            params.push(("end_id", end_id.to_string()));
        }
        if let Some(order) = &query.order {
            params.push(("order", order.clone()));
        }
        if let Some(since) = query.since {
            params.push(("since", since.to_string()));
        }
        if let Some(end) = query.end {
            params.push(("end", end.to_string()));
        }
        if let Some(pair) = &query.pair {
            params.push(("pair", pair.clone()));
        }
        let Keyed(trades) = self.private_post("TradeHistory", params).await?;
        Ok(trades)
    }

    async fn get_info(&self) -> Result<AccountInfo, ExchangeError> {
        self.private_post("getInfo", Vec::new()).await
    }

    async fn active_orders(
        &self,
        pair: &str,
    ) -> Result<Vec<(String, ActiveOrder)>, ExchangeError> {
        let params = vec![("pair", pair.to_string())];
        let Keyed(orders) = self.private_post("ActiveOrders", params).await?;
        Ok(orders)
    }

    async fn place_trade(
        &self,
        pair: Option<&str>,
        side: Side,
        rate: Option<Decimal>,
        amount: Option<Decimal>,
    ) -> Result<TradeReceipt, ExchangeError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(pair) = pair {
            params.push(("pair", pair.to_string()));
        }
        params.push(("type", side.to_string()));
        if let Some(rate) = rate {
            params.push(("rate", rate.to_string()));
        }
        if let Some(amount) = amount {
            params.push(("amount", amount.to_string()));
        }
        self.private_post("Trade", params).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<CancelReceipt, ExchangeError> {
        let params = vec![("order_id", order_id.to_string())];
        self.private_post("CancelOrder", params).await
    }
}
