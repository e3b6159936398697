use gloo_net::http::Request;

use super::dto::parse_snapshot;
use crate::domain::{
    chart::{Snapshot, SnapshotSource},
    errors::ChartError,
    logging::{LogComponent, get_logger},
    market_data::ChartKey,
};

/// Snapshot source backed by the dashboard's graph update endpoint
#[derive(Clone, Debug)]
pub struct BackendHttpClient {
    base_url: String,
    mode: String,
}

impl Default for BackendHttpClient {
    fn default() -> Self {
        Self::new("", "live")
    }
}

impl BackendHttpClient {
    /// `base_url` may be empty to target the page's own origin.
    pub fn new(base_url: &str, mode: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), mode: mode.to_string() }
    }

    pub fn snapshot_url(&self, key: &ChartKey) -> String {
        format!(
            "{}/dashboard/currency_price_graph_update/{}/{}/{}/{}",
            self.base_url,
            url_encode(key.exchange.value()),
            url_encode(&key.symbol.url_segment()),
            key.time_frame,
            url_encode(&self.mode)
        )
    }
}

impl SnapshotSource for BackendHttpClient {
    async fn fetch_snapshot(&self, key: &ChartKey) -> Result<Snapshot, ChartError> {
        let url = self.snapshot_url(key);
        get_logger().debug(LogComponent::Infrastructure("BackendHttp"), &format!("GET {url}"));

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ChartError::Transport(format!("request to {url} failed: {e:?}")))?;

        if !response.ok() {
            return Err(ChartError::Transport(format!(
                "HTTP error: {} - {}",
                response.status(),
                response.status_text()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChartError::Transport(format!("failed to read response: {e:?}")))?;

        let snapshot = parse_snapshot(&body)?;
        if let Snapshot::Data(data) = &snapshot {
            get_logger().debug(
                LogComponent::Infrastructure("BackendHttp"),
                &format!(
                    "{}: {} candles, {} trades, {} orders",
                    key,
                    data.candles.len(),
                    data.trades.len(),
                    data.orders.len()
                ),
            );
        }
        Ok(snapshot)
    }
}

/// Percent-encodes the characters that would break a path segment.
pub fn url_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            ' ' => encoded.push_str("%20"),
            '#' => encoded.push_str("%23"),
            '%' => encoded.push_str("%25"),
            '&' => encoded.push_str("%26"),
            '/' => encoded.push_str("%2F"),
            '=' => encoded.push_str("%3D"),
            '?' => encoded.push_str("%3F"),
            '|' => encoded.push_str("%7C"),
            _ => encoded.push(ch),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_url_encodes_symbol_and_trims_base() {
        let client = BackendHttpClient::new("http://localhost:5001/", "live");
        let key = ChartKey::parse("binance-1", "BTC/USDT", "1h").unwrap();
        assert_eq!(
            client.snapshot_url(&key),
            "http://localhost:5001/dashboard/currency_price_graph_update/binance-1/BTC%7CUSDT/1h/live"
        );
    }

    #[test]
    fn same_origin_url_is_relative() {
        let client = BackendHttpClient::default();
        let key = ChartKey::parse("kraken", "ETH/EUR", "1d").unwrap();
        assert!(client.snapshot_url(&key).starts_with("/dashboard/"));
    }

    #[test]
    fn url_encoding() {
        assert_eq!(url_encode("hello world"), "hello%20world");
        assert_eq!(url_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(url_encode("BTC|USDT"), "BTC%7CUSDT");
    }
}
