use std::collections::HashMap;

use reqwest::Client;

/// Client for a CoinGecko-style `simple/price` endpoint. The poll cadence is
/// owned by the alert monitor, not by this client.
#[derive(Clone)]
pub struct PriceClient {
    http: Client,
    base: String,
}

impl PriceClient {
    pub fn new(base: String) -> Self {
        Self {
            http: Client::new(),
            base,
        }
    }

    /// Fetches current USD prices for the given coin ids in one request.
    /// Coins the feed does not know stay absent from the result map.
    pub async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, String> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = format!("{}/simple/price", self.base);
        let res = self
            .http
            .get(&url)
            .query(&[("ids", ids.join(",").as_str()), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("price request failed: {status} {body}"));
        }

        let raw: HashMap<String, HashMap<String, f64>> =
            res.json().await.map_err(|e| e.to_string())?;

        Ok(raw
            .into_iter()
            .filter_map(|(id, currencies)| currencies.get("usd").map(|p| (id, *p)))
            .collect())
    }
}
