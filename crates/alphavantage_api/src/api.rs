use crate::CustomError;
use crate::cache::QueryCache;
use crate::payload;
use history_model::PriceRow;
use log::debug;

const ALPHAVANTAGE_BASE_API_URL: &str = "https://www.alphavantage.co";
const DAILY_ADJUSTED_FUNCTION: &str = "TIME_SERIES_DAILY_ADJUSTED";

// reqwest errors carry the request url, which holds the api key
fn redact(err: reqwest::Error) -> CustomError {
    CustomError::from(err.without_url())
}

pub struct AlphaVantageAPI<C> {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    cache: C,
}

impl<C: QueryCache> AlphaVantageAPI<C> {
    pub fn new(api_key: String, cache: C) -> Self {
        AlphaVantageAPI {
            base_url: ALPHAVANTAGE_BASE_API_URL.to_string(),
            api_key,
            client: reqwest::Client::new(),
            cache,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn query(&self, symbol: &str, api_key: Option<&str>) -> Result<reqwest::Url, CustomError> {
        let mut params = vec![
            ("function", DAILY_ADJUSTED_FUNCTION),
            ("symbol", symbol),
            ("outputsize", "full"),
        ];
        if let Some(key) = api_key {
            params.push(("apikey", key));
        }
        params.push(("datatype", "csv"));

        reqwest::Url::parse_with_params(&format!("{}/query", self.base_url), &params)
            .map_err(|e| CustomError::Request(e.to_string()))
    }

    /// The query for `symbol` without the api key. Used as cache key and in logs.
    pub fn cache_key(&self, symbol: &str) -> Result<String, CustomError> {
        Ok(self.query(symbol, None)?.to_string())
    }

    /// Raw CSV for `symbol`, from the cache when present.
    ///
    /// Only payloads that hold a price series are cached; an invalid ticker is
    /// asked again next time.
    pub async fn get_payload(&self, symbol: &str) -> Result<String, CustomError> {
        let key = self.cache_key(symbol)?;

        if let Some(cached) = self.cache.get(&key).await? {
            debug!("get_payload | cache hit | key: {}", key);
            return Ok(cached);
        }

        debug!("get_payload | cache miss | url: {}", key);

        let url = self.query(symbol, Some(&self.api_key))?;
        let payload = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(redact)?
            .text()
            .await
            .map_err(redact)?;

        payload::classify(&payload)?;

        debug!("get_payload | saving to cache");
        self.cache.put(&key, &payload).await?;

        Ok(payload)
    }

    pub async fn get_ticker(&self, symbol: &str) -> Result<Vec<PriceRow>, CustomError> {
        let payload = self.get_payload(symbol).await?;
        payload::parse_history(&payload)
    }
}
