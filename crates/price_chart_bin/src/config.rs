use dotenvy::dotenv;
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_CAPACITY: usize = 64;

#[derive(Debug)]
pub struct MissingVar(&'static str);

impl fmt::Display for MissingVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "environment variable {} is not set", self.0)
    }
}

impl Error for MissingVar {}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub workers: usize,
    pub bind: String,
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Config {
    pub fn new() -> Result<Config, Box<dyn Error>> {
        dotenv().ok();
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("PRICE_CHART_API_KEY").ok_or(MissingVar("PRICE_CHART_API_KEY"))?;

        let mut workers: usize = match var("PRICE_CHART_WORKERS") {
            Some(w) => w.trim().parse()?,
            None => 1,
        };
        if workers == 0 {
            workers = 1;
        }

        let bind = var("PRICE_CHART_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let redis_url = var("PRICE_CHART_REDIS");

        let cache_ttl = match var("PRICE_CHART_CACHE_TTL_SECS") {
            Some(secs) => Duration::from_secs(secs.trim().parse()?),
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };
        let cache_capacity = match var("PRICE_CHART_CACHE_CAPACITY") {
            Some(cap) => cap.trim().parse()?,
            None => DEFAULT_CACHE_CAPACITY,
        };

        Ok(Config {
            api_key,
            workers,
            bind,
            redis_url,
            cache_ttl,
            cache_capacity,
        })
    }
}
