use serde::Deserialize;
use std::env;

const DEFAULT_HEALTHCHECK_URL: &str = "http://localhost:8080/healthcheck";

#[derive(Debug)]
enum CustomError {
    ReqwestError(String),
    NotOk(String),
}

#[derive(Debug, Deserialize)]
struct StatusJSON {
    status: String,
}

impl std::fmt::Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomError::ReqwestError(e) => write!(f, "Reqwest error: {}", e),
            CustomError::NotOk(detail) => write!(f, "Price chart service unhealthy: {}", detail),
        }
    }
}

impl From<reqwest::Error> for CustomError {
    fn from(err: reqwest::Error) -> CustomError {
        CustomError::ReqwestError(err.to_string())
    }
}

fn healthcheck_url() -> String {
    env::var("PRICE_CHART_HEALTHCHECK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HEALTHCHECK_URL.to_string())
}

fn check_status(status: &StatusJSON) -> Result<(), CustomError> {
    if status.status != "ok" {
        return Err(CustomError::NotOk(format!("status {:?}", status.status)));
    }
    Ok(())
}

fn main() -> Result<(), CustomError> {
    let res = reqwest::blocking::get(healthcheck_url())?;
    if res.status() != 200 {
        return Err(CustomError::NotOk(format!("http {}", res.status())));
    }
    check_status(&res.json::<StatusJSON>()?)
}
