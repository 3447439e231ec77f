use alphavantage_api::CustomError;
use alphavantage_api::api::AlphaVantageAPI;
use alphavantage_api::cache::{CacheBackend, CachePolicy, MemoryCache, RedisCache};
use chrono::Datelike;
use history_model::{Month, Year, select_month};
use log::{error, info, warn};
use price_chart::{ChartSpec, render_chart, svg};
use serde::Serialize;
use std::process::exit;

use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};

use config::Config;
use pages::ChartForm;

mod config;
mod pages;
mod utils;

type PriceAPI = AlphaVantageAPI<CacheBackend>;

#[derive(Serialize)]
struct HealthcheckResponse {
    status: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

enum ChartError {
    Selection(String),
    Fetch(CustomError),
}

impl ChartError {
    fn into_response(self) -> HttpResponse {
        let (mut builder, error) = match self {
            ChartError::Selection(e) => (HttpResponse::BadRequest(), e),
            ChartError::Fetch(CustomError::InvalidTicker) => {
                (HttpResponse::NotFound(), "not a valid ticker".to_string())
            }
            ChartError::Fetch(e) => (HttpResponse::BadGateway(), e.to_string()),
        };
        builder.json(ErrorResponse { error })
    }
}

fn parse_selection(year: &str, month: &str) -> Result<(Year, Month), ChartError> {
    let year = year
        .parse()
        .map_err(|e: history_model::ParseError| ChartError::Selection(e.to_string()))?;
    let month = month
        .parse()
        .map_err(|e: history_model::ParseError| ChartError::Selection(e.to_string()))?;
    Ok((year, month))
}

async fn month_chart(
    api: &PriceAPI,
    ticker: &str,
    year: &str,
    month: &str,
) -> Result<ChartSpec, ChartError> {
    let ticker = utils::sanitize_ticker(ticker);
    if ticker.is_empty() {
        return Err(ChartError::Selection("empty ticker".to_string()));
    }
    let (year, month) = parse_selection(year, month)?;

    let history = api.get_ticker(&ticker).await.map_err(|e| {
        warn!("month_chart | ticker: {} | {}", ticker, e);
        ChartError::Fetch(e)
    })?;
    let rows = select_month(&history, month, year);
    info!(
        "month_chart | ticker: {} | {} {} | rows: {}",
        ticker,
        month,
        year,
        rows.len()
    );

    Ok(render_chart(&rows, month, year, &ticker))
}

#[get("/")]
async fn index(form: web::Query<ChartForm>, api: web::Data<PriceAPI>) -> impl Responder {
    let form = form.into_inner();
    let body = if form.is_complete() {
        match month_chart(&api, &form.ticker, &form.year, &form.month).await {
            Ok(chart) => svg::render(&chart),
            Err(ChartError::Fetch(CustomError::InvalidTicker)) => pages::message("not a valid ticker"),
            Err(ChartError::Selection(e)) => pages::message(&e),
            Err(ChartError::Fetch(e)) => pages::message(&format!("could not load prices: {}", e)),
        }
    } else {
        String::new()
    };

    let last_year = chrono::Local::now().year().clamp(0, 9999) as u16;
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(pages::render_page(&form, last_year, &body))
}

#[get("/api/chart/{ticker}/{year}/{month}")]
async fn get_chart(
    path: web::Path<(String, String, String)>,
    api: web::Data<PriceAPI>,
) -> impl Responder {
    let (ticker, year, month) = path.into_inner();
    match month_chart(&api, &ticker, &year, &month).await {
        Ok(chart) => HttpResponse::Ok().json(chart),
        Err(e) => e.into_response(),
    }
}

#[get("/api/chart/{ticker}/{year}/{month}/svg")]
async fn get_chart_svg(
    path: web::Path<(String, String, String)>,
    api: web::Data<PriceAPI>,
) -> impl Responder {
    let (ticker, year, month) = path.into_inner();
    match month_chart(&api, &ticker, &year, &month).await {
        Ok(chart) => HttpResponse::Ok()
            .content_type("image/svg+xml")
            .body(svg::render(&chart)),
        Err(e) => e.into_response(),
    }
}

#[get("/healthcheck")]
async fn healthcheck() -> impl Responder {
    web::Json(HealthcheckResponse {
        status: "ok".to_string(),
    })
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(HealthcheckResponse {
        status: "not found".to_string(),
    })
}

fn build_cache(config: &Config) -> Result<CacheBackend, redis::RedisError> {
    match &config.redis_url {
        Some(url) => {
            let mut redis_client = redis::Client::open(url.as_str())?;
            if !redis::ConnectionLike::check_connection(&mut redis_client) {
                return Err(redis::RedisError::from((
                    redis::ErrorKind::IoError,
                    "Redis unavailable",
                )));
            }
            info!("Redis connected");
            Ok(CacheBackend::Redis(RedisCache::new(
                redis_client,
                config.cache_ttl,
            )))
        }
        None => {
            info!(
                "Using in-memory cache | ttl: {:?} | capacity: {}",
                config.cache_ttl, config.cache_capacity
            );
            Ok(CacheBackend::Memory(MemoryCache::new(CachePolicy {
                ttl: config.cache_ttl,
                capacity: config.cache_capacity,
            })))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Could not create config: {}", e);
            exit(1);
        }
    };

    let cache = match build_cache(&config) {
        Ok(cache) => cache,
        Err(e) => {
            error!("Could not create cache: {}", e);
            exit(1);
        }
    };

    let api = web::Data::new(AlphaVantageAPI::new(config.api_key.clone(), cache));

    info!("Listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(api.clone())
            .service(healthcheck)
            .service(index)
            .service(get_chart_svg)
            .service(get_chart)
            .default_service(web::to(not_found))
            .wrap(Logger::default())
    })
    .bind(config.bind.as_str())?
    .workers(config.workers)
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    const IBM_CSV: &str = "timestamp,open,high,low,close,adjusted_close,volume,dividend_amount,split_coefficient
2020-04-01,128.0,129.31,124.0,124.88,110.6,4,0.0000,1.0
2020-03-31,127.74,131.13,126.28,127.9,113.27,5500000,0.0000,1.0
2020-03-02,123.0,128.39,121.05,125.3,110.97,7800000,0.0000,1.0
2020-02-28,121.0,125.0,120.0,122.0,108.0,7000000,0.0000,1.0
";

    const ERROR_CSV: &str = "{
    \"Error Message\": \"Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for TIME_SERIES_DAILY_ADJUSTED.\"
}";

    async fn api_with_ibm() -> web::Data<PriceAPI> {
        let api = AlphaVantageAPI::new(
            "secret".to_string(),
            CacheBackend::Memory(MemoryCache::new(CachePolicy::default())),
        )
        .with_base_url("http://127.0.0.1:9");
        let key = api.cache_key("IBM").unwrap();
        alphavantage_api::cache::QueryCache::put(api.cache(), &key, IBM_CSV)
            .await
            .unwrap();
        let key = api.cache_key("NOPE").unwrap();
        alphavantage_api::cache::QueryCache::put(api.cache(), &key, ERROR_CSV)
            .await
            .unwrap();
        web::Data::new(api)
    }

    macro_rules! app {
        ($api:expr) => {
            test::init_service(
                App::new()
                    .app_data($api)
                    .service(healthcheck)
                    .service(index)
                    .service(get_chart_svg)
                    .service(get_chart)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn get_chart_pass_cached_month() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/ibm/2020/Mar")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "IBM");
        assert_eq!(body["x_axis_label"], "2020");
        assert_eq!(body["y_axis_label"], "stock price ($)");
        let close = body["series"][0]["points"].as_array().unwrap();
        assert_eq!(close.len(), 2);
        assert_eq!(close[0]["date"], "2020-03-31");
        assert_eq!(close[1]["date"], "2020-03-02");
    }

    #[actix_web::test]
    async fn get_chart_pass_empty_window() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/IBM/2099/Jan")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "IBM");
        assert_eq!(body["series"][0]["points"].as_array().unwrap().len(), 0);
        assert_eq!(body["series"][1]["points"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn get_chart_fail_unknown_month() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/IBM/2020/mar")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_chart_fail_upstream_unreachable() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/MSFT/2020/Mar")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn get_chart_svg_pass() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/IBM/2020/Mar/svg")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let svg = std::str::from_utf8(&body).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">Mar 31</text>"));
    }

    #[actix_web::test]
    async fn index_pass_form_only_when_unselected() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/?ticker=IBM&year=2020&month=")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("<form"));
        assert!(!page.contains("<svg"));
    }

    #[actix_web::test]
    async fn index_pass_renders_chart() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/?ticker=ibm&year=2020&month=Mar")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("<svg"));
        assert!(page.contains(">IBM</text>"));
    }

    #[actix_web::test]
    async fn index_pass_reports_fetch_error() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/?ticker=MSFT&year=2020&month=Mar")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("could not load prices"));
        assert!(!page.contains("secret"));
    }

    #[actix_web::test]
    async fn index_pass_reports_invalid_ticker() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/?ticker=nope&year=2020&month=Mar")
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let page = std::str::from_utf8(&body).unwrap();
        assert!(page.contains("<p>not a valid ticker</p>"));
        assert!(!page.contains("<svg"));
    }

    #[actix_web::test]
    async fn get_chart_fail_invalid_ticker() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get()
            .uri("/api/chart/NOPE/2020/Mar")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not a valid ticker");
    }

    #[actix_web::test]
    async fn healthcheck_pass() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get().uri("/healthcheck").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn not_found_pass() {
        let app = app!(api_with_ibm().await);
        let req = test::TestRequest::get().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn chart_error_into_response_pass_invalid_ticker_is_404() {
        let resp = ChartError::Fetch(CustomError::InvalidTicker).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
