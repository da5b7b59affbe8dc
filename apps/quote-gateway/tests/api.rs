//! End-to-end API tests.
//!
//! Each test binds the real router on an ephemeral port and drives it with
//! a plain HTTP client, with wiremock standing in for Alpha Vantage.

use std::sync::Arc;
use std::time::Duration;

use quote_gateway::{
    AlphaVantageClient, AppState, DataMode, MarketDataCache, PredictionMethod, StockDataService,
    TtlCache, router,
};
use quote_gateway::{CacheSettings, StreamSettings, UpstreamSettings};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Everything a test needs to talk to a running gateway.
struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

impl TestApp {
    async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path_and_query}", self.base_url))
            .send()
            .await
            .expect("request should reach the test server")
    }

    async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("request should reach the test server")
    }
}

/// Gateway options the tests vary.
struct AppOptions {
    api_key: Option<&'static str>,
    mode: DataMode,
    prediction: PredictionMethod,
    stream: StreamSettings,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            api_key: Some("test-key"),
            mode: DataMode::Quote,
            prediction: PredictionMethod::Threshold,
            stream: StreamSettings {
                tick_interval: Duration::from_millis(20),
                max_duration: Some(Duration::from_millis(100)),
            },
        }
    }
}

/// Spawn the gateway against the given upstream and return a client for it.
async fn spawn_app(upstream: &MockServer, options: AppOptions) -> TestApp {
    let settings = UpstreamSettings {
        api_key: options.api_key.map(str::to_string),
        base_url: upstream.uri(),
        ..Default::default()
    };

    let fetcher = Arc::new(AlphaVantageClient::new(&settings).expect("client should build"));
    let cache: Arc<dyn MarketDataCache> = Arc::new(TtlCache::new(&CacheSettings {
        ttl: Duration::from_secs(300),
        capacity: 16,
    }));
    let service = Arc::new(StockDataService::new(fetcher, cache, options.mode));

    let state = AppState {
        service,
        prediction: options.prediction,
        stream: options.stream,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("test server should run");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        client: reqwest::Client::new(),
    }
}

fn quote_body() -> Value {
    json!({
        "Global Quote": {
            "01. symbol": "AAPL",
            "05. price": "194.35",
            "07. latest trading day": "2024-06-03",
            "09. change": "1.5000",
            "10. change percent": "0.7800%"
        }
    })
}

// =============================================================================
// Liveness
// =============================================================================

#[tokio::test]
async fn healthz_returns_ok() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream, AppOptions::default()).await;

    let response = app.get("/healthz").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

// =============================================================================
// Predict
// =============================================================================

#[tokio::test]
async fn predict_returns_two_decimal_string() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream, AppOptions::default()).await;

    let response = app
        .post_json("/api/predict", json!({ "prompt": "100,102" }))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    // Threshold formula: 102 > mean(101), so 102 * 1.01.
    assert_eq!(body["prediction"], "103.02");
}

#[tokio::test]
async fn predict_with_trend_method_uses_moving_average() {
    let upstream = MockServer::start().await;
    let app = spawn_app(
        &upstream,
        AppOptions {
            prediction: PredictionMethod::Trend,
            ..Default::default()
        },
    )
    .await;

    let response = app
        .post_json("/api/predict", json!({ "prompt": "1,2,3,4,5,6,7,8,9,10" }))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    // avg 5.5 + trend (10 - 1) / 10 = 6.4
    assert_eq!(body["prediction"], "6.40");
}

#[tokio::test]
async fn predict_rejects_short_and_malformed_input() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream, AppOptions::default()).await;

    for prompt in ["100", "", "100,abc", "100,NaN", "1,,2"] {
        let response = app
            .post_json("/api/predict", json!({ "prompt": prompt }))
            .await;
        assert_eq!(response.status(), 400, "prompt {prompt:?} should be rejected");

        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn predict_rejects_a_malformed_body_with_the_json_contract() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream, AppOptions::default()).await;

    // A body without `prompt` fails extraction, not validation; it still
    // answers 400 with the `{ error }` shape rather than plain text.
    for body in [json!({ "wrong": 1 }), json!({ "prompt": 42 }), json!(null)] {
        let response = app.post_json("/api/predict", body.clone()).await;
        assert_eq!(response.status(), 400, "body {body} should be rejected");
        assert!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("application/json"))
        );

        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Stock Data
// =============================================================================

#[tokio::test]
async fn stock_data_requires_a_symbol() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream, AppOptions::default()).await;

    for uri in ["/api/stock-data", "/api/stock-data?symbol="] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), 400);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Stock symbol is required");
    }
}

#[tokio::test]
async fn stock_data_without_api_key_is_a_500() {
    let upstream = MockServer::start().await;
    let app = spawn_app(
        &upstream,
        AppOptions {
            api_key: None,
            ..Default::default()
        },
    )
    .await;

    let response = app.get("/api/stock-data?symbol=AAPL").await;
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "API key is not configured");
}

#[tokio::test]
async fn stock_data_serves_quote_and_caches_it() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "GLOBAL_QUOTE"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body()))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream, AppOptions::default()).await;

    let first = app.get("/api/stock-data?symbol=AAPL").await;
    assert_eq!(first.status(), 200);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["price"], 194.35);
    assert_eq!(body["changePercent"], "0.7800%");

    // Second call inside the TTL is served from cache; the upstream mock
    // asserts it was hit exactly once.
    let second = app.get("/api/stock-data?symbol=AAPL").await;
    assert_eq!(second.status(), 200);
    let cached: Value = second.json().await.unwrap();
    assert_eq!(cached, body);
}

#[tokio::test]
async fn rate_limited_upstream_maps_to_429_and_is_not_cached() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Information": "API rate limit is 25 requests per day"
        })))
        .expect(2)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream, AppOptions::default()).await;

    // Both calls reach upstream: a failure must never populate the cache.
    for _ in 0..2 {
        let response = app.get("/api/stock-data?symbol=AAPL").await;
        assert_eq!(response.status(), 429);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "API rate limit reached. Please try again later.");
    }
}

#[tokio::test]
async fn empty_upstream_data_maps_to_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Global Quote": {} })))
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream, AppOptions::default()).await;

    let response = app.get("/api/stock-data?symbol=ZZZZ").await;
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No data available for the given symbol");
}

#[tokio::test]
async fn upstream_error_message_maps_to_500_with_details() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Error Message": "Invalid API call."
        })))
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream, AppOptions::default()).await;

    let response = app.get("/api/stock-data?symbol=AAPL").await;
    assert_eq!(response.status(), 500);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch stock data");
    assert_eq!(body["details"], "Invalid API call.");
}

#[tokio::test]
async fn series_mode_serves_an_ordered_point_array() {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let mut series = serde_json::Map::new();
    for offset in (0..35u64).rev() {
        let date = start + chrono::Days::new(offset);
        series.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({ "4. close": format!("{}.50", 100 + offset) }),
        );
    }

    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Time Series (Daily)": series })),
        )
        .mount(&upstream)
        .await;

    let app = spawn_app(
        &upstream,
        AppOptions {
            mode: DataMode::Series,
            ..Default::default()
        },
    )
    .await;

    let response = app.get("/api/stock-data?symbol=AAPL").await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let points = body.as_array().expect("series responds with an array");
    assert_eq!(points.len(), 30);
    assert_eq!(points[0]["date"], "2024-05-06");
    assert_eq!(points[0]["price"], 105.5);
    assert_eq!(points[29]["date"], "2024-06-04");
}

// =============================================================================
// Stock Stream
// =============================================================================

#[tokio::test]
async fn stream_emits_json_ticks_until_the_cap() {
    let upstream = MockServer::start().await;
    // 20ms ticks capped at 100ms: roughly five frames, then server-side close.
    let app = spawn_app(&upstream, AppOptions::default()).await;

    let response = app.get("/api/stock-stream").await;
    assert_eq!(response.status(), 200);
    assert!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"))
    );
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache, no-transform")
    );

    // The body completes once the server closes the capped stream.
    let body = response.text().await.unwrap();
    let ticks: Vec<Value> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).expect("tick frames are JSON"))
        .collect();

    // 5 +/- 1 frames across the 100ms window, allowing scheduler jitter.
    assert!(
        (3..=6).contains(&ticks.len()),
        "expected about 5 ticks, got {}",
        ticks.len()
    );
    for tick in &ticks {
        let price = tick["price"].as_f64().expect("price is a number");
        assert!((100.0..110.0).contains(&price));
        assert!(tick["timestamp"].as_i64().expect("timestamp is epoch ms") > 0);
    }
}
