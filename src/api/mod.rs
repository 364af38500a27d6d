mod error;
mod payload;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

use crate::core::{
    DividendResult, FireTargetResult, FixedIncomeResult, GrowthResult, NormalVariation,
    calculate_fire, simulate_dividends, simulate_fixed_income, simulate_growth,
};

pub use error::ApiError;
pub use payload::{
    ApiFireVariant, ApiIndexType, DEFAULT_VOLATILITY, DividendPayload, FirePayload,
    FixedIncomePayload, GrowthPayload, VariationModel, coerce_number,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendResponse {
    pub ticker: Option<String>,
    pub seed: u64,
    pub expected_appreciation: f64,
    pub volatility: f64,
    #[serde(flatten)]
    pub result: DividendResult,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn run_growth(payload: GrowthPayload) -> GrowthResult {
    simulate_growth(&payload.into_params())
}

pub fn run_fixed_income(payload: FixedIncomePayload) -> FixedIncomeResult {
    simulate_fixed_income(&payload.into_params())
}

pub fn run_fire(payload: FirePayload) -> FireTargetResult {
    calculate_fire(&payload.into_params())
}

pub fn run_dividends(payload: DividendPayload) -> DividendResponse {
    let ticker = payload.ticker.clone();
    let (params, model) = payload.into_params();
    let seed = model.seed.unwrap_or_else(rand::random);
    let mut variation =
        NormalVariation::seeded(seed, model.annual_drift, model.annual_volatility);
    let result = simulate_dividends(&params, &mut variation);
    DividendResponse {
        ticker,
        seed,
        expected_appreciation: model.annual_drift,
        volatility: model.annual_volatility,
        result,
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/growth", get(growth_get_handler).post(growth_post_handler))
        .route(
            "/api/fixed-income",
            get(fixed_income_get_handler).post(fixed_income_post_handler),
        )
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route(
            "/api/dividends",
            get(dividends_get_handler).post(dividends_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from((host, port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "simulation HTTP API listening");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn growth_get_handler(query: Result<Query<GrowthPayload>, QueryRejection>) -> Response {
    respond("growth", query.map(|Query(p)| p), run_growth)
}

async fn growth_post_handler(body: Result<Json<GrowthPayload>, JsonRejection>) -> Response {
    respond("growth", body.map(|Json(p)| p), run_growth)
}

async fn fixed_income_get_handler(
    query: Result<Query<FixedIncomePayload>, QueryRejection>,
) -> Response {
    respond("fixed-income", query.map(|Query(p)| p), run_fixed_income)
}

async fn fixed_income_post_handler(
    body: Result<Json<FixedIncomePayload>, JsonRejection>,
) -> Response {
    respond("fixed-income", body.map(|Json(p)| p), run_fixed_income)
}

async fn fire_get_handler(query: Result<Query<FirePayload>, QueryRejection>) -> Response {
    respond("fire", query.map(|Query(p)| p), run_fire)
}

async fn fire_post_handler(body: Result<Json<FirePayload>, JsonRejection>) -> Response {
    respond("fire", body.map(|Json(p)| p), run_fire)
}

async fn dividends_get_handler(query: Result<Query<DividendPayload>, QueryRejection>) -> Response {
    respond("dividends", query.map(|Query(p)| p), run_dividends)
}

async fn dividends_post_handler(body: Result<Json<DividendPayload>, JsonRejection>) -> Response {
    respond("dividends", body.map(|Json(p)| p), run_dividends)
}

fn respond<P, E, T, F>(route: &'static str, payload: Result<P, E>, run: F) -> Response
where
    E: Into<ApiError>,
    T: Serialize,
    F: FnOnce(P) -> T,
{
    match payload {
        Ok(payload) => {
            tracing::debug!(route, "running simulation");
            json_response(StatusCode::OK, run(payload))
        }
        Err(e) => {
            let err: ApiError = e.into();
            err.into_response()
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FireExtra, IndexType};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).expect("json should parse")
    }

    #[test]
    fn growth_response_serialization_contains_expected_fields() {
        let result = run_growth(parse(
            r#"{
              "initialValue": 100000,
              "monthlyContribution": 2000,
              "annualGrowthRate": 12,
              "dividendYield": 6,
              "years": 10
            }"#,
        ));
        let json = serde_json::to_string(&result).expect("response should serialize");
        assert!(json.contains("\"finalValue\""));
        assert!(json.contains("\"totalContributed\""));
        assert!(json.contains("\"monthlyDividendIncome\""));
        assert!(json.contains("\"yearly\""));
        assert!(json.contains("\"accumulatedValue\""));
        assert!(json.contains("\"cumulativeDividends\""));
    }

    #[test]
    fn fixed_income_scenario_through_api_payload() {
        let result = run_fixed_income(parse(
            r#"{
              "principal": "50000",
              "nominalRate": 110,
              "holdingMonths": 24,
              "indexType": "percent-of-benchmark",
              "benchmarkRate": 10
            }"#,
        ));
        assert_eq!(result.index_type, IndexType::PercentOfBenchmark);
        assert_approx(result.effective_annual_rate, 11.0);
        assert_approx(result.tax_rate_percent, 17.5);

        let json = serde_json::to_string(&result).expect("response should serialize");
        assert!(json.contains("\"indexType\":\"percent-of-benchmark\""));
        assert!(json.contains("\"netFinalBalance\""));
    }

    #[test]
    fn fire_response_tags_variant_extras() {
        let result = run_fire(parse(
            r#"{
              "variant": "fat",
              "currentWealth": 0,
              "annualGrowthRate": 8,
              "monthlyExpenses": 10000,
              "multiplier": 30,
              "monthlyContribution": 20000
            }"#,
        ));
        assert!(matches!(result.extra, FireExtra::Fat { .. }));

        let json = serde_json::to_string(&result).expect("response should serialize");
        assert!(json.contains("\"variant\":\"fat\""));
        assert!(json.contains("\"safetyBuffer\""));
        assert!(json.contains("\"monthsToTarget\""));
        assert!(json.contains("\"progressPercent\""));
    }

    #[test]
    fn fire_with_garbage_inputs_is_immediate() {
        let result = run_fire(parse(
            r#"{ "monthlyExpenses": "n/a", "currentWealth": "??" }"#,
        ));
        assert_eq!(result.months_to_target, 0);
        assert_approx(result.progress_percent, 100.0);
    }

    #[test]
    fn dividend_response_is_reproducible_with_seed() {
        let json = r#"{
          "ticker": "ITSA4",
          "price": 10,
          "dividendYield": 7,
          "months": 12,
          "initialContribution": 1000,
          "monthlyContribution": 200,
          "depositRate": 10.5,
          "inflationRate": 4.5,
          "inflationSpread": 6,
          "volatility": 25,
          "seed": 99
        }"#;
        let first = run_dividends(parse(json));
        let second = run_dividends(parse(json));

        assert_eq!(first.seed, 99);
        assert_eq!(first.result, second.result);

        let out = serde_json::to_string(&first).expect("response should serialize");
        assert!(out.contains("\"ticker\":\"ITSA4\""));
        assert!(out.contains("\"benchmarks\""));
        assert!(out.contains("\"sharpeRatio\""));
        assert!(out.contains("\"maxDrawdownPercent\""));
        assert!(out.contains("\"kind\":\"equity-index\""));
    }

    #[test]
    fn api_error_maps_to_bad_request() {
        let err = serde_json::from_str::<FirePayload>(r#"{ "variant": "unknown" }"#)
            .map_err(ApiError::from)
            .expect_err("unknown variant must fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("Invalid JSON payload"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(b"no-store".as_slice())
        );
    }
}
