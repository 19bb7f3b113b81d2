//! HTTP routing for the engine
//!
//! `route` is a pure function from a request to a response so it can be driven
//! directly in tests; the `server` binary wraps it in the Lambda HTTP runtime.

pub mod performance;
pub mod requests;

pub use requests::{FilterRequest, ValidatorRequest};

use crate::config::EngineConfig;
use crate::error::ApiError;
use crate::portfolio::{simulate_allocation, simulate_basic, MAX_HORIZON_YEARS};
use crate::returns::{calculate_returns, ReturnProfile, ReturnsRequest};
use crate::transactions::{enrich_all, filter_by_k_periods, validate_and_enrich, Transaction, WageCap};
use lambda_http::http::{header, HeaderValue, Method, StatusCode};
use lambda_http::{Body, Request, RequestExt, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;

pub const API_PREFIX: &str = "/blackrock/challenge/v1";

/// Default risk appetite for the round-up simulator
const DEFAULT_RISK: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SimulateRoundup,
    Parse,
    Validator,
    Filter,
    ReturnsNps,
    ReturnsIndex,
    Performance,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        if path.trim_end_matches('/') == "/simulate-roundup" {
            return Some(Endpoint::SimulateRoundup);
        }
        match path.strip_prefix(API_PREFIX)? {
            "/transactions:parse" => Some(Endpoint::Parse),
            "/transactions:validator" => Some(Endpoint::Validator),
            "/transactions:filter" => Some(Endpoint::Filter),
            "/returns:nps" => Some(Endpoint::ReturnsNps),
            "/returns:index" => Some(Endpoint::ReturnsIndex),
            "/performance" => Some(Endpoint::Performance),
            _ => None,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::SimulateRoundup | Endpoint::Performance => Method::GET,
            _ => Method::POST,
        }
    }
}

/// Dispatch a request and render the JSON response
pub fn route(request: &Request, config: &EngineConfig) -> Response<Body> {
    log::info!("{} {}", request.method(), request.uri().path());
    match dispatch(request, config) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => {
            if err.status().is_server_error() {
                log::error!("{} {}: {}", request.method(), request.uri().path(), err);
            } else {
                log::warn!("{} {}: {}", request.method(), request.uri().path(), err);
            }
            let body = serde_json::json!({ "error": err.to_string() }).to_string();
            json_response(err.status(), body)
        }
    }
}

fn dispatch(request: &Request, config: &EngineConfig) -> Result<String, ApiError> {
    let path = request.uri().path();
    let endpoint = Endpoint::from_path(path).ok_or_else(|| ApiError::NotFound(path.to_string()))?;
    if *request.method() != endpoint.method() {
        return Err(ApiError::MethodNotAllowed {
            method: request.method().to_string(),
            path: path.to_string(),
        });
    }

    match endpoint {
        Endpoint::SimulateRoundup => simulate_roundup(request, config),
        Endpoint::Parse => {
            let transactions: Vec<Transaction> = parse_body(request)?;
            encode(&enrich_all(&transactions))
        }
        Endpoint::Validator => {
            let body: ValidatorRequest = parse_body(request)?;
            let cap = WageCap::new(body.wage, config.wage_cap_fraction);
            encode(&validate_and_enrich(&body.transactions, cap))
        }
        Endpoint::Filter => {
            let body: FilterRequest = parse_body(request)?;
            let cap = WageCap::new(body.wage, config.wage_cap_fraction);
            let validated = validate_and_enrich(&body.transactions, cap);
            encode(&filter_by_k_periods(validated, &body.k))
        }
        Endpoint::ReturnsNps => {
            let body: ReturnsRequest = parse_body(request)?;
            encode(&calculate_returns(&body, ReturnProfile::Nps, config))
        }
        Endpoint::ReturnsIndex => {
            let body: ReturnsRequest = parse_body(request)?;
            encode(&calculate_returns(&body, ReturnProfile::Index, config))
        }
        Endpoint::Performance => encode(&performance::snapshot()),
    }
}

/// Basic mode takes `risk_value`; supplying `period` switches to the allocator
fn simulate_roundup(request: &Request, config: &EngineConfig) -> Result<String, ApiError> {
    let params = request.query_string_parameters();
    let param = |name: &'static str| params.first(name);

    let amount = finite(required(param("transaction_amount"), "transaction_amount")?, "transaction_amount")?;
    match param("period") {
        Some(raw) => {
            let period: u32 = parse_param(raw, "period")?;
            if period > MAX_HORIZON_YEARS {
                return Err(ApiError::InvalidParameter {
                    name: "period",
                    value: raw.to_string(),
                });
            }
            let risk_val = optional(param("risk_val"), "risk_val")?
                .map(|v| finite(v, "risk_val"))
                .transpose()?
                .unwrap_or(DEFAULT_RISK);
            encode(&simulate_allocation(amount, period, risk_val, config))
        }
        None => {
            let risk_value = optional(param("risk_value"), "risk_value")?
                .map(|v| finite(v, "risk_value"))
                .transpose()?
                .unwrap_or(DEFAULT_RISK);
            encode(&simulate_basic(amount, risk_value, config))
        }
    }
}

fn parse_param<T: FromStr>(raw: &str, name: &'static str) -> Result<T, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::InvalidParameter {
        name,
        value: raw.to_string(),
    })
}

/// `inf`, `NaN` and overflowing literals like `1e400` parse as f64 but are not amounts
fn finite(value: f64, name: &'static str) -> Result<f64, ApiError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ApiError::InvalidParameter {
            name,
            value: value.to_string(),
        })
    }
}

fn required<T: FromStr>(raw: Option<&str>, name: &'static str) -> Result<T, ApiError> {
    parse_param(raw.ok_or(ApiError::MissingParameter(name))?, name)
}

fn optional<T: FromStr>(raw: Option<&str>, name: &'static str) -> Result<Option<T>, ApiError> {
    raw.map(|value| parse_param(value, name)).transpose()
}

fn parse_body<T: DeserializeOwned>(request: &Request) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(request.body().as_ref())?)
}

fn encode<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(ApiError::Encode)
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::from_path("/simulate-roundup"), Some(Endpoint::SimulateRoundup));
        assert_eq!(
            Endpoint::from_path("/blackrock/challenge/v1/transactions:parse"),
            Some(Endpoint::Parse)
        );
        assert_eq!(
            Endpoint::from_path("/blackrock/challenge/v1/returns:index"),
            Some(Endpoint::ReturnsIndex)
        );
        assert_eq!(Endpoint::from_path("/blackrock/challenge/v1/returns"), None);
        assert_eq!(Endpoint::from_path("/transactions:parse"), None);
    }

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::SimulateRoundup.method(), Method::GET);
        assert_eq!(Endpoint::Performance.method(), Method::GET);
        assert_eq!(Endpoint::Filter.method(), Method::POST);
    }

    #[test]
    fn test_param_parsing() {
        assert_eq!(required::<f64>(Some("12.5"), "x").unwrap(), 12.5);
        assert!(matches!(required::<f64>(None, "x"), Err(ApiError::MissingParameter("x"))));
        assert!(matches!(
            required::<u32>(Some("ten"), "period"),
            Err(ApiError::InvalidParameter { name: "period", .. })
        ));
        assert_eq!(optional::<f64>(None, "risk").unwrap(), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(finite(12.5, "x").unwrap(), 12.5);
        for raw in ["inf", "-inf", "NaN", "1e400"] {
            let value: f64 = required(Some(raw), "x").unwrap();
            assert!(matches!(finite(value, "x"), Err(ApiError::InvalidParameter { name: "x", .. })));
        }
    }
}
