//! HTTP access to the two storefront endpoints.
//!
//! `StoreApi` is the seam between the controllers and the network so that the
//! submission flow can be exercised without a browser. `FetchApi` is the real
//! implementation on top of `window.fetch`.

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

/// Key/value multiset sent as the order form body. Keys may repeat.
pub type FormPayload = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response.
    Network(String),
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The body was not the JSON we expected.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Status(code) => write!(f, "Server responded with status {}", code),
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<JsValue> for ApiError {
    fn from(value: JsValue) -> Self {
        ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

/// Body of the order endpoint's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Recommended number of games for a party. Bounds are `null` when the
/// server has no matching range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

pub fn decode_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub trait StoreApi {
    /// POST the order form to `endpoint`.
    fn submit_order<'a>(
        &'a self,
        endpoint: &'a str,
        csrf_token: &'a str,
        payload: &'a FormPayload,
    ) -> LocalBoxFuture<'a, Result<OrderResponse, ApiError>>;

    /// GET the recommended game range for `guests` people.
    fn recommend_games(&self, guests: u32) -> LocalBoxFuture<'_, Result<GameRange, ApiError>>;
}

/// `StoreApi` backed by the browser's fetch. One instance serves the whole
/// page: it knows where to ask for game recommendations, while each order is
/// posted to the endpoint passed with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchApi {
    guests_endpoint: String,
}

impl FetchApi {
    pub fn new(guests_endpoint: impl Into<String>) -> Self {
        Self {
            guests_endpoint: guests_endpoint.into(),
        }
    }

    pub fn guests_url(&self, guests: u32) -> String {
        format!("{}?guests={}", self.guests_endpoint, guests)
    }

    async fn fetch_text(request: Request) -> Result<String, ApiError> {
        let window = gloo_utils::window();
        let value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| ApiError::Network("fetch did not return a Response".into()))?;

        if !response.ok() {
            return Err(ApiError::Status(response.status()));
        }
        let text = JsFuture::from(response.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }

    async fn post_order(
        endpoint: &str,
        csrf_token: &str,
        payload: &FormPayload,
    ) -> Result<OrderResponse, ApiError> {
        let body = FormData::new()?;
        for (key, value) in payload {
            body.append_with_str(key, value)?;
        }

        let headers = Headers::new()?;
        headers.set("X-CSRFToken", csrf_token)?;
        headers.set("X-Requested-With", "XMLHttpRequest")?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&body);

        let request = Request::new_with_str_and_init(endpoint, &init)?;
        debug!("POST {} ({} fields)", endpoint, payload.len());
        let text = Self::fetch_text(request).await?;
        decode_json(&text)
    }

    async fn get_range(url: String) -> Result<GameRange, ApiError> {
        let init = RequestInit::new();
        init.set_method("GET");
        let request = Request::new_with_str_and_init(&url, &init)?;
        let text = Self::fetch_text(request).await?;
        decode_json(&text)
    }
}

impl StoreApi for FetchApi {
    fn submit_order<'a>(
        &'a self,
        endpoint: &'a str,
        csrf_token: &'a str,
        payload: &'a FormPayload,
    ) -> LocalBoxFuture<'a, Result<OrderResponse, ApiError>> {
        async move {
            let result = Self::post_order(endpoint, csrf_token, payload).await;
            if let Err(e) = &result {
                error!("Order submission failed: {}", e);
            }
            result
        }
        .boxed_local()
    }

    fn recommend_games(&self, guests: u32) -> LocalBoxFuture<'_, Result<GameRange, ApiError>> {
        let url = self.guests_url(guests);
        async move {
            let result = Self::get_range(url).await;
            if let Err(e) = &result {
                error!("Game recommendation request failed: {}", e);
            }
            result
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_order_responses() {
        let ok: OrderResponse = decode_json(r#"{"success": true, "message": "ok"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("ok"));

        let bare: OrderResponse = decode_json(r#"{"success": false}"#).unwrap();
        assert_eq!(bare.message, None);

        assert!(matches!(
            decode_json::<OrderResponse>("<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn decodes_game_ranges_with_nulls() {
        let range: GameRange = decode_json(r#"{"min":2,"max":3}"#).unwrap();
        assert_eq!(range, GameRange { min: Some(2), max: Some(3) });

        let empty: GameRange = decode_json(r#"{"min":null,"max":null}"#).unwrap();
        assert_eq!(empty.min, None);
    }

    #[test]
    fn builds_guest_url() {
        let api = FetchApi::new("/calculate_games/");
        assert_eq!(api.guests_url(4), "/calculate_games/?guests=4");
    }
}
