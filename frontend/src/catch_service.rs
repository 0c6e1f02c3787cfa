//! Catch API client over `window.fetch`.

use serde::Deserialize;
use shared::{CatchId, CatchRecord, CatchesResponse, ClientConfig};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error_display::make_error_user_friendly;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// Error payload reported by the catch service itself.
    #[error("{0}")]
    Service(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Service(message) => message.clone(),
            FetchError::Decode(_) => "The catch service sent an unexpected response.".to_string(),
            FetchError::Network(_) | FetchError::Status { .. } => {
                make_error_user_friendly(&self.to_string())
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Interprets a `GET /catches` response body.
pub fn decode_catches(status: u16, body: &str) -> Result<Vec<CatchRecord>, FetchError> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, body));
    }
    serde_json::from_str::<CatchesResponse>(body)
        .map_err(|error| FetchError::Decode(error.to_string()))?
        .into_result()
        .map_err(FetchError::Service)
}

fn status_error(status: u16, body: &str) -> FetchError {
    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => FetchError::Service(payload.error),
        Err(_) => FetchError::Status {
            status,
            message: body.trim().to_string(),
        },
    }
}

pub fn delete_url(config: &ClientConfig, catch_id: CatchId, token: &str) -> String {
    format!(
        "{}?token={}",
        config.catch_url(catch_id),
        String::from(js_sys::encode_uri_component(token))
    )
}

pub async fn fetch_catches(config: &ClientConfig) -> Result<Vec<CatchRecord>, FetchError> {
    let (status, body) = send("GET", &config.catches_url()).await?;
    decode_catches(status, &body)
}

pub async fn delete_catch(config: &ClientConfig, catch_id: CatchId, token: &str) -> Result<(), FetchError> {
    let (status, body) = send("DELETE", &delete_url(config, catch_id, token)).await?;
    if !(200..300).contains(&status) {
        return Err(status_error(status, &body));
    }
    Ok(())
}

async fn send(method: &str, url: &str) -> Result<(u16, String), FetchError> {
    let init = RequestInit::new();
    init.set_method(method);
    init.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &init).map_err(network_error)?;

    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_error)?
        .dyn_into()
        .map_err(|_| FetchError::Decode("fetch did not resolve to a Response".to_string()))?;

    let text_promise = response.text().map_err(decode_error)?;
    let body = JsFuture::from(text_promise)
        .await
        .map_err(decode_error)?
        .as_string()
        .unwrap_or_default();
    Ok((response.status(), body))
}

fn network_error(error: JsValue) -> FetchError {
    FetchError::Network(js_error_text(&error))
}

fn decode_error(error: JsValue) -> FetchError {
    FetchError::Decode(js_error_text(&error))
}

fn js_error_text(error: &JsValue) -> String {
    error
        .dyn_ref::<js_sys::Error>()
        .map(|error| String::from(error.message()))
        .or_else(|| error.as_string())
        .unwrap_or_else(|| format!("{error:?}"))
}
