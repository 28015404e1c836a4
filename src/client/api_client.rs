use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

use super::session::Session;
use super::transport::{
    HttpMethod, MultipartForm, RequestBody, Transport, TransportRequest, TransportResponse,
    WreqTransport,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, GENERIC_FAILURE};

pub type Headers = BTreeMap<String, String>;

/// Request payload accepted by [`ApiClient::call`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(MultipartForm),
}

/// Successful response body: JSON when the server declared it, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    pub fn into_typed<T: DeserializeOwned>(self) -> ClientResult<T> {
        match self {
            ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
            // Some endpoints answer JSON with a text/html content type.
            ApiResponse::Text(text) => Ok(serde_json::from_str(&text)?),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            ApiResponse::Json(value) => value.to_string(),
            ApiResponse::Text(text) => text.clone(),
        }
    }
}

/// HTTP client bound to one base origin and one [`Session`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            transport,
            session,
        }
    }

    pub fn from_config(config: &ClientConfig, session: Session) -> Result<Self> {
        let transport = WreqTransport::new(config.api.emulate_browser)?;
        Ok(Self::new(config.base_url(), Arc::new(transport), session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Builds the outgoing request: JSON bodies get a JSON content type,
    /// multipart bodies get none, session cookies are attached, and extra
    /// headers override anything set before them.
    pub fn build_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Payload>,
        extra_headers: Option<&Headers>,
    ) -> ClientResult<TransportRequest> {
        let mut headers: Vec<(String, String)> = Vec::new();

        let body = match body {
            Some(Payload::Json(value)) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                RequestBody::Json(serde_json::to_string(&value)?)
            }
            Some(Payload::Multipart(form)) => RequestBody::Multipart(form),
            None => RequestBody::Empty,
        };

        if let Some(cookie) = self.session.cookie_header() {
            headers.push(("Cookie".to_string(), cookie));
        }

        if let Some(extra) = extra_headers {
            for (key, value) in extra {
                headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(key));
                headers.push((key.clone(), value.clone()));
            }
        }

        Ok(TransportRequest {
            method,
            url: self.url_for(endpoint),
            headers,
            body,
        })
    }

    pub async fn call(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Payload>,
        extra_headers: Option<&Headers>,
    ) -> ClientResult<ApiResponse> {
        let result = self.execute(endpoint, method, body, extra_headers).await;

        if let Err(ref e) = result {
            error!("API Error on {} {}: {}", method, endpoint, e);
        }

        result
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Payload>,
        extra_headers: Option<&Headers>,
    ) -> ClientResult<ApiResponse> {
        let request = self.build_request(endpoint, method, body, extra_headers)?;
        debug!("Sending {} {}", method, request.url);

        let response = self.transport.send(request).await?;
        self.session.store_cookies(&response.set_cookies);

        normalize_response(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.call(endpoint, HttpMethod::Get, None, None)
            .await?
            .into_typed()
    }

    /// Sends `body` as JSON and decodes the JSON reply.
    pub async fn send_json<B, T>(&self, endpoint: &str, method: HttpMethod, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = Payload::Json(serde_json::to_value(body)?);
        self.call(endpoint, method, Some(payload), None)
            .await?
            .into_typed()
    }

    pub async fn send_empty<T: DeserializeOwned>(&self, endpoint: &str, method: HttpMethod) -> ClientResult<T> {
        self.call(endpoint, method, None, None).await?.into_typed()
    }
}

fn normalize_response(response: TransportResponse) -> ClientResult<ApiResponse> {
    if !response.is_success() {
        return Err(ClientError::Http {
            status: response.status,
            message: error_message(&response.body),
        });
    }

    if response.is_json() {
        if response.body.trim().is_empty() {
            return Ok(ApiResponse::Json(Value::Null));
        }
        let value = serde_json::from_str(&response.body)?;
        Ok(ApiResponse::Json(value))
    } else {
        Ok(ApiResponse::Text(response.body))
    }
}

/// Message for a failed response: the JSON `message` field, else the raw
/// body text, else the generic fallback.
pub fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = map.get("message") {
            if !message.trim().is_empty() {
                return message.clone();
            }
        }
    }

    let text = body.trim();
    if text.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        text.to_string()
    }
}
