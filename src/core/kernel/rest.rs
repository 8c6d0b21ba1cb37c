use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{canonical_query, SignedRequest, Signer};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, trace};

/// REST client trait for making HTTP requests
///
/// Every call is executed exactly once. Retries, backoff and rate limiting
/// belong to the caller.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a GET request and return the envelope payload
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a GET request with strongly-typed response
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError>;

    /// Make a POST request with a JSON body
    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a POST request with strongly-typed response
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<T, ExchangeError>;

    /// Make a DELETE request
    async fn delete(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError>;

    /// Make a DELETE request with strongly-typed response
    async fn delete_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError>;

    /// Make a request with any method and return the raw response bytes
    ///
    /// Status is checked, the envelope is not. Useful for payloads that do
    /// not follow the venue's documented shape.
    async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<Vec<u8>, ExchangeError>;
}

/// Shape of a successful REST response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEnvelope {
    /// `{"code": 0, "data": ..., "message": "OK"}`; any other code is an
    /// application error.
    Coded,
    /// The payload is the body itself; an object carrying a `label` is an
    /// application error.
    Labelled,
}

#[derive(Deserialize)]
struct CodedEnvelope {
    code: i64,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: String,
}

impl ResponseEnvelope {
    /// Decode a 2xx body into the payload type.
    ///
    /// A body that does not parse, or whose payload does not fit `T`, is
    /// returned whole as [`ExchangeError::Body`].
    pub fn decode<T: DeserializeOwned>(self, raw: &[u8]) -> Result<T, ExchangeError> {
        let payload = match self {
            Self::Coded => {
                let envelope: CodedEnvelope = serde_json::from_slice(raw)
                    .map_err(|_| ExchangeError::Body(raw.to_vec()))?;
                if envelope.code != 0 {
                    return Err(ExchangeError::Application {
                        code: envelope.code.to_string(),
                        message: envelope.message,
                    });
                }
                envelope.data
            }
            Self::Labelled => {
                let value: Value = serde_json::from_slice(raw)
                    .map_err(|_| ExchangeError::Body(raw.to_vec()))?;
                if let Some(label) = value.get("label").and_then(Value::as_str) {
                    return Err(ExchangeError::Application {
                        code: label.to_string(),
                        message: value
                            .get("message")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
                value
            }
        };

        serde_json::from_value(payload).map_err(|_| ExchangeError::Body(raw.to_vec()))
    }
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
    /// How successful bodies are unwrapped
    pub envelope: ResponseEnvelope,
}

impl RestClientConfig {
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout_seconds: 30,
            user_agent: "venuelink/0.1".to_string(),
            envelope: ResponseEnvelope::Coded,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Set the response envelope
    pub fn with_envelope(mut self, envelope: ResponseEnvelope) -> Self {
        self.envelope = envelope;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer: self.signer,
        })
    }
}

/// Implementation of `RestClient` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn build_url(&self, endpoint: &str, query_string: &str) -> String {
        if query_string.is_empty() {
            format!("{}{}", self.config.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.config.base_url, endpoint, query_string)
        }
    }

    /// Send one request and return the body of a 2xx response
    #[instrument(skip(self, query_params, body), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<Vec<u8>, ExchangeError> {
        let query_string = canonical_query(query_params);
        let url = self.build_url(endpoint, &query_string);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");

        if authenticated {
            let signer = self.signer.as_ref().ok_or_else(|| {
                ExchangeError::AuthError(
                    "Authentication required but no signer provided".to_string(),
                )
            })?;

            let headers = SignedRequest::now(
                method.as_str(),
                endpoint,
                &query_string,
                body,
                signer.timestamp_unit(),
            )?
            .sign(signer.as_ref())?;

            for (key, value) in headers {
                request = request.header(key.as_str(), value.as_str());
            }

            info!(url = %url, body = %String::from_utf8_lossy(body), "Request");
        }

        if !body.is_empty() {
            request = request.body(body.to_vec());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status();
        let response_body = response.bytes().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        if authenticated {
            info!(url = %url, status = %status, body = %String::from_utf8_lossy(&response_body), "Response");
        } else {
            trace!(status = %status, "Response body: {}", String::from_utf8_lossy(&response_body));
        }

        if !status.is_success() {
            let body = String::from_utf8_lossy(&response_body).into_owned();
            error!(url = %url, status = %status, body = %body, "Response status");
            return Err(ExchangeError::Status {
                code: status.as_u16(),
                status: status.to_string(),
                body,
            });
        }

        Ok(response_body.to_vec())
    }

    async fn make_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let raw = self
            .execute(method, endpoint, query_params, body, authenticated)
            .await?;
        self.config.envelope.decode(&raw)
    }

    fn encode_body(body: &Value) -> Result<Vec<u8>, ExchangeError> {
        serde_json::to_vec(body).map_err(|e| {
            ExchangeError::SerializationError(format!("Failed to serialize request body: {}", e))
        })
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, &[], authenticated)
            .await
    }

    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, &[], authenticated)
            .await
    }

    async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let body_bytes = Self::encode_body(body)?;
        self.make_request(Method::POST, endpoint, &[], &body_bytes, authenticated)
            .await
    }

    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        body: &Value,
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        let body_bytes = Self::encode_body(body)?;
        self.make_request(Method::POST, endpoint, &[], &body_bytes, authenticated)
            .await
    }

    async fn delete(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::DELETE, endpoint, query_params, &[], authenticated)
            .await
    }

    async fn delete_json<T: DeserializeOwned + Send>(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<T, ExchangeError> {
        self.make_request(Method::DELETE, endpoint, query_params, &[], authenticated)
            .await
    }

    async fn request_raw(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: &[u8],
        authenticated: bool,
    ) -> Result<Vec<u8>, ExchangeError> {
        self.execute(method, endpoint, query_params, body, authenticated)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ticker {
        last: String,
    }

    #[test]
    fn test_coded_envelope_success() {
        let ticker: Ticker = ResponseEnvelope::Coded
            .decode(br#"{"code":0,"data":{"last":"1.5"},"message":"OK"}"#)
            .unwrap();
        assert_eq!(ticker.last, "1.5");
    }

    #[test]
    fn test_coded_envelope_application_error() {
        let err = ResponseEnvelope::Coded
            .decode::<Value>(br#"{"code":1,"message":"x"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Application { ref code, ref message } if code == "1" && message == "x"
        ));
    }

    #[test]
    fn test_coded_envelope_missing_code_is_body_error() {
        let raw = br#"{"data":[]}"#;
        let err = ResponseEnvelope::Coded.decode::<Value>(raw).unwrap_err();
        assert!(matches!(err, ExchangeError::Body(ref bytes) if bytes == raw));
    }

    #[test]
    fn test_payload_shape_mismatch_keeps_raw_body() {
        let raw = br#"{"code":0,"data":{"unexpected":true},"message":"OK"}"#;
        let err = ResponseEnvelope::Coded.decode::<Ticker>(raw).unwrap_err();
        assert!(matches!(err, ExchangeError::Body(ref bytes) if bytes == raw));
    }

    #[test]
    fn test_labelled_envelope() {
        let value: Value = ResponseEnvelope::Labelled
            .decode(br#"[{"currency":"BTC"}]"#)
            .unwrap();
        assert_eq!(value[0]["currency"], "BTC");

        let err = ResponseEnvelope::Labelled
            .decode::<Value>(br#"{"label":"INVALID_SIGNATURE","message":"Signature mismatch"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Application { ref code, .. } if code == "INVALID_SIGNATURE"
        ));
    }

    #[test]
    fn test_garbage_is_body_error() {
        for envelope in [ResponseEnvelope::Coded, ResponseEnvelope::Labelled] {
            let err = envelope.decode::<Value>(b"not json").unwrap_err();
            assert!(matches!(err, ExchangeError::Body(ref bytes) if bytes == b"not json"));
        }
    }
}
