use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{hmac_sha256_hex, sign_sha256_concat};
use crate::core::kernel::{SignatureResult, Signer, TimestampUnit};
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;

pub const HEADER_KEY: &str = "X-COINEX-KEY";
pub const HEADER_SIGN: &str = "X-COINEX-SIGN";
pub const HEADER_TIMESTAMP: &str = "X-COINEX-TIMESTAMP";

/// CoinEx v2 request signer.
///
/// The digest covers the request URI, so a non-empty query is appended to
/// the path before hashing.
pub struct CoinexSigner {
    api_key: String,
    secret_key: Secret<String>,
}

impl CoinexSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// `signed_str` for the `server.sign` stream login
    pub fn login_signature(&self, timestamp_ms: u64) -> Result<String, ExchangeError> {
        hmac_sha256_hex(self.secret_key.expose_secret(), &timestamp_ms.to_string())
    }
}

impl Signer for CoinexSigner {
    fn timestamp_unit(&self) -> TimestampUnit {
        TimestampUnit::Milliseconds
    }

    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let request_uri = if query_string.is_empty() {
            endpoint.to_string()
        } else {
            format!("{}?{}", endpoint, query_string)
        };
        let timestamp = timestamp.to_string();
        let signature = sign_sha256_concat(
            method,
            &request_uri,
            body,
            &timestamp,
            self.secret_key.expose_secret(),
        );

        let mut headers = HashMap::new();
        headers.insert(HEADER_KEY.to_string(), self.api_key.clone());
        headers.insert(HEADER_SIGN.to_string(), signature);
        headers.insert(HEADER_TIMESTAMP.to_string(), timestamp);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_for_public_path() {
        let signer = CoinexSigner::new("my-key".to_string(), "test".to_string());
        let headers = signer
            .sign_request("GET", "/v2/spot/market", "", b"", 1_700_000_000_000)
            .unwrap();

        assert_eq!(headers[HEADER_KEY], "my-key");
        assert_eq!(headers[HEADER_TIMESTAMP], "1700000000000");
        assert_eq!(
            headers[HEADER_SIGN],
            "2acbdcfd7a7a3642ca829435e281829a4b61e6249ee33427213ed841827116e8"
        );
    }

    #[test]
    fn test_query_is_part_of_signed_uri() {
        let signer = CoinexSigner::new("k".to_string(), "test".to_string());
        let with_query = signer
            .sign_request("GET", "/v2/spot/market", "market=BTCUSDT", b"", 1)
            .unwrap();
        let expected = sign_sha256_concat("GET", "/v2/spot/market?market=BTCUSDT", b"", "1", "test");
        assert_eq!(with_query[HEADER_SIGN], expected);
    }

    #[test]
    fn test_body_is_signed() {
        let signer = CoinexSigner::new("k".to_string(), "secret".to_string());
        let headers = signer
            .sign_request(
                "POST",
                "/v2/spot/order",
                "",
                br#"{"market":"BTCUSDT"}"#,
                1_700_000_000_000,
            )
            .unwrap();
        assert_eq!(
            headers[HEADER_SIGN],
            "ddc8240847c1122da2c2e09367b74f7e7573a52f5e3a5e68c97016bab6a644a0"
        );
    }

    #[test]
    fn test_login_signature() {
        let signer = CoinexSigner::new("k".to_string(), "test".to_string());
        assert_eq!(
            signer.login_signature(1_700_000_000_000).unwrap(),
            "4d4d81d8bf4c335e53a996b3e182a6ddc55557e43c8693431cd9ff39264157b1"
        );
    }
}
