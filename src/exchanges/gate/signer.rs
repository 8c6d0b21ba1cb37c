use crate::core::kernel::signer::sign_hmac_sha512;
use crate::core::kernel::{SignatureResult, Signer, TimestampUnit};
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;

pub const HEADER_KEY: &str = "KEY";
pub const HEADER_SIGN: &str = "SIGN";
pub const HEADER_TIMESTAMP: &str = "Timestamp";

/// Gate v4 request signer (HMAC-SHA512, timestamp in seconds)
pub struct GateSigner {
    api_key: String,
    secret_key: Secret<String>,
}

impl GateSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
        }
    }
}

impl Signer for GateSigner {
    fn timestamp_unit(&self) -> TimestampUnit {
        TimestampUnit::Seconds
    }

    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult {
        let timestamp = timestamp.to_string();
        let signature = sign_hmac_sha512(
            method,
            endpoint,
            query_string,
            body,
            &timestamp,
            self.secret_key.expose_secret(),
        )?;

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
    fn test_signed_headers() {
        let signer = GateSigner::new("gate-key".to_string(), "test".to_string());
        let headers = signer
            .sign_request(
                "GET",
                "/api/v4/spot/accounts",
                "currency=BTC",
                b"",
                1_700_000_000,
            )
            .unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[HEADER_KEY], "gate-key");
        assert_eq!(headers[HEADER_TIMESTAMP], "1700000000");
        assert_eq!(
            headers[HEADER_SIGN],
            "b791d2e0052acdebbfea82901b2d45339bf1438cd03829be234bcab07e3b186c\
             912c26e89430adc90fe2bb2f673adaf73a6abde37345d184a4cfb1a2d313dc37"
        );
    }

    #[test]
    fn test_post_body_signed() {
        let signer = GateSigner::new("k".to_string(), "test".to_string());
        let headers = signer
            .sign_request(
                "POST",
                "/api/v4/spot/orders",
                "",
                br#"{"currency_pair":"BTC_USDT"}"#,
                1_700_000_000,
            )
            .unwrap();
        assert_eq!(
            headers[HEADER_SIGN],
            "09244cffc1faf4a8895f3baa8c1580d5e60377017e608484498f85db1db1cfd4\
             94b97ca3e82420d6f852dce214b28cb03b9cce3e313e0f91732bcf7441d9b25e"
        );
    }

    #[test]
    fn test_seconds_timestamp() {
        let signer = GateSigner::new("k".to_string(), "s".to_string());
        assert_eq!(signer.timestamp_unit(), TimestampUnit::Seconds);
    }
}
