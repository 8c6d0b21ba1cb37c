use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use url::form_urlencoded;

/// Result type for signing operations: the headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Signer trait for request authentication
///
/// Implementations reproduce one venue's canonical string and digest. The
/// output must be byte-exact: a deviation is not detectable locally and only
/// shows up as a rejected request.
pub trait Signer: Send + Sync {
    /// Unit of the timestamp the venue expects in its signature
    fn timestamp_unit(&self) -> TimestampUnit {
        TimestampUnit::Milliseconds
    }

    /// Sign a request and return the authentication headers
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    /// * `query_string` - Canonical query string (without leading '?')
    /// * `body` - Raw request body bytes, empty when there is no body
    /// * `timestamp` - Request timestamp in [`Self::timestamp_unit`]
    fn sign_request(
        &self,
        method: &str,
        endpoint: &str,
        query_string: &str,
        body: &[u8],
        timestamp: u64,
    ) -> SignatureResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    Milliseconds,
    Seconds,
}

impl TimestampUnit {
    /// Current unix time in this unit
    pub fn now(self) -> Result<u64, ExchangeError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ExchangeError::Other(format!("Failed to get timestamp: {}", e)))?;
        Ok(match self {
            Self::Milliseconds => elapsed.as_millis() as u64,
            Self::Seconds => elapsed.as_secs(),
        })
    }
}

/// One authenticated call, captured at send time.
///
/// Signing consumes the request so a digest is produced exactly once per
/// timestamp; a retry has to build a fresh one.
#[derive(Debug)]
pub struct SignedRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub body: &'a [u8],
    pub timestamp: u64,
}

impl<'a> SignedRequest<'a> {
    /// Capture a request stamped with the current time in `unit`
    pub fn now(
        method: &'a str,
        path: &'a str,
        query: &'a str,
        body: &'a [u8],
        unit: TimestampUnit,
    ) -> Result<Self, ExchangeError> {
        Ok(Self {
            method,
            path,
            query,
            body,
            timestamp: unit.now()?,
        })
    }

    pub fn sign(self, signer: &dyn Signer) -> SignatureResult {
        signer.sign_request(self.method, self.path, self.query, self.body, self.timestamp)
    }
}

/// Canonical query encoding: pairs sorted by key, form-urlencoded, joined
/// with `&`. The sort is stable, so repeated keys keep their value order.
pub fn canonical_query<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut sorted: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in sorted {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// `hex(SHA-256(method ‖ path ‖ body ‖ timestamp ‖ secret))`
pub fn sign_sha256_concat(
    method: &str,
    path: &str,
    body: &[u8],
    timestamp: &str,
    secret: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(body);
    hasher.update(timestamp.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// `hex(HMAC-SHA512(secret, method \n path \n query \n hex(SHA-512(body)) \n timestamp))`
///
/// An empty body still contributes the digest of the empty string.
pub fn sign_hmac_sha512(
    method: &str,
    path: &str,
    query: &str,
    body: &[u8],
    timestamp: &str,
    secret: &str,
) -> Result<String, ExchangeError> {
    let payload = hex::encode(Sha512::digest(body));
    let prehash = format!(
        "{}\n{}\n{}\n{}\n{}",
        method, path, query, payload, timestamp
    );

    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(prehash.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// `hex(HMAC-SHA256(secret, message))`
pub fn hmac_sha256_hex(secret: &str, message: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_concat_vector() {
        let digest = sign_sha256_concat("GET", "/v2/spot/market", b"", "1700000000000", "test");
        assert_eq!(
            digest,
            "2acbdcfd7a7a3642ca829435e281829a4b61e6249ee33427213ed841827116e8"
        );
        // pure: same inputs, same output
        assert_eq!(
            digest,
            sign_sha256_concat("GET", "/v2/spot/market", b"", "1700000000000", "test")
        );
    }

    #[test]
    fn test_sha256_concat_with_body() {
        let digest = sign_sha256_concat(
            "POST",
            "/v2/spot/order",
            br#"{"market":"BTCUSDT"}"#,
            "1700000000000",
            "secret",
        );
        assert_eq!(
            digest,
            "ddc8240847c1122da2c2e09367b74f7e7573a52f5e3a5e68c97016bab6a644a0"
        );
    }

    #[test]
    fn test_hmac_sha512_empty_body_vector() {
        let digest = sign_hmac_sha512(
            "GET",
            "/api/v4/spot/accounts",
            "currency=BTC",
            b"",
            "1700000000",
            "test",
        )
        .unwrap();
        assert_eq!(
            digest,
            "b791d2e0052acdebbfea82901b2d45339bf1438cd03829be234bcab07e3b186c\
             912c26e89430adc90fe2bb2f673adaf73a6abde37345d184a4cfb1a2d313dc37"
        );
    }

    #[test]
    fn test_hmac_sha512_body_vector() {
        let digest = sign_hmac_sha512(
            "POST",
            "/api/v4/spot/orders",
            "",
            br#"{"currency_pair":"BTC_USDT"}"#,
            "1700000000",
            "test",
        )
        .unwrap();
        assert_eq!(
            digest,
            "09244cffc1faf4a8895f3baa8c1580d5e60377017e608484498f85db1db1cfd4\
             94b97ca3e82420d6f852dce214b28cb03b9cce3e313e0f91732bcf7441d9b25e"
        );
    }

    #[test]
    fn test_hmac_sha256_hex_vector() {
        assert_eq!(
            hmac_sha256_hex("test", "1700000000000").unwrap(),
            "4d4d81d8bf4c335e53a996b3e182a6ddc55557e43c8693431cd9ff39264157b1"
        );
    }

    #[test]
    fn test_canonical_query_is_order_independent() {
        let a = canonical_query(&[("market", "BTCUSDT"), ("limit", "10"), ("interval", "0")]);
        let b = canonical_query(&[("interval", "0"), ("market", "BTCUSDT"), ("limit", "10")]);
        assert_eq!(a, b);
        assert_eq!(a, "interval=0&limit=10&market=BTCUSDT");

        let sig_a = sign_hmac_sha512("GET", "/p", &a, b"", "1", "s").unwrap();
        let sig_b = sign_hmac_sha512("GET", "/p", &b, b"", "1", "s").unwrap();
        assert_eq!(sig_a, sig_b);
    }

    #[test]
    fn test_canonical_query_escapes_values() {
        assert_eq!(
            canonical_query(&[("text", "t-a b&c")]),
            "text=t-a+b%26c"
        );
        assert_eq!(canonical_query::<&str, &str>(&[]), "");
    }

    #[test]
    fn test_canonical_query_keeps_duplicate_order() {
        assert_eq!(
            canonical_query(&[("b", "2"), ("a", "z"), ("a", "y")]),
            "a=z&a=y&b=2"
        );
    }

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn sign_request(
            &self,
            method: &str,
            endpoint: &str,
            query_string: &str,
            body: &[u8],
            timestamp: u64,
        ) -> SignatureResult {
            let mut headers = HashMap::new();
            headers.insert(
                "SIGN".to_string(),
                sign_sha256_concat(method, endpoint, body, &timestamp.to_string(), query_string),
            );
            Ok(headers)
        }
    }

    #[test]
    fn test_signed_request_uses_current_time() {
        let before = TimestampUnit::Seconds.now().unwrap();
        let request =
            SignedRequest::now("GET", "/x", "", b"", TimestampUnit::Seconds).unwrap();
        assert!(request.timestamp >= before);
        let headers = request.sign(&FixedSigner).unwrap();
        assert_eq!(headers["SIGN"].len(), 64);
    }
}
