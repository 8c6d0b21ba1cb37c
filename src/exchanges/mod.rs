pub mod coinex;
pub mod gate;

use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    ReqwestRest, ResponseEnvelope, RestClientBuilder, RestClientConfig, Signer, TimestampUnit,
    WsConfig,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Longest silence tolerated on a stream before it is considered dead
const STREAM_READ_TIMEOUT: Duration = Duration::from_secs(120);

/// Supported venues and their wire-level constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    Coinex,
    Gate,
}

impl Venue {
    pub const ALL: [Self; 2] = [Self::Coinex, Self::Gate];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Coinex => "coinex",
            Self::Gate => "gate",
        }
    }

    pub const fn rest_url(self) -> &'static str {
        match self {
            Self::Coinex => "https://api.coinex.com",
            Self::Gate => "https://api.gateio.ws",
        }
    }

    pub const fn ws_url(self) -> &'static str {
        match self {
            Self::Coinex => "wss://socket.coinex.com",
            Self::Gate => "wss://api.gateio.ws",
        }
    }

    pub const fn ws_path(self) -> &'static str {
        match self {
            Self::Coinex => "/v2/spot",
            Self::Gate => "/ws/v4/",
        }
    }

    /// Full stream URL for a base URL, or for the venue default
    pub fn stream_url(self, base: Option<&str>) -> String {
        let base = base.unwrap_or_else(|| self.ws_url());
        format!("{}{}", base.trim_end_matches('/'), self.ws_path())
    }

    pub const fn heartbeat_interval(self) -> Duration {
        match self {
            Self::Coinex => Duration::from_secs(3),
            Self::Gate => Duration::from_secs(10),
        }
    }

    pub fn ws_config(self) -> WsConfig {
        WsConfig::with_heartbeat(self.heartbeat_interval()).read_timeout(STREAM_READ_TIMEOUT)
    }

    pub const fn response_envelope(self) -> ResponseEnvelope {
        match self {
            Self::Coinex => ResponseEnvelope::Coded,
            Self::Gate => ResponseEnvelope::Labelled,
        }
    }

    pub const fn timestamp_unit(self) -> TimestampUnit {
        match self {
            Self::Coinex => TimestampUnit::Milliseconds,
            Self::Gate => TimestampUnit::Seconds,
        }
    }

    pub fn signer(self, api_key: String, secret_key: String) -> Arc<dyn Signer> {
        match self {
            Self::Coinex => Arc::new(coinex::CoinexSigner::new(api_key, secret_key)),
            Self::Gate => Arc::new(gate::GateSigner::new(api_key, secret_key)),
        }
    }

    /// REST client bound to this venue. A signer is attached only when the
    /// configuration carries credentials.
    pub fn rest_client(self, config: &ExchangeConfig) -> Result<ReqwestRest, ExchangeError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| self.rest_url().to_string());

        let rest_config = RestClientConfig::new(base_url, self.name().to_string())
            .with_envelope(self.response_envelope());
        let mut rest_builder = RestClientBuilder::new(rest_config);

        if config.has_credentials() {
            rest_builder = rest_builder.with_signer(self.signer(
                config.api_key().to_string(),
                config.secret_key().to_string(),
            ));
        }

        rest_builder.build()
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coinex" => Ok(Self::Coinex),
            "gate" | "gateio" | "gate.io" => Ok(Self::Gate),
            other => Err(ExchangeError::InvalidParameters(format!(
                "unknown venue: {}",
                other
            ))),
        }
    }
}
