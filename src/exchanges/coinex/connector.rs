use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    kernel::{RestClient, WsSession},
    traits::{AccountInfo, MarketDataSource},
    types::{Balance, OrderBook},
};
use crate::exchanges::coinex::codec::CoinexCodec;
use crate::exchanges::coinex::conversions::{
    convert_coinex_balance, convert_coinex_depth_snapshot,
};
use crate::exchanges::coinex::rest::CoinexRestClient;
use crate::exchanges::Venue;
use async_trait::async_trait;
use tracing::instrument;

/// CoinEx connector: typed REST access plus stream sessions on demand
pub struct CoinexConnector<R: RestClient> {
    rest: CoinexRestClient<R>,
    config: ExchangeConfig,
}

impl<R: RestClient> CoinexConnector<R> {
    pub fn new(rest: R, config: ExchangeConfig) -> Self {
        Self {
            rest: CoinexRestClient::new(rest),
            config,
        }
    }

    /// Typed REST endpoints
    pub fn rest(&self) -> &CoinexRestClient<R> {
        &self.rest
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn can_authenticate(&self) -> bool {
        self.config.has_credentials()
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for CoinexConnector<R> {
    type Codec = CoinexCodec;

    #[instrument(skip(self), fields(exchange = "coinex"))]
    async fn get_order_book(&self, pair: &str, limit: u32) -> Result<OrderBook, ExchangeError> {
        let depth = self.rest.depth(pair, limit, "0").await?;
        Ok(convert_coinex_depth_snapshot(depth))
    }

    fn websocket_url(&self) -> String {
        Venue::Coinex.stream_url(self.config.ws_url.as_deref())
    }

    fn stream_session(&self) -> WsSession<CoinexCodec> {
        let session = WsSession::new(
            self.websocket_url(),
            Venue::Coinex.name().to_string(),
            CoinexCodec::new(),
            Venue::Coinex.ws_config(),
        );
        if self.can_authenticate() {
            session.with_credentials(
                self.config.api_key().to_string(),
                self.config.secret_key.clone(),
            )
        } else {
            session
        }
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for CoinexConnector<R> {
    #[instrument(skip(self), fields(exchange = "coinex"))]
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError> {
        let balances = self.rest.spot_balance().await?;
        Ok(balances.into_iter().map(convert_coinex_balance).collect())
    }
}
