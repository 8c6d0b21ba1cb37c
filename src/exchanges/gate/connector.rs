use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    kernel::{RestClient, WsSession},
    traits::{AccountInfo, MarketDataSource},
    types::{Balance, OrderBook},
};
use crate::exchanges::gate::codec::GateCodec;
use crate::exchanges::gate::conversions::{convert_gate_account, convert_gate_order_book};
use crate::exchanges::gate::rest::GateRestClient;
use crate::exchanges::Venue;
use async_trait::async_trait;
use tracing::instrument;

/// Gate connector: typed REST access plus stream sessions on demand
pub struct GateConnector<R: RestClient> {
    rest: GateRestClient<R>,
    config: ExchangeConfig,
}

impl<R: RestClient> GateConnector<R> {
    pub fn new(rest: R, config: ExchangeConfig) -> Self {
        Self {
            rest: GateRestClient::new(rest),
            config,
        }
    }

    pub fn rest(&self) -> &GateRestClient<R> {
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
impl<R: RestClient> MarketDataSource for GateConnector<R> {
    type Codec = GateCodec;

    #[instrument(skip(self), fields(exchange = "gate"))]
    async fn get_order_book(&self, pair: &str, limit: u32) -> Result<OrderBook, ExchangeError> {
        let book = self.rest.order_book(pair, None, Some(limit)).await?;
        Ok(convert_gate_order_book(pair, book))
    }

    fn websocket_url(&self) -> String {
        Venue::Gate.stream_url(self.config.ws_url.as_deref())
    }

    // public channels only, no login
    fn stream_session(&self) -> WsSession<GateCodec> {
        WsSession::new(
            self.websocket_url(),
            Venue::Gate.name().to_string(),
            GateCodec::new(),
            Venue::Gate.ws_config(),
        )
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for GateConnector<R> {
    #[instrument(skip(self), fields(exchange = "gate"))]
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError> {
        let accounts = self.rest.accounts(None).await?;
        Ok(accounts.into_iter().map(convert_gate_account).collect())
    }
}
