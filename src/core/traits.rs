use crate::core::{
    errors::ExchangeError,
    kernel::{WsCodec, WsSession},
    types::{Balance, OrderBook},
};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    /// Codec driving this venue's stream sessions
    type Codec: WsCodec;

    /// Fetch an order book snapshot over REST
    async fn get_order_book(&self, pair: &str, limit: u32) -> Result<OrderBook, ExchangeError>;

    /// Full WebSocket URL, venue path included
    fn websocket_url(&self) -> String;

    /// A new, not yet connected stream session for this venue
    fn stream_session(&self) -> WsSession<Self::Codec>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError>;
}
