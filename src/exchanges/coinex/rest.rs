use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::OrderSide;
use crate::exchanges::coinex::types::{
    CoinexBalance, CoinexDepositAddress, CoinexDepositWithdrawConfig, CoinexDepth, CoinexKline,
    CoinexMarket, CoinexMarketType, CoinexOrder, CoinexOrderRequest, CoinexWithdrawRequest,
    CoinexWithdrawal,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

fn to_body<T: Serialize>(request: &T) -> Result<Value, ExchangeError> {
    serde_json::to_value(request)
        .map_err(|e| ExchangeError::SerializationError(format!("Failed to encode request: {}", e)))
}

/// Thin typed wrapper around `RestClient` for the CoinEx v2 API
pub struct CoinexRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> CoinexRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &R {
        &self.client
    }

    /// Market status; `None` lists every market
    #[instrument(skip(self), fields(exchange = "coinex"))]
    pub async fn markets(&self, market: Option<&str>) -> Result<Vec<CoinexMarket>, ExchangeError> {
        let mut params = Vec::new();
        if let Some(market) = market {
            params.push(("market", market));
        }
        self.client.get_json("/v2/spot/market", &params, false).await
    }

    /// Candles for one market
    ///
    /// # Arguments
    /// * `period` - one of `1min`, `3min`, `5min`, `15min`, `30min`, `1hour`,
    ///   `2hour`, `4hour`, `6hour`, `12hour`, `1day`, `3day`, `1week`
    /// * `limit` - up to 1000, venue default 100
    #[instrument(skip(self), fields(exchange = "coinex"))]
    pub async fn klines(
        &self,
        market: &str,
        period: &str,
        limit: Option<u32>,
    ) -> Result<Vec<CoinexKline>, ExchangeError> {
        let mut params = vec![("market", market), ("period", period)];

        let limit_str;
        if let Some(limit) = limit {
            limit_str = limit.to_string();
            params.push(("limit", limit_str.as_str()));
        }

        self.client.get_json("/v2/spot/kline", &params, false).await
    }

    /// Order book snapshot
    #[instrument(skip(self), fields(exchange = "coinex"))]
    pub async fn depth(
        &self,
        market: &str,
        limit: u32,
        interval: &str,
    ) -> Result<CoinexDepth, ExchangeError> {
        let limit_str = limit.to_string();
        let params = [
            ("market", market),
            ("limit", limit_str.as_str()),
            ("interval", interval),
        ];
        self.client.get_json("/v2/spot/depth", &params, false).await
    }

    pub async fn deposit_withdraw_config(
        &self,
        ccy: &str,
    ) -> Result<CoinexDepositWithdrawConfig, ExchangeError> {
        self.client
            .get_json("/v2/assets/deposit-withdraw-config", &[("ccy", ccy)], false)
            .await
    }

    pub async fn deposit_address(
        &self,
        ccy: &str,
        chain: &str,
    ) -> Result<CoinexDepositAddress, ExchangeError> {
        self.client
            .get_json(
                "/v2/assets/deposit-address",
                &[("ccy", ccy), ("chain", chain)],
                true,
            )
            .await
    }

    #[instrument(skip(self, request), fields(exchange = "coinex", ccy = %request.ccy))]
    pub async fn withdraw(
        &self,
        request: &CoinexWithdrawRequest,
    ) -> Result<CoinexWithdrawal, ExchangeError> {
        let body = to_body(request)?;
        self.client
            .post_json("/v2/assets/withdraw", &body, true)
            .await
    }

    pub async fn spot_balance(&self) -> Result<Vec<CoinexBalance>, ExchangeError> {
        self.client
            .get_json("/v2/assets/spot/balance", &[], true)
            .await
    }

    #[instrument(skip(self, order), fields(exchange = "coinex", market = %order.market))]
    pub async fn place_order(
        &self,
        order: &CoinexOrderRequest,
    ) -> Result<CoinexOrder, ExchangeError> {
        let body = to_body(order)?;
        self.client.post_json("/v2/spot/order", &body, true).await
    }

    #[instrument(skip(self), fields(exchange = "coinex"))]
    pub async fn cancel_order(
        &self,
        market: &str,
        market_type: CoinexMarketType,
        order_id: i64,
    ) -> Result<CoinexOrder, ExchangeError> {
        let body = json!({
            "market": market,
            "market_type": market_type,
            "order_id": order_id,
        });
        self.client
            .post_json("/v2/spot/cancel-order", &body, true)
            .await
    }

    pub async fn order_status(
        &self,
        market: &str,
        order_id: i64,
    ) -> Result<CoinexOrder, ExchangeError> {
        let order_id_str = order_id.to_string();
        self.client
            .get_json(
                "/v2/spot/order-status",
                &[("market", market), ("order_id", order_id_str.as_str())],
                true,
            )
            .await
    }

    /// Completed orders, newest first
    pub async fn finished_orders(
        &self,
        market: Option<&str>,
        market_type: CoinexMarketType,
        side: Option<OrderSide>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<CoinexOrder>, ExchangeError> {
        let market_type_str = match market_type {
            CoinexMarketType::Spot => "SPOT",
            CoinexMarketType::Margin => "MARGIN",
            CoinexMarketType::Futures => "FUTURES",
        };
        let mut params = vec![("market_type", market_type_str)];
        if let Some(market) = market {
            params.push(("market", market));
        }
        if let Some(side) = side {
            params.push((
                "side",
                match side {
                    OrderSide::Buy => "buy",
                    OrderSide::Sell => "sell",
                },
            ));
        }

        let page_str;
        let limit_str;
        if let Some(page) = page {
            page_str = page.to_string();
            params.push(("page", page_str.as_str()));
        }
        if let Some(limit) = limit {
            limit_str = limit.to_string();
            params.push(("limit", limit_str.as_str()));
        }

        self.client
            .get_json("/v2/spot/finished-order", &params, true)
            .await
    }
}
