use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::gate::types::{
    GateAccount, GateCurrency, GateCurrencyPair, GateDepositAddress, GateOrder, GateOrderBook,
    GateOrderRequest, GateWithdrawal, GateWithdrawalRequest,
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

fn to_body<T: Serialize>(request: &T) -> Result<Value, ExchangeError> {
    serde_json::to_value(request)
        .map_err(|e| ExchangeError::SerializationError(format!("Failed to encode request: {}", e)))
}

/// Thin typed wrapper around `RestClient` for the Gate v4 API
pub struct GateRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> GateRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &R {
        &self.client
    }

    pub async fn currencies(&self) -> Result<Vec<GateCurrency>, ExchangeError> {
        self.client
            .get_json("/api/v4/spot/currencies", &[], false)
            .await
    }

    pub async fn currency_pairs(&self) -> Result<Vec<GateCurrencyPair>, ExchangeError> {
        self.client
            .get_json("/api/v4/spot/currency_pairs", &[], false)
            .await
    }

    /// Order book snapshot
    ///
    /// # Arguments
    /// * `interval` - price merge precision, `None` for no merging
    /// * `limit` - levels per side
    #[instrument(skip(self), fields(exchange = "gate"))]
    pub async fn order_book(
        &self,
        pair: &str,
        interval: Option<&str>,
        limit: Option<u32>,
    ) -> Result<GateOrderBook, ExchangeError> {
        let mut params = vec![("currency_pair", pair)];
        if let Some(interval) = interval {
            params.push(("interval", interval));
        }

        let limit_str;
        if let Some(limit) = limit {
            limit_str = limit.to_string();
            params.push(("limit", limit_str.as_str()));
        }

        self.client
            .get_json("/api/v4/spot/order_book", &params, false)
            .await
    }

    /// Spot balances, optionally for a single currency
    pub async fn accounts(&self, currency: Option<&str>) -> Result<Vec<GateAccount>, ExchangeError> {
        let mut params = Vec::new();
        if let Some(currency) = currency {
            params.push(("currency", currency));
        }
        self.client
            .get_json("/api/v4/spot/accounts", &params, true)
            .await
    }

    /// Open orders grouped by pair. Each entry carries `currency_pair`,
    /// `total` and `orders`.
    pub async fn open_orders(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        account: Option<&str>,
    ) -> Result<Vec<Value>, ExchangeError> {
        let page_str;
        let limit_str;
        let mut params = Vec::new();

        if let Some(page) = page {
            page_str = page.to_string();
            params.push(("page", page_str.as_str()));
        }
        if let Some(limit) = limit {
            limit_str = limit.to_string();
            params.push(("limit", limit_str.as_str()));
        }
        if let Some(account) = account {
            params.push(("account", account));
        }

        self.client
            .get_json("/api/v4/spot/open_orders", &params, true)
            .await
    }

    #[instrument(skip(self, order), fields(exchange = "gate", pair = %order.currency_pair))]
    pub async fn place_order(&self, order: &GateOrderRequest) -> Result<GateOrder, ExchangeError> {
        let body = to_body(order)?;
        self.client.post_json("/api/v4/spot/orders", &body, true).await
    }

    #[instrument(skip(self), fields(exchange = "gate"))]
    pub async fn cancel_order(
        &self,
        order_id: &str,
        pair: &str,
        account: Option<&str>,
    ) -> Result<GateOrder, ExchangeError> {
        let endpoint = format!("/api/v4/spot/orders/{}", order_id);
        let mut params = vec![("currency_pair", pair)];
        if let Some(account) = account {
            params.push(("account", account));
        }
        self.client.delete_json(&endpoint, &params, true).await
    }

    pub async fn get_order(
        &self,
        order_id: &str,
        pair: &str,
        account: Option<&str>,
    ) -> Result<GateOrder, ExchangeError> {
        let endpoint = format!("/api/v4/spot/orders/{}", order_id);
        let mut params = vec![("currency_pair", pair)];
        if let Some(account) = account {
            params.push(("account", account));
        }
        self.client.get_json(&endpoint, &params, true).await
    }

    pub async fn deposit_address(
        &self,
        currency: &str,
    ) -> Result<GateDepositAddress, ExchangeError> {
        self.client
            .get_json(
                "/api/v4/wallet/deposit_address",
                &[("currency", currency)],
                true,
            )
            .await
    }

    #[instrument(skip(self, request), fields(exchange = "gate", currency = %request.currency))]
    pub async fn withdraw(
        &self,
        request: &GateWithdrawalRequest,
    ) -> Result<GateWithdrawal, ExchangeError> {
        let body = to_body(request)?;
        self.client.post_json("/api/v4/withdrawals", &body, true).await
    }
}
