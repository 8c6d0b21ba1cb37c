use crate::core::types::{OrderBookEntry, OrderSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const ACCOUNT_SPOT: &str = "spot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateOrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateOrderStatus {
    Open,
    Closed,
    Cancelled,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateCurrency {
    pub currency: String,
    #[serde(default)]
    pub delisted: bool,
    #[serde(default)]
    pub withdraw_disabled: bool,
    #[serde(default)]
    pub withdraw_delayed: bool,
    #[serde(default)]
    pub deposit_disabled: bool,
    #[serde(default)]
    pub trade_disabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateCurrencyPair {
    pub id: String,
    pub base: String,
    pub quote: String,
    pub fee: Decimal,
    #[serde(default)]
    pub min_base_amount: Option<Decimal>,
    #[serde(default)]
    pub min_quote_amount: Option<Decimal>,
    pub amount_precision: u32,
    pub precision: u32,
    /// `untradable`, `buyable`, `sellable` or `tradable`
    pub trade_status: String,
    #[serde(default)]
    pub sell_start: i64,
    #[serde(default)]
    pub buy_start: i64,
}

/// REST order book; the pair is not echoed back by the venue
#[derive(Debug, Clone, Deserialize)]
pub struct GateOrderBook {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub current: Option<i64>,
    #[serde(default)]
    pub update: Option<i64>,
    pub asks: Vec<OrderBookEntry>,
    pub bids: Vec<OrderBookEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateAccount {
    pub currency: String,
    pub available: Decimal,
    pub locked: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateOrderRequest {
    /// Custom id, must start with `t-`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub currency_pair: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<GateOrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub side: OrderSide,
    pub amount: String,
    pub price: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateOrder {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub create_time_ms: Option<i64>,
    #[serde(default)]
    pub update_time_ms: Option<i64>,
    pub status: GateOrderStatus,
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub order_type: GateOrderType,
    pub account: String,
    pub side: OrderSide,
    pub amount: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub iceberg: Option<Decimal>,
    pub left: Decimal,
    #[serde(default)]
    pub fill_price: Option<Decimal>,
    #[serde(default)]
    pub filled_total: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub point_fee: Option<Decimal>,
    #[serde(default)]
    pub gt_fee: Option<Decimal>,
    #[serde(default)]
    pub gt_discount: bool,
    #[serde(default)]
    pub rebated_fee: Option<Decimal>,
    #[serde(default)]
    pub rebated_fee_currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateChainAddress {
    pub chain: String,
    pub address: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub payment_name: String,
    #[serde(default)]
    pub obtain_failed: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateDepositAddress {
    pub currency: String,
    pub address: String,
    #[serde(default)]
    pub multichain_addresses: Vec<GateChainAddress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GateWithdrawalRequest {
    pub amount: String,
    pub currency: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateWithdrawal {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub currency: String,
    pub address: String,
    #[serde(default)]
    pub txid: String,
    pub amount: Decimal,
    #[serde(default)]
    pub memo: String,
    pub status: String,
    #[serde(default)]
    pub chain: String,
}

/// `spot.order_book` push: a full limited-level snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct GateBookSnapshot {
    #[serde(rename = "t")]
    pub time_ms: i64,
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: i64,
    #[serde(rename = "s")]
    pub pair: String,
    pub bids: Vec<OrderBookEntry>,
    pub asks: Vec<OrderBookEntry>,
}

/// `spot.order_book_update` push: changed levels between two update ids
#[derive(Debug, Clone, Deserialize)]
pub struct GateBookUpdate {
    #[serde(rename = "t")]
    pub time_ms: i64,
    /// Set on the first message after subscribing
    #[serde(default)]
    pub full: bool,
    #[serde(rename = "s")]
    pub pair: String,
    #[serde(rename = "U")]
    pub first_update_id: i64,
    #[serde(rename = "u")]
    pub last_update_id: i64,
    #[serde(rename = "b", default)]
    pub bids: Vec<OrderBookEntry>,
    #[serde(rename = "a", default)]
    pub asks: Vec<OrderBookEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_parses_string_amounts() {
        let order: GateOrder = serde_json::from_value(json!({
            "id": "12332324",
            "text": "t-123456",
            "create_time": "1548000000",
            "update_time": "1548000100",
            "create_time_ms": 1548000000123i64,
            "update_time_ms": 1548000100123i64,
            "currency_pair": "ETH_BTC",
            "status": "cancelled",
            "type": "limit",
            "account": "spot",
            "side": "buy",
            "iceberg": "0",
            "amount": "1",
            "price": "5.00032",
            "time_in_force": "gtc",
            "left": "0.5",
            "filled_total": "2.50016",
            "fee": "0.005",
            "fee_currency": "ETH",
            "point_fee": "0",
            "gt_fee": "0",
            "gt_discount": false,
            "rebated_fee": "0",
            "rebated_fee_currency": "BTC"
        }))
        .unwrap();
        assert_eq!(order.status, GateOrderStatus::Cancelled);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.left.to_string(), "0.5");
    }

    #[test]
    fn test_order_request_body() {
        let request = GateOrderRequest {
            text: Some("t-abc".to_string()),
            currency_pair: "BTC_USDT".to_string(),
            order_type: None,
            account: Some(ACCOUNT_SPOT.to_string()),
            side: OrderSide::Sell,
            amount: "0.001".to_string(),
            price: "65000".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "text": "t-abc",
                "currency_pair": "BTC_USDT",
                "account": "spot",
                "side": "sell",
                "amount": "0.001",
                "price": "65000"
            })
        );
    }
}
