use crate::core::types::{OrderBookEntry, OrderSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoinexMarketType {
    Spot,
    Margin,
    Futures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinexOrderType {
    /// Good till cancelled
    Limit,
    Market,
    /// Post-only
    MakerOnly,
    Ioc,
    Fok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinexWithdrawMethod {
    OnChain,
    InterUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexMarket {
    pub market: String,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
    pub min_amount: Decimal,
    pub base_ccy: String,
    pub quote_ccy: String,
    pub base_ccy_precision: u32,
    pub quote_ccy_precision: u32,
    #[serde(default)]
    pub is_amm_available: bool,
    #[serde(default)]
    pub is_margin_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexKline {
    pub market: String,
    pub created_at: i64,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
    pub value: Decimal,
}

/// Depth body shared by the REST snapshot and the `depth.update` push
#[derive(Debug, Clone, Deserialize)]
pub struct CoinexDepthLevels {
    #[serde(default)]
    pub asks: Vec<OrderBookEntry>,
    #[serde(default)]
    pub bids: Vec<OrderBookEntry>,
    pub checksum: Option<i64>,
    pub last: Option<Decimal>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexDepth {
    pub market: String,
    /// true for a full snapshot, false for an incremental push
    pub is_full: bool,
    pub depth: CoinexDepthLevels,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexAssetConfig {
    pub ccy: String,
    pub deposit_enabled: bool,
    pub withdraw_enabled: bool,
    #[serde(default)]
    pub inter_transfer_enabled: bool,
    #[serde(default)]
    pub is_st: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexChainConfig {
    pub chain: String,
    pub min_deposit_amount: Decimal,
    pub min_withdraw_amount: Decimal,
    pub deposit_enabled: bool,
    pub withdraw_enabled: bool,
    #[serde(default)]
    pub deposit_delay_minutes: u32,
    #[serde(default)]
    pub safe_confirmations: u32,
    #[serde(default)]
    pub irreversible_confirmations: u32,
    #[serde(default)]
    pub deflation_rate: Option<String>,
    pub withdrawal_fee: Decimal,
    #[serde(default)]
    pub withdrawal_precision: u32,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub is_memo_required_for_deposit: bool,
    #[serde(default)]
    pub explorer_asset_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexDepositWithdrawConfig {
    pub asset: CoinexAssetConfig,
    pub chains: Vec<CoinexChainConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexDepositAddress {
    pub address: String,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinexWithdrawRequest {
    pub ccy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    pub to_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw_method: Option<CoinexWithdrawMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexWithdrawal {
    pub withdraw_id: i64,
    pub created_at: i64,
    pub ccy: String,
    #[serde(default)]
    pub chain: String,
    pub amount: Decimal,
    pub actual_amount: Decimal,
    pub withdraw_method: String,
    #[serde(default)]
    pub memo: String,
    pub tx_fee: Decimal,
    #[serde(default)]
    pub tx_id: String,
    pub to_address: String,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub explorer_address_url: String,
    #[serde(default)]
    pub explorer_tx_url: String,
    pub status: String,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexBalance {
    pub ccy: String,
    pub available: Decimal,
    pub frozen: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoinexOrderRequest {
    pub market: String,
    pub market_type: CoinexMarketType,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: CoinexOrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccy: Option<String>,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinexOrder {
    pub order_id: i64,
    pub market: String,
    pub market_type: String,
    #[serde(default)]
    pub ccy: String,
    pub side: OrderSide,
    #[serde(rename = "type")]
    pub order_type: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub unfilled_amount: Decimal,
    pub filled_amount: Decimal,
    pub filled_value: Decimal,
    #[serde(default)]
    pub client_id: String,
    pub base_fee: Decimal,
    pub quote_fee: Decimal,
    #[serde(default)]
    pub discount_fee: Decimal,
    pub maker_fee_rate: Decimal,
    pub taker_fee_rate: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
    // not always returned
    #[serde(default)]
    pub last_fill_amount: Option<String>,
    #[serde(default)]
    pub last_fill_price: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
