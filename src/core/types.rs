use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] rust_decimal::Error),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Type-safe price representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn parse(s: &str) -> Result<Self, TypesError> {
        Ok(Self(s.parse()?))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe quantity representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Quantity {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let value: Decimal = s.parse()?;
        if value.is_sign_negative() {
            return Err(TypesError::InvalidQuantity(s.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One price level. On the wire this is a `[price, size]` pair, with either
/// side encoded as a string or a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Decimal; 2]")]
pub struct OrderBookEntry {
    pub price: Price,
    pub quantity: Quantity,
}

impl From<[Decimal; 2]> for OrderBookEntry {
    fn from([price, quantity]: [Decimal; 2]) -> Self {
        Self {
            price: Price(price),
            quantity: Quantity(quantity),
        }
    }
}

/// Order book snapshot fetched over REST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub pair: String,
    pub asks: Vec<OrderBookEntry>,
    pub bids: Vec<OrderBookEntry>,
    pub timestamp: Option<i64>,
}

/// Order book push from a stream session.
///
/// `is_full` tells whether the message replaces the whole view or only
/// carries changed levels (a zero quantity removes a level). Keeping a local
/// book in sync is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookUpdate {
    pub pair: String,
    pub asks: Vec<OrderBookEntry>,
    pub bids: Vec<OrderBookEntry>,
    pub is_full: bool,
    pub checksum: Option<i64>,
    pub last_price: Option<Price>,
    pub updated_at: Option<i64>,
    pub first_update_id: Option<i64>,
    pub last_update_id: Option<i64>,
}

impl OrderBookUpdate {
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Quantity,
    pub locked: Quantity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_entry_from_string_pair() {
        let entry: OrderBookEntry = serde_json::from_str(r#"["30000.5","0.25"]"#).unwrap();
        assert_eq!(entry.price, Price::parse("30000.5").unwrap());
        assert_eq!(entry.quantity.value(), Decimal::from_str("0.25").unwrap());
    }

    #[test]
    fn test_entry_from_numeric_pair() {
        let entry: OrderBookEntry = serde_json::from_str("[1.5, 2]").unwrap();
        assert_eq!(entry.price.to_string(), "1.5");
        assert_eq!(entry.quantity.to_string(), "2");
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert!(Quantity::parse("-1").is_err());
        assert!(Quantity::parse("0").unwrap().is_zero());
    }

    #[test]
    fn test_order_side_wire_format() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), r#""buy""#);
        let side: OrderSide = serde_json::from_str(r#""sell""#).unwrap();
        assert_eq!(side, OrderSide::Sell);
    }

    #[test]
    fn test_price_serializes_as_string() {
        let json = serde_json::to_string(&Price::parse("42.10").unwrap()).unwrap();
        assert_eq!(json, r#""42.10""#);
    }
}
