use crate::core::types::{Balance, OrderBook, OrderBookUpdate, Price, Quantity};
use crate::exchanges::coinex::types::{CoinexBalance, CoinexDepth};

pub fn convert_coinex_depth_update(depth: CoinexDepth) -> OrderBookUpdate {
    OrderBookUpdate {
        pair: depth.market,
        asks: depth.depth.asks,
        bids: depth.depth.bids,
        is_full: depth.is_full,
        checksum: depth.depth.checksum,
        last_price: depth.depth.last.map(Price::new),
        updated_at: depth.depth.updated_at,
        first_update_id: None,
        last_update_id: None,
    }
}

pub fn convert_coinex_depth_snapshot(depth: CoinexDepth) -> OrderBook {
    OrderBook {
        pair: depth.market,
        asks: depth.depth.asks,
        bids: depth.depth.bids,
        timestamp: depth.depth.updated_at,
    }
}

pub fn convert_coinex_balance(balance: CoinexBalance) -> Balance {
    Balance {
        asset: balance.ccy,
        free: Quantity::new(balance.available),
        locked: Quantity::new(balance.frozen),
    }
}
