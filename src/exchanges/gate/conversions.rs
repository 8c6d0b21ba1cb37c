use crate::core::types::{Balance, OrderBook, OrderBookUpdate, Quantity};
use crate::exchanges::gate::types::{GateAccount, GateBookSnapshot, GateBookUpdate, GateOrderBook};

pub fn convert_gate_book_snapshot(snapshot: GateBookSnapshot) -> OrderBookUpdate {
    OrderBookUpdate {
        pair: snapshot.pair,
        asks: snapshot.asks,
        bids: snapshot.bids,
        is_full: true,
        checksum: None,
        last_price: None,
        updated_at: Some(snapshot.time_ms),
        first_update_id: None,
        last_update_id: Some(snapshot.last_update_id),
    }
}

pub fn convert_gate_book_update(update: GateBookUpdate) -> OrderBookUpdate {
    OrderBookUpdate {
        pair: update.pair,
        asks: update.asks,
        bids: update.bids,
        is_full: update.full,
        checksum: None,
        last_price: None,
        updated_at: Some(update.time_ms),
        first_update_id: Some(update.first_update_id),
        last_update_id: Some(update.last_update_id),
    }
}

pub fn convert_gate_order_book(pair: &str, book: GateOrderBook) -> OrderBook {
    OrderBook {
        pair: pair.to_string(),
        asks: book.asks,
        bids: book.bids,
        timestamp: book.current,
    }
}

pub fn convert_gate_account(account: GateAccount) -> Balance {
    Balance {
        asset: account.currency,
        free: Quantity::new(account.available),
        locked: Quantity::new(account.locked),
    }
}
