pub mod core;
pub mod exchanges;

pub use crate::core::{
    errors::ExchangeError,
    traits::{AccountInfo, MarketDataSource},
    types::*,
};
pub use crate::exchanges::coinex::CoinexConnector;
pub use crate::exchanges::gate::GateConnector;
pub use crate::exchanges::Venue;
