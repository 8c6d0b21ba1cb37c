pub mod builder;
pub mod codec;
pub mod connector;
pub mod conversions;
pub mod rest;
pub mod signer;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_connector, build_connector_from_env};
pub use codec::{GateCodec, GateWsEvent};
pub use connector::GateConnector;
pub use rest::GateRestClient;
pub use signer::GateSigner;
pub use types::{
    GateAccount, GateBookSnapshot, GateBookUpdate, GateCurrency, GateCurrencyPair,
    GateDepositAddress, GateOrder, GateOrderBook, GateOrderRequest, GateOrderStatus,
    GateOrderType, GateWithdrawal, GateWithdrawalRequest,
};
