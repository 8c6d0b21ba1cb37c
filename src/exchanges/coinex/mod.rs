pub mod builder;
pub mod codec;
pub mod connector;
pub mod conversions;
pub mod rest;
pub mod signer;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_connector, build_connector_from_env};
pub use codec::{CoinexCodec, CoinexWsEvent};
pub use connector::CoinexConnector;
pub use rest::CoinexRestClient;
pub use signer::CoinexSigner;
pub use types::{
    CoinexBalance, CoinexDepositAddress, CoinexDepositWithdrawConfig, CoinexDepth, CoinexKline,
    CoinexMarket, CoinexMarketType, CoinexOrder, CoinexOrderRequest, CoinexOrderType,
    CoinexWithdrawMethod, CoinexWithdrawRequest, CoinexWithdrawal,
};
