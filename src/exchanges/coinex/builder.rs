use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::ReqwestRest;
use crate::exchanges::coinex::connector::CoinexConnector;
use crate::exchanges::Venue;

/// Create a CoinEx connector; requests are signed when the config has credentials
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<CoinexConnector<ReqwestRest>, ExchangeError> {
    let rest = Venue::Coinex.rest_client(&config)?;
    Ok(CoinexConnector::new(rest, config))
}

/// Create a CoinEx connector from `COINEX_*` environment variables, read-only
/// when no credentials are set
pub fn build_connector_from_env() -> Result<CoinexConnector<ReqwestRest>, ExchangeError> {
    build_connector(ExchangeConfig::from_env_or_read_only("COINEX"))
}
