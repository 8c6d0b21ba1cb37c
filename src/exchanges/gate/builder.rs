use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::ReqwestRest;
use crate::exchanges::gate::connector::GateConnector;
use crate::exchanges::Venue;

/// Create a Gate connector; requests are signed when the config has credentials
pub fn build_connector(config: ExchangeConfig) -> Result<GateConnector<ReqwestRest>, ExchangeError> {
    let rest = Venue::Gate.rest_client(&config)?;
    Ok(GateConnector::new(rest, config))
}

/// Create a Gate connector from `GATE_*` environment variables
pub fn build_connector_from_env() -> Result<GateConnector<ReqwestRest>, ExchangeError> {
    build_connector(ExchangeConfig::from_env_or_read_only("GATE"))
}
