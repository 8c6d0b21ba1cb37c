/// Kernel - venue-agnostic transport layer
///
/// The kernel holds the transport machinery shared by every venue: signed
/// REST calls, the persistent WebSocket session, and the traits a venue plugs
/// into them. It contains no venue-specific logic.
///
/// # Architecture
///
/// ## Transport Layer
/// - `RestClient`: HTTP client interface, one attempt per call
/// - `WsSession`: WebSocket connection with keepalive and read tasks
///
/// ## Authentication
/// - `Signer`: pluggable request signing, one digest per request
/// - `canonical_query`: order-independent query encoding
///
/// ## Message Handling
/// - `WsCodec`: venue-specific command encoding and frame decoding
///
/// # Usage
///
/// ## REST client
/// ```rust,no_run
/// use venuelink::core::kernel::*;
/// use venuelink::exchanges::coinex::CoinexSigner;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new(
///     "https://api.coinex.com".to_string(),
///     "coinex".to_string(),
/// );
/// let signer = Arc::new(CoinexSigner::new("api_key".to_string(), "secret".to_string()));
/// let rest = RestClientBuilder::new(rest_config).with_signer(signer).build()?;
///
/// let balances: Value = rest.get_json("/v2/assets/spot/balance", &[], true).await?;
/// # Ok(())
/// # }
/// ```
///
/// ## WebSocket session
/// ```rust,no_run
/// use venuelink::core::kernel::*;
/// use venuelink::exchanges::coinex::{CoinexCodec, CoinexWsEvent};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = WsSession::new(
///     "wss://socket.coinex.com/v2/spot".to_string(),
///     "coinex".to_string(),
///     CoinexCodec::new(),
///     WsConfig::default(),
/// );
/// let mut events = session.connect().await?;
/// session
///     .send_command(&session.codec().depth_subscription(&["BTCUSDT"], 10, "0", true))
///     .await?;
///
/// while let Some(event) = events.recv().await {
///     if let CoinexWsEvent::OrderBook(book) = event? {
///         println!("{} full={}", book.pair, book.is_full);
///     }
/// }
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub mod codec;
pub mod rest;
pub mod signer;
pub mod ws;

// Re-export key types for convenience
pub use codec::{Compression, InboundFrame, WsCodec, WsCommand};
pub use rest::{ReqwestRest, ResponseEnvelope, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{canonical_query, SignatureResult, SignedRequest, Signer, TimestampUnit};
pub use ws::{EventReceiver, SessionState, WsConfig, WsSession};
