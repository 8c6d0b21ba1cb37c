use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{frame_bytes, parse_envelope, text_frame};
use crate::core::kernel::{Compression, InboundFrame, Signer, WsCodec, WsCommand};
use crate::core::types::OrderBookUpdate;
use crate::exchanges::coinex::conversions::convert_coinex_depth_update;
use crate::exchanges::coinex::signer::CoinexSigner;
use crate::exchanges::coinex::types::CoinexDepth;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_tungstenite::tungstenite::Message;

pub const DEPTH_UPDATE: &str = "depth.update";
pub const DEPTH_SUBSCRIBE: &str = "depth.subscribe";
pub const DEPTH_UNSUBSCRIBE: &str = "depth.unsubscribe";
pub const SERVER_PING: &str = "server.ping";
pub const SERVER_SIGN: &str = "server.sign";

/// Request id reserved for the login command; other commands count up from 1
const LOGIN_REQUEST_ID: u64 = 0;

#[derive(Debug, Clone, PartialEq)]
pub enum CoinexWsEvent {
    OrderBook(OrderBookUpdate),
    /// Reply to a command carrying a non-zero code
    CommandRejected {
        id: Option<Value>,
        code: i64,
        message: String,
    },
}

#[derive(Deserialize)]
struct CoinexFrame {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl From<CoinexFrame> for InboundFrame {
    fn from(frame: CoinexFrame) -> Self {
        Self {
            channel: frame.method.unwrap_or_default(),
            event: None,
            payload: frame.data,
            id: frame.id,
            code: frame.code,
            message: frame.message,
        }
    }
}

/// CoinEx v2 spot stream codec. Server frames are gzip-compressed binary.
pub struct CoinexCodec {
    next_id: AtomicU64,
}

impl Default for CoinexCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinexCodec {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(LOGIN_REQUEST_ID + 1),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// `depth.subscribe` for each market with the same depth settings
    ///
    /// # Arguments
    /// * `limit` - Levels per side (5, 10, 20 or 50)
    /// * `interval` - Price merge granularity, `"0"` for none
    /// * `is_full` - Push full snapshots instead of increments
    pub fn depth_subscription(
        &self,
        markets: &[impl AsRef<str>],
        limit: u32,
        interval: &str,
        is_full: bool,
    ) -> WsCommand {
        let market_list: Vec<Value> = markets
            .iter()
            .map(|market| json!([market.as_ref(), limit, interval, is_full]))
            .collect();
        WsCommand::new(DEPTH_SUBSCRIBE, json!({ "market_list": market_list }))
    }

    /// `depth.unsubscribe`; an empty list drops every depth subscription
    pub fn depth_unsubscription(&self, markets: &[impl AsRef<str>]) -> WsCommand {
        let market_list: Vec<&str> = markets.iter().map(AsRef::as_ref).collect();
        WsCommand::new(DEPTH_UNSUBSCRIBE, json!({ "market_list": market_list }))
    }

    fn parse_frame(&self, message: &Message) -> Result<Option<InboundFrame>, ExchangeError> {
        let Some(bytes) = frame_bytes(message, Compression::Gzip)? else {
            return Ok(None);
        };
        let frame: CoinexFrame = parse_envelope(&bytes)?;
        Ok(Some(frame.into()))
    }

    fn dispatch(&self, frame: InboundFrame) -> Result<Option<CoinexWsEvent>, ExchangeError> {
        match frame.channel.as_str() {
            DEPTH_UPDATE => {
                let depth: CoinexDepth = frame.payload_as()?;
                Ok(Some(CoinexWsEvent::OrderBook(convert_coinex_depth_update(
                    depth,
                ))))
            }
            "" if frame.is_rejection() => Ok(Some(CoinexWsEvent::CommandRejected {
                id: frame.id,
                code: frame.code.unwrap_or_default(),
                message: frame.message.unwrap_or_default(),
            })),
            _ => Ok(None),
        }
    }
}

impl WsCodec for CoinexCodec {
    type Message = CoinexWsEvent;

    fn encode_command(&self, command: &WsCommand) -> Result<Message, ExchangeError> {
        text_frame(&json!({
            "id": self.next_id(),
            "method": command.method,
            "params": command.params,
        }))
    }

    fn encode_ping(&self) -> Result<Message, ExchangeError> {
        self.encode_command(&WsCommand::new(SERVER_PING, json!({})))
    }

    fn encode_login(
        &self,
        api_key: &str,
        secret_key: &str,
    ) -> Result<Option<Message>, ExchangeError> {
        let signer = CoinexSigner::new(api_key.to_string(), secret_key.to_string());
        let timestamp = signer.timestamp_unit().now()?;
        text_frame(&json!({
            "id": LOGIN_REQUEST_ID,
            "method": SERVER_SIGN,
            "params": {
                "access_id": signer.api_key(),
                "signed_str": signer.login_signature(timestamp)?,
                "timestamp": timestamp,
            },
        }))
        .map(Some)
    }

    fn login_reply(&self, message: &Message) -> Result<Option<()>, ExchangeError> {
        let Some(frame) = self.parse_frame(message)? else {
            return Ok(None);
        };
        if frame.id.as_ref().and_then(Value::as_u64) != Some(LOGIN_REQUEST_ID)
            || frame.code.is_none()
        {
            return Ok(None);
        }
        if frame.is_rejection() {
            return Err(ExchangeError::Application {
                code: frame.code.unwrap_or_default().to_string(),
                message: frame.message.unwrap_or_default(),
            });
        }
        Ok(Some(()))
    }

    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, ExchangeError> {
        match self.parse_frame(&message)? {
            Some(frame) => self.dispatch(frame),
            None => Ok(None),
        }
    }
}
