use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{frame_bytes, parse_envelope, text_frame};
use crate::core::kernel::{Compression, InboundFrame, TimestampUnit, WsCodec, WsCommand};
use crate::core::types::OrderBookUpdate;
use crate::exchanges::gate::conversions::{convert_gate_book_snapshot, convert_gate_book_update};
use crate::exchanges::gate::types::{GateBookSnapshot, GateBookUpdate};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio_tungstenite::tungstenite::Message;

pub const ORDER_BOOK: &str = "spot.order_book";
pub const ORDER_BOOK_UPDATE: &str = "spot.order_book_update";
pub const PING: &str = "spot.ping";

const EVENT_UPDATE: &str = "update";
const EVENT_SUBSCRIBE: &str = "subscribe";
const EVENT_UNSUBSCRIBE: &str = "unsubscribe";

#[derive(Debug, Clone, PartialEq)]
pub enum GateWsEvent {
    OrderBook(OrderBookUpdate),
    /// Channel reply carrying an error object
    CommandRejected {
        channel: String,
        code: i64,
        message: String,
    },
}

#[derive(Deserialize)]
struct GateFrameError {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct GateFrame {
    #[serde(default)]
    channel: String,
    #[serde(default)]
    event: Option<String>,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<GateFrameError>,
    #[serde(default)]
    id: Option<Value>,
}

impl From<GateFrame> for InboundFrame {
    fn from(frame: GateFrame) -> Self {
        let (code, message) = match frame.error {
            Some(error) => (Some(error.code), Some(error.message)),
            None => (None, None),
        };
        Self {
            channel: frame.channel,
            event: frame.event,
            payload: frame.result,
            id: frame.id,
            code,
            message,
        }
    }
}

/// Gate v4 spot stream codec. Frames are plain JSON text.
#[derive(Debug, Default, Clone, Copy)]
pub struct GateCodec;

impl GateCodec {
    pub fn new() -> Self {
        Self
    }

    /// `spot.order_book`: periodic full snapshots
    ///
    /// # Arguments
    /// * `level` - depth per side: `5`, `10`, `20`, `50` or `100`
    /// * `interval` - push cadence: `100ms` or `1000ms`
    pub fn order_book_subscription(&self, pair: &str, level: &str, interval: &str) -> WsCommand {
        WsCommand::new(ORDER_BOOK, json!([pair, level, interval])).with_event(EVENT_SUBSCRIBE)
    }

    /// `spot.order_book_update`: incremental changes, first message flagged full
    ///
    /// * `interval` - `20ms` or `100ms`
    pub fn order_book_update_subscription(&self, pair: &str, interval: &str) -> WsCommand {
        WsCommand::new(ORDER_BOOK_UPDATE, json!([pair, interval])).with_event(EVENT_SUBSCRIBE)
    }

    /// The unsubscribe counterpart of a subscription command
    pub fn unsubscription(&self, subscription: WsCommand) -> WsCommand {
        subscription.with_event(EVENT_UNSUBSCRIBE)
    }

    fn dispatch(&self, frame: InboundFrame) -> Result<Option<GateWsEvent>, ExchangeError> {
        if frame.is_rejection() {
            return Ok(Some(GateWsEvent::CommandRejected {
                channel: frame.channel,
                code: frame.code.unwrap_or_default(),
                message: frame.message.unwrap_or_default(),
            }));
        }
        if frame.event.as_deref() != Some(EVENT_UPDATE) {
            return Ok(None);
        }

        match frame.channel.as_str() {
            ORDER_BOOK => {
                let snapshot: GateBookSnapshot = frame.payload_as()?;
                Ok(Some(GateWsEvent::OrderBook(convert_gate_book_snapshot(
                    snapshot,
                ))))
            }
            ORDER_BOOK_UPDATE => {
                let update: GateBookUpdate = frame.payload_as()?;
                Ok(Some(GateWsEvent::OrderBook(convert_gate_book_update(
                    update,
                ))))
            }
            _ => Ok(None),
        }
    }
}

impl WsCodec for GateCodec {
    type Message = GateWsEvent;

    fn encode_command(&self, command: &WsCommand) -> Result<Message, ExchangeError> {
        let mut envelope = Map::new();
        envelope.insert(
            "time".to_string(),
            json!(TimestampUnit::Seconds.now()?),
        );
        envelope.insert("channel".to_string(), json!(command.method));
        if let Some(event) = &command.event {
            envelope.insert("event".to_string(), json!(event));
        }
        if !command.params.is_null() {
            envelope.insert("payload".to_string(), command.params.clone());
        }
        text_frame(&Value::Object(envelope))
    }

    fn encode_ping(&self) -> Result<Message, ExchangeError> {
        self.encode_command(&WsCommand::new(PING, Value::Null))
    }

    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, ExchangeError> {
        let Some(bytes) = frame_bytes(&message, Compression::None)? else {
            return Ok(None);
        };
        let frame: GateFrame = parse_envelope(&bytes)?;
        self.dispatch(frame.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: Value) -> Message {
        Message::Text(value.to_string())
    }

    fn encoded(message: Message) -> Value {
        match message {
            Message::Text(text) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_push() {
        let event = GateCodec
            .decode_message(frame(json!({
                "time": 1606292218,
                "time_ms": 1606292218231i64,
                "channel": "spot.order_book",
                "event": "update",
                "result": {
                    "t": 1606292218213i64,
                    "lastUpdateId": 48791820,
                    "s": "BTC_USDT",
                    "bids": [["19079.55", "0.0195"]],
                    "asks": [["19080.24", "0.1638"], ["19080.91", "0.0012"]]
                }
            })))
            .unwrap();

        match event {
            Some(GateWsEvent::OrderBook(book)) => {
                assert_eq!(book.pair, "BTC_USDT");
                assert!(book.is_full);
                assert_eq!(book.asks.len(), 2);
                assert_eq!(book.last_update_id, Some(48_791_820));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_incremental_push() {
        let event = GateCodec
            .decode_message(frame(json!({
                "time": 1606294781,
                "channel": "spot.order_book_update",
                "event": "update",
                "result": {
                    "t": 1606294781123i64,
                    "e": "depthUpdate",
                    "E": 1606294781,
                    "s": "BTC_USDT",
                    "U": 48776301,
                    "u": 48776306,
                    "b": [["19137.74", "0.0001"]],
                    "a": [["19137.75", "0"]]
                }
            })))
            .unwrap();

        match event {
            Some(GateWsEvent::OrderBook(book)) => {
                assert!(!book.is_full);
                assert_eq!(book.first_update_id, Some(48_776_301));
                assert_eq!(book.last_update_id, Some(48_776_306));
                assert!(book.asks[0].quantity.is_zero());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_acks_and_pongs_are_dropped() {
        let ack = frame(json!({
            "time": 1606292218,
            "channel": "spot.order_book",
            "event": "subscribe",
            "error": null,
            "result": {"status": "success"}
        }));
        let pong = frame(json!({"time": 1606292218, "channel": "spot.pong", "event": "", "result": null}));
        assert!(GateCodec.decode_message(ack).unwrap().is_none());
        assert!(GateCodec.decode_message(pong).unwrap().is_none());
    }

    #[test]
    fn test_unknown_channel_is_dropped() {
        let trade = frame(json!({"time": 1, "channel": "spot.trades", "event": "update", "result": {}}));
        assert!(GateCodec.decode_message(trade).unwrap().is_none());
    }

    #[test]
    fn test_error_reply() {
        let reply = frame(json!({
            "time": 1606292218,
            "channel": "spot.order_book",
            "event": "subscribe",
            "error": {"code": 2, "message": "unknown currency pair FOO_BAR"},
            "result": null
        }));
        assert_eq!(
            GateCodec.decode_message(reply).unwrap(),
            Some(GateWsEvent::CommandRejected {
                channel: "spot.order_book".to_string(),
                code: 2,
                message: "unknown currency pair FOO_BAR".to_string(),
            })
        );
    }

    #[test]
    fn test_bad_json_is_frame_error() {
        let result = GateCodec.decode_message(Message::Text("{\"channel\":".to_string()));
        assert!(matches!(result, Err(ExchangeError::Frame(_))));
    }

    #[test]
    fn test_subscription_envelope() {
        let command = GateCodec.order_book_subscription("BTC_USDT", "5", "100ms");
        let sent = encoded(GateCodec.encode_command(&command).unwrap());
        assert_eq!(sent["channel"], "spot.order_book");
        assert_eq!(sent["event"], "subscribe");
        assert_eq!(sent["payload"], json!(["BTC_USDT", "5", "100ms"]));
        assert!(sent["time"].as_u64().unwrap() > 1_600_000_000);

        let unsub = GateCodec.unsubscription(command);
        assert_eq!(unsub.event.as_deref(), Some("unsubscribe"));
    }

    #[test]
    fn test_ping_envelope() {
        let ping = encoded(GateCodec.encode_ping().unwrap());
        assert_eq!(ping["channel"], "spot.ping");
        assert!(ping.get("event").is_none());
        assert!(ping.get("payload").is_none());
    }

    #[test]
    fn test_anonymous_stream() {
        assert!(GateCodec.encode_login("k", "s").unwrap().is_none());
    }
}
