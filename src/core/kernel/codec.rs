use crate::core::errors::ExchangeError;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;
use tokio_tungstenite::tungstenite::Message;

/// Codec trait for handling exchange-specific WebSocket message encoding/decoding
///
/// A codec owns everything venue-specific about the stream: the command
/// envelope, the liveness ping, the optional login handshake, and the
/// mapping of inbound frames to typed events. The session only moves frames.
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing parsed messages from this exchange
    type Message: Send + 'static;

    /// Encode a command (subscribe, unsubscribe, query) into a text frame
    fn encode_command(&self, command: &WsCommand) -> Result<Message, ExchangeError>;

    /// Encode the application-level liveness ping
    fn encode_ping(&self) -> Result<Message, ExchangeError>;

    /// Encode the login command sent right after the socket opens.
    ///
    /// `None` means the venue streams anonymously.
    fn encode_login(
        &self,
        _api_key: &str,
        _secret_key: &str,
    ) -> Result<Option<Message>, ExchangeError> {
        Ok(None)
    }

    /// Inspect a frame received while waiting for the login reply
    ///
    /// # Returns
    /// - `Ok(Some(()))` - login accepted
    /// - `Ok(None)` - unrelated frame, keep waiting
    /// - `Err(error)` - login rejected or frame undecodable
    fn login_reply(&self, _message: &Message) -> Result<Option<()>, ExchangeError> {
        Ok(Some(()))
    }

    /// Decode a raw WebSocket message into a typed message
    ///
    /// # Returns
    /// - `Ok(Some(message))` - Successfully decoded message
    /// - `Ok(None)` - Control frame, ack, or a channel this codec does not know
    /// - `Err(error)` - Failed to decompress or parse the frame
    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, ExchangeError>;
}

/// A venue-neutral outbound command
#[derive(Debug, Clone, PartialEq)]
pub struct WsCommand {
    /// Method or channel name, e.g. `depth.subscribe` or `spot.order_book`
    pub method: String,
    /// Action on the channel for venues that separate the two (`subscribe`)
    pub event: Option<String>,
    pub params: Value,
}

impl WsCommand {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            event: None,
            params,
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }
}

/// Transport framing of an inbound message, separated from its payload
#[derive(Debug, Clone, PartialEq)]
pub struct InboundFrame {
    /// Method or channel name; empty for plain command replies
    pub channel: String,
    pub event: Option<String>,
    pub payload: Value,
    pub id: Option<Value>,
    /// Status carried by command replies
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl InboundFrame {
    /// Whether this frame is a reply reporting a failed command
    pub fn is_rejection(&self) -> bool {
        self.code.is_some_and(|code| code != 0)
    }

    /// Parse the payload into a typed event body
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, ExchangeError> {
        T::deserialize(&self.payload).map_err(|e| {
            ExchangeError::Frame(format!(
                "Failed to parse `{}` payload: {}",
                self.channel, e
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

/// Extract the payload bytes of a data frame, decompressing binary frames
/// when the venue compresses them. Control frames yield `None`.
pub fn frame_bytes(
    message: &Message,
    compression: Compression,
) -> Result<Option<Vec<u8>>, ExchangeError> {
    match message {
        Message::Text(text) => Ok(Some(text.as_bytes().to_vec())),
        Message::Binary(data) => match compression {
            Compression::Gzip => gunzip(data).map(Some),
            Compression::None => Ok(Some(data.clone())),
        },
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => Ok(None),
    }
}

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, ExchangeError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 4);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ExchangeError::Frame(format!("Failed to decompress frame: {}", e)))?;
    Ok(out)
}

/// Parse the outer JSON envelope of a frame
pub fn parse_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ExchangeError> {
    serde_json::from_slice(bytes).map_err(|e| {
        ExchangeError::Frame(format!(
            "Failed to parse frame envelope: {} ({})",
            e,
            String::from_utf8_lossy(bytes)
        ))
    })
}

/// Encode a JSON value as a single text frame
pub fn text_frame<T: serde::Serialize>(value: &T) -> Result<Message, ExchangeError> {
    serde_json::to_string(value)
        .map(Message::Text)
        .map_err(|e| ExchangeError::SerializationError(format!("Failed to encode command: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_gzip_binary_frame() {
        let message = Message::Binary(gzip(br#"{"method":"server.ping"}"#));
        let bytes = frame_bytes(&message, Compression::Gzip).unwrap().unwrap();
        assert_eq!(bytes, br#"{"method":"server.ping"}"#);
    }

    #[test]
    fn test_text_frame_passthrough() {
        let message = Message::Text("{}".to_string());
        assert_eq!(
            frame_bytes(&message, Compression::Gzip).unwrap().unwrap(),
            b"{}"
        );
        assert_eq!(
            frame_bytes(&message, Compression::None).unwrap().unwrap(),
            b"{}"
        );
    }

    #[test]
    fn test_control_frames_have_no_payload() {
        assert!(frame_bytes(&Message::Ping(vec![1]), Compression::None)
            .unwrap()
            .is_none());
        assert!(frame_bytes(&Message::Close(None), Compression::Gzip)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupt_gzip_is_frame_error() {
        let err = frame_bytes(&Message::Binary(vec![0x1f, 0x8b, 0, 1]), Compression::Gzip)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Frame(_)));
    }

    #[test]
    fn test_envelope_error_is_frame_error() {
        let err = parse_envelope::<Value>(b"{not json").unwrap_err();
        assert!(matches!(err, ExchangeError::Frame(_)));
    }

    #[test]
    fn test_rejection_flag() {
        let frame = InboundFrame {
            channel: String::new(),
            event: None,
            payload: Value::Null,
            id: Some(Value::from(3)),
            code: Some(20001),
            message: Some("invalid argument".to_string()),
        };
        assert!(frame.is_rejection());
        assert!(!InboundFrame { code: Some(0), ..frame }.is_rejection());
    }
}
