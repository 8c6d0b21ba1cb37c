use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{WsCodec, WsCommand};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, Secret};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;
type WsReader = SplitStream<WsStream>;

/// Receiving end of a session: decoded events and stream failures, in wire order
pub type EventReceiver<T> = mpsc::Receiver<Result<T, ExchangeError>>;
type EventSender<T> = mpsc::Sender<Result<T, ExchangeError>>;

/// WebSocket session configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Connection (and login handshake) timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Application ping interval in milliseconds
    pub heartbeat_interval_ms: u64,
    /// Longest silence tolerated on the read side, in milliseconds.
    /// Must exceed the heartbeat interval.
    pub read_timeout_ms: u64,
    /// Capacity of the event channel
    pub message_buffer_size: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,    // 10 seconds
            heartbeat_interval_ms: 10_000, // 10 seconds
            read_timeout_ms: 120_000,      // 2 minutes
            message_buffer_size: 1024,
        }
    }
}

impl WsConfig {
    /// Configuration for a given ping cadence; the read deadline defaults to
    /// ten heartbeats.
    pub fn with_heartbeat(heartbeat: Duration) -> Self {
        let heartbeat_interval_ms = heartbeat.as_millis() as u64;
        Self {
            heartbeat_interval_ms,
            read_timeout_ms: heartbeat_interval_ms.saturating_mul(10),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout_ms = read_timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout_ms = connect_timeout.as_millis() as u64;
        self
    }

    #[must_use]
    pub fn message_buffer_size(mut self, size: usize) -> Self {
        self.message_buffer_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.heartbeat_interval_ms == 0 {
            return Err(ExchangeError::ConfigurationError(
                "heartbeat interval must be positive".to_string(),
            ));
        }
        if self.read_timeout_ms <= self.heartbeat_interval_ms {
            return Err(ExchangeError::ConfigurationError(format!(
                "read timeout ({} ms) must be greater than heartbeat interval ({} ms)",
                self.read_timeout_ms, self.heartbeat_interval_ms
            )));
        }
        if self.message_buffer_size == 0 {
            return Err(ExchangeError::ConfigurationError(
                "message buffer size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn connect_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Lifecycle of a [`WsSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Closing,
    Closed,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One live connection: the write half and the signals shared by the caller,
/// the keepalive task and the read task.
///
/// `shutdown` stops both loops and fires on any failure. `close_requested`
/// fires only from [`WsSession::close`]; pending deliveries wait for it, so a
/// failure is still handed to a slow consumer.
struct Link<C: WsCodec> {
    exchange_name: String,
    codec: Arc<C>,
    state: Arc<StdMutex<SessionState>>,
    writer: Mutex<Option<WsWriter>>,
    shutdown: CancellationToken,
    close_requested: CancellationToken,
    failed: AtomicBool,
}

impl<C: WsCodec> Link<C> {
    fn begin_closing(&self) {
        let mut state = lock(&self.state);
        if *state == SessionState::Connected {
            *state = SessionState::Closing;
        }
    }

    /// Write one frame. A closed link swallows the write; a failed write
    /// tears the link down and is returned to the sender.
    async fn send(&self, message: Message) -> Result<(), ExchangeError> {
        let mut writer = self.writer.lock().await;
        let Some(sink) = writer.as_mut() else {
            debug!(exchange = %self.exchange_name, "Dropping write on closed session");
            return Ok(());
        };

        if let Err(e) = sink.send(message).await {
            writer.take();
            drop(writer);
            self.begin_closing();
            self.shutdown.cancel();
            return Err(ExchangeError::NetworkError(format!(
                "Failed to send message: {}",
                e
            )));
        }
        Ok(())
    }

    /// Shutdown routine shared by `close` and self-detected failures.
    async fn shut_down(&self) -> Result<(), ExchangeError> {
        self.begin_closing();
        self.shutdown.cancel();

        let Some(mut sink) = self.writer.lock().await.take() else {
            return Ok(());
        };
        match sink.close().await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(tungstenite::Error::Io(e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::BrokenPipe
                        | std::io::ErrorKind::NotConnected
                        | std::io::ErrorKind::ConnectionReset
                ) =>
            {
                Ok(())
            }
            Err(e) => Err(ExchangeError::NetworkError(format!(
                "Failed to close connection: {}",
                e
            ))),
        }
    }

    /// Hand one item to the consumer, waiting for room unless the caller
    /// closes the session.
    async fn deliver(
        &self,
        events: &EventSender<C::Message>,
        item: Result<C::Message, ExchangeError>,
    ) -> bool {
        tokio::select! {
            biased;
            sent = events.send(item) => sent.is_ok(),
            () = self.close_requested.cancelled() => false,
        }
    }

    /// Tear the link down after a self-detected failure and report it.
    /// Only the first failure of a link reaches the consumer.
    async fn fail(&self, events: &EventSender<C::Message>, error: ExchangeError) {
        if self.failed.swap(true, Ordering::AcqRel) {
            debug!(exchange = %self.exchange_name, error = %error, "Suppressing follow-up stream error");
            return;
        }
        error!(exchange = %self.exchange_name, error = %error, "WebSocket stream failed");

        if let Err(e) = self.shut_down().await {
            warn!(exchange = %self.exchange_name, error = %e, "Error while closing WebSocket");
        }
        if !self.deliver(events, Err(error)).await {
            debug!(exchange = %self.exchange_name, "Stream error not delivered, session closed by caller");
        }
    }
}

/// Persistent WebSocket session driven by a venue codec.
///
/// `connect` opens the socket and starts two tasks: a keepalive loop sending
/// the codec's ping every heartbeat, and a read loop decoding frames into
/// events on the returned channel. Commands can be sent concurrently from any
/// task holding a reference. The session never reconnects on its own; after a
/// failure call [`WsSession::close`] and then `connect` again.
pub struct WsSession<C: WsCodec> {
    url: String,
    exchange_name: String,
    codec: Arc<C>,
    config: WsConfig,
    credentials: Option<(String, Secret<String>)>,
    state: Arc<StdMutex<SessionState>>,
    link: StdMutex<Option<Arc<Link<C>>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: WsCodec> WsSession<C> {
    /// Create a new session
    ///
    /// # Arguments
    /// * `url` - Full WebSocket URL, venue path included
    /// * `exchange_name` - Name of the exchange for logging/tracing
    /// * `codec` - The codec handling message encoding/decoding
    /// * `config` - Timeouts and buffer sizes
    pub fn new(url: String, exchange_name: String, codec: C, config: WsConfig) -> Self {
        Self {
            url,
            exchange_name,
            codec: Arc::new(codec),
            config,
            credentials: None,
            state: Arc::new(StdMutex::new(SessionState::Disconnected)),
            link: StdMutex::new(None),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Log in with these credentials right after the socket opens, for codecs
    /// that support it.
    #[must_use]
    pub fn with_credentials(mut self, api_key: String, secret_key: Secret<String>) -> Self {
        self.credentials = Some((api_key, secret_key));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    fn set_state(&self, state: SessionState) {
        *lock(&self.state) = state;
    }

    /// Open the connection and start the background tasks.
    ///
    /// Allowed from `Disconnected` and `Closed`. On failure the session is
    /// back in `Disconnected` and no task is running.
    #[instrument(skip(self), fields(exchange = %self.exchange_name, url = %self.url))]
    pub async fn connect(&self) -> Result<EventReceiver<C::Message>, ExchangeError> {
        self.config.validate()?;
        let mut tasks = self.tasks.lock().await;

        {
            let mut state = lock(&self.state);
            match *state {
                SessionState::Disconnected | SessionState::Closed => {
                    *state = SessionState::Connecting;
                }
                other => {
                    return Err(ExchangeError::InvalidParameters(format!(
                        "cannot connect a session in state {:?}; close it first",
                        other
                    )));
                }
            }
        }

        let (writer, reader) = match self.handshake().await {
            Ok(halves) => halves,
            Err(e) => {
                error!(exchange = %self.exchange_name, error = %e, "WebSocket connect failed");
                self.set_state(SessionState::Disconnected);
                return Err(e);
            }
        };

        let (events_tx, events_rx) = mpsc::channel(self.config.message_buffer_size);
        let link = Arc::new(Link {
            exchange_name: self.exchange_name.clone(),
            codec: self.codec.clone(),
            state: self.state.clone(),
            writer: Mutex::new(Some(writer)),
            shutdown: CancellationToken::new(),
            close_requested: CancellationToken::new(),
            failed: AtomicBool::new(false),
        });
        *lock(&self.link) = Some(link.clone());
        self.set_state(SessionState::Connected);

        let heartbeat = Duration::from_millis(self.config.heartbeat_interval_ms);
        let read_timeout = Duration::from_millis(self.config.read_timeout_ms);
        tasks.push(tokio::spawn(keepalive_loop(
            link.clone(),
            heartbeat,
            events_tx.clone(),
        )));
        tasks.push(tokio::spawn(read_loop(link, reader, read_timeout, events_tx)));

        info!(exchange = %self.exchange_name, "WebSocket connected");
        Ok(events_rx)
    }

    async fn handshake(&self) -> Result<(WsWriter, WsReader), ExchangeError> {
        let connect_timeout = self.config.connect_timeout_duration();
        let (ws_stream, _) = timeout(connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| {
                ExchangeError::ConnectionTimeout(format!(
                    "Connection to {} timed out after {:?}",
                    self.url, connect_timeout
                ))
            })?
            .map_err(|e| {
                ExchangeError::NetworkError(format!("WebSocket connection failed: {}", e))
            })?;

        let (mut writer, mut reader) = ws_stream.split();

        if let Some((api_key, secret)) = &self.credentials {
            if let Some(login) = self.codec.encode_login(api_key, secret.expose_secret())? {
                writer.send(login).await.map_err(|e| {
                    ExchangeError::NetworkError(format!("Failed to send login: {}", e))
                })?;
                timeout(connect_timeout, self.await_login(&mut reader))
                    .await
                    .map_err(|_| {
                        ExchangeError::ConnectionTimeout("No login reply received".to_string())
                    })??;
                debug!(exchange = %self.exchange_name, "WebSocket login accepted");
            }
        }

        Ok((writer, reader))
    }

    async fn await_login(&self, reader: &mut WsReader) -> Result<(), ExchangeError> {
        while let Some(frame) = reader.next().await {
            let frame = frame
                .map_err(|e| ExchangeError::NetworkError(format!("WebSocket error: {}", e)))?;
            if self.codec.login_reply(&frame)?.is_some() {
                return Ok(());
            }
        }
        Err(ExchangeError::NetworkError(
            "Connection closed during login".to_string(),
        ))
    }

    fn current_link(&self) -> Option<Arc<Link<C>>> {
        lock(&self.link).clone()
    }

    /// Send a raw frame. A no-op once the session is closing or closed.
    pub async fn send_raw(&self, message: Message) -> Result<(), ExchangeError> {
        match self.current_link() {
            Some(link) => link.send(message).await,
            None => Ok(()),
        }
    }

    /// Encode a command with the codec and send it
    #[instrument(skip(self, command), fields(exchange = %self.exchange_name, method = %command.method))]
    pub async fn send_command(&self, command: &WsCommand) -> Result<(), ExchangeError> {
        let message = self.codec.encode_command(command)?;
        self.send_raw(message).await
    }

    /// Close the connection and wait for both background tasks.
    ///
    /// Idempotent: closing a session that is not connected succeeds.
    #[instrument(skip(self), fields(exchange = %self.exchange_name))]
    pub async fn close(&self) -> Result<(), ExchangeError> {
        let mut tasks = self.tasks.lock().await;
        let link = lock(&self.link).take();
        let Some(link) = link else {
            return Ok(());
        };

        link.close_requested.cancel();
        let result = link.shut_down().await;
        if let Err(e) = &result {
            warn!(exchange = %self.exchange_name, error = %e, "Error while closing WebSocket");
        }

        for handle in tasks.drain(..) {
            if let Err(e) = handle.await {
                warn!(exchange = %self.exchange_name, error = %e, "WebSocket task ended abnormally");
            }
        }

        self.set_state(SessionState::Closed);
        info!(exchange = %self.exchange_name, "WebSocket closed");
        result
    }
}

impl<C: WsCodec> Drop for WsSession<C> {
    fn drop(&mut self) {
        if let Some(link) = lock(&self.link).take() {
            link.close_requested.cancel();
            link.shutdown.cancel();
        }
    }
}

async fn keepalive_loop<C: WsCodec>(
    link: Arc<Link<C>>,
    period: Duration,
    events: EventSender<C::Message>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = link.shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let sent = match link.codec.encode_ping() {
                    Ok(ping) => link.send(ping).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = sent {
                    warn!(exchange = %link.exchange_name, error = %e, "Keepalive ping failed");
                    link.fail(&events, e).await;
                    break;
                }
            }
        }
    }
    debug!(exchange = %link.exchange_name, "Keepalive loop stopped");
}

async fn read_loop<C: WsCodec>(
    link: Arc<Link<C>>,
    mut reader: WsReader,
    read_timeout: Duration,
    events: EventSender<C::Message>,
) {
    loop {
        let next = tokio::select! {
            () = link.shutdown.cancelled() => break,
            next = timeout(read_timeout, reader.next()) => next,
        };

        let decoded = match next {
            Err(_) => Err(ExchangeError::ConnectionTimeout(format!(
                "No frame received within {:?}",
                read_timeout
            ))),
            Ok(None) => Err(ExchangeError::NetworkError(
                "Connection closed by peer".to_string(),
            )),
            Ok(Some(Err(e))) => Err(ExchangeError::NetworkError(format!(
                "WebSocket error: {}",
                e
            ))),
            Ok(Some(Ok(Message::Close(frame)))) => Err(ExchangeError::NetworkError(format!(
                "Connection closed by peer: {:?}",
                frame
            ))),
            Ok(Some(Ok(message))) => link.codec.decode_message(message),
        };

        match decoded {
            Ok(Some(event)) => {
                if !link.deliver(&events, Ok(event)).await {
                    if events.is_closed() {
                        debug!(exchange = %link.exchange_name, "Event receiver dropped, shutting down");
                        if let Err(e) = link.shut_down().await {
                            warn!(exchange = %link.exchange_name, error = %e, "Error while closing WebSocket");
                        }
                    }
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                if !link.close_requested.is_cancelled() {
                    link.fail(&events, e).await;
                }
                break;
            }
        }
    }
    debug!(exchange = %link.exchange_name, "Read loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_read_timeout_must_exceed_heartbeat() {
        let config =
            WsConfig::with_heartbeat(Duration::from_secs(10)).read_timeout(Duration::from_secs(10));
        assert!(matches!(
            config.validate(),
            Err(ExchangeError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_heartbeat_derives_read_timeout() {
        let config = WsConfig::with_heartbeat(Duration::from_secs(3));
        assert_eq!(config.heartbeat_interval_ms, 3_000);
        assert_eq!(config.read_timeout_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = WsConfig::default().message_buffer_size(0);
        assert!(config.validate().is_err());
    }
}
