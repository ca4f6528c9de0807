//! Drive socket session.
//!
//! Wraps a `tokio-tungstenite` connection to the vehicle's `/wsDrive`
//! endpoint: commands go out as JSON text, whatever the vehicle says comes
//! back as [`VehicleMessage`]s.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use messages::{DriveCommand, VehicleMessage, decode_message, encode_command};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{info, warn};

use crate::{PilotConfig, PilotError};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A connected drive socket.
pub struct DriveSocket {
    stream: WsStream,
}

impl DriveSocket {
    /// Connect to the vehicle's drive socket.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::InvalidBaseUrl`] for an unusable base URL and
    /// [`PilotError::Ws`] when the connection or handshake fails.
    pub async fn connect(config: &PilotConfig) -> Result<Self, PilotError> {
        let url = config.control_url()?;
        let (stream, _) = connect_async(url.as_str()).await?;
        info!(%url, "drive socket connected");
        Ok(Self { stream })
    }

    /// Send one steering/throttle command.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Ws`] when the send fails.
    pub async fn send_command(&mut self, command: &DriveCommand) -> Result<(), PilotError> {
        let text = encode_command(command);
        self.stream.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Receive the next message from the vehicle.
    ///
    /// Control frames and undecodable text are skipped with a warning;
    /// `Ok(None)` means the vehicle closed the socket.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Ws`] for transport failures.
    pub async fn next_message(&mut self) -> Result<Option<VehicleMessage>, PilotError> {
        loop {
            let Some(message) = self.stream.next().await else {
                info!("drive socket closed");
                return Ok(None);
            };
            if let Some(decoded) = accept_message(message?) {
                return Ok(Some(decoded));
            }
        }
    }

    /// Split into sink/stream halves so inbound traffic can be drained from
    /// a separate task while commands are being sent.
    #[must_use]
    pub fn split(self) -> (CommandSink, MessageSource) {
        let (sink, stream) = self.stream.split();
        (CommandSink { sink }, MessageSource { stream })
    }
}

/// Outbound half of a split [`DriveSocket`].
pub struct CommandSink {
    sink: SplitSink<WsStream, Message>,
}

impl CommandSink {
    /// Send one steering/throttle command.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Ws`] when the send fails.
    pub async fn send_command(&mut self, command: &DriveCommand) -> Result<(), PilotError> {
        let text = encode_command(command);
        self.sink.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Close the outbound half, flushing pending commands.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Ws`] when the close handshake fails.
    pub async fn close(&mut self) -> Result<(), PilotError> {
        self.sink.close().await?;
        Ok(())
    }
}

/// Inbound half of a split [`DriveSocket`].
pub struct MessageSource {
    stream: SplitStream<WsStream>,
}

impl MessageSource {
    /// Receive the next message from the vehicle; `Ok(None)` on close.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Ws`] for transport failures.
    pub async fn next_message(&mut self) -> Result<Option<VehicleMessage>, PilotError> {
        loop {
            let Some(message) = self.stream.next().await else {
                info!("drive socket closed");
                return Ok(None);
            };
            if let Some(decoded) = accept_message(message?) {
                return Ok(Some(decoded));
            }
        }
    }
}

/// Decode a websocket message, skipping everything that is not vehicle JSON.
fn accept_message(message: Message) -> Option<VehicleMessage> {
    match message {
        Message::Text(text) => match decode_message(text.as_str()) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(%error, "undecodable message on drive socket");
                None
            }
        },
        // A Close frame is followed by end-of-stream, which does the logging.
        Message::Close(_) => None,
        _ => None,
    }
}
