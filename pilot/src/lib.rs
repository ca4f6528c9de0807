//! Remote pilot client for a camera-equipped vehicle.
//!
//! This crate drives the vehicle's web controller from the outside: it opens
//! the persistent drive websocket, opens the MJPEG video stream over HTTP,
//! and emits one steering/throttle command per captured frame.

pub mod config;
pub mod drive;
pub mod session;
pub mod video;

pub use config::PilotConfig;
pub use drive::{ConstantPilot, DriveOptions, DriveReport, Pilot, run_drive};
pub use session::DriveSocket;
pub use video::{MjpegDemuxer, VideoError, VideoStream, jpeg_dimensions};

/// Error type for pilot operations.
#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    /// The base URL could not be converted to a websocket URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The websocket connection, handshake, or transport failed.
    #[error("drive socket failed: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    /// An inbound text message could not be decoded.
    #[error("message decode failed: {0}")]
    Decode(#[from] messages::CodecError),
    /// The video stream failed or ended.
    #[error(transparent)]
    Video(#[from] video::VideoError),
}

impl From<tokio_tungstenite::tungstenite::Error> for PilotError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[cfg(test)]
#[path = "e2e_drive_test.rs"]
mod tests;
