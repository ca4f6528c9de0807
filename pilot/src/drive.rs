//! The drive loop: one command per captured video frame.

use messages::DriveCommand;
use tracing::{debug, info, warn};

use crate::session::DriveSocket;
use crate::video::{VideoStream, jpeg_dimensions};
use crate::{PilotConfig, PilotError};

/// Decides the command to send for each captured frame.
///
/// This is the seam for car logic: implementations get the raw JPEG bytes
/// of the current frame and return the command to emit for it.
pub trait Pilot {
    /// Produce the command for the given frame.
    fn command(&mut self, frame: &[u8]) -> DriveCommand;
}

/// A pilot that emits the same command for every frame.
#[derive(Clone, Copy, Debug)]
pub struct ConstantPilot {
    command: DriveCommand,
}

impl ConstantPilot {
    /// Build a pilot that always answers with `command`.
    #[must_use]
    pub fn new(command: DriveCommand) -> Self {
        Self { command }
    }
}

impl Pilot for ConstantPilot {
    fn command(&mut self, _frame: &[u8]) -> DriveCommand {
        self.command
    }
}

/// Options for [`run_drive`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DriveOptions {
    /// Stop after this many frames; `None` drives until the stream ends.
    pub max_frames: Option<usize>,
    /// Log a progress line every N frames; `0` disables progress logging.
    pub progress_every: usize,
}

/// Summary of a finished drive loop.
#[derive(Clone, Copy, Debug)]
pub struct DriveReport {
    /// Number of frames captured and commands sent.
    pub frames: usize,
    /// Width of the first frame, when its JPEG header was readable.
    pub width: Option<u16>,
    /// Height of the first frame, when its JPEG header was readable.
    pub height: Option<u16>,
}

/// Drive the vehicle: connect the control socket, open the video stream,
/// and send one command per captured frame.
///
/// The first frame only establishes the camera geometry; commands start
/// with the frame after it. Everything the vehicle sends back on the
/// socket is drained and logged by a background task. On a limited run
/// (`max_frames`) an all-stop command is sent before hanging up.
///
/// # Errors
///
/// Propagates connection, transport, and video stream errors. The video
/// stream ending is an error ([`crate::VideoError::StreamEnded`]); there is
/// no retry.
pub async fn run_drive(
    config: &PilotConfig,
    mut pilot: impl Pilot,
    options: DriveOptions,
) -> Result<DriveReport, PilotError> {
    let socket = DriveSocket::connect(config).await?;
    let (mut sink, mut source) = socket.split();

    // Drain and log everything the vehicle sends back.
    let reader = tokio::spawn(async move {
        loop {
            match source.next_message().await {
                Ok(Some(message)) => info!(%message, "vehicle message"),
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "drive socket read failed");
                    break;
                }
            }
        }
    });

    let mut video = VideoStream::open(config).await?;

    // First frame establishes the camera geometry.
    let first = video.next_frame().await?;
    let dimensions = jpeg_dimensions(&first);
    match dimensions {
        Some((width, height)) => info!(width, height, "video stream open"),
        None => warn!("first frame has no readable JPEG dimensions"),
    }

    let mut frames = 0_usize;
    let result = loop {
        if options.max_frames.is_some_and(|limit| frames >= limit) {
            break Ok(());
        }
        let frame = match video.next_frame().await {
            Ok(frame) => frame,
            Err(error) => break Err(PilotError::from(error)),
        };

        let command = pilot.command(&frame);
        if let Err(error) = sink.send_command(&command).await {
            break Err(error);
        }
        debug!(
            angle = command.angle,
            throttle = command.throttle,
            "command sent"
        );

        frames += 1;
        if options.progress_every > 0 && frames.is_multiple_of(options.progress_every) {
            info!(frames, "driving");
        }
    };

    // Bring the vehicle to rest before hanging up. On a transport error the
    // socket is already gone, so a failed stop is not worth surfacing.
    if sink.send_command(&DriveCommand::stop()).await.is_ok() {
        let _ = sink.close().await;
    }
    reader.abort();

    result?;
    Ok(DriveReport {
        frames,
        width: dimensions.map(|(width, _)| width),
        height: dimensions.map(|(_, height)| height),
    })
}

#[cfg(test)]
#[path = "drive_test.rs"]
mod tests;
