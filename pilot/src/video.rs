//! MJPEG video stream client.
//!
//! The vehicle's `/video` endpoint serves `multipart/x-mixed-replace` with
//! one JPEG image per part. [`MjpegDemuxer`] is a pure incremental parser
//! over arriving byte chunks; [`VideoStream`] feeds it from a streaming HTTP
//! response. Keeping the demuxer free of I/O lets the framing logic be
//! tested against synthetic byte streams.

use std::pin::Pin;

use bytes::{Buf, Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::PilotConfig;

/// Boundary token used by the stock vehicle video handler when the response
/// headers do not name one.
pub const DEFAULT_BOUNDARY: &str = "boundarydonotcross";

/// Part headers larger than this indicate a desynchronized stream.
const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Error type for video stream operations.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    /// The HTTP request for the stream failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The video endpoint answered with a non-success status.
    #[error("video endpoint returned HTTP {0}")]
    BadStatus(u16),
    /// A multipart part did not look like a JPEG frame.
    #[error("unexpected multipart part: {0}")]
    UnexpectedPart(String),
    /// A part carried an unparseable `Content-Length`.
    #[error("invalid content length: {0}")]
    BadLength(String),
    /// The HTTP stream ended; the vehicle serves frames indefinitely.
    #[error("video stream ended")]
    StreamEnded,
}

/// Extract the boundary token from a `Content-Type` header value.
///
/// Accepts quoted values and a leading `--` (the stock vehicle announces the
/// boundary with the dashes already attached).
#[must_use]
pub fn boundary_from_content_type(value: &str) -> Option<String> {
    for param in value.split(';').skip(1) {
        let mut parts = param.splitn(2, '=');
        let name = parts.next()?.trim();
        if !name.eq_ignore_ascii_case("boundary") {
            continue;
        }
        let token = parts
            .next()?
            .trim()
            .trim_matches('"')
            .trim_start_matches('-');
        if token.is_empty() {
            return None;
        }
        return Some(token.to_owned());
    }
    None
}

#[derive(Clone, Copy)]
enum DemuxState {
    /// Looking for the next `--<boundary>` marker.
    Boundary,
    /// Collecting part headers up to the blank line.
    Headers,
    /// Collecting the JPEG body.
    Body { expected: Option<usize> },
}

/// Incremental parser for a `multipart/x-mixed-replace` JPEG stream.
///
/// Byte chunks go in via [`push`](Self::push); complete JPEG bodies come out
/// via [`next_frame`](Self::next_frame). Chunk boundaries are arbitrary —
/// a frame may arrive in one chunk or one byte at a time.
pub struct MjpegDemuxer {
    boundary: Vec<u8>,
    buf: BytesMut,
    state: DemuxState,
}

impl MjpegDemuxer {
    /// Build a demuxer for the given boundary token (leading dashes are
    /// stripped; an empty token falls back to [`DEFAULT_BOUNDARY`]).
    #[must_use]
    pub fn new(boundary: &str) -> Self {
        let token = boundary.trim_start_matches('-');
        let token = if token.is_empty() {
            DEFAULT_BOUNDARY
        } else {
            token
        };

        Self {
            boundary: format!("--{token}").into_bytes(),
            buf: BytesMut::new(),
            state: DemuxState::Boundary,
        }
    }

    /// Append a chunk of raw stream bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Try to produce the next complete frame from buffered bytes.
    ///
    /// Returns `Ok(None)` when more input is needed.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::UnexpectedPart`] for non-JPEG parts or runaway
    /// headers and [`VideoError::BadLength`] for unparseable lengths.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>, VideoError> {
        loop {
            match self.state {
                DemuxState::Boundary => {
                    let Some(pos) = find(&self.buf, &self.boundary) else {
                        // Keep a tail that could be a marker prefix.
                        let keep = self.boundary.len() - 1;
                        let drop = self.buf.len().saturating_sub(keep);
                        self.buf.advance(drop);
                        return Ok(None);
                    };
                    self.buf.advance(pos + self.boundary.len());
                    self.state = DemuxState::Headers;
                }
                DemuxState::Headers => {
                    let Some(end) = find(&self.buf, b"\r\n\r\n") else {
                        if self.buf.len() > MAX_HEADER_BYTES {
                            return Err(VideoError::UnexpectedPart(
                                "part headers never terminated".to_owned(),
                            ));
                        }
                        return Ok(None);
                    };
                    let block = self.buf.split_to(end);
                    self.buf.advance(4);
                    let expected = parse_part_headers(&block)?;
                    self.state = DemuxState::Body { expected };
                }
                DemuxState::Body {
                    expected: Some(length),
                } => {
                    if self.buf.len() < length {
                        return Ok(None);
                    }
                    let frame = self.buf.split_to(length).freeze();
                    self.state = DemuxState::Boundary;
                    if frame.is_empty() {
                        continue;
                    }
                    return Ok(Some(frame));
                }
                DemuxState::Body { expected: None } => {
                    // No declared length: the next boundary delimits the body.
                    let mut delimiter = Vec::with_capacity(2 + self.boundary.len());
                    delimiter.extend_from_slice(b"\r\n");
                    delimiter.extend_from_slice(&self.boundary);
                    let Some(pos) = find(&self.buf, &delimiter) else {
                        return Ok(None);
                    };
                    let frame = self.buf.split_to(pos).freeze();
                    self.buf.advance(2);
                    self.state = DemuxState::Boundary;
                    if frame.is_empty() {
                        continue;
                    }
                    return Ok(Some(frame));
                }
            }
        }
    }
}

/// Parse a part's header block, returning the declared body length, if any.
fn parse_part_headers(block: &[u8]) -> Result<Option<usize>, VideoError> {
    let text = String::from_utf8_lossy(block);
    let mut expected = None;

    for line in text.split("\r\n") {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        match name.as_str() {
            "content-type" => {
                if !value.to_ascii_lowercase().starts_with("image/jpeg") {
                    return Err(VideoError::UnexpectedPart(value.to_owned()));
                }
            }
            "content-length" => {
                let length = value
                    .parse::<usize>()
                    .map_err(|_| VideoError::BadLength(value.to_owned()))?;
                expected = Some(length);
            }
            _ => {}
        }
    }

    Ok(expected)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Read image dimensions from a JPEG's start-of-frame marker.
///
/// Scans the marker segments of a baseline or progressive JPEG and returns
/// `(width, height)`. Returns `None` for anything that is not a parseable
/// JPEG — the caller treats geometry as advisory.
#[must_use]
pub fn jpeg_dimensions(data: &[u8]) -> Option<(u16, u16)> {
    if data.len() < 4 || data[0..2] != [0xFF, 0xD8] {
        return None;
    }

    let mut i = 2;
    while i + 4 <= data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];

        // Fill bytes before a marker.
        if marker == 0xFF {
            i += 1;
            continue;
        }
        // Standalone markers carry no length field.
        if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
            i += 2;
            continue;
        }

        let length = usize::from(u16::from_be_bytes([data[i + 2], data[i + 3]]));
        if length < 2 {
            return None;
        }

        // SOF0..SOF15, minus DHT/JPG/DAC which share the range.
        if matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF) {
            if i + 9 > data.len() {
                return None;
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]);
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]);
            return Some((width, height));
        }
        // Entropy-coded data follows; no SOF was seen.
        if marker == 0xDA {
            return None;
        }

        i += 2 + length;
    }

    None
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// A live MJPEG stream from the vehicle's video endpoint.
pub struct VideoStream {
    chunks: ByteStream,
    demuxer: MjpegDemuxer,
}

impl VideoStream {
    /// Open the vehicle's video stream.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::Http`] when the request fails and
    /// [`VideoError::BadStatus`] for a non-success response.
    pub async fn open(config: &PilotConfig) -> Result<Self, VideoError> {
        let url = config.video_url();
        let response = reqwest::Client::new().get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VideoError::BadStatus(status.as_u16()));
        }

        let boundary = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(boundary_from_content_type)
            .unwrap_or_else(|| DEFAULT_BOUNDARY.to_owned());
        debug!(%url, %boundary, "video stream connected");

        Ok(Self {
            chunks: Box::pin(response.bytes_stream()),
            demuxer: MjpegDemuxer::new(&boundary),
        })
    }

    /// Read the next JPEG frame, waiting for more stream data as needed.
    ///
    /// # Errors
    ///
    /// Propagates demuxer errors, transport errors, and
    /// [`VideoError::StreamEnded`] when the HTTP body finishes.
    pub async fn next_frame(&mut self) -> Result<Bytes, VideoError> {
        loop {
            if let Some(frame) = self.demuxer.next_frame()? {
                return Ok(frame);
            }
            let Some(chunk) = self.chunks.next().await else {
                return Err(VideoError::StreamEnded);
            };
            self.demuxer.push(&chunk?);
        }
    }
}

#[cfg(test)]
#[path = "video_test.rs"]
mod tests;
