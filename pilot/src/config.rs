//! Endpoint configuration for the vehicle under control.

use crate::PilotError;

/// Base URL used when `DONKEY_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://donkeycar:8887";

/// Where to find the vehicle's web controller.
#[derive(Clone, Debug)]
pub struct PilotConfig {
    /// HTTP base URL of the controller (e.g. `"http://donkeycar:8887"`).
    pub base_url: String,
}

impl PilotConfig {
    /// Build a config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Load config from the environment with the stock vehicle default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("DONKEY_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self { base_url }
    }

    /// Websocket URL of the drive socket.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::InvalidBaseUrl`] when the base URL is neither
    /// `http://` nor `https://`.
    pub fn control_url(&self) -> Result<String, PilotError> {
        let base = self.base_url.trim_end_matches('/');
        if let Some(rest) = base.strip_prefix("http://") {
            return Ok(format!("ws://{rest}/wsDrive"));
        }
        if let Some(rest) = base.strip_prefix("https://") {
            return Ok(format!("wss://{rest}/wsDrive"));
        }

        Err(PilotError::InvalidBaseUrl(self.base_url.clone()))
    }

    /// HTTP URL of the MJPEG video stream.
    #[must_use]
    pub fn video_url(&self) -> String {
        format!("{}/video", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
