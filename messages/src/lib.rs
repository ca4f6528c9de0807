//! Shared message model and JSON codec for the vehicle drive socket.
//!
//! This crate owns the wire representation used by both `pilot` and `cli`.
//! The vehicle's web controller speaks JSON text over a websocket: outbound
//! commands are a fixed, typed shape, while inbound messages echo driving
//! state with no published schema, so they stay loosely typed.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`decode_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be parsed as JSON.
    #[error("failed to parse message as JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The message parsed, but is not a JSON object.
    #[error("message is not a JSON object")]
    NotAnObject,
}

/// Driving mode understood by the vehicle's web controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Full manual control: both angle and throttle come from this client.
    #[default]
    User,
    /// The vehicle steers itself, this client controls throttle.
    LocalAngle,
    /// Full vehicle autopilot.
    Local,
}

impl DriveMode {
    /// Wire name of the mode, as the vehicle expects it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::LocalAngle => "local_angle",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DriveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "local_angle" => Ok(Self::LocalAngle),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "unknown drive mode `{other}` (expected user, local_angle, or local)"
            )),
        }
    }
}

/// One steering/throttle command, sent for every captured video frame.
///
/// Field order matters: the vehicle is tolerant, but the serialized form is
/// kept identical to what its own web UI sends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// Steering angle, `-1.0` (full left) to `1.0` (full right).
    pub angle: f64,
    /// Throttle, `-1.0` (full reverse) to `1.0` (full forward).
    pub throttle: f64,
    /// Which parts of the command the vehicle should honor.
    pub drive_mode: DriveMode,
    /// Ask the vehicle to record captured frames.
    pub recording: bool,
}

impl Default for DriveCommand {
    /// Straight ahead at gentle throttle, manual mode, not recording.
    fn default() -> Self {
        Self {
            angle: 0.0,
            throttle: 0.2,
            drive_mode: DriveMode::User,
            recording: false,
        }
    }
}

impl DriveCommand {
    /// All-stop command, sent before hanging up so the vehicle comes to rest.
    #[must_use]
    pub fn stop() -> Self {
        Self {
            angle: 0.0,
            throttle: 0.0,
            drive_mode: DriveMode::User,
            recording: false,
        }
    }
}

/// Encode a command as the JSON text message the drive socket expects.
#[must_use]
pub fn encode_command(command: &DriveCommand) -> String {
    // serde_json cannot fail on this shape: plain struct, string keys only.
    serde_json::to_string(command).unwrap_or_default()
}

/// An inbound message from the drive socket.
///
/// The vehicle echoes driving state as JSON objects, but the field set is
/// not part of any published contract. The raw object is kept intact; typed
/// accessors cover the fields this client actually inspects.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleMessage {
    fields: Map<String, Value>,
}

impl VehicleMessage {
    /// Steering angle reported by the vehicle, if present.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        self.fields.get("angle").and_then(Value::as_f64)
    }

    /// Throttle reported by the vehicle, if present.
    #[must_use]
    pub fn throttle(&self) -> Option<f64> {
        self.fields.get("throttle").and_then(Value::as_f64)
    }

    /// Drive mode reported by the vehicle, if present and recognized.
    #[must_use]
    pub fn drive_mode(&self) -> Option<DriveMode> {
        self.fields
            .get("drive_mode")
            .and_then(Value::as_str)
            .and_then(|mode| mode.parse().ok())
    }

    /// Raw access to any field of the message.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Consume the message, yielding the underlying JSON object.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl fmt::Display for VehicleMessage {
    /// Renders the message back as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.fields).unwrap_or_default();
        f.write_str(&rendered)
    }
}

/// Decode an inbound text message from the drive socket.
///
/// # Errors
///
/// Returns [`CodecError::Parse`] for malformed JSON and
/// [`CodecError::NotAnObject`] when the message is valid JSON but not an
/// object.
pub fn decode_message(text: &str) -> Result<VehicleMessage, CodecError> {
    let value = serde_json::from_str::<Value>(text)?;
    let Value::Object(fields) = value else {
        return Err(CodecError::NotAnObject);
    };
    Ok(VehicleMessage { fields })
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
