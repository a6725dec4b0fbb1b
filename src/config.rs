//! Controller configuration parameters
//!
//! All tunable parameters for the PlantVase controller.  Set once at
//! startup (defaults, optionally overridden by a JSON document baked in
//! at build time) and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{self, ConfigError};

/// Upper bound on a single pump hold.  The hold cannot be interrupted,
/// so a typo here would flood the pot.
pub const MAX_PUMP_DURATION_MS: u32 = 8_000;

/// Maximum identity length announced in `whoiam:<identity>`.
pub const IDENTITY_CAP: usize = 16;

/// Record separator agreed with the fog node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    NewLine,
    Comma,
    #[default]
    Dollar,
    Hash,
}

impl Delimiter {
    /// The byte that terminates a record on the wire.
    pub const fn byte(self) -> u8 {
        match self {
            Self::NewLine => b'\n',
            Self::Comma => b',',
            Self::Dollar => b'$',
            Self::Hash => b'#',
        }
    }

    pub const fn as_char(self) -> char {
        self.byte() as char
    }
}

/// Which reading the watering predicate compares against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WateringTrigger {
    /// `temperature_c < threshold` (field-deployed behaviour).
    #[default]
    Temperature,
    /// `moisture_raw < threshold`.
    Moisture,
}

/// Deployment profile selecting the idle sample interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// 2 s between Monitoring samples.
    Responsive,
    /// 5 s between Monitoring samples.
    LowPower,
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Watering decision ---
    /// Threshold the watering predicate compares against
    pub moisture_threshold: f32,
    /// Reading compared against `moisture_threshold`
    pub watering_trigger: WateringTrigger,
    /// Pump hold duration (milliseconds)
    pub pump_duration_ms: u32,
    /// Waterings available before the reservoir must be refilled (`None` = unlimited)
    pub watering_budget: Option<u32>,

    // --- Timing ---
    /// Sleep after a Monitoring tick that did not water (milliseconds)
    pub sample_interval_ms: u32,
    /// Fixed sleep for Registering, Communicating and Waiting (milliseconds)
    pub idle_interval_ms: u32,
    /// Slice length used to drain link events while sleeping (milliseconds)
    pub event_poll_ms: u32,

    // --- Link ---
    /// Identity announced during the handshake
    pub identity: heapless::String<IDENTITY_CAP>,
    /// Record separator on the serial link
    pub delimiter: Delimiter,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let mut identity = heapless::String::new();
        let _ = identity.push_str("vase");
        Self {
            moisture_threshold: 50.0,
            watering_trigger: WateringTrigger::Temperature,
            pump_duration_ms: 5_000,
            watering_budget: None,

            sample_interval_ms: 2_000,
            idle_interval_ms: 2_000,
            event_poll_ms: 50,

            identity,
            delimiter: Delimiter::Dollar,
        }
    }
}

impl ControllerConfig {
    /// Defaults tuned for a deployment profile.
    pub fn for_profile(profile: Profile) -> Self {
        let sample_interval_ms = match profile {
            Profile::Responsive => 2_000,
            Profile::LowPower => 5_000,
        };
        Self {
            sample_interval_ms,
            ..Self::default()
        }
    }

    /// Parse a JSON document.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or `json` applied over them when present.
    pub fn load(json: Option<&str>) -> error::Result<Self> {
        match json {
            Some(json) => Ok(Self::from_json(json)?),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the controller cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.moisture_threshold.is_finite() {
            return Err(ConfigError::ValidationFailed("threshold must be finite"));
        }
        if self.pump_duration_ms > MAX_PUMP_DURATION_MS {
            return Err(ConfigError::ValidationFailed(
                "pump duration exceeds maximum hold",
            ));
        }
        if self.event_poll_ms == 0 {
            return Err(ConfigError::ValidationFailed("event poll must be non-zero"));
        }
        if self.identity.is_empty() {
            return Err(ConfigError::ValidationFailed("identity empty"));
        }
        if self
            .identity
            .bytes()
            .any(|b| b == self.delimiter.byte() || b == b':' || b == b'\r')
        {
            return Err(ConfigError::ValidationFailed(
                "identity contains a reserved character",
            ));
        }
        Ok(())
    }
}
