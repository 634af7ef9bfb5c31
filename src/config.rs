//! Host-defined defaults for processors with no upstream source.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Channel layout a merger falls back to when neither slot is filled.
///
/// Hosts usually load this once and hand a copy to each merger:
///
/// ```
/// use merger::HostDefaults;
///
/// let defaults = HostDefaults::from_toml_str("num_outputs = 16").unwrap();
/// assert_eq!(defaults.num_outputs, 16);
/// assert_eq!(defaults.sample_rate, 44_100.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostDefaults {
    /// Number of stub output channels.
    pub num_outputs: usize,
    /// Sample rate of the stub channels in Hz.
    pub sample_rate: f32,
    /// Microvolts per bit of the stub channels.
    pub bit_volts: f32,
}

impl Default for HostDefaults {
    fn default() -> Self {
        Self {
            num_outputs: 2,
            sample_rate: 44_100.0,
            bit_volts: 1.0,
        }
    }
}

impl HostDefaults {
    /// Parse defaults from a TOML table. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
