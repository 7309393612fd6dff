//! Device class taxonomy for click enrichment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounded set of device classes a user agent can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Bot,
    #[default]
    Unknown,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "Desktop",
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Bot => "Bot",
            DeviceType::Unknown => "Unknown",
        }
    }

    /// Parses a stored label. Anything unrecognised maps to [`DeviceType::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "Desktop" => DeviceType::Desktop,
            "Mobile" => DeviceType::Mobile,
            "Tablet" => DeviceType::Tablet,
            "Bot" => DeviceType::Bot,
            _ => DeviceType::Unknown,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
