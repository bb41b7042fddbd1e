// crates/content-gate-core/src/core/device.rs
// ============================================================================
// Module: Content Gate Device Classes
// Description: Device form factors recognized by the device-class gate.
// Purpose: Express which hosts may reveal external content.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Hosts report their form factor as a [`DeviceClass`]. Tablets are excluded
//! from external content when the device check is enabled.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Device form factor reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Handheld phone.
    Phone,
    /// Tablet form factor (excluded from external content).
    Tablet,
    /// Desktop or laptop.
    Desktop,
    /// Host did not report a form factor.
    #[default]
    Unknown,
}

impl DeviceClass {
    /// Returns true when the device may reveal external content.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Tablet)
    }

    /// Returns the stable label for the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceClass {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "tablet" => Ok(Self::Tablet),
            "desktop" => Ok(Self::Desktop),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown device class: {other}")),
        }
    }
}
