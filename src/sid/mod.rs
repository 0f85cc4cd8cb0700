//! SID Emulation Domain
//!
//! MOS 6581/8580 Sound Interface Device model used to replay captured
//! register frames as audio.
//!
//! Implementation:
//! - `backend` - [`SidBackend`] trait the renderer is generic over
//! - `chip` - [`Sid`], three voices + envelopes + filter
//! - `registers` - register map and control bitflags

pub mod backend;
pub mod chip;
pub mod envelope;
pub mod filter;
pub mod registers;
pub mod voice;

pub use backend::SidBackend;
pub use chip::Sid;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SidCapError;

/// SID hardware revision
///
/// The revision changes the analog character of the output (filter cutoff
/// curve and resonance range), so it is always chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SidModel {
    /// Original NMOS revision (C64 "breadbin")
    #[serde(rename = "6581")]
    Mos6581,
    /// HMOS-II revision (C64C, C128DCR)
    #[serde(rename = "8580")]
    Mos8580,
}

impl SidModel {
    /// Canonical part number
    pub fn as_str(&self) -> &'static str {
        match self {
            SidModel::Mos6581 => "6581",
            SidModel::Mos8580 => "8580",
        }
    }
}

impl FromStr for SidModel {
    type Err = SidCapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "6581" | "mos6581" => Ok(SidModel::Mos6581),
            "8580" | "mos8580" => Ok(SidModel::Mos8580),
            _ => Err(SidCapError::Config(format!(
                "unknown SID model '{value}' (expected 6581 or 8580)"
            ))),
        }
    }
}

impl fmt::Display for SidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MOS {}", self.as_str())
    }
}
