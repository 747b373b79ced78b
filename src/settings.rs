//! Per-sweep-iteration settings shared by every component of one astrolabe.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which variant of the instrument is being built.
///
/// The simplified design omits the unequal-hours engraving and is easier to
/// assemble; the token (`full`/`simplified`) appears verbatim in filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AstrolabeType {
    Full,
    Simplified,
}

impl AstrolabeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Simplified => "simplified",
        }
    }
}

impl fmt::Display for AstrolabeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color theme applied by the graphics layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Default
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Dark => "dark",
        })
    }
}

/// Immutable description of the instrument variant under construction.
///
/// One `Settings` value is built at the start of each sweep iteration and
/// shared by every component constructed in that iteration. Latitude is in
/// degrees, range [-90, 90]; range and language membership are checked by
/// config validation before any iteration runs, never here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub language: String,
    pub astrolabe_type: AstrolabeType,
    pub latitude: f64,
    pub theme: Theme,
}

impl Settings {
    /// Southern-hemisphere flag, derived and never stored: latitude 0 counts
    /// as northern.
    pub fn southern(&self) -> bool {
        self.latitude < 0.0
    }
}
