//! Quality profiles and their mapping onto Ghostscript presets.

use std::fmt;

use crate::error::{Error, Result};

/// Names accepted by [`resolve`], lowest quality first.
pub const QUALITY_NAMES: [&str; 3] = ["low", "medium", "high"];

/// Target resolution and quality for one named level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityProfile {
    pub name: &'static str,
    pub target_dpi: u32,
    pub target_quality_percent: u8,
}

const PROFILES: [QualityProfile; 3] = [
    QualityProfile {
        name: "low",
        target_dpi: 72,
        target_quality_percent: 30,
    },
    QualityProfile {
        name: "medium",
        target_dpi: 150,
        target_quality_percent: 60,
    },
    QualityProfile {
        name: "high",
        target_dpi: 300,
        target_quality_percent: 90,
    },
];

/// Look up a profile by name.
pub fn resolve(name: &str) -> Result<QualityProfile> {
    PROFILES
        .iter()
        .find(|profile| profile.name == name)
        .copied()
        .ok_or_else(|| Error::InvalidQuality(name.to_string()))
}

impl QualityProfile {
    pub fn preset(&self) -> Preset {
        preset_for(self.target_dpi, self.target_quality_percent)
    }
}

/// `-dPDFSETTINGS` values understood by Ghostscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Screen,
    Ebook,
    Printer,
    Prepress,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Screen => "screen",
            Preset::Ebook => "ebook",
            Preset::Printer => "printer",
            Preset::Prepress => "prepress",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the preset for a target DPI.
///
/// The quality percentage is accepted alongside the DPI but does not change
/// the outcome: only the DPI thresholds decide.
pub fn preset_for(target_dpi: u32, _target_quality_percent: u8) -> Preset {
    if target_dpi <= 72 {
        Preset::Screen
    } else if target_dpi <= 150 {
        Preset::Ebook
    } else if target_dpi <= 300 {
        Preset::Printer
    } else {
        Preset::Prepress
    }
}
