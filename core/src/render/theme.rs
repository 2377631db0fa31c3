use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::prelude::MapError;
use crate::render::color::Rgba;

/// Named palettes shipped with the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
}

impl ThemePreset {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreset::Dark => ThemePreset::Light,
            ThemePreset::Light => ThemePreset::Dark,
        }
    }
}

impl FromStr for ThemePreset {
    type Err = MapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemePreset::Dark),
            "light" => Ok(ThemePreset::Light),
            other => Err(MapError::InvalidOptions(format!("unknown theme '{other}'"))),
        }
    }
}

/// Every non-accent color the map draws with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub background: Rgba,
    pub grid: Rgba,
    pub path: Rgba,
    pub marker_outline: Rgba,
    pub marker_text: Rgba,
    pub label_background: Rgba,
    pub label_border: Rgba,
    pub label_text: Rgba,
    pub legend: Rgba,
}

impl ThemeConfig {
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(0x0D, 0x11, 0x17),
            grid: Rgba::rgba(0xFF, 0xFF, 0xFF, 0x0A),
            path: Rgba::rgba(0xE8, 0x74, 0x0C, 0x59),
            marker_outline: Rgba::rgb(0x0D, 0x11, 0x17),
            marker_text: Rgba::WHITE,
            label_background: Rgba::rgba(0x0D, 0x11, 0x17, 0xEB),
            label_border: Rgba::rgba(0xE8, 0x74, 0x0C, 0x80),
            label_text: Rgba::WHITE,
            legend: Rgba::rgba(0xFF, 0xFF, 0xFF, 0x4D),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Rgba::rgb(0xF7, 0xF5, 0xF2),
            grid: Rgba::rgba(0x00, 0x00, 0x00, 0x0F),
            path: Rgba::rgba(0xE8, 0x74, 0x0C, 0x73),
            marker_outline: Rgba::WHITE,
            marker_text: Rgba::WHITE,
            label_background: Rgba::rgba(0xFF, 0xFF, 0xFF, 0xF0),
            label_border: Rgba::rgba(0xE8, 0x74, 0x0C, 0x99),
            label_text: Rgba::rgb(0x1F, 0x23, 0x28),
            legend: Rgba::rgba(0x1F, 0x23, 0x28, 0x80),
        }
    }

    pub fn preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Dark => Self::dark(),
            ThemePreset::Light => Self::light(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::dark()
    }
}
