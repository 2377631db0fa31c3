use anyhow::Context;
use mapcore::geometry::Viewport;
use mapcore::render::{ThemeConfig, ThemePreset};
use mapcore::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Logical size and density of the drawing surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 280.0,
            pixel_ratio: 2.0,
        }
    }
}

/// A preset name (`dark`, `light`) or a full set of colors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSetting {
    Preset(ThemePreset),
    Custom(ThemeConfig),
}

impl Default for ThemeSetting {
    fn default() -> Self {
        ThemeSetting::Preset(ThemePreset::Dark)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub canvas: CanvasConfig,
    pub theme: ThemeSetting,
    pub render: RenderOptions,
    pub bind: SocketAddr,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            theme: ThemeSetting::default(),
            render: RenderOptions::default(),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl MapConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading map config {}", path_ref.display()))?;
        let config: MapConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing map config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating map config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let canvas = &self.canvas;
        let positive = |value: f32| value > 0.0 && value.is_finite();
        if !(positive(canvas.width) && positive(canvas.height)) {
            anyhow::bail!(
                "canvas must have a finite positive size, got {}x{}",
                canvas.width,
                canvas.height
            );
        }
        if !positive(canvas.pixel_ratio) {
            anyhow::bail!(
                "pixel ratio must be finite and positive, got {}",
                canvas.pixel_ratio
            );
        }
        self.render.validate()?;
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width, self.canvas.height).with_pixel_ratio(self.canvas.pixel_ratio)
    }

    pub fn theme(&self) -> ThemeConfig {
        match &self.theme {
            ThemeSetting::Preset(preset) => ThemeConfig::preset(*preset),
            ThemeSetting::Custom(theme) => theme.clone(),
        }
    }
}
