use crate::colormap::DEFAULT_PALETTE;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_ZOOM: u8 = 22;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub style: StyleConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub data_json: PathBuf, // {"lats": [...], "lons": [...], "pm25": [...]}
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleConfig {
    pub palette: Vec<String>, // Hex codes, lowest bin first
    pub value_label: String,
    pub radius_m: f64,
    pub fill_opacity: f64,
    pub viewport_padding: f64,
    pub limit_padding: f64,
    pub min_zoom_offset: u8,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            value_label: "PM2.5".to_string(),
            radius_m: 50.0,
            fill_opacity: 0.8,
            viewport_padding: 0.0001,
            limit_padding: 0.01,
            min_zoom_offset: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub tile_dir: PathBuf,
    pub scene_file: PathBuf,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.output.min_zoom > self.output.max_zoom {
            bail!(
                "min_zoom ({}) is greater than max_zoom ({})",
                self.output.min_zoom,
                self.output.max_zoom
            );
        }
        if self.output.max_zoom > MAX_ZOOM {
            bail!("max_zoom must be at most {}, got {}", MAX_ZOOM, self.output.max_zoom);
        }
        let style = &self.style;
        if !(0.0..=1.0).contains(&style.fill_opacity) {
            bail!("fill_opacity must be within [0, 1], got {}", style.fill_opacity);
        }
        if !(style.viewport_padding >= 0.0 && style.limit_padding >= 0.0) {
            bail!("Bounds paddings must be non-negative");
        }
        if !(style.radius_m > 0.0) {
            bail!("radius_m must be positive, got {}", style.radius_m);
        }
        Ok(())
    }
}
