use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::GpxSplitError;

const CONFIG_DIR_NAME: &str = "gpxsplit";
const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_SPLIT_LABEL: &str = "SPLIT";

/// Palette as plain RGB triples so the config file stays readable
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark: [u8; 3],
    pub light: [u8; 3],
    pub primary: [u8; 3],
    pub secondary: [u8; 3],
    pub error: [u8; 3],
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark: [12, 12, 12],
            light: [236, 236, 236],
            primary: [155, 57, 34],
            secondary: [242, 97, 63],
            error: [230, 40, 40],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub theme: ThemeConfig,
    /// Label of the button that confirms the split point
    pub split_label: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            split_label: DEFAULT_SPLIT_LABEL.to_string(),
            window_width: 900.,
            window_height: 700.,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, GpxSplitError> {
        Ok(dirs::config_dir()
            .ok_or(GpxSplitError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Load the config from the user's config directory, if one was saved
    pub fn from_local_file() -> Result<Option<Self>, GpxSplitError> {
        Self::from_path(&Self::default_path()?)
    }

    pub fn from_path(config_path: &Path) -> Result<Option<Self>, GpxSplitError> {
        if !config_path.exists() {
            debug!("No config file at {:?}", config_path);
            return Ok(None);
        }
        let file = File::open(config_path).map_err(|e| GpxSplitError::ConfigIO { source: e })?;
        let config = serde_json::from_reader(file)
            .map_err(|e| GpxSplitError::ConfigSerialize { source: e })?;
        info!("Loaded config from {:?}", config_path);
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<(), GpxSplitError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), GpxSplitError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| GpxSplitError::ConfigIO { source: e })?;
        }

        let file =
            File::create(config_path).map_err(|e| GpxSplitError::ConfigIO { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| GpxSplitError::ConfigSerialize { source: e })
    }
}
