use lowcode_render::{RenderMode, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "lowcode.config.json";

/// Lowcode configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory scanned for `*.material.json` files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials_dir: Option<String>,

    /// Render mode used by `render` when no `--mode` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Upper bound on a single dynamic component load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_placeholder: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_outline: Option<bool>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Materials directory: the command line wins over the config file
    pub fn get_materials_dir(&self, cwd: &str, flag: Option<&str>) -> Option<PathBuf> {
        flag.or(self.materials_dir.as_deref())
            .map(|dir| PathBuf::from(cwd).join(dir))
    }

    /// Render options for `mode_flag`, else the configured mode, else preview.
    /// Explicit flags in the file are applied on top of the mode preset.
    pub fn render_options(&self, mode_flag: Option<&str>) -> anyhow::Result<RenderOptions> {
        let mode = match mode_flag.or(self.mode.as_deref()) {
            Some(name) => name.parse::<RenderMode>().map_err(anyhow::Error::msg)?,
            None => RenderMode::default(),
        };

        let mut options = RenderOptions::for_mode(mode);
        if let Some(timeout) = self.load_timeout_ms {
            options.load_timeout_ms = timeout;
        }
        if let Some(show_placeholder) = self.show_placeholder {
            options.show_placeholder = show_placeholder;
        }
        if let Some(show_outline) = self.show_outline {
            options.show_outline = show_outline;
        }
        Ok(options)
    }
}
