use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UsageGraphError};
use crate::style::PackageColor;
use crate::usage::UsageDirection;

/// Name of the configuration file stored inside the `.usagegraph` directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Name of the hidden directory holding the view configuration.
pub const USAGEGRAPH_DIR: &str = ".usagegraph";

/// Toggles and lists that drive one display cycle.
///
/// The core only reads these values; persisting them between sessions is the
/// caller's business (see [`load_config`] and [`save_config`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Hide nodes without incident links.
    pub filter_isolated: bool,
    /// Collapse variant classes.
    pub filter_variants: bool,
    /// Show hotspot nodes only.
    pub only_hotspots: bool,
    /// Register every API-tagged class as an entry point.
    pub api_filtering: bool,
    /// Show inheritance links and re-admit filtered supertypes.
    pub hybrid_view: bool,
    /// Link direction followed by the usage-level expansion.
    pub direction: UsageDirection,
    /// Usage level displayed when entry points are set.
    pub usage_level: u32,
    /// Package patterns hidden from the graph.
    pub package_filters: Vec<String>,
    /// Entry-point patterns the usage levels are measured from.
    pub entry_points: Vec<String>,
    /// Package colours, first match wins.
    pub package_colors: Vec<PackageColor>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            filter_isolated: false,
            filter_variants: true,
            only_hotspots: false,
            api_filtering: false,
            hybrid_view: false,
            direction: UsageDirection::Out,
            usage_level: 1,
            package_filters: Vec::new(),
            entry_points: Vec::new(),
            package_colors: Vec::new(),
        }
    }
}

/// Returns the path to the `.usagegraph` directory within the given project root.
pub fn get_usagegraph_dir(project_root: &Path) -> PathBuf {
    project_root.join(USAGEGRAPH_DIR)
}

/// Returns the path to `config.toml` within the `.usagegraph` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_usagegraph_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the view configuration, or the defaults if none was saved yet.
pub fn load_config(project_root: &Path) -> Result<ViewConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ViewConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| UsageGraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: ViewConfig = toml::from_str(&contents).map_err(|e| UsageGraphError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    Ok(config)
}

/// Saves the view configuration using an atomic write.
pub fn save_config(project_root: &Path, config: &ViewConfig) -> Result<()> {
    let dir = get_usagegraph_dir(project_root);
    fs::create_dir_all(&dir).map_err(|e| UsageGraphError::Config {
        message: format!("failed to create directory '{}': {}", dir.display(), e),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let contents = toml::to_string_pretty(config).map_err(|e| UsageGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &contents).map_err(|e| UsageGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| UsageGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
