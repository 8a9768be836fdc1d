//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.villa/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::LocatorKind;
use crate::core::action::{ToggleVisual, VisualState};
use crate::core::navigator::{EngineSettings, Markup};
use crate::core::page::PageId;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VillaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub markup: MarkupConfig,
    #[serde(default)]
    pub toggle: ToggleConfig,
    /// Server shell path → start page, e.g. `"/admin" = "admin/dashboard"`.
    #[serde(default)]
    pub shells: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub base_url: Option<String>,
    pub locator: Option<LocatorKind>,
    pub initial_page: Option<String>,
    pub login_page: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MarkupConfig {
    pub skeleton: Option<String>,
    pub error_fragment: Option<String>,
    pub busy_label: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ToggleConfig {
    pub on_classes: Option<Vec<String>>,
    pub on_icon: Option<String>,
    pub on_label: Option<String>,
    pub off_classes: Option<Vec<String>>,
    pub off_icon: Option<String>,
    pub off_label: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub locator: LocatorKind,
    /// Start page when the address bar names none.
    pub initial_page: Option<String>,
    pub timeout: Duration,
    pub engine: EngineSettings,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.villa/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".villa").join("config.toml"))
}

/// Load config from `~/.villa/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `VillaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<VillaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(VillaConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<VillaConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(VillaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: VillaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Villa Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# base_url = "http://localhost:5000"   # Or set VILLA_BASE_URL env var
# locator = "path"                     # "path" (/page) or "hash" (/#/page)
# initial_page = "index"               # Or set VILLA_INITIAL_PAGE env var
# login_page = "login"                 # Loaded when an action gets a 401
# timeout_secs = 30

# [markup]
# skeleton = "<div class=\"animate-pulse\"></div>"
# error_fragment = "<div><h2>Oops!</h2><p>Something went wrong.</p></div>"
# busy_label = "<i class=\"fas fa-spinner fa-spin\"></i>"

# [toggle]
# on_classes = ["bg-rose-500", "text-white"]
# on_icon = "fas fa-heart"
# on_label = "In Wishlist"
# off_classes = ["bg-slate-100", "text-slate-700"]
# off_icon = "far fa-heart"
# off_label = "Add to Wishlist"

# [shells]
# "/admin" = "admin/dashboard"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Flags given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub locator: Option<LocatorKind>,
    pub page: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &VillaConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("VILLA_BASE_URL").ok())
        .or_else(|| config.general.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Locator: CLI → env → config → default
    let locator = cli
        .locator
        .or_else(|| {
            std::env::var("VILLA_LOCATOR")
                .ok()
                .and_then(|raw| LocatorKind::parse(&raw))
        })
        .or(config.general.locator)
        .unwrap_or_default();

    // Initial page: CLI → env → config (None lets the engine pick `index`)
    let initial_page = cli
        .page
        .clone()
        .or_else(|| std::env::var("VILLA_INITIAL_PAGE").ok())
        .or_else(|| config.general.initial_page.clone());

    ResolvedConfig {
        base_url,
        locator,
        initial_page,
        timeout: Duration::from_secs(config.general.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        engine: resolve_engine(config),
    }
}

/// Engine settings from the file alone; none of these have env or CLI overrides.
fn resolve_engine(config: &VillaConfig) -> EngineSettings {
    let defaults = EngineSettings::default();

    let markup = Markup {
        skeleton: config
            .markup
            .skeleton
            .clone()
            .unwrap_or(defaults.markup.skeleton),
        error_fragment: config
            .markup
            .error_fragment
            .clone()
            .unwrap_or(defaults.markup.error_fragment),
        busy_label: config
            .markup
            .busy_label
            .clone()
            .unwrap_or(defaults.markup.busy_label),
    };

    let t = &config.toggle;
    let toggle = ToggleVisual {
        on: VisualState {
            classes: t.on_classes.clone().unwrap_or(defaults.toggle.on.classes),
            icon: t.on_icon.clone().unwrap_or(defaults.toggle.on.icon),
            label: t.on_label.clone().unwrap_or(defaults.toggle.on.label),
        },
        off: VisualState {
            classes: t.off_classes.clone().unwrap_or(defaults.toggle.off.classes),
            icon: t.off_icon.clone().unwrap_or(defaults.toggle.off.icon),
            label: t.off_label.clone().unwrap_or(defaults.toggle.off.label),
        },
    };

    // Configured shells replace the built-in table entirely.
    let shell_pages = if config.shells.is_empty() {
        defaults.shell_pages
    } else {
        config
            .shells
            .iter()
            .map(|(path, page)| (path.clone(), PageId::from(page.as_str())))
            .collect()
    };

    EngineSettings {
        login_page: config
            .general
            .login_page
            .as_deref()
            .map(PageId::from)
            .unwrap_or(defaults.login_page),
        markup,
        toggle,
        tabs: defaults.tabs,
        shell_pages,
    }
}
