//! Configuration system for the `zaplist` CLI.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/zaplist/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use zaplist_proto::settings::Theme;
use zaplist_proto::task::TaskFilter;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A value in the config file is not recognised.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    ui: UiFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    backend: Option<String>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    timestamp_format: Option<String>,
    default_filter: Option<String>,
    system_prefers_dark: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Where tasks and settings are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// One JSON file per key under the data directory.
    #[default]
    File,
    /// Process memory only; nothing survives exit.
    Memory,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend `{other}` (expected file or memory)")),
        }
    }
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Storage --
    /// Directory holding the value files of the file backend.
    pub data_dir: PathBuf,
    /// Storage backend.
    pub backend: Backend,

    // -- UI --
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
    /// Filter used by `list` when none is given.
    pub default_filter: TaskFilter,
    /// Stand-in for the OS appearance when the theme is `system`.
    pub system_prefers_dark: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: Backend::File,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
            default_filter: TaskFilter::All,
            system_prefers_dark: false,
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path
    /// (`~/.config/zaplist/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// holds an unrecognised backend or filter name, or the timestamp
    /// format is not a valid chrono format string.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. This is separated from `load()` to
    /// enable unit testing without CLI parsing.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_backend = file
            .storage
            .backend
            .as_deref()
            .map(str::parse::<Backend>)
            .transpose()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "storage.backend",
                reason,
            })?;

        let file_filter = file
            .ui
            .default_filter
            .as_deref()
            .map(str::parse::<TaskFilter>)
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                field: "ui.default_filter",
                reason: e.to_string(),
            })?;

        let timestamp_format = cli
            .timestamp_format
            .clone()
            .or_else(|| file.ui.timestamp_format.clone())
            .unwrap_or(defaults.timestamp_format);
        validate_timestamp_format(&timestamp_format)?;

        Ok(Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            backend: cli.backend.or(file_backend).unwrap_or(defaults.backend),
            timestamp_format,
            default_filter: file_filter.unwrap_or(defaults.default_filter),
            system_prefers_dark: file
                .ui
                .system_prefers_dark
                .unwrap_or(defaults.system_prefers_dark),
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Personal task tracker")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/zaplist/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory where tasks and settings are stored.
    #[arg(long, env = "ZAPLIST_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend.
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    /// Timestamp display format (chrono format string).
    #[arg(long, global = true)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "ZAPLIST_LOG", global = true)]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/zaplist.log`).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// What to do. Defaults to `list`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// `zaplist` subcommands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List tasks.
    List {
        /// Which tasks to show: all, active, or completed.
        #[arg(short, long)]
        filter: Option<TaskFilter>,
    },
    /// Create a task.
    Add {
        /// Task title.
        title: String,
        /// Longer description.
        #[arg(short, long, default_value = "")]
        description: String,
        /// Reference to an attached image.
        #[arg(long)]
        image: Option<String>,
        /// Latitude of the attached location.
        #[arg(
            long,
            requires = "lon",
            allow_negative_numbers = true,
            value_parser = parse_coordinate
        )]
        lat: Option<f64>,
        /// Longitude of the attached location.
        #[arg(
            long,
            requires = "lat",
            allow_negative_numbers = true,
            value_parser = parse_coordinate
        )]
        lon: Option<f64>,
    },
    /// Show one task in detail.
    Show {
        /// Task id.
        id: String,
    },
    /// Change a task. Unspecified fields keep their value.
    Edit {
        /// Task id.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(short, long)]
        description: Option<String>,
        /// New image reference.
        #[arg(long, conflicts_with = "clear_image")]
        image: Option<String>,
        /// Remove the image.
        #[arg(long)]
        clear_image: bool,
        /// New latitude.
        #[arg(
            long,
            requires = "lon",
            allow_negative_numbers = true,
            value_parser = parse_coordinate
        )]
        lat: Option<f64>,
        /// New longitude.
        #[arg(
            long,
            requires = "lat",
            allow_negative_numbers = true,
            value_parser = parse_coordinate
        )]
        lon: Option<f64>,
        /// Remove the location.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        clear_location: bool,
    },
    /// Mark a task done, or open again.
    Toggle {
        /// Task id.
        id: String,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// Delete every task.
    Clear {
        /// Confirm the wipe.
        #[arg(long)]
        yes: bool,
        /// Also reset settings to defaults.
        #[arg(long)]
        settings: bool,
    },
    /// Show or change the theme.
    Theme {
        /// `light`, `dark`, `system`, or `toggle`.
        value: Option<String>,
    },
    /// Show or change preferences.
    Settings {
        /// Enable or disable notifications.
        #[arg(long)]
        notifications: Option<bool>,
        /// Enable or disable auto-save.
        #[arg(long)]
        auto_save: Option<bool>,
        /// UI language tag.
        #[arg(long)]
        language: Option<String>,
    },
}

/// Parses a `--lat`/`--lon` value, rejecting NaN and infinities.
fn parse_coordinate(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("`{s}` is not a finite coordinate"))
    }
}

/// What a `theme` argument asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeRequest {
    /// Switch between light and dark.
    Toggle,
    /// Set an explicit theme.
    Set(Theme),
}

impl std::str::FromStr for ThemeRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("toggle") {
            return Ok(Self::Toggle);
        }
        s.parse::<Theme>()
            .map(Self::Set)
            .map_err(|e| format!("{e}, or toggle"))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Default data directory: `<data dir>/zaplist`, or `$TMPDIR/zaplist` when
/// the platform has no data directory.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("zaplist")
}

/// Rejects chrono format strings containing unknown specifiers.
fn validate_timestamp_format(format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::InvalidValue {
            field: "ui.timestamp_format",
            reason: format!("`{format}` is not a valid chrono format string"),
        });
    }
    Ok(())
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available, use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("zaplist").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
