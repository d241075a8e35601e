//! Configuration management.
//!
//! Thresholds and defaults are resolved once, centrally, into a
//! fully-populated [`CxtConfig`]; callers never re-apply defaults at the
//! call site.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory holding the managed context files.
pub const CXT_DIR_NAME: &str = ".cxt";

/// Config file name inside the `.cxt` directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration for cxt.
#[derive(Debug, Clone)]
pub struct CxtConfig {
    /// Root of the project (the directory containing `.cxt/`).
    pub root: PathBuf,
    /// Template-ratio thresholds, in percent.
    pub quality: QualityThresholds,
    /// Substantive-content thresholds.
    pub content: ContentThresholds,
    /// Days after which a `*Last Updated*` marker counts as stale.
    pub stale_after_days: i64,
    /// Branch assumed as "previous" before the first sync writes state.
    pub fallback_branch: String,
    /// Default style for newly created plans.
    pub default_plan_style: crate::models::PlanStyle,
}

/// Template-ratio cut points, in percent of non-blank content characters.
#[derive(Debug, Clone, Copy)]
pub struct QualityThresholds {
    /// At or below this percentage a file counts as well populated.
    pub well_populated: u8,
    /// Above this percentage a mild warning becomes a firm one.
    pub mild_warning: u8,
    /// At or above this percentage the file is flagged as an error.
    pub critical: u8,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            well_populated: 30,
            mild_warning: 50,
            critical: 70,
        }
    }
}

/// Substantive-content minimums.
#[derive(Debug, Clone, Copy)]
pub struct ContentThresholds {
    /// Minimum trimmed content length before a file counts as mostly empty.
    pub min_content_length: usize,
    /// Substantive line count at or below which template-heavy content is
    /// treated as template-only.
    pub min_content_lines: usize,
}

impl Default for ContentThresholds {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            min_content_lines: 3,
        }
    }
}

/// Configuration file structure (for TOML parsing).
///
/// Every field is optional; absent fields fall back to the documented
/// defaults when resolved into [`CxtConfig`].
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Template-ratio thresholds.
    pub quality: Option<ConfigFileQuality>,
    /// Content minimums.
    pub content: Option<ConfigFileContent>,
    /// Staleness window in days.
    pub stale_after_days: Option<i64>,
    /// Fallback previous-branch name.
    pub fallback_branch: Option<String>,
    /// Default plan style: "blank" or "template".
    pub default_plan_style: Option<String>,
}

/// Quality section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileQuality {
    /// Well-populated cutoff percentage.
    pub well_populated: Option<u8>,
    /// Mild-warning cutoff percentage.
    pub mild_warning: Option<u8>,
    /// Critical cutoff percentage.
    pub critical: Option<u8>,
}

/// Content section in the config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileContent {
    /// Minimum trimmed content length.
    pub min_content_length: Option<usize>,
    /// Minimum substantive line count.
    pub min_content_lines: Option<usize>,
}

impl Default for CxtConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            quality: QualityThresholds::default(),
            content: ContentThresholds::default(),
            stale_after_days: 30,
            fallback_branch: "main".to_string(),
            default_plan_style: crate::models::PlanStyle::Blank,
        }
    }
}

impl CxtConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| crate::Error::Storage {
            operation: "read_config_file".to_string(),
            cause: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| crate::Error::Storage {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration for a project root.
    ///
    /// Checks the following paths in order:
    /// 1. `<root>/.cxt/config.toml`
    /// 2. Platform-specific config dir (`~/.config/cxt/config.toml` and the
    ///    macOS equivalent)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_for_root(root: &Path) -> Self {
        let project_config = root.join(CXT_DIR_NAME).join(CONFIG_FILE_NAME);
        if project_config.exists() {
            if let Ok(config) = Self::load_from_file(&project_config) {
                return config.with_root(root);
            }
        }

        if let Some(base_dirs) = directories::BaseDirs::new() {
            let user_config = base_dirs.config_dir().join("cxt").join(CONFIG_FILE_NAME);
            if user_config.exists() {
                if let Ok(config) = Self::load_from_file(&user_config) {
                    return config.with_root(root);
                }
            }
        }

        Self::default().with_root(root)
    }

    /// Converts a `ConfigFile` to `CxtConfig`, resolving defaults.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(quality) = file.quality {
            if let Some(v) = quality.well_populated {
                config.quality.well_populated = v;
            }
            if let Some(v) = quality.mild_warning {
                config.quality.mild_warning = v;
            }
            if let Some(v) = quality.critical {
                config.quality.critical = v;
            }
        }
        if let Some(content) = file.content {
            if let Some(v) = content.min_content_length {
                config.content.min_content_length = v;
            }
            if let Some(v) = content.min_content_lines {
                config.content.min_content_lines = v;
            }
        }
        if let Some(days) = file.stale_after_days {
            config.stale_after_days = days;
        }
        if let Some(branch) = file.fallback_branch {
            config.fallback_branch = branch;
        }
        if let Some(style) = file.default_plan_style {
            config.default_plan_style = crate::models::PlanStyle::parse(&style);
        }

        config
    }

    /// Sets the project root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Returns the `.cxt` directory for this project.
    #[must_use]
    pub fn cxt_dir(&self) -> PathBuf {
        self.root.join(CXT_DIR_NAME)
    }
}
