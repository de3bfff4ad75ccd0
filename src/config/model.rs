// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::batch::BatchConfig;
use crate::exec::ToolLocator;
use crate::exec::locator::{DEFAULT_TOOL_BIN_DIR, DEFAULT_TOOL_ENV_VAR, DEFAULT_TOOL_EXE};
use crate::job::JobDescriptor;
use crate::types::{BatchStrategy, BuildDefaults, DEFAULT_CONFIGURATION, DEFAULT_PLATFORM};

/// Timeout used when the batch file sets neither `timeout_minutes` nor
/// `timeout_seconds`.
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 10;

/// Batch file as read from TOML, before validation.
///
/// ```toml
/// [batch]
/// default_action = "REBUILD"
/// timeout_minutes = 5
/// stop_on_error = false
///
/// [defaults]
/// configuration = "Release"
///
/// [[project]]
/// path = 'C:\src\app\app.dsp'
/// action = "CLEAN"
/// ```
///
/// All sections are optional at the TOML level; validation then insists on
/// at least one `[[project]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default)]
    pub defaults: DefaultsSection,

    #[serde(default)]
    pub project: Vec<ProjectConfig>,
}

/// Validated batch file. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub batch: BatchSection,
    pub defaults: DefaultsSection,
    pub project: Vec<ProjectConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        batch: BatchSection,
        defaults: DefaultsSection,
        project: Vec<ProjectConfig>,
    ) -> Self {
        Self {
            batch,
            defaults,
            project,
        }
    }

    /// Effective per-job timeout.
    pub fn timeout(&self) -> Duration {
        match (self.batch.timeout_seconds, self.batch.timeout_minutes) {
            (Some(secs), _) => Duration::from_secs(secs),
            (None, Some(mins)) => Duration::from_secs(mins.saturating_mul(60)),
            (None, None) => Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60),
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            tool_path: self.batch.tool_path.clone(),
            locator: ToolLocator {
                env_var: self.batch.tool_env_var.clone(),
                bin_dir: self.batch.tool_bin_dir.clone(),
                exe_name: self.batch.tool_exe.clone(),
            },
            defaults: BuildDefaults {
                platform: self.defaults.platform.clone(),
                configuration: self.defaults.configuration.clone(),
                action: normalize_action(&self.batch.default_action),
            },
            timeout: self.timeout(),
            strategy: BatchStrategy::from_stop_on_error(self.batch.stop_on_error),
            kill_on_timeout: self.batch.kill_on_timeout,
        }
    }

    /// Job descriptors in file order.
    pub fn jobs(&self) -> Vec<JobDescriptor> {
        self.project.iter().map(ProjectConfig::to_job).collect()
    }
}

/// `[batch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSection {
    /// Explicit tool path. Empty means locate via `tool_env_var`.
    #[serde(default)]
    pub tool_path: String,

    #[serde(default = "default_tool_env_var")]
    pub tool_env_var: String,

    #[serde(default = "default_tool_bin_dir")]
    pub tool_bin_dir: String,

    #[serde(default = "default_tool_exe")]
    pub tool_exe: String,

    /// Action appended to every job that does not name its own,
    /// e.g. `"REBUILD"` or `"CLEAN"`. Empty means a plain build.
    #[serde(default)]
    pub default_action: String,

    #[serde(default)]
    pub timeout_minutes: Option<u64>,

    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    #[serde(default = "default_true")]
    pub stop_on_error: bool,

    #[serde(default = "default_true")]
    pub kill_on_timeout: bool,
}

fn default_tool_env_var() -> String {
    DEFAULT_TOOL_ENV_VAR.to_string()
}

fn default_tool_bin_dir() -> String {
    DEFAULT_TOOL_BIN_DIR.to_string()
}

fn default_tool_exe() -> String {
    DEFAULT_TOOL_EXE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            tool_path: String::new(),
            tool_env_var: default_tool_env_var(),
            tool_bin_dir: default_tool_bin_dir(),
            tool_exe: default_tool_exe(),
            default_action: String::new(),
            timeout_minutes: None,
            timeout_seconds: None,
            stop_on_error: true,
            kill_on_timeout: true,
        }
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsSection {
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default = "default_configuration")]
    pub configuration: String,
}

fn default_platform() -> String {
    DEFAULT_PLATFORM.to_string()
}

fn default_configuration() -> String {
    DEFAULT_CONFIGURATION.to_string()
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            configuration: default_configuration(),
        }
    }
}

/// One `[[project]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Path to the legacy project file.
    pub path: String,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub configuration: String,

    #[serde(default)]
    pub action: String,
}

impl ProjectConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            platform: String::new(),
            configuration: String::new(),
            action: String::new(),
        }
    }

    pub fn to_job(&self) -> JobDescriptor {
        JobDescriptor::new(&self.path)
            .with_platform(self.platform.trim())
            .with_configuration(self.configuration.trim())
            .with_action(normalize_action(&self.action))
    }
}

/// `"/clean "` → `"CLEAN"`; empty stays empty.
pub fn normalize_action(action: &str) -> String {
    action.trim().trim_start_matches('/').to_uppercase()
}
