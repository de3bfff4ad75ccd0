#![allow(dead_code)]

use std::time::Duration;

use vc6batch::batch::BatchConfig;
use vc6batch::config::{
    BatchSection, ConfigFile, DefaultsSection, ProjectConfig, RawConfigFile,
};
use vc6batch::types::BatchStrategy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                batch: BatchSection::default(),
                defaults: DefaultsSection::default(),
                project: Vec::new(),
            },
        }
    }

    pub fn with_project(mut self, project: ProjectConfig) -> Self {
        self.config.project.push(project);
        self
    }

    pub fn tool_path(mut self, path: &str) -> Self {
        self.config.batch.tool_path = path.to_string();
        self
    }

    pub fn default_action(mut self, action: &str) -> Self {
        self.config.batch.default_action = action.to_string();
        self
    }

    pub fn timeout_seconds(mut self, secs: u64) -> Self {
        self.config.batch.timeout_seconds = Some(secs);
        self
    }

    pub fn stop_on_error(mut self, val: bool) -> Self {
        self.config.batch.stop_on_error = val;
        self
    }

    pub fn default_configuration(mut self, configuration: &str) -> Self {
        self.config.defaults.configuration = configuration.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectConfigBuilder {
    project: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            project: ProjectConfig::new(path),
        }
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.project.platform = platform.to_string();
        self
    }

    pub fn configuration(mut self, configuration: &str) -> Self {
        self.project.configuration = configuration.to_string();
        self
    }

    pub fn action(mut self, action: &str) -> Self {
        self.project.action = action.to_string();
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}

/// Builder for `BatchConfig` used directly by orchestrator tests.
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: BatchConfig::default(),
        }
    }

    pub fn tool_path(mut self, path: impl Into<String>) -> Self {
        self.config.tool_path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn stop_on_error(mut self, val: bool) -> Self {
        self.config.strategy = BatchStrategy::from_stop_on_error(val);
        self
    }

    pub fn default_action(mut self, action: &str) -> Self {
        self.config.defaults.action = action.to_string();
        self
    }

    pub fn build(self) -> BatchConfig {
        self.config
    }
}

impl Default for BatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
