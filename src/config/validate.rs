// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, Vc6BatchError};
use crate::job::JobDescriptor;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::Vc6BatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.batch, raw.defaults, raw.project))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_projects(cfg)?;
    validate_batch_section(cfg)?;
    validate_projects(cfg)?;
    Ok(())
}

fn ensure_has_projects(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.is_empty() {
        return Err(Vc6BatchError::ConfigError(
            "batch file must contain at least one [[project]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_batch_section(cfg: &RawConfigFile) -> Result<()> {
    let batch = &cfg.batch;

    if batch.timeout_minutes.is_some() && batch.timeout_seconds.is_some() {
        return Err(Vc6BatchError::ConfigError(
            "[batch] may set timeout_minutes or timeout_seconds, not both".to_string(),
        ));
    }

    if batch.timeout_minutes == Some(0) || batch.timeout_seconds == Some(0) {
        return Err(Vc6BatchError::ConfigError(
            "[batch] timeout must be positive (got 0)".to_string(),
        ));
    }

    if let Some(mins) = batch.timeout_minutes {
        if mins.checked_mul(60).is_none() {
            return Err(Vc6BatchError::ConfigError(format!(
                "[batch].timeout_minutes is too large (got {mins})"
            )));
        }
    }

    if batch.tool_path.trim().is_empty() && batch.tool_exe.trim().is_empty() {
        return Err(Vc6BatchError::ConfigError(
            "[batch].tool_exe must not be empty when tool_path is not set".to_string(),
        ));
    }

    Ok(())
}

fn validate_projects(cfg: &RawConfigFile) -> Result<()> {
    for (idx, project) in cfg.project.iter().enumerate() {
        if project.path.trim().is_empty() {
            return Err(Vc6BatchError::ConfigError(format!(
                "[[project]] #{} has an empty path",
                idx + 1
            )));
        }

        if JobDescriptor::new(&project.path).base_name().is_empty() {
            return Err(Vc6BatchError::ConfigError(format!(
                "project '{}' has no file name to derive a target from",
                project.path
            )));
        }
    }
    Ok(())
}
