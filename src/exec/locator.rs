// src/exec/locator.rs

//! Resolve the build tool executable.
//!
//! Precedence:
//! 1. an explicit override, returned verbatim
//! 2. `<$env_var>/<bin_dir>/<exe_name>` when the variable is set and non-empty
//! 3. the bare `exe_name`, left to search-path resolution
//!
//! Resolution itself never touches the filesystem. Existence is checked
//! separately by the orchestrator through [`find_executable`] before any job
//! is attempted.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::Environment;

pub const DEFAULT_TOOL_ENV_VAR: &str = "MSDevDir";
pub const DEFAULT_TOOL_BIN_DIR: &str = "Bin";
pub const DEFAULT_TOOL_EXE: &str = "msdev.exe";

/// Pure lookup following the precedence described in the module docs.
pub fn resolve(
    explicit_path: &str,
    env_var: &str,
    bin_subdir: &str,
    exe_name: &str,
    env: &dyn Environment,
) -> PathBuf {
    if !explicit_path.is_empty() {
        return PathBuf::from(explicit_path);
    }

    match env.var(env_var) {
        Some(root) if !root.is_empty() => Path::new(&root).join(bin_subdir).join(exe_name),
        _ => PathBuf::from(exe_name),
    }
}

/// Names the environment variable, bin directory and executable to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocator {
    pub env_var: String,
    pub bin_dir: String,
    pub exe_name: String,
}

impl Default for ToolLocator {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_TOOL_ENV_VAR.to_string(),
            bin_dir: DEFAULT_TOOL_BIN_DIR.to_string(),
            exe_name: DEFAULT_TOOL_EXE.to_string(),
        }
    }
}

impl ToolLocator {
    pub fn resolve(&self, explicit_path: &str, env: &dyn Environment) -> PathBuf {
        let path = resolve(
            explicit_path,
            &self.env_var,
            &self.bin_dir,
            &self.exe_name,
            env,
        );
        debug!(tool = %path.display(), "resolved build tool path");
        path
    }
}

/// Turn a resolved tool path into an existing executable file.
///
/// Paths with a directory component are checked as-is. A bare name is looked
/// up in each directory of the injected `PATH`. Returns `None` when nothing
/// executable is found.
pub fn find_executable(tool: &Path, env: &dyn Environment) -> Option<PathBuf> {
    if !is_bare_name(tool) {
        return is_executable(tool).then(|| tool.to_path_buf());
    }

    let search_path = env.var("PATH")?;
    std::env::split_paths(&search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

/// True when `path` names a regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

fn is_bare_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}
