use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
///
/// The script body receives the tool's argv exactly as the runner passes it.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("writing test script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod test script");
    }

    path
}

/// Write an empty project file so jobs get a real working directory.
pub fn write_project(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "# Microsoft Developer Studio Project File\n").expect("writing project");
    path
}
