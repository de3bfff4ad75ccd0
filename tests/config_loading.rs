// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use vc6batch::config::load_and_validate;
use vc6batch::errors::Vc6BatchError;
use vc6batch::types::BatchStrategy;
use vc6batch_test_utils::builders::{ConfigFileBuilder, ProjectConfigBuilder};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_batch_file_maps_to_jobs_and_batch_config() {
    let file = write_config(
        r#"
[batch]
tool_path = '/opt/vs98/Common/MSDev98/Bin/msdev.exe'
default_action = "rebuild"
timeout_minutes = 3
stop_on_error = false
kill_on_timeout = false

[defaults]
configuration = "Release"

[[project]]
path = 'C:\src\core\core.dsp'

[[project]]
path = 'C:\src\app\app.dsp'
platform = "Win64"
configuration = "Debug"
action = "/clean"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    let batch = cfg.batch_config();

    assert_eq!(batch.tool_path, "/opt/vs98/Common/MSDev98/Bin/msdev.exe");
    assert_eq!(batch.defaults.action, "REBUILD");
    assert_eq!(batch.defaults.platform, "Win32");
    assert_eq!(batch.defaults.configuration, "Release");
    assert_eq!(batch.timeout, Duration::from_secs(180));
    assert_eq!(batch.strategy, BatchStrategy::RunAll);
    assert!(!batch.kill_on_timeout);

    let jobs = cfg.jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].base_name(), "core");
    assert_eq!(jobs[0].action, "");
    assert_eq!(jobs[1].platform, "Win64");
    assert_eq!(jobs[1].configuration, "Debug");
    assert_eq!(jobs[1].action, "CLEAN");
}

#[test]
fn minimal_batch_file_uses_defaults() {
    let file = write_config(
        r#"
[[project]]
path = "app.dsp"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    let batch = cfg.batch_config();

    assert_eq!(batch.tool_path, "");
    assert_eq!(batch.locator.env_var, "MSDevDir");
    assert_eq!(batch.locator.bin_dir, "Bin");
    assert_eq!(batch.locator.exe_name, "msdev.exe");
    assert_eq!(batch.timeout, Duration::from_secs(600));
    assert_eq!(batch.strategy, BatchStrategy::StopOnError);
    assert!(batch.kill_on_timeout);
}

#[test]
fn empty_project_list_is_a_config_error() {
    let file = write_config("[batch]\ntimeout_seconds = 5\n");

    match load_and_validate(file.path()) {
        Err(Vc6BatchError::ConfigError(msg)) => assert!(msg.contains("[[project]]")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn conflicting_timeouts_are_rejected() {
    let mut raw = ConfigFileBuilder::new()
        .with_project(ProjectConfigBuilder::new("a.dsp").build())
        .timeout_seconds(30)
        .raw();
    raw.batch.timeout_minutes = Some(1);

    match vc6batch::config::ConfigFile::try_from(raw) {
        Err(Vc6BatchError::ConfigError(msg)) => assert!(msg.contains("not both")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn zero_timeout_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_project(ProjectConfigBuilder::new("a.dsp").build())
        .timeout_seconds(0)
        .raw();

    assert!(matches!(
        vc6batch::config::ConfigFile::try_from(raw),
        Err(Vc6BatchError::ConfigError(_))
    ));
}

#[test]
fn timeout_minutes_too_large_for_seconds_is_rejected() {
    let file = write_config(
        r#"
[batch]
timeout_minutes = 922337203685477580

[[project]]
path = "a.dsp"
"#,
    );

    match load_and_validate(file.path()) {
        Err(Vc6BatchError::ConfigError(msg)) => assert!(msg.contains("timeout_minutes")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn project_without_file_name_is_rejected() {
    let file = write_config(
        r#"
[[project]]
path = "src/"
"#,
    );

    match load_and_validate(file.path()) {
        Err(Vc6BatchError::ConfigError(msg)) => assert!(msg.contains("src/")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[[project]\npath = ");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(Vc6BatchError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_and_validate("/definitely/not/a/Vc6Batch.toml"),
        Err(Vc6BatchError::IoError(_))
    ));
}

#[test]
fn builder_config_round_trips_overrides() {
    let cfg = ConfigFileBuilder::new()
        .default_configuration("Release")
        .default_action("clean")
        .stop_on_error(false)
        .with_project(
            ProjectConfigBuilder::new("lib/util.dsp")
                .platform("Win32")
                .configuration("Debug")
                .build(),
        )
        .build();

    let batch = cfg.batch_config();
    let job = &cfg.jobs()[0];
    assert_eq!(
        vc6batch::exec::args::build(job, &batch.defaults),
        r#""lib/util.dsp" /MAKE "util - Win32 Debug" /CLEAN"#
    );
}
