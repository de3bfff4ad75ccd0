// tests/batch_orchestrator.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use vc6batch::batch::Orchestrator;
use vc6batch::env::MapEnvironment;
use vc6batch::job::{JobDescriptor, JobOutcome, JobResult};
use vc6batch_test_utils::builders::BatchConfigBuilder;
use vc6batch_test_utils::fake_executor::FakeExecutor;
use vc6batch_test_utils::init_tracing;
use vc6batch_test_utils::scripts::{write_project, write_script};
use vc6batch_test_utils::sink::RecordingSink;

fn fake_tool(dir: &Path) -> PathBuf {
    write_script(dir, "msdev.exe", "exit 0")
}

fn abc_jobs() -> Vec<JobDescriptor> {
    vec![
        JobDescriptor::new("A.dsp"),
        JobDescriptor::new("B.dsp"),
        JobDescriptor::new("C.dsp"),
    ]
}

#[tokio::test]
async fn all_successful_jobs_give_overall_success_and_log_stdout() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(dir.path());

    let config = BatchConfigBuilder::new()
        .tool_path(tool.to_string_lossy())
        .build();
    let mut orch = Orchestrator::new(
        config,
        FakeExecutor::new(),
        RecordingSink::new(),
        MapEnvironment::new(),
    );

    let report = orch.run(&abc_jobs()).await;

    assert!(report.success());
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.tool.as_deref(), Some(tool.as_path()));
    assert!(orch.sink().errors().is_empty());
    assert!(orch.sink().infos().contains(&"A.dsp ok"));
    assert!(orch.sink().infos().contains(&"C.dsp ok"));
}

#[tokio::test]
async fn stop_on_error_skips_remaining_jobs() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = BatchConfigBuilder::new()
        .tool_path(fake_tool(dir.path()).to_string_lossy())
        .stop_on_error(true)
        .build();
    let executor = FakeExecutor::new().failing("B.dsp", 1, "B.cpp(3): error C2143");
    let mut orch = Orchestrator::new(config, executor, RecordingSink::new(), MapEnvironment::new());

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert!(report.stopped_early);
    assert_eq!(orch.executor().executed_labels(), vec!["A.dsp", "B.dsp"]);
    let errors = orch.sink().errors();
    assert!(errors.contains(&"B.cpp(3): error C2143"));
    assert!(errors.iter().any(|e| e.contains("B.dsp failed with exit code 1")));
}

#[tokio::test]
async fn run_all_attempts_every_job_and_ands_the_results() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = BatchConfigBuilder::new()
        .tool_path(fake_tool(dir.path()).to_string_lossy())
        .stop_on_error(false)
        .build();
    let executor = FakeExecutor::new().failing("B.dsp", 1, "link failed");
    let mut orch = Orchestrator::new(config, executor, RecordingSink::new(), MapEnvironment::new());

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert!(!report.stopped_early);
    assert_eq!(orch.executor().executed_labels(), vec!["A.dsp", "B.dsp", "C.dsp"]);
    let outcomes: Vec<JobOutcome> = report.jobs.iter().map(|j| j.result.outcome()).collect();
    assert_eq!(
        outcomes,
        vec![JobOutcome::Success, JobOutcome::ToolFailure, JobOutcome::Success]
    );
    assert!(orch.sink().infos().contains(&"C.dsp ok"));
}

#[tokio::test]
async fn failure_of_last_job_is_not_an_early_stop() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = BatchConfigBuilder::new()
        .tool_path(fake_tool(dir.path()).to_string_lossy())
        .build();
    let executor = FakeExecutor::new().failing("C.dsp", 3, "");
    let mut orch = Orchestrator::new(config, executor, RecordingSink::new(), MapEnvironment::new());

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert!(!report.stopped_early);
    assert_eq!(report.attempted(), 3);
}

#[tokio::test]
async fn missing_tool_attempts_nothing_and_logs_one_error() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("Bin").join("msdev.exe");
    let config = BatchConfigBuilder::new()
        .tool_path(missing.to_string_lossy())
        .build();
    let mut orch = Orchestrator::new(
        config,
        FakeExecutor::new(),
        RecordingSink::new(),
        MapEnvironment::new(),
    );

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert_eq!(report.attempted(), 0);
    assert!(orch.executor().executed().is_empty());
    assert_eq!(orch.sink().lines.len(), 1);
    let errors = orch.sink().errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("msdev.exe"));
    assert!(report.config_error.is_some());
}

#[tokio::test]
async fn timeout_is_logged_distinctly_and_stops_the_batch() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = BatchConfigBuilder::new()
        .tool_path(fake_tool(dir.path()).to_string_lossy())
        .timeout(Duration::from_secs(90))
        .build();
    let executor = FakeExecutor::new()
        .with_result("A.dsp", JobResult::timed_out("partial\n".into(), String::new()));
    let mut orch = Orchestrator::new(config, executor, RecordingSink::new(), MapEnvironment::new());

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert_eq!(report.attempted(), 1);
    assert_eq!(report.jobs[0].result.exit_code(), None);
    assert_eq!(
        orch.sink().errors(),
        vec!["A.dsp timed out after 90 seconds"]
    );
}

#[tokio::test]
async fn launch_failure_surfaces_its_cause() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = BatchConfigBuilder::new()
        .tool_path(fake_tool(dir.path()).to_string_lossy())
        .stop_on_error(false)
        .build();
    let executor = FakeExecutor::new()
        .with_result("B.dsp", JobResult::launch_failed("permission denied"));
    let mut orch = Orchestrator::new(config, executor, RecordingSink::new(), MapEnvironment::new());

    let report = orch.run(&abc_jobs()).await;

    assert!(!report.success());
    assert_eq!(report.attempted(), 3);
    assert_eq!(orch.sink().errors(), vec!["B.dsp: permission denied"]);
}

#[tokio::test]
async fn invocation_carries_arguments_timeout_and_project_dir() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(dir.path());
    let project = write_project(dir.path(), "app.dsp");

    let config = BatchConfigBuilder::new()
        .tool_path(tool.to_string_lossy())
        .timeout(Duration::from_secs(42))
        .default_action("REBUILD")
        .build();
    let mut orch = Orchestrator::new(
        config,
        FakeExecutor::new(),
        RecordingSink::new(),
        MapEnvironment::new(),
    );

    let job = JobDescriptor::new(&project).with_configuration("Release");
    orch.run(std::slice::from_ref(&job)).await;

    let inv = &orch.executor().executed()[0];
    assert_eq!(inv.tool, tool);
    assert_eq!(inv.timeout, Duration::from_secs(42));
    assert_eq!(inv.working_dir.as_deref(), Some(dir.path()));
    assert_eq!(
        inv.args,
        format!(
            "\"{}\" /MAKE \"app - Win32 Release\" /REBUILD",
            project.display()
        )
    );
}

#[tokio::test]
async fn tool_is_located_through_injected_environment() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let bin = dir.path().join("Bin");
    std::fs::create_dir(&bin).unwrap();
    let tool = write_script(&bin, "msdev.exe", "exit 0");

    let env = MapEnvironment::new().with_var("MSDevDir", dir.path().to_string_lossy());
    let mut orch = Orchestrator::new(
        BatchConfigBuilder::new().build(),
        FakeExecutor::new(),
        RecordingSink::new(),
        env,
    );

    let report = orch.run(&abc_jobs()).await;

    assert!(report.success());
    assert_eq!(report.tool, Some(tool));
}

#[tokio::test]
async fn bare_tool_name_is_found_on_injected_search_path() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let tool = fake_tool(dir.path());

    let env = MapEnvironment::new().with_var("PATH", dir.path().to_string_lossy());
    let orch = Orchestrator::new(
        BatchConfigBuilder::new().build(),
        FakeExecutor::new(),
        RecordingSink::new(),
        env,
    );

    assert_eq!(orch.resolve_tool().unwrap(), tool);
}

#[tokio::test]
async fn explicit_tool_path_beats_environment() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let explicit = write_script(dir.path(), "custom.exe", "exit 0");
    let bin = dir.path().join("Bin");
    std::fs::create_dir(&bin).unwrap();
    write_script(&bin, "msdev.exe", "exit 0");

    let env = MapEnvironment::new()
        .with_var("MSDevDir", dir.path().to_string_lossy())
        .with_var("PATH", bin.to_string_lossy());
    let orch = Orchestrator::new(
        BatchConfigBuilder::new()
            .tool_path(explicit.to_string_lossy())
            .build(),
        FakeExecutor::new(),
        RecordingSink::new(),
        env,
    );

    assert_eq!(orch.resolve_tool().unwrap(), explicit);
}

#[cfg(unix)]
#[tokio::test]
async fn relative_tool_and_project_paths_survive_the_project_working_dir() {
    init_tracing();
    let dir = tempfile::Builder::new()
        .prefix("relpaths")
        .tempdir_in(".")
        .unwrap();
    let rel = PathBuf::from(dir.path().file_name().unwrap());
    write_script(
        dir.path(),
        "msdev.exe",
        "[ -f \"$1\" ] || { echo \"no project $1 in $(pwd)\" >&2; exit 3; }",
    );
    std::fs::create_dir(dir.path().join("proj")).unwrap();
    write_project(&dir.path().join("proj"), "core.dsp");

    let config = BatchConfigBuilder::new()
        .tool_path(rel.join("msdev.exe").to_string_lossy())
        .build();
    let mut orch = Orchestrator::new(
        config,
        vc6batch::exec::ProcessRunner::default(),
        RecordingSink::new(),
        vc6batch::env::ProcessEnvironment,
    );

    let report = orch
        .run(&[JobDescriptor::new(rel.join("proj").join("core.dsp"))])
        .await;

    assert!(report.success(), "errors: {:?}", orch.sink().errors());
    assert!(report.tool.as_deref().is_some_and(Path::is_absolute));
    assert!(orch.sink().errors().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn run_batch_drives_real_processes() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let tool = write_script(
        dir.path(),
        "msdev.exe",
        "case \"$3\" in *Release*) exit 0 ;; *) echo \"bad config $3\" >&2; exit 1 ;; esac",
    );
    let project = write_project(dir.path(), "app.dsp");

    let ok = vc6batch::batch::run_batch(
        &[JobDescriptor::new(&project).with_configuration("Release")],
        BatchConfigBuilder::new()
            .tool_path(tool.to_string_lossy())
            .build(),
    )
    .await;
    assert!(ok);

    let failed = vc6batch::batch::run_batch(
        &[JobDescriptor::new(&project)],
        BatchConfigBuilder::new()
            .tool_path(tool.to_string_lossy())
            .build(),
    )
    .await;
    assert!(!failed);
}
