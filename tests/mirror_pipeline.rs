use async_trait::async_trait;
use clap::Parser;
use image_mirror::cli::{Args, MirrorConfig, MirrorStep, Runner};
use image_mirror::error::{MirrorError, Result};
use image_mirror::{CommandOutput, ContainerEngine, ImageReference, OutputManager};
use std::sync::{Arc, Mutex};

/// Engine that records every call and fails on a chosen command
#[derive(Default)]
struct FakeEngine {
    calls: Mutex<Vec<String>>,
    missing: bool,
    fail_on: Option<&'static str>,
}

impl FakeEngine {
    fn missing() -> Self {
        Self {
            missing: true,
            ..Default::default()
        }
    }

    fn failing_on(command: &'static str) -> Self {
        Self {
            fail_on: Some(command),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str, call: String) -> Result<CommandOutput> {
        if self.missing {
            return Err(MirrorError::EngineMissing {
                engine: "docker".to_string(),
            });
        }
        self.calls.lock().unwrap().push(call.clone());
        if self.fail_on == Some(name) {
            return Err(MirrorError::CommandFailed {
                command: format!("docker {}", call),
                status: "exit status: 1".to_string(),
                stderr: format!("{} denied", name),
            });
        }
        Ok(CommandOutput::new(format!("{} ok", name), ""))
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    fn program(&self) -> &str {
        "docker"
    }

    async fn version(&self) -> Result<CommandOutput> {
        self.record("version", "--version".to_string())
    }

    async fn login(&self, registry: &str, username: &str, token: &str) -> Result<CommandOutput> {
        assert_eq!(token, "ghp_token");
        self.record("login", format!("login {} -u {}", registry, username))
    }

    async fn pull(&self, reference: &ImageReference) -> Result<CommandOutput> {
        self.record("pull", format!("pull {}", reference))
    }

    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<CommandOutput> {
        self.record("tag", format!("tag {} {}", source, target))
    }

    async fn push(&self, reference: &ImageReference) -> Result<CommandOutput> {
        self.record("push", format!("push {}", reference))
    }
}

fn config(extra: &[&str]) -> MirrorConfig {
    let base = [
        "image-mirror",
        "--username",
        "octo",
        "--token",
        "ghp_token",
        "--repo",
        "octo/search",
    ];
    let args = Args::try_parse_from(base.iter().chain(extra.iter()).copied()).unwrap();
    MirrorConfig::from_args(&args).unwrap()
}

fn runner(config: MirrorConfig, engine: Arc<FakeEngine>) -> Runner {
    Runner::with_engine(config, OutputManager::new_quiet(), engine)
}

#[tokio::test]
async fn test_successful_mirror_runs_every_step_in_order() {
    let engine = Arc::new(FakeEngine::default());
    let runner = runner(
        config(&["--source-tag", "27.1", "--target-tag", "stable"]),
        engine.clone(),
    );

    let report = runner.run().await.unwrap();

    assert_eq!(report.destination, "ghcr.io/octo/search/typesense:stable");
    assert_eq!(report.pull_command, "docker pull ghcr.io/octo/search/typesense:stable");
    assert!(report.logged_in);
    assert_eq!(
        report.steps.iter().map(|s| s.name).collect::<Vec<_>>(),
        vec!["check", "login", "pull", "tag", "push"]
    );
    assert_eq!(
        engine.calls(),
        vec![
            "--version".to_string(),
            "login ghcr.io -u octo".to_string(),
            "pull typesense/typesense:27.1".to_string(),
            "tag typesense/typesense:27.1 ghcr.io/octo/search/typesense:stable".to_string(),
            "push ghcr.io/octo/search/typesense:stable".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_missing_engine_stops_before_any_other_step() {
    let engine = Arc::new(FakeEngine::missing());
    let runner = runner(config(&[]), engine.clone());

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, MirrorError::EngineMissing { .. }));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(err.to_string(), "docker is not installed or not running");
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_failed_version_check_counts_as_missing_engine() {
    let engine = Arc::new(FakeEngine::failing_on("version"));
    let runner = runner(config(&[]), engine.clone());

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, MirrorError::EngineMissing { .. }));
    assert_eq!(engine.calls(), vec!["--version".to_string()]);
}

#[tokio::test]
async fn test_login_failure_skips_pull_tag_and_push() {
    let engine = Arc::new(FakeEngine::failing_on("login"));
    let runner = runner(config(&[]), engine.clone());

    let err = runner.run().await.unwrap_err();

    match &err {
        MirrorError::Authentication { registry, message } => {
            assert_eq!(registry, "ghcr.io");
            assert!(message.contains("login denied"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_ne!(err.exit_code(), 0);
    assert_eq!(
        engine.calls(),
        vec!["--version".to_string(), "login ghcr.io -u octo".to_string()]
    );
}

#[tokio::test]
async fn test_push_failure_is_reported_without_rollback() {
    let engine = Arc::new(FakeEngine::failing_on("push"));
    let runner = runner(config(&[]), engine.clone());

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, MirrorError::Push { .. }));
    assert_eq!(engine.calls().len(), 5);
    assert_eq!(
        engine.calls().last().map(String::as_str),
        Some("push ghcr.io/octo/search/typesense:latest")
    );
}

#[tokio::test]
async fn test_skip_login_omits_login_step() {
    let engine = Arc::new(FakeEngine::default());
    let runner = runner(config(&["--skip-login"]), engine.clone());

    assert!(!runner.plan().iter().any(|s| matches!(s, MirrorStep::Login { .. })));

    let report = runner.run().await.unwrap();

    assert!(!report.logged_in);
    assert!(!engine.calls().iter().any(|c| c.starts_with("login")));
    assert_eq!(engine.calls().len(), 4);
}

#[tokio::test]
async fn test_dry_run_executes_nothing() {
    let engine = Arc::new(FakeEngine::missing());
    let runner = runner(config(&["--dry-run"]), engine.clone());

    let report = runner.run().await.unwrap();

    assert!(report.dry_run);
    assert!(report.steps.is_empty());
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_json_report_serializes() {
    let engine = Arc::new(FakeEngine::default());
    let runner = runner(config(&["--skip-login", "-o", "json"]), engine);

    let report = runner.run().await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["destination"], "ghcr.io/octo/search/typesense:latest");
    assert_eq!(json["steps"].as_array().map(Vec::len), Some(4));
}
