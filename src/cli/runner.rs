//! Runner that drives the mirror pipeline

use crate::cli::args::OutputFormat;
use crate::cli::config::MirrorConfig;
use crate::cli::step::MirrorStep;
use crate::engine::{CommandOutput, ContainerEngine, EngineCli, commands};
use crate::error::{MirrorError, Result};
use crate::output::OutputManager;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Timing for one completed step
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StepReport {
    pub name: &'static str,
    pub duration_ms: u128,
}

/// Result of a successful (or dry) run
#[derive(Debug, Clone, Serialize)]
pub struct MirrorReport {
    pub source: String,
    pub destination: String,
    pub registry: String,
    pub logged_in: bool,
    pub dry_run: bool,
    pub steps: Vec<StepReport>,
    pub total_duration_ms: u128,
    pub pull_command: String,
}

pub struct Runner {
    config: MirrorConfig,
    output: OutputManager,
    engine: Arc<dyn ContainerEngine>,
}

impl Runner {
    /// Runner using the engine CLI named in `config`
    pub fn new(config: MirrorConfig, output: OutputManager) -> Self {
        let engine = Arc::new(EngineCli::new(config.engine.clone()));
        Self::with_engine(config, output, engine)
    }

    pub fn with_engine(
        config: MirrorConfig,
        output: OutputManager,
        engine: Arc<dyn ContainerEngine>,
    ) -> Self {
        // stdout carries only the report in JSON mode
        let output = match config.output {
            OutputFormat::Json => output.with_diagnostics_to_stderr(),
            OutputFormat::Text => output,
        };
        Self {
            config,
            output,
            engine,
        }
    }

    /// Steps in execution order; login is omitted when skipped
    pub fn plan(&self) -> Vec<MirrorStep> {
        let mut steps = vec![MirrorStep::CheckEngine {
            engine: self.engine.program().to_string(),
        }];
        if self.config.credentials.is_some() {
            steps.push(MirrorStep::Login {
                registry: self.config.registry.clone(),
            });
        }
        steps.push(MirrorStep::Pull {
            reference: self.config.source.clone(),
        });
        steps.push(MirrorStep::Tag {
            source: self.config.source.clone(),
            target: self.config.destination.clone(),
        });
        steps.push(MirrorStep::Push {
            reference: self.config.destination.clone(),
        });
        steps
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run(&self) -> Result<MirrorReport> {
        let start_time = Instant::now();
        self.print_banner();

        let plan = self.plan();
        let mut steps = Vec::with_capacity(plan.len());

        if self.config.dry_run {
            self.output.info("Dry run - no commands will be executed");
            for step in &plan {
                self.echo(step);
            }
        } else {
            for step in &plan {
                let step_start = Instant::now();
                self.output.step(&step.description());

                let result = self.execute(step).await;
                let output = match result {
                    Ok(output) => output,
                    Err(e) => {
                        self.output.debug(&format!(
                            "Step '{}' failed after {}",
                            step,
                            self.output.format_duration(step_start.elapsed())
                        ));
                        return Err(e.in_step(step));
                    }
                };

                self.output.command_output(&output, self.config.secret());
                self.output.success(&step.success_message());
                steps.push(StepReport {
                    name: step.name(),
                    duration_ms: step_start.elapsed().as_millis(),
                });
            }
        }

        let report = MirrorReport {
            source: self.config.source.to_string(),
            destination: self.config.destination.to_string(),
            registry: self.config.registry.clone(),
            logged_in: !self.config.dry_run && self.config.credentials.is_some(),
            dry_run: self.config.dry_run,
            steps,
            total_duration_ms: start_time.elapsed().as_millis(),
            pull_command: format!("{} pull {}", self.engine.program(), self.config.destination),
        };

        self.print_summary(&report)?;
        Ok(report)
    }

    async fn execute(&self, step: &MirrorStep) -> Result<CommandOutput> {
        self.echo(step);

        match step {
            MirrorStep::CheckEngine { .. } => self.engine.version().await,
            MirrorStep::Login { registry } => {
                // plan() only yields Login when credentials are present
                let creds = self.config.credentials.as_ref().ok_or_else(|| {
                    MirrorError::Validation(
                        "Login requested without credentials".to_string(),
                    )
                })?;
                self.engine
                    .login(registry, &creds.username, &creds.token)
                    .await
            }
            MirrorStep::Pull { reference } => self.engine.pull(reference).await,
            MirrorStep::Tag { source, target } => self.engine.tag(source, target).await,
            MirrorStep::Push { reference } => self.engine.push(reference).await,
        }
    }

    fn echo(&self, step: &MirrorStep) {
        self.output
            .command(self.engine.program(), &self.args_for(step), self.config.secret());
    }

    fn args_for(&self, step: &MirrorStep) -> Vec<String> {
        match step {
            MirrorStep::CheckEngine { .. } => commands::version(),
            MirrorStep::Login { registry } => {
                let username = self
                    .config
                    .credentials
                    .as_ref()
                    .map(|c| c.username.as_str())
                    .unwrap_or_default();
                commands::login(registry, username)
            }
            MirrorStep::Pull { reference } => commands::pull(reference),
            MirrorStep::Tag { source, target } => commands::tag(source, target),
            MirrorStep::Push { reference } => commands::push(reference),
        }
    }

    fn print_banner(&self) {
        self.output
            .section(&format!("{} Docker Image Mirror", self.config.display_name()));
        self.output.info(&format!("Source: {}", self.config.source));
        self.output.info(&format!("Target: {}", self.config.destination));
        self.output.verbose(&format!("Engine: {}", self.engine.program()));
        self.output.blank();
    }

    fn print_summary(&self, report: &MirrorReport) -> Result<()> {
        if self.config.output == OutputFormat::Json {
            self.output.report(&serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        if report.dry_run {
            self.output.blank();
            self.output.info(&format!(
                "Dry run complete; {} would be mirrored to {}",
                report.source, report.destination
            ));
            return Ok(());
        }

        self.output.blank();
        self.output.section("Success!");
        self.output.info(&format!(
            "{} image has been successfully mirrored to:",
            self.config.display_name()
        ));
        self.output.info(&report.destination);
        self.output.blank();
        self.output.info("You can now use this image with:");
        self.output.info(&report.pull_command);

        if self.output.verbose {
            let items: Vec<(&str, String)> = report
                .steps
                .iter()
                .map(|s| (s.name, format!("{} ms", s.duration_ms)))
                .collect();
            self.output.summary("Step timings", &items);
            self.output
                .detail(&format!("Total time: {}", self.output.elapsed_time()));
        }
        Ok(())
    }
}
