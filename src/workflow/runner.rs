use crate::app;
use crate::config::{PipelineKind, RunOptions};
use crate::utils::error::{EtlError, Result};
use crate::workflow::definition::WorkflowConfig;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_name: String,
    pub pipeline: PipelineKind,
    pub output_path: String,
    pub duration: Duration,
}

/// Executes every enabled task of a workflow in dependency order. One task
/// failure fails the whole run; the external scheduler owns retries, so a
/// rerun repeats the workflow from the start.
pub struct WorkflowRunner {
    config: WorkflowConfig,
    options: RunOptions,
}

impl WorkflowRunner {
    pub fn new(config: WorkflowConfig, options: RunOptions) -> Self {
        Self { config, options }
    }

    pub async fn execute_all(&self) -> Result<Vec<TaskResult>> {
        self.config.validate_config()?;
        let order = self.config.execution_order()?;

        tracing::info!(
            "🗂️ Workflow '{}': {} tasks (schedule: {})",
            self.config.workflow.name,
            order.len(),
            self.config.workflow.schedule
        );

        let mut results = Vec::new();

        for task in order {
            if !task.is_enabled() {
                tracing::info!("⏭️ Skipping task: {} (disabled)", task.name);
                continue;
            }

            let kind = PipelineKind::parse(&task.pipeline).ok_or_else(|| {
                EtlError::WorkflowError {
                    task: task.name.clone(),
                    details: format!("Unknown pipeline: {}", task.pipeline),
                }
            })?;

            tracing::info!("▶️ Running task: {} ({})", task.name, kind.as_str());
            let started = Instant::now();

            let output_path = app::run_named_pipeline(kind, &self.options)
                .await
                .map_err(|e| EtlError::WorkflowError {
                    task: task.name.clone(),
                    details: e.to_string(),
                })?;

            let duration = started.elapsed();
            tracing::info!("✅ Task completed: {} ({:?})", task.name, duration);

            results.push(TaskResult {
                task_name: task.name.clone(),
                pipeline: kind,
                output_path,
                duration,
            });
        }

        let total: Duration = results.iter().map(|r| r.duration).sum();
        tracing::info!(
            "🗂️ Workflow '{}' finished: {} tasks in {:?}",
            self.config.workflow.name,
            results.len(),
            total
        );

        Ok(results)
    }
}
