use crate::config::PipelineKind;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub workflow: WorkflowInfo,
    pub tasks: Vec<TaskDefinition>,
}

/// Schedule and retry hints are declarative only; the external scheduler
/// reads them, this process never does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInfo {
    pub name: String,
    pub description: Option<String>,
    pub schedule: String,
    pub retries: Option<u32>,
    pub retry_delay_minutes: Option<u64>,
    pub max_active_runs: Option<u32>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub pipeline: String,
    pub depends_on: Option<Vec<String>>,
    pub enabled: Option<bool>,
}

impl TaskDefinition {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

impl WorkflowConfig {
    /// 從 TOML 檔案載入工作流定義
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析，支援 ${VAR} 環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| EtlError::ConfigError {
            message: format!("Workflow TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("workflow.name", &self.workflow.name)?;
        validate_non_empty_string("workflow.schedule", &self.workflow.schedule)?;

        if self.tasks.is_empty() {
            return Err(EtlError::ConfigError {
                message: "Workflow must declare at least one task".to_string(),
            });
        }

        let mut names = HashMap::new();
        for task in &self.tasks {
            validate_non_empty_string("tasks.name", &task.name)?;

            if names.insert(task.name.as_str(), ()).is_some() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "tasks.name".to_string(),
                    value: task.name.clone(),
                    reason: "Duplicate task name".to_string(),
                });
            }

            if PipelineKind::parse(&task.pipeline).is_none() {
                return Err(EtlError::InvalidConfigValueError {
                    field: format!("tasks.{}.pipeline", task.name),
                    value: task.pipeline.clone(),
                    reason: "Unknown pipeline; expected top-tracks, recently-played, or tweets"
                        .to_string(),
                });
            }
        }

        // 順便檢查依賴與循環
        self.execution_order()?;

        Ok(())
    }

    /// Tasks in dependency order, declaration order preserved among tasks
    /// whose dependencies are already satisfied.
    pub fn execution_order(&self) -> Result<Vec<&TaskDefinition>> {
        let n = self.tasks.len();
        let index: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| (task.name.as_str(), i))
            .collect();

        let mut indegree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, task) in self.tasks.iter().enumerate() {
            for dep in task.depends_on.iter().flatten() {
                let j = *index.get(dep.as_str()).ok_or_else(|| {
                    EtlError::InvalidConfigValueError {
                        field: format!("tasks.{}.depends_on", task.name),
                        value: dep.clone(),
                        reason: "Unknown task".to_string(),
                    }
                })?;

                if j == i {
                    return Err(EtlError::InvalidConfigValueError {
                        field: format!("tasks.{}.depends_on", task.name),
                        value: dep.clone(),
                        reason: "Task cannot depend on itself".to_string(),
                    });
                }

                indegree[i] += 1;
                dependents[j].push(i);
            }
        }

        let mut emitted = vec![false; n];
        let mut order = Vec::with_capacity(n);

        while order.len() < n {
            let next = (0..n).find(|&i| !emitted[i] && indegree[i] == 0);
            match next {
                Some(i) => {
                    emitted[i] = true;
                    order.push(&self.tasks[i]);
                    for &dependent in &dependents[i] {
                        indegree[dependent] -= 1;
                    }
                }
                None => {
                    return Err(EtlError::ValidationError {
                        message: "Dependency cycle detected in workflow tasks".to_string(),
                    })
                }
            }
        }

        Ok(order)
    }
}

impl Validate for WorkflowConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_WORKFLOW: &str = r#"
[workflow]
name = "daily-listening"
schedule = "@daily"
retries = 2
retry_delay_minutes = 5
max_active_runs = 1

[[tasks]]
name = "artist_top_tracks"
pipeline = "top-tracks"

[[tasks]]
name = "recently_played"
pipeline = "recently-played"
depends_on = ["artist_top_tracks"]
"#;

    #[test]
    fn test_parse_basic_workflow() {
        let config = WorkflowConfig::from_toml_str(BASIC_WORKFLOW).unwrap();

        assert_eq!(config.workflow.name, "daily-listening");
        assert_eq!(config.workflow.schedule, "@daily");
        assert_eq!(config.workflow.retries, Some(2));
        assert_eq!(config.tasks.len(), 2);
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_execution_order_respects_dependencies() {
        let toml = r#"
[workflow]
name = "reordered"
schedule = "@daily"

[[tasks]]
name = "second"
pipeline = "recently-played"
depends_on = ["first"]

[[tasks]]
name = "first"
pipeline = "top-tracks"
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        let order: Vec<&str> = config
            .execution_order()
            .unwrap()
            .iter()
            .map(|task| task.name.as_str())
            .collect();

        assert_eq!(order, vec!["first", "second"]);
    }

    #[test]
    fn test_unknown_dependency_is_rejected() {
        let toml = r#"
[workflow]
name = "broken"
schedule = "@daily"

[[tasks]]
name = "only"
pipeline = "top-tracks"
depends_on = ["missing"]
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_dependency_cycle_is_rejected() {
        let toml = r#"
[workflow]
name = "cyclic"
schedule = "@daily"

[[tasks]]
name = "a"
pipeline = "top-tracks"
depends_on = ["b"]

[[tasks]]
name = "b"
pipeline = "recently-played"
depends_on = ["a"]
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        let err = config.execution_order().unwrap_err();
        assert!(matches!(err, EtlError::ValidationError { .. }));
    }

    #[test]
    fn test_unknown_pipeline_is_rejected() {
        let toml = r#"
[workflow]
name = "broken"
schedule = "@daily"

[[tasks]]
name = "only"
pipeline = "does-not-exist"
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_task_names_are_rejected() {
        let toml = r#"
[workflow]
name = "broken"
schedule = "@daily"

[[tasks]]
name = "twice"
pipeline = "top-tracks"

[[tasks]]
name = "twice"
pipeline = "recently-played"
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        assert!(config.validate_config().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WORKFLOW_TEST_SCHEDULE", "0 3 * * *");

        let toml = r#"
[workflow]
name = "substituted"
schedule = "${WORKFLOW_TEST_SCHEDULE}"

[[tasks]]
name = "only"
pipeline = "top-tracks"
"#;
        let config = WorkflowConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.workflow.schedule, "0 3 * * *");

        std::env::remove_var("WORKFLOW_TEST_SCHEDULE");
    }
}
