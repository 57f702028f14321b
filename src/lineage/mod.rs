//! Column lineage records built from binding results.
//!
//! A [`JobExecution`] identifies one run of a named job. Each bound statement
//! of that run becomes a [`ColumnLineage`]: one [`LineageEdge`] per
//! source/target column pair.

mod graph;

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::binder::BindingResult;
use crate::catalog::CatalogColumn;
use crate::error::{LineageError, Result};

pub use graph::{GraphEdge, GraphNode, LineageGraph, NodeKind};

/// Outcome of a job execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Success,
    Failure,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Running => write!(f, "running"),
            ExecutionStatus::Success => write!(f, "success"),
            ExecutionStatus::Failure => write!(f, "failure"),
        }
    }
}

/// One run of a named job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobExecution {
    pub id: Uuid,
    pub job_name: String,
    pub started_at: DateTime<Utc>,
    /// None while the execution is running.
    pub ended_at: Option<DateTime<Utc>>,
    pub status: ExecutionStatus,
}

impl JobExecution {
    /// Starts a new execution of `job_name` now.
    #[must_use]
    pub fn start(job_name: impl Into<String>) -> Self {
        JobExecution {
            id: Uuid::new_v4(),
            job_name: job_name.into(),
            started_at: Utc::now(),
            ended_at: None,
            status: ExecutionStatus::Running,
        }
    }

    /// Marks the execution finished with `status`.
    pub fn finish(&mut self, status: ExecutionStatus) {
        self.ended_at = Some(Utc::now());
        self.status = status;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == ExecutionStatus::Running
    }
}

/// Data flow from one source column to one target column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    pub source: CatalogColumn,
    pub target: CatalogColumn,
    pub job_name: String,
    pub execution_id: Uuid,
}

/// Lineage edges of one bound statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLineage {
    execution: JobExecution,
    edges: Vec<LineageEdge>,
}

impl ColumnLineage {
    /// Pairs source and target columns of `result` by position.
    ///
    /// A statement without source columns (COPY FROM) yields no edges.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::LineageMismatch`] if the statement has source
    /// columns and their count differs from the target column count.
    pub fn from_binding(execution: &JobExecution, result: &BindingResult) -> Result<Self> {
        let sources = result.source_columns();
        let targets = result.target_columns();

        let edges = if sources.is_empty() {
            Vec::new()
        } else if sources.len() != targets.len() {
            return Err(LineageError::LineageMismatch {
                sources: sources.len(),
                targets: targets.len(),
            });
        } else {
            sources
                .iter()
                .zip(targets)
                .map(|(source, target)| LineageEdge {
                    source: source.clone(),
                    target: target.clone(),
                    job_name: execution.job_name.clone(),
                    execution_id: execution.id,
                })
                .collect()
        };

        debug!(
            "Recorded {} lineage edges into {} for job {}",
            edges.len(),
            result.target_table(),
            execution.job_name
        );
        Ok(ColumnLineage {
            execution: execution.clone(),
            edges,
        })
    }

    #[must_use]
    pub fn execution(&self) -> &JobExecution {
        &self.execution
    }

    #[must_use]
    pub fn edges(&self) -> &[LineageEdge] {
        &self.edges
    }

    #[must_use]
    pub fn into_edges(self) -> Vec<LineageEdge> {
        self.edges
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
