//! Batch executor.
//!
//! Runs a node once per input item and collects the output records in input
//! order. Failures either abort the batch or, when `continue_on_fail` is
//! set, become `{error}` records paired with the failing item.

use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ExecutionConfig;
use crate::error::Result;
use crate::metrics::{self, ItemOutcome};
use crate::nodes::{Node, NodeContext, OutputRecord};

/// How item failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// The first failing item (in input order) fails the whole batch.
    #[default]
    Abort,
    /// A failing item yields `{error: message}` and processing continues.
    Continue,
}

/// Batch execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSettings {
    pub failure_mode: FailureMode,
    /// Items in flight at once; 1 processes strictly one after another.
    pub max_concurrency: usize,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            failure_mode: FailureMode::Abort,
            max_concurrency: 1,
        }
    }
}

impl ExecutionSettings {
    pub fn tolerant() -> Self {
        Self {
            failure_mode: FailureMode::Continue,
            ..Self::default()
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}

impl From<&ExecutionConfig> for ExecutionSettings {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            failure_mode: if config.continue_on_fail {
                FailureMode::Continue
            } else {
                FailureMode::Abort
            },
            max_concurrency: config.max_concurrency.max(1),
        }
    }
}

/// Runs a node over a batch of items.
pub struct Executor {
    node: Arc<dyn Node>,
    settings: ExecutionSettings,
}

impl Executor {
    pub fn new(node: Arc<dyn Node>, settings: ExecutionSettings) -> Self {
        Self { node, settings }
    }

    pub fn settings(&self) -> ExecutionSettings {
        self.settings
    }

    /// Process every item with the same node parameters.
    ///
    /// Output records are ordered by input index. In abort mode the error of
    /// the lowest failing index is returned.
    pub async fn run(
        &self,
        execution_id: &str,
        items: &[Value],
        config: &Value,
    ) -> Result<Vec<OutputRecord>> {
        let start = Instant::now();
        let base_ctx = NodeContext::new(execution_id);
        let node_type = self.node.node_type().to_string();

        info!(
            execution_id,
            node_type = %node_type,
            items = items.len(),
            "Starting batch"
        );

        let mut outcomes = stream::iter(items.iter().enumerate())
            .map(|(index, item)| {
                let ctx = base_ctx.for_item(item.clone(), index);
                let node = self.node.clone();
                async move {
                    let result = node.execute(config, &ctx).await;
                    (index, result)
                }
            })
            .buffered(self.settings.max_concurrency.max(1));

        let mut records = Vec::with_capacity(items.len());
        while let Some((index, result)) = outcomes.next().await {
            match result {
                Ok(result) => {
                    debug!(execution_id, item_index = index, "Item completed");
                    metrics::record_item(ItemOutcome::Success);
                    records.extend(result.into_records(index));
                }
                Err(e) => match self.settings.failure_mode {
                    FailureMode::Continue => {
                        warn!(
                            "Node '{}' item {} failed (continuing): {}",
                            node_type, index, e
                        );
                        metrics::record_item(ItemOutcome::Recovered);
                        records.push(OutputRecord::error(e.to_string(), index));
                    }
                    FailureMode::Abort => {
                        error!("Node '{}' item {} failed: {}", node_type, index, e);
                        metrics::record_item(ItemOutcome::Failed);
                        return Err(e.at_item(index));
                    }
                },
            }
        }

        info!(
            execution_id,
            node_type = %node_type,
            records = records.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch completed"
        );

        Ok(records)
    }
}
