//! Node trait and context types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Result of node execution for a single item.
#[derive(Debug, Clone)]
pub struct NodeResult {
    /// Output data from the node
    pub data: Value,
    /// Metadata (timing, debug info, etc.)
    pub metadata: Value,
}

impl NodeResult {
    /// Create a new result with just data.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            metadata: serde_json::json!({}),
        }
    }

    /// Create a result with data and metadata.
    pub fn with_metadata(data: Value, metadata: Value) -> Self {
        Self { data, metadata }
    }

    /// Split the data into output records paired with `item_index`.
    ///
    /// An array yields one record per element, anything else one record.
    pub fn into_records(self, item_index: usize) -> Vec<OutputRecord> {
        match self.data {
            Value::Array(values) => values
                .into_iter()
                .map(|json| OutputRecord::new(json, item_index))
                .collect(),
            data => vec![OutputRecord::new(data, item_index)],
        }
    }
}

/// Back-reference from an output record to the input item it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One record handed back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: Value,
    pub paired_item: PairedItem,
    /// Set only for records produced from a tolerated failure.
    #[serde(skip)]
    failed: bool,
}

impl OutputRecord {
    pub fn new(json: Value, item_index: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: item_index },
            failed: false,
        }
    }

    /// Error record used when failures are tolerated.
    pub fn error(message: impl Into<String>, item_index: usize) -> Self {
        Self {
            failed: true,
            ..Self::new(serde_json::json!({ "error": message.into() }), item_index)
        }
    }

    pub fn item_index(&self) -> usize {
        self.paired_item.item
    }

    pub fn is_error(&self) -> bool {
        self.failed
    }
}

/// Context passed to a node for one input item.
#[derive(Debug, Clone)]
pub struct NodeContext {
    /// The input item being processed
    pub input: Value,

    /// Position of the item in the batch
    pub item_index: usize,

    /// Execution ID
    pub execution_id: String,
}

impl NodeContext {
    /// Create a new context.
    pub fn new(execution_id: &str) -> Self {
        Self {
            input: Value::Null,
            item_index: 0,
            execution_id: execution_id.to_string(),
        }
    }

    /// Set the input data.
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Clone context for a specific item.
    pub fn for_item(&self, item: Value, index: usize) -> Self {
        Self {
            input: item,
            item_index: index,
            execution_id: self.execution_id.clone(),
        }
    }
}

/// Trait that all node types must implement.
#[async_trait]
pub trait Node: Send + Sync {
    /// Get the node type name (e.g., "anymailFinder").
    fn node_type(&self) -> &str;

    /// Execute the node for one item.
    ///
    /// # Arguments
    /// * `config` - Node parameters, possibly containing `{{ input.* }}` templates
    /// * `ctx` - Execution context with the current item and its index
    ///
    /// # Returns
    /// The node's output data wrapped in NodeResult
    async fn execute(&self, config: &Value, ctx: &NodeContext) -> Result<NodeResult>;

    /// Get a description of this node type.
    fn description(&self) -> &str {
        "A workflow node"
    }
}
