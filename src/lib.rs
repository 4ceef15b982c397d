//! anymailfinder-node - Anymailfinder email discovery for workflow automation
//!
//! Exposes the Anymailfinder REST API as six resource/operation actions
//! (person email, company emails, decision maker, LinkedIn URL, email
//! verification, account info) and runs them once per input item.
//!
//! ## Example
//!
//! ```no_run
//! use anymailfinder_node::{executor_from_config, Config};
//! use serde_json::json;
//!
//! # async fn run() -> anymailfinder_node::Result<()> {
//! let executor = executor_from_config(&Config::load())?;
//! let items = vec![json!({"name": "Jane Doe", "company": "acme.com"})];
//! let records = executor
//!     .run(
//!         "exec-1",
//!         &items,
//!         &json!({
//!             "resource": "personEmail",
//!             "operation": "findEmail",
//!             "fullName": "{{ input.name }}",
//!             "domain": "{{ input.company }}"
//!         }),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod nodes;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;
pub use engine::{ExecutionSettings, Executor, FailureMode};
pub use error::{Error, Result};
pub use nodes::{AnymailfinderNode, OutputRecord};

/// Build an executor for the Anymailfinder node from loaded configuration.
pub fn executor_from_config(config: &Config) -> Result<Executor> {
    let node = AnymailfinderNode::from_config(&config.api)?;
    Ok(Executor::new(
        Arc::new(node),
        ExecutionSettings::from(&config.execution),
    ))
}
