//! Node implementations.
//!
//! A node turns one input item plus its parameters into output data.
//! The Anymailfinder node is the only node type in this crate.

pub mod anymailfinder;
pub mod template;
mod types;

pub use anymailfinder::AnymailfinderNode;
pub use types::{Node, NodeContext, NodeResult, OutputRecord, PairedItem};
