//! Error types for the fallible edges of the crate.
//!
//! Node operations themselves never fail; these cover parsing persisted
//! text and building a host graph.

use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug)]
pub enum MergerError {
    /// A session block could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] serde_json::Error),

    /// A host defaults file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A node with this id is already in the graph.
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),
}

pub type Result<T> = std::result::Result<T, MergerError>;
