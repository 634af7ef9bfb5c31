//! Merger block of a saved session document.
//!
//! A session is a JSON object that each processor writes its own named
//! blocks into. The merger's block records which nodes fill its two slots:
//!
//! ```json
//! { "MERGER": { "NodeA": 100, "NodeB": -1 } }
//! ```
//!
//! Slots are stored as host node ids, with `-1` for an empty slot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::node::NodeId;

/// Name of the block inside the session object.
pub const MERGER_BLOCK: &str = "MERGER";

/// Persisted identities of a merger's two sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergerRecord {
    #[serde(rename = "NodeA", default = "unset")]
    pub node_a: i64,
    #[serde(rename = "NodeB", default = "unset")]
    pub node_b: i64,
}

fn unset() -> i64 {
    NodeId::UNSET
}

impl MergerRecord {
    pub fn new(node_a: Option<NodeId>, node_b: Option<NodeId>) -> Self {
        Self {
            node_a: NodeId::encode(node_a),
            node_b: NodeId::encode(node_b),
        }
    }

    #[inline]
    pub fn node_a(&self) -> Option<NodeId> {
        NodeId::decode(self.node_a)
    }

    #[inline]
    pub fn node_b(&self) -> Option<NodeId> {
        NodeId::decode(self.node_b)
    }

    /// Write this record as the merger block of `parent`, replacing any earlier one.
    pub fn write_into(&self, parent: &mut Map<String, Value>) -> Result<()> {
        parent.insert(MERGER_BLOCK.to_owned(), serde_json::to_value(self)?);
        Ok(())
    }

    /// Read the merger block of `parent`, if it has one.
    pub fn read_from(parent: &Value) -> Result<Option<Self>> {
        match parent.get(MERGER_BLOCK) {
            Some(block) => Ok(Some(Self::deserialize(block)?)),
            None => Ok(None),
        }
    }
}

impl Default for MergerRecord {
    fn default() -> Self {
        Self::new(None, None)
    }
}
