// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(format!("connection-{}", Uuid::new_v4().simple()))
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed connection from one node's output to another node's input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Node the drag started from
    pub source: NodeId,
    /// Node the drag was released on
    pub target: NodeId,
}

impl Connection {
    /// Create a new connection
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: ConnectionId::new(),
            source,
            target,
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: &NodeId) -> bool {
        self.source == *node_id || self.target == *node_id
    }

    /// Check if this connection joins `a` and `b`, in either direction
    pub fn links(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }
}
