// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph store containing nodes and connections.
//!
//! All mutation goes through [`Graph`]'s own methods, which keep the
//! structural invariants:
//! - node IDs are unique
//! - no connection joins a node to itself
//! - at most one connection joins any unordered pair of nodes
//! - no connection references a node that is not in the graph

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeDataPatch, NodeId, NodeType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Connections in creation order
    connections: IndexMap<ConnectionId, Connection>,
    /// Number of nodes created so far, used to seed default names
    created: u64,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node of the given type at a canvas-local position.
    ///
    /// Unknown types are accepted and receive generic default data.
    pub fn create_node(&mut self, node_type: NodeType, position: [f32; 2]) -> &Node {
        self.created += 1;
        let mut node = Node::new(node_type, position, self.created);
        // Regenerate on the (unlikely) suffix clash
        while self.nodes.contains_key(&node.id) {
            node.id = NodeId::generate(&node.node_type);
        }

        tracing::debug!("Created {} node {} at {:?}", node.node_type, node.id, position);

        let index = self.nodes.insert_full(node.id.clone(), node).0;
        &self.nodes[index]
    }

    /// Merge a patch into a node's data.
    ///
    /// Returns `false`, changing nothing, if the node does not exist.
    pub fn update_node_data(&mut self, node_id: &NodeId, patch: NodeDataPatch) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.data.apply(patch);
                tracing::debug!("Updated data of node {}", node_id);
                true
            }
            None => {
                tracing::debug!("Ignoring update for missing node {}", node_id);
                false
            }
        }
    }

    /// Connect `source` to `target`.
    ///
    /// Rejects self-loops and any second connection between the same two
    /// nodes, whichever direction the existing one has.
    pub fn create_connection(
        &mut self,
        source: &NodeId,
        target: &NodeId,
    ) -> Result<&Connection, ConnectionError> {
        if source == target {
            return Err(ConnectionError::SelfLoop);
        }
        if !self.nodes.contains_key(source) {
            return Err(ConnectionError::NodeNotFound(source.clone()));
        }
        if !self.nodes.contains_key(target) {
            return Err(ConnectionError::NodeNotFound(target.clone()));
        }
        if self.is_linked(source, target) {
            return Err(ConnectionError::Duplicate(source.clone(), target.clone()));
        }

        let connection = Connection::new(source.clone(), target.clone());
        tracing::debug!("Connected {} -> {} ({})", source, target, connection.id);

        let index = self.connections.insert_full(connection.id.clone(), connection).0;
        Ok(&self.connections[index])
    }

    /// Move a node. Returns `false` if the node does not exist.
    pub fn set_node_position(&mut self, node_id: &NodeId, position: [f32; 2]) -> bool {
        match self.nodes.get_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(node_id)?;
        self.connections.retain(|_, c| !c.involves_node(node_id));
        tracing::debug!("Removed node {}", node_id);
        Some(node)
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(connection_id)
    }

    /// Whether any connection joins `a` and `b`, in either direction
    pub fn is_linked(&self, a: &NodeId, b: &NodeId) -> bool {
        self.connections.values().any(|c| c.links(a, b))
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Get all nodes, in creation order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get all connections, in creation order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node<'a>(
        &'a self,
        node_id: &'a NodeId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Source and target are the same node
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The two nodes are already connected, in either direction
    #[error("Nodes already connected: {0} and {1}")]
    Duplicate(NodeId, NodeId),

    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}
