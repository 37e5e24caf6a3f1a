// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector geometry and hit-testing.
//!
//! All coordinates are canvas-local: the origin is the top-left corner of the
//! drawing surface, the same space node positions are stored in.

use crate::graph::Graph;
use crate::node::{Node, NodeId};
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Assumed node card width
pub const NODE_WIDTH: f32 = 192.0;
/// Assumed node card height
pub const NODE_HEIGHT: f32 = 84.0;
/// Drawn connector radius
pub const CONNECTOR_RADIUS: f32 = 6.0;
/// Connector hotspot radius used for hit-testing
pub const CONNECTOR_HIT_RADIUS: f32 = 10.0;

/// Sizes and offsets used to lay out node cards and their connectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasMetrics {
    /// Node card width
    pub node_width: f32,
    /// Node card height
    pub node_height: f32,
    /// Drawn connector radius
    pub connector_radius: f32,
    /// Connector hotspot radius
    pub connector_hit_radius: f32,
    /// Horizontal offset of the input connector from the node position
    pub input_offset: f32,
    /// Horizontal offset of the output connector from the node position
    pub output_offset: f32,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            connector_radius: CONNECTOR_RADIUS,
            connector_hit_radius: CONNECTOR_HIT_RADIUS,
            input_offset: -NODE_WIDTH / 2.0,
            output_offset: NODE_WIDTH / 2.0,
        }
    }
}

/// Which end of a node a connector sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorSide {
    /// Left edge
    Input,
    /// Right edge
    Output,
}

/// A specific connector on a specific node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connector {
    /// Owning node
    pub node: NodeId,
    /// Side of the node
    pub side: ConnectorSide,
}

impl Connector {
    /// Input connector of a node
    pub fn input(node: NodeId) -> Self {
        Self { node, side: ConnectorSide::Input }
    }

    /// Output connector of a node
    pub fn output(node: NodeId) -> Self {
        Self { node, side: ConnectorSide::Output }
    }
}

/// What lies under a canvas-local point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A connector hotspot
    Connector(Connector),
    /// The body of a node card
    NodeBody(NodeId),
    /// Empty canvas
    Canvas,
}

impl CanvasMetrics {
    /// Anchor point of one of a node's connectors
    pub fn anchor(&self, node: &Node, side: ConnectorSide) -> Pos2 {
        match side {
            ConnectorSide::Input => self.input_anchor(node),
            ConnectorSide::Output => self.output_anchor(node),
        }
    }

    /// Anchor point of the input connector (left edge)
    pub fn input_anchor(&self, node: &Node) -> Pos2 {
        node.pos() + Vec2::new(self.input_offset, 0.0)
    }

    /// Anchor point of the output connector (right edge)
    pub fn output_anchor(&self, node: &Node) -> Pos2 {
        node.pos() + Vec2::new(self.output_offset, 0.0)
    }

    /// Bounding box of a node card, centered on its position
    pub fn node_rect(&self, node: &Node) -> Rect {
        Rect::from_center_size(node.pos(), Vec2::new(self.node_width, self.node_height))
    }

    /// Whether `pos` falls within the hotspot around `anchor`
    pub fn hits_connector(&self, anchor: Pos2, pos: Pos2) -> bool {
        anchor.distance(pos) <= self.connector_hit_radius
    }

    /// Find what lies under `pos`.
    ///
    /// Nodes are tested topmost first (later nodes are drawn on top). Within
    /// a node its connector hotspots win over its body, but a card hides
    /// whatever lies beneath it, connectors of earlier nodes included.
    pub fn hit_test(&self, graph: &Graph, pos: Pos2) -> HitTarget {
        for node in graph.nodes().rev() {
            for side in [ConnectorSide::Output, ConnectorSide::Input] {
                if self.hits_connector(self.anchor(node, side), pos) {
                    return HitTarget::Connector(Connector { node: node.id.clone(), side });
                }
            }
            if self.node_rect(node).contains(pos) {
                return HitTarget::NodeBody(node.id.clone());
            }
        }
        HitTarget::Canvas
    }
}
