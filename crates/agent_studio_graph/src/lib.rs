// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph canvas for Agent Studio.
//!
//! This crate provides the interactive core of the studio canvas:
//! - The graph store (nodes, connections and their invariants)
//! - Connector geometry and hit-testing
//! - The connection-drag state machine and selection handling
//! - The configuration panel for agent nodes
//! - egui rendering of the canvas
//!
//! ## Architecture
//!
//! Input is modelled as discrete [`interaction::CanvasEvent`]s. The
//! [`interaction::InteractionState`] turns each event into zero or more
//! [`interaction::GraphCommand`]s without touching the store, and
//! [`interaction::NodeEditor`] applies them to the owned [`Graph`]. The egui
//! layer in [`ui`] only translates pointer input into events and paints what
//! [`render`] derives from the graph.

pub mod node;
pub mod connection;
pub mod graph;
pub mod geometry;
pub mod interaction;
pub mod render;
pub mod panel;
pub mod ui;

pub use node::{AgentData, AgentModel, Node, NodeData, NodeDataPatch, NodeId, NodeKind, NodeType, Temperature};
pub use connection::{Connection, ConnectionId};
pub use graph::{ConnectionError, Graph};
pub use geometry::{CanvasMetrics, Connector, ConnectorSide, HitTarget};
pub use interaction::{CanvasEvent, GraphCommand, InteractionMode, InteractionState, NodeEditor, Surface};
