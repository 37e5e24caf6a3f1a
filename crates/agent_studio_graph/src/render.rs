// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry of what the canvas draws, derived fresh from the graph each frame.

use crate::connection::ConnectionId;
use crate::geometry::CanvasMetrics;
use crate::graph::Graph;
use crate::interaction::InteractionState;
use egui::Pos2;

/// Dash length of the in-progress connection
pub const DRAG_DASH_LENGTH: f32 = 5.0;
/// Gap length of the in-progress connection
pub const DRAG_GAP_LENGTH: f32 = 5.0;

/// Straight line drawn for an existing connection
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSegment {
    /// Connection being drawn
    pub id: ConnectionId,
    /// Output anchor of the source node
    pub from: Pos2,
    /// Input anchor of the target node
    pub to: Pos2,
}

/// Dashed line drawn while a connection is being dragged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSegment {
    /// Connector anchor the drag started from
    pub from: Pos2,
    /// Current pointer position
    pub to: Pos2,
}

/// Segments for every connection whose endpoints exist
pub fn connection_segments(graph: &Graph, metrics: &CanvasMetrics) -> Vec<ConnectionSegment> {
    graph
        .connections()
        .filter_map(|connection| {
            let source = graph.node(&connection.source)?;
            let target = graph.node(&connection.target)?;
            Some(ConnectionSegment {
                id: connection.id.clone(),
                from: metrics.output_anchor(source),
                to: metrics.input_anchor(target),
            })
        })
        .collect()
}

/// Segment for the connection being dragged, if any
pub fn drag_segment(state: &InteractionState) -> Option<DragSegment> {
    state.connection_drag().map(|drag| DragSegment {
        from: drag.start,
        to: drag.current,
    })
}
