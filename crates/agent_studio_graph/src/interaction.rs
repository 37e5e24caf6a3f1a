// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas interaction: connection dragging, selection and configuration.
//!
//! [`InteractionState::handle`] maps one [`CanvasEvent`] to a new interaction
//! state plus the [`GraphCommand`]s it implies. It only reads the graph;
//! [`NodeEditor`] owns both halves and applies the commands.
//!
//! Connection policy: a drag may start from either connector of a node. The
//! node the drag started from is always the source and the node whose
//! connector it is released on is the target.

use crate::geometry::{CanvasMetrics, ConnectorSide, HitTarget};
use crate::graph::Graph;
use crate::node::{Node, NodeDataPatch, NodeId, NodeType};
use crate::panel::{PanelAction, PanelRequest};
use egui::Pos2;

/// The drawing surface's placement on screen.
///
/// Pointer events arrive in page coordinates and are translated into
/// canvas-local space by subtracting the surface origin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Surface {
    origin: Option<Pos2>,
}

impl Surface {
    /// A surface that is not mounted (cannot translate coordinates)
    pub fn unmounted() -> Self {
        Self { origin: None }
    }

    /// A surface whose top-left corner is at `origin` in page space
    pub fn mounted(origin: Pos2) -> Self {
        Self { origin: Some(origin) }
    }

    /// Update the on-screen origin, `None` when unmounted
    pub fn set_origin(&mut self, origin: Option<Pos2>) {
        self.origin = origin;
    }

    /// Translate a page position into canvas-local space
    pub fn to_local(&self, page_pos: Pos2) -> Option<Pos2> {
        self.origin.map(|origin| (page_pos - origin).to_pos2())
    }

    /// Translate a canvas-local position into page space
    pub fn to_page(&self, local_pos: Pos2) -> Option<Pos2> {
        self.origin.map(|origin| origin + local_pos.to_vec2())
    }
}

/// Discrete input to the canvas, in canvas-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// Primary button pressed
    PointerDown {
        /// What was under the pointer
        target: HitTarget,
        /// Pointer position
        pos: Pos2,
    },
    /// Pointer moved
    PointerMove {
        /// Pointer position
        pos: Pos2,
    },
    /// Primary button released
    PointerUp {
        /// What was under the pointer
        target: HitTarget,
        /// Pointer position
        pos: Pos2,
    },
    /// Primary button double-clicked
    DoubleClick {
        /// What was under the pointer
        target: HitTarget,
    },
    /// A palette item was dropped on the canvas
    Drop {
        /// Node type token carried by the drag
        token: String,
        /// Drop position
        pos: Pos2,
    },
    /// Abort the current gesture (Escape)
    Cancel,
    /// Remove the selected node
    DeleteSelected,
    /// The configuration panel saved a patch
    PanelUpdate {
        /// Node being configured
        node: NodeId,
        /// Fields to merge
        patch: NodeDataPatch,
    },
    /// The configuration panel was dismissed
    PanelClose,
}

/// A mutation of the graph store requested by the interaction layer
#[derive(Debug, Clone, PartialEq)]
pub enum GraphCommand {
    /// Create a node with default data
    CreateNode {
        /// Node type
        node_type: NodeType,
        /// Canvas-local position
        position: Pos2,
    },
    /// Connect two nodes
    CreateConnection {
        /// Node the drag started from
        source: NodeId,
        /// Node the drag was released on
        target: NodeId,
    },
    /// Merge a patch into a node's data
    UpdateNodeData {
        /// Target node
        node: NodeId,
        /// Fields to merge
        patch: NodeDataPatch,
    },
    /// Remove a node and its connections
    RemoveNode(NodeId),
}

impl GraphCommand {
    /// Apply the command. Returns whether the graph changed.
    ///
    /// Rejected connections and stale targets are absorbed here.
    pub fn apply(self, graph: &mut Graph) -> bool {
        match self {
            Self::CreateNode { node_type, position } => {
                graph.create_node(node_type, [position.x, position.y]);
                true
            }
            Self::CreateConnection { source, target } => {
                match graph.create_connection(&source, &target) {
                    Ok(_) => true,
                    Err(err) => {
                        tracing::debug!("Connection discarded: {err}");
                        false
                    }
                }
            }
            Self::UpdateNodeData { node, patch } => {
                !patch.is_empty() && graph.update_node_data(&node, patch)
            }
            Self::RemoveNode(node) => graph.remove_node(&node).is_some(),
        }
    }
}

/// A connection being dragged out of a connector
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDrag {
    /// Node the drag started from
    pub source: NodeId,
    /// Connector the drag started from
    pub side: ConnectorSide,
    /// Connector anchor at drag start
    pub start: Pos2,
    /// Current pointer position
    pub current: Pos2,
}

/// Connection-drag state machine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionMode {
    /// Nothing in progress
    #[default]
    Idle,
    /// Dragging a new connection
    Connecting(ConnectionDrag),
}

/// Transient canvas UI state
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Layout used for connector anchors
    pub metrics: CanvasMetrics,
    /// Current drag mode
    mode: InteractionMode,
    /// Node body the primary button went down on, pending a click
    pressed_node: Option<NodeId>,
    /// Highlighted node
    selected: Option<NodeId>,
    /// Node whose configuration panel is open
    configuring: Option<NodeId>,
}

impl InteractionState {
    /// Create idle state using the given layout
    pub fn new(metrics: CanvasMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Current drag mode
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// The connection being dragged, if any
    pub fn connection_drag(&self) -> Option<&ConnectionDrag> {
        match &self.mode {
            InteractionMode::Connecting(drag) => Some(drag),
            InteractionMode::Idle => None,
        }
    }

    /// Selected node, if any
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Node being configured, if any
    pub fn configuring(&self) -> Option<&NodeId> {
        self.configuring.as_ref()
    }

    /// Handle one event, returning the graph mutations it implies
    pub fn handle(&mut self, graph: &Graph, event: CanvasEvent) -> Vec<GraphCommand> {
        match event {
            CanvasEvent::PointerMove { pos } => {
                if let InteractionMode::Connecting(drag) = &mut self.mode {
                    drag.current = pos;
                }
                Vec::new()
            }
            CanvasEvent::PointerDown { target, .. } => {
                self.pointer_down(graph, target);
                Vec::new()
            }
            CanvasEvent::PointerUp { target, .. } => self.pointer_up(target),
            CanvasEvent::DoubleClick { target } => {
                self.double_click(graph, target);
                Vec::new()
            }
            CanvasEvent::Drop { token, pos } => match NodeType::from_builtin(token.trim()) {
                Some(node_type) => vec![GraphCommand::CreateNode { node_type, position: pos }],
                None => {
                    tracing::debug!("Ignoring drop with unknown node type {token:?}");
                    Vec::new()
                }
            },
            CanvasEvent::Cancel => {
                if matches!(self.mode, InteractionMode::Connecting(_)) {
                    tracing::debug!("Connection drag cancelled");
                }
                self.mode = InteractionMode::Idle;
                self.pressed_node = None;
                Vec::new()
            }
            CanvasEvent::DeleteSelected => match self.selected.take() {
                Some(node) => {
                    self.forget_node(&node);
                    vec![GraphCommand::RemoveNode(node)]
                }
                None => Vec::new(),
            },
            CanvasEvent::PanelUpdate { node, patch } => {
                vec![GraphCommand::UpdateNodeData { node, patch }]
            }
            CanvasEvent::PanelClose => {
                self.configuring = None;
                Vec::new()
            }
        }
    }

    fn pointer_down(&mut self, graph: &Graph, target: HitTarget) {
        self.pressed_node = None;
        match target {
            HitTarget::Connector(connector) => {
                let Some(node) = graph.node(&connector.node) else {
                    return;
                };
                let start = self.metrics.anchor(node, connector.side);
                self.mode = InteractionMode::Connecting(ConnectionDrag {
                    source: connector.node,
                    side: connector.side,
                    start,
                    current: start,
                });
            }
            HitTarget::NodeBody(node) => {
                self.pressed_node = Some(node);
            }
            HitTarget::Canvas => {}
        }
    }

    fn pointer_up(&mut self, target: HitTarget) -> Vec<GraphCommand> {
        let pressed = self.pressed_node.take();

        if let InteractionMode::Connecting(drag) = std::mem::take(&mut self.mode) {
            return match target {
                HitTarget::Connector(connector) if connector.node != drag.source => {
                    vec![GraphCommand::CreateConnection {
                        source: drag.source,
                        target: connector.node,
                    }]
                }
                _ => Vec::new(),
            };
        }

        if let (HitTarget::NodeBody(node), Some(pressed)) = (target, pressed) {
            if node == pressed {
                self.toggle_selection(node);
            }
        }
        Vec::new()
    }

    fn double_click(&mut self, graph: &Graph, target: HitTarget) {
        let HitTarget::NodeBody(node_id) = target else {
            return;
        };
        if graph.node(&node_id).is_some_and(|node| node.node_type.is_configurable()) {
            tracing::debug!("Configuring node {}", node_id);
            self.configuring = Some(node_id);
        }
    }

    /// Select `node`, or deselect it if it is already selected
    pub fn toggle_selection(&mut self, node: NodeId) {
        if self.selected.as_ref() == Some(&node) {
            self.selected = None;
        } else {
            self.selected = Some(node);
        }
    }

    /// Drop every reference to a node that is going away
    pub fn forget_node(&mut self, node: &NodeId) {
        if self.selected.as_ref() == Some(node) {
            self.selected = None;
        }
        if self.configuring.as_ref() == Some(node) {
            self.configuring = None;
        }
        if self.pressed_node.as_ref() == Some(node) {
            self.pressed_node = None;
        }
        if matches!(&self.mode, InteractionMode::Connecting(drag) if drag.source == *node) {
            self.mode = InteractionMode::Idle;
        }
    }
}

/// Owns the graph store and the interaction state of one canvas
#[derive(Debug, Clone, Default)]
pub struct NodeEditor {
    graph: Graph,
    interaction: InteractionState,
    surface: Surface,
}

impl NodeEditor {
    /// Create an empty editor using the given layout
    pub fn new(metrics: CanvasMetrics) -> Self {
        Self {
            graph: Graph::new(),
            interaction: InteractionState::new(metrics),
            surface: Surface::unmounted(),
        }
    }

    /// The graph store
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The interaction state
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Layout used for connectors and node cards
    pub fn metrics(&self) -> &CanvasMetrics {
        &self.interaction.metrics
    }

    /// The drawing surface
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Update the surface origin, `None` when the surface is not on screen
    pub fn set_surface_origin(&mut self, origin: Option<Pos2>) {
        self.surface.set_origin(origin);
    }

    /// Handle a canvas-local event and apply the resulting commands.
    ///
    /// Returns the number of commands that changed the graph.
    pub fn dispatch(&mut self, event: CanvasEvent) -> usize {
        let commands = self.interaction.handle(&self.graph, event);
        commands
            .into_iter()
            .map(|command| command.apply(&mut self.graph))
            .filter(|changed| *changed)
            .count()
    }

    /// Primary button pressed at a page position
    pub fn pointer_down(&mut self, page_pos: Pos2) {
        if let Some(pos) = self.surface.to_local(page_pos) {
            let target = self.hit_test(pos);
            self.dispatch(CanvasEvent::PointerDown { target, pos });
        }
    }

    /// Pointer moved to a page position
    pub fn pointer_move(&mut self, page_pos: Pos2) {
        if let Some(pos) = self.surface.to_local(page_pos) {
            self.dispatch(CanvasEvent::PointerMove { pos });
        }
    }

    /// Primary button released at a page position
    pub fn pointer_up(&mut self, page_pos: Pos2) -> usize {
        match self.surface.to_local(page_pos) {
            Some(pos) => {
                let target = self.hit_test(pos);
                self.dispatch(CanvasEvent::PointerUp { target, pos })
            }
            None => self.dispatch(CanvasEvent::Cancel),
        }
    }

    /// Primary button released outside the visible surface.
    ///
    /// Nothing outside the surface is a valid release target, so an
    /// in-progress drag is cancelled.
    pub fn pointer_up_outside(&mut self, page_pos: Pos2) -> usize {
        match self.surface.to_local(page_pos) {
            Some(pos) => self.dispatch(CanvasEvent::PointerUp {
                target: HitTarget::Canvas,
                pos,
            }),
            None => self.dispatch(CanvasEvent::Cancel),
        }
    }

    /// Primary button double-clicked at a page position
    pub fn double_click(&mut self, page_pos: Pos2) {
        if let Some(pos) = self.surface.to_local(page_pos) {
            let target = self.hit_test(pos);
            self.dispatch(CanvasEvent::DoubleClick { target });
        }
    }

    /// A palette item carrying `token` was dropped at a page position.
    ///
    /// Ignored if the surface cannot be measured.
    pub fn drop_payload(&mut self, token: &str, page_pos: Pos2) -> usize {
        match self.surface.to_local(page_pos) {
            Some(pos) => self.dispatch(CanvasEvent::Drop {
                token: token.to_string(),
                pos,
            }),
            None => {
                tracing::debug!("Ignoring drop on unmounted surface");
                0
            }
        }
    }

    /// Abort the current gesture
    pub fn cancel(&mut self) {
        self.dispatch(CanvasEvent::Cancel);
    }

    /// Remove the selected node, if any
    pub fn delete_selected(&mut self) -> usize {
        self.dispatch(CanvasEvent::DeleteSelected)
    }

    /// What the configuration panel should show
    pub fn panel_request(&self) -> PanelRequest<'_> {
        PanelRequest::new(self.configuring_node())
    }

    /// Apply what the configuration panel reported
    pub fn panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Save { node, patch } => {
                self.dispatch(CanvasEvent::PanelUpdate { node, patch });
                self.dispatch(CanvasEvent::PanelClose);
            }
            PanelAction::Close => {
                self.dispatch(CanvasEvent::PanelClose);
            }
        }
    }

    /// Selected node, if it still exists
    pub fn selected_node(&self) -> Option<&Node> {
        self.interaction.selected().and_then(|id| self.graph.node(id))
    }

    /// Node being configured, if it still exists
    pub fn configuring_node(&self) -> Option<&Node> {
        self.interaction.configuring().and_then(|id| self.graph.node(id))
    }

    fn hit_test(&self, pos: Pos2) -> HitTarget {
        self.interaction.metrics.hit_test(&self.graph, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Connector;
    use crate::node::AgentModel;
    use egui::Vec2;

    const ORIGIN: Pos2 = Pos2::new(40.0, 60.0);

    fn editor() -> NodeEditor {
        let mut editor = NodeEditor::new(CanvasMetrics::default());
        editor.set_surface_origin(Some(ORIGIN));
        editor
    }

    fn add_node(editor: &mut NodeEditor, token: &str, local: [f32; 2]) -> NodeId {
        let page = ORIGIN + Vec2::new(local[0], local[1]);
        assert_eq!(editor.drop_payload(token, page), 1);
        editor.graph().nodes().last().unwrap().id.clone()
    }

    fn anchor_page(editor: &NodeEditor, id: &NodeId, side: ConnectorSide) -> Pos2 {
        let node = editor.graph().node(id).unwrap();
        editor.surface().to_page(editor.metrics().anchor(node, side)).unwrap()
    }

    #[test]
    fn test_surface_translation() {
        let surface = Surface::mounted(Pos2::new(100.0, 50.0));
        assert_eq!(surface.to_local(Pos2::new(220.0, 130.0)), Some(Pos2::new(120.0, 80.0)));
        assert_eq!(surface.to_page(Pos2::new(120.0, 80.0)), Some(Pos2::new(220.0, 130.0)));
        assert_eq!(Surface::unmounted().to_local(Pos2::ZERO), None);
    }

    #[test]
    fn test_drop_creates_node_at_local_position() {
        let mut editor = editor();
        let id = add_node(&mut editor, "trigger", [120.0, 80.0]);

        let node = editor.graph().node(&id).unwrap();
        assert_eq!(editor.graph().node_count(), 1);
        assert_eq!(node.position, [120.0, 80.0]);
        assert_eq!(node.data.label, "Trigger");
    }

    #[test]
    fn test_drop_ignored_without_type_or_surface() {
        let mut editor = editor();
        assert_eq!(editor.drop_payload("", ORIGIN), 0);
        assert_eq!(editor.drop_payload("teleporter", ORIGIN), 0);

        editor.set_surface_origin(None);
        assert_eq!(editor.drop_payload("agent", ORIGIN), 0);
        assert!(editor.graph().is_empty());
    }

    #[test]
    fn test_drag_output_to_input_connects() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let b = add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        let drag = editor.interaction().connection_drag().unwrap();
        assert_eq!(drag.source, a);
        assert_eq!(drag.start, drag.current);

        editor.pointer_move(ORIGIN + Vec2::new(320.0, 140.0));
        editor.pointer_move(ORIGIN + Vec2::new(380.0, 120.0));
        assert_eq!(
            editor.interaction().connection_drag().unwrap().current,
            Pos2::new(380.0, 120.0)
        );

        assert_eq!(editor.pointer_up(anchor_page(&editor, &b, ConnectorSide::Input)), 1);
        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);

        let connections: Vec<_> = editor.graph().connections().collect();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].source, a);
        assert_eq!(connections[0].target, b);
    }

    #[test]
    fn test_drag_onto_own_connector_creates_nothing() {
        let mut editor = editor();
        let a = add_node(&mut editor, "agent", [200.0, 200.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        editor.pointer_move(ORIGIN + Vec2::new(10.0, 10.0));
        editor.pointer_up(anchor_page(&editor, &a, ConnectorSide::Input));

        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
        assert_eq!(editor.graph().connection_count(), 0);
    }

    #[test]
    fn test_release_on_empty_canvas_cancels() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        assert_eq!(editor.pointer_up(ORIGIN + Vec2::new(300.0, 400.0)), 0);

        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
        assert_eq!(editor.graph().connection_count(), 0);
    }

    #[test]
    fn test_release_on_node_body_cancels() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        editor.pointer_up(ORIGIN + Vec2::new(500.0, 100.0));

        assert_eq!(editor.graph().connection_count(), 0);
        assert_eq!(editor.interaction().selected(), None);
    }

    #[test]
    fn test_duplicate_drag_in_reverse_is_swallowed() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let b = add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        editor.pointer_up(anchor_page(&editor, &b, ConnectorSide::Input));
        editor.pointer_down(anchor_page(&editor, &b, ConnectorSide::Output));
        assert_eq!(editor.pointer_up(anchor_page(&editor, &a, ConnectorSide::Input)), 0);

        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
        assert_eq!(editor.graph().connection_count(), 1);
    }

    #[test]
    fn test_drag_from_input_uses_start_node_as_source() {
        let mut editor = editor();
        let a = add_node(&mut editor, "output", [500.0, 100.0]);
        let b = add_node(&mut editor, "agent", [150.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Input));
        editor.pointer_up(anchor_page(&editor, &b, ConnectorSide::Output));

        let connection = editor.graph().connections().next().unwrap();
        assert_eq!(connection.source, a);
        assert_eq!(connection.target, b);
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let b = add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        editor.cancel();
        assert_eq!(editor.pointer_up(anchor_page(&editor, &b, ConnectorSide::Input)), 0);
        assert_eq!(editor.graph().connection_count(), 0);
    }

    #[test]
    fn test_pointer_move_while_idle_is_ignored() {
        let mut state = InteractionState::default();
        let commands = state.handle(&Graph::new(), CanvasEvent::PointerMove { pos: Pos2::new(5.0, 5.0) });
        assert!(commands.is_empty());
        assert_eq!(*state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_pure_transition_emits_connection_command() {
        let mut graph = Graph::new();
        let a = graph.create_node(NodeType::Trigger, [100.0, 100.0]).id.clone();
        let b = graph.create_node(NodeType::Agent, [400.0, 100.0]).id.clone();
        let mut state = InteractionState::default();

        let down = CanvasEvent::PointerDown {
            target: HitTarget::Connector(Connector::output(a.clone())),
            pos: Pos2::ZERO,
        };
        assert!(state.handle(&graph, down).is_empty());

        let up = CanvasEvent::PointerUp {
            target: HitTarget::Connector(Connector::input(b.clone())),
            pos: Pos2::ZERO,
        };
        assert_eq!(
            state.handle(&graph, up),
            vec![GraphCommand::CreateConnection { source: a, target: b }]
        );
        // The store itself is untouched until the command is applied
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_click_toggles_selection() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let b = add_node(&mut editor, "agent", [500.0, 100.0]);
        let body_a = ORIGIN + Vec2::new(150.0, 100.0);
        let body_b = ORIGIN + Vec2::new(500.0, 100.0);

        editor.pointer_down(body_a);
        editor.pointer_up(body_a);
        assert_eq!(editor.interaction().selected(), Some(&a));

        editor.pointer_down(body_b);
        editor.pointer_up(body_b);
        assert_eq!(editor.interaction().selected(), Some(&b));

        editor.pointer_down(body_b);
        editor.pointer_up(body_b);
        assert_eq!(editor.interaction().selected(), None);
    }

    #[test]
    fn test_press_and_release_on_different_nodes_is_not_a_click() {
        let mut editor = editor();
        add_node(&mut editor, "trigger", [150.0, 100.0]);
        add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.pointer_down(ORIGIN + Vec2::new(150.0, 100.0));
        editor.pointer_up(ORIGIN + Vec2::new(500.0, 100.0));
        assert_eq!(editor.interaction().selected(), None);
    }

    #[test]
    fn test_double_click_configures_agents_only() {
        let mut editor = editor();
        let trigger = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let agent = add_node(&mut editor, "agent", [500.0, 100.0]);

        editor.double_click(ORIGIN + Vec2::new(150.0, 100.0));
        assert_eq!(editor.interaction().configuring(), None);
        assert!(!editor.panel_request().is_open);

        editor.double_click(ORIGIN + Vec2::new(500.0, 100.0));
        assert_eq!(editor.interaction().configuring(), Some(&agent));
        assert!(editor.panel_request().is_open);
        assert_ne!(editor.interaction().configuring(), Some(&trigger));
    }

    #[test]
    fn test_panel_save_merges_and_closes() {
        let mut editor = editor();
        let agent = add_node(&mut editor, "agent", [500.0, 100.0]);
        editor.double_click(ORIGIN + Vec2::new(500.0, 100.0));

        editor.panel_action(PanelAction::Save {
            node: agent.clone(),
            patch: NodeDataPatch::new().with_model(AgentModel::Claude3Opus),
        });

        let data = &editor.graph().node(&agent).unwrap().data;
        assert_eq!(data.agent().unwrap().model, AgentModel::Claude3Opus);
        assert_eq!(data.label, "Agent");
        assert_eq!(editor.interaction().configuring(), None);
    }

    #[test]
    fn test_delete_selected_clears_references() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        let b = add_node(&mut editor, "agent", [500.0, 100.0]);
        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        editor.pointer_up(anchor_page(&editor, &b, ConnectorSide::Input));

        let body_b = ORIGIN + Vec2::new(500.0, 100.0);
        editor.double_click(body_b);
        editor.pointer_down(body_b);
        editor.pointer_up(body_b);
        assert_eq!(editor.interaction().selected(), Some(&b));

        assert_eq!(editor.delete_selected(), 1);
        assert_eq!(editor.graph().node_count(), 1);
        assert_eq!(editor.graph().connection_count(), 0);
        assert_eq!(editor.interaction().selected(), None);
        assert_eq!(editor.interaction().configuring(), None);
        assert_eq!(editor.delete_selected(), 0);
    }

    #[test]
    fn test_release_with_unmounted_surface_cancels() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [150.0, 100.0]);
        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));

        editor.set_surface_origin(None);
        editor.pointer_up(Pos2::ZERO);
        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_click_on_card_above_connector_selects_card() {
        let mut editor = editor();
        let below = add_node(&mut editor, "trigger", [100.0, 100.0]);
        let above = add_node(&mut editor, "agent", [246.0, 100.0]);

        let covered = anchor_page(&editor, &below, ConnectorSide::Output);
        editor.pointer_down(covered);
        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
        editor.pointer_up(covered);
        assert_eq!(editor.interaction().selected(), Some(&above));
    }

    #[test]
    fn test_release_outside_surface_cancels_drag() {
        let mut editor = editor();
        let a = add_node(&mut editor, "trigger", [400.0, 100.0]);
        let b = add_node(&mut editor, "agent", [60.0, 100.0]);

        // Input anchor of b lies left of the surface, where it is clipped
        let clipped = anchor_page(&editor, &b, ConnectorSide::Input);
        assert!(clipped.x < ORIGIN.x);

        editor.pointer_down(anchor_page(&editor, &a, ConnectorSide::Output));
        assert_eq!(editor.pointer_up_outside(clipped), 0);
        assert_eq!(*editor.interaction().mode(), InteractionMode::Idle);
        assert_eq!(editor.graph().connection_count(), 0);
    }

    #[test]
    fn test_empty_panel_patch_changes_nothing() {
        let mut editor = editor();
        let agent = add_node(&mut editor, "agent", [500.0, 100.0]);

        let applied = editor.dispatch(CanvasEvent::PanelUpdate {
            node: agent,
            patch: NodeDataPatch::new(),
        });
        assert_eq!(applied, 0);
    }
}
