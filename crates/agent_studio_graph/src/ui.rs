// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas rendering and input translation for egui.
//!
//! Features:
//! - Node cards with input/output connectors
//! - Straight connection lines
//! - Dashed line for the connection being dragged
//! - Drop target for palette drags
//! - Click to select, double-click to configure, Delete to remove
//!
//! Everything drawn here is derived from the [`NodeEditor`] each frame; the
//! only state the view keeps is display options.

use crate::geometry::{CanvasMetrics, ConnectorSide, HitTarget};
use crate::interaction::NodeEditor;
use crate::node::Node;
use crate::render::{connection_segments, drag_segment, DRAG_DASH_LENGTH, DRAG_GAP_LENGTH};
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};

/// Default grid spacing
pub const GRID_SPACING: f32 = 30.0;

/// Node card visual parameters
const NODE_ROUNDING: f32 = 12.0;
const NODE_PADDING: f32 = 16.0;
const SELECTION_GROW: f32 = 4.0;

/// Canvas visual parameters
const CANVAS_ROUNDING: f32 = 12.0;
const CONNECTION_THICKNESS: f32 = 2.0;

const CANVAS_BG: Color32 = Color32::from_rgb(18, 18, 27);
const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(26, 26, 26, 26);
const CONNECTION_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const DRAG_COLOR: Color32 = Color32::from_rgb(139, 92, 246);
const NODE_BG: Color32 = Color32::from_rgb(30, 30, 42);

/// Drag-and-drop payload carried from the palette to the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTypePayload(pub String);

/// Canvas display options
#[derive(Debug, Clone)]
pub struct CanvasView {
    /// Draw the background grid
    pub show_grid: bool,
    /// Grid spacing in points
    pub grid_spacing: f32,
}

impl Default for CanvasView {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_spacing: GRID_SPACING,
        }
    }
}

impl CanvasView {
    /// Create a canvas view with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle input and draw the canvas into the remaining space of `ui`
    pub fn ui(&mut self, ui: &mut egui::Ui, editor: &mut NodeEditor) -> egui::Response {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        editor.set_surface_origin(Some(rect.min));

        Self::handle_input(ui, &response, rect, editor);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CANVAS_ROUNDING, CANVAS_BG);
        if self.show_grid {
            self.draw_grid(&painter, rect);
        }
        if response.dnd_hover_payload::<NodeTypePayload>().is_some() {
            painter.rect_stroke(rect.shrink(1.0), CANVAS_ROUNDING, Stroke::new(2.0, DRAG_COLOR));
        }

        Self::draw_connections(&painter, rect, editor);
        Self::draw_nodes(ui, &painter, rect, editor);

        if editor.graph().is_empty() {
            Self::draw_empty_hint(&painter, rect);
        }

        if editor.interaction().connection_drag().is_some() {
            ui.ctx().request_repaint();
        }

        response
    }

    fn handle_input(
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        editor: &mut NodeEditor,
    ) {
        let (pointer_pos, pressed, released, double_clicked, escape) = ui.input(|i| {
            (
                i.pointer.interact_pos().or(i.pointer.hover_pos()),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if let Some(payload) = response.dnd_release_payload::<NodeTypePayload>() {
            if let Some(pos) = pointer_pos {
                editor.drop_payload(&payload.0, pos);
            }
        }

        if escape {
            editor.cancel();
        }

        let Some(pos) = pointer_pos else {
            return;
        };
        let over_canvas = rect.contains(pos) && ui.rect_contains_pointer(rect);

        if pressed && over_canvas {
            editor.pointer_down(pos);
        }
        if editor.interaction().connection_drag().is_some() {
            editor.pointer_move(pos);
        }
        if released {
            if over_canvas {
                editor.pointer_up(pos);
            } else {
                editor.pointer_up_outside(pos);
            }
        }
        if double_clicked && over_canvas {
            editor.double_click(pos);
        }

        let delete = ui.input(|i| i.key_pressed(egui::Key::Delete));
        if delete && !ui.ctx().wants_keyboard_input() {
            editor.delete_selected();
        }
    }

    fn draw_grid(&self, painter: &egui::Painter, rect: Rect) {
        if self.grid_spacing <= 0.0 {
            return;
        }
        let stroke = Stroke::new(1.0, GRID_COLOR);

        let mut x = rect.left() + self.grid_spacing;
        while x < rect.right() {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            x += self.grid_spacing;
        }

        let mut y = rect.top() + self.grid_spacing;
        while y < rect.bottom() {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
            y += self.grid_spacing;
        }
    }

    fn draw_connections(painter: &egui::Painter, rect: Rect, editor: &NodeEditor) {
        let offset = rect.min.to_vec2();

        for segment in connection_segments(editor.graph(), editor.metrics()) {
            painter.line_segment(
                [segment.from + offset, segment.to + offset],
                Stroke::new(CONNECTION_THICKNESS, CONNECTION_COLOR),
            );
        }

        if let Some(segment) = drag_segment(editor.interaction()) {
            painter.extend(Shape::dashed_line(
                &[segment.from + offset, segment.to + offset],
                Stroke::new(CONNECTION_THICKNESS, DRAG_COLOR.gamma_multiply(0.7)),
                DRAG_DASH_LENGTH,
                DRAG_GAP_LENGTH,
            ));
        }
    }

    fn draw_nodes(ui: &egui::Ui, painter: &egui::Painter, rect: Rect, editor: &NodeEditor) {
        let offset = rect.min.to_vec2();
        let metrics = editor.metrics();
        let selected = editor.interaction().selected();

        // Connector under the pointer, highlighted while a drag is in progress
        let hovered = editor
            .interaction()
            .connection_drag()
            .and_then(|drag| {
                let pos = ui.input(|i| i.pointer.hover_pos())?;
                let local = editor.surface().to_local(pos)?;
                match metrics.hit_test(editor.graph(), local) {
                    HitTarget::Connector(connector) if connector.node != drag.source => Some(connector),
                    _ => None,
                }
            });

        for node in editor.graph().nodes() {
            let is_selected = selected == Some(&node.id);
            let node_rect = metrics.node_rect(node).translate(offset);
            Self::draw_node(painter, node, node_rect, is_selected);

            for side in [ConnectorSide::Input, ConnectorSide::Output] {
                let is_hovered = hovered
                    .as_ref()
                    .is_some_and(|c| c.node == node.id && c.side == side);
                Self::draw_connector(painter, metrics, metrics.anchor(node, side) + offset, is_hovered);
            }
        }
    }

    fn draw_node(painter: &egui::Painter, node: &Node, node_rect: Rect, is_selected: bool) {
        let [r, g, b] = node.node_type.color();
        let accent = Color32::from_rgb(r, g, b);
        let card = if is_selected { node_rect.expand(SELECTION_GROW) } else { node_rect };

        painter.rect(card, NODE_ROUNDING, NODE_BG, Stroke::new(2.0, accent));
        painter.rect_filled(
            card.shrink(2.0),
            NODE_ROUNDING,
            Color32::from_rgba_unmultiplied(r, g, b, 26),
        );
        if is_selected {
            painter.rect_stroke(
                card.expand(2.0),
                NODE_ROUNDING,
                Stroke::new(2.0, Color32::from_white_alpha(50)),
            );
        }

        let title_pos = Pos2::new(card.left() + NODE_PADDING, card.top() + NODE_PADDING);
        painter.text(
            title_pos,
            Align2::LEFT_TOP,
            &node.data.label,
            FontId::proportional(15.0),
            Color32::WHITE,
        );

        if let Some(agent) = node.data.agent() {
            painter.text(
                Pos2::new(card.right() - NODE_PADDING, title_pos.y + 2.0),
                Align2::RIGHT_TOP,
                agent.model.name(),
                FontId::proportional(10.0),
                accent,
            );
        }

        if let Some(description) = &node.data.description {
            painter.text(
                Pos2::new(title_pos.x, title_pos.y + 26.0),
                Align2::LEFT_TOP,
                description,
                FontId::proportional(11.0),
                Color32::from_gray(150),
            );
        }
    }

    fn draw_connector(painter: &egui::Painter, metrics: &CanvasMetrics, pos: Pos2, is_hovered: bool) {
        let radius = if is_hovered {
            metrics.connector_radius * 1.4
        } else {
            metrics.connector_radius
        };
        painter.circle(
            pos,
            radius,
            Color32::from_rgb(59, 130, 246),
            Stroke::new(2.0, Color32::from_white_alpha(80)),
        );
    }

    fn draw_empty_hint(painter: &egui::Painter, rect: Rect) {
        let center = rect.center();
        painter.text(
            center - Vec2::new(0.0, 14.0),
            Align2::CENTER_CENTER,
            "Start building your agent system",
            FontId::proportional(20.0),
            Color32::from_rgb(139, 92, 246),
        );
        painter.text(
            center + Vec2::new(0.0, 14.0),
            Align2::CENTER_CENTER,
            "Drag components from the left panel onto this canvas, starting with an Input Trigger",
            FontId::proportional(13.0),
            Color32::from_gray(150),
        );
    }
}

/// Show a palette entry that can be dragged onto the canvas.
///
/// `add_contents` draws the entry; the drag carries `node_type` as a
/// [`NodeTypePayload`].
pub fn palette_drag_source<R>(
    ui: &mut egui::Ui,
    node_type: &crate::node::NodeType,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> egui::InnerResponse<R> {
    let id = egui::Id::new(("palette", node_type.as_str()));
    ui.dnd_drag_source(id, NodeTypePayload(node_type.as_str().to_string()), add_contents)
}
