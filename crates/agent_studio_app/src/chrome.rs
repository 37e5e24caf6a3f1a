// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chrome around the canvas: header, component palette and status bar.

use agent_studio_graph::ui::palette_drag_source;
use agent_studio_graph::{Graph, NodeType};
use egui::{Color32, RichText};

/// Application title shown in the header
pub const APP_TITLE: &str = "MultiAgent Studio";

/// One draggable entry of the component palette
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteItem {
    /// Node type created when the entry is dropped
    pub node_type: NodeType,
    /// Display name
    pub title: &'static str,
    /// One-line description
    pub description: &'static str,
}

impl PaletteItem {
    /// Create a palette entry
    pub fn new(node_type: NodeType, title: &'static str, description: &'static str) -> Self {
        Self {
            node_type,
            title,
            description,
        }
    }
}

/// Header bar with the application title
#[derive(Debug)]
pub struct Header;

impl Header {
    /// Draw the header
    pub fn ui(ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(APP_TITLE)
                    .heading()
                    .strong()
                    .color(Color32::from_rgb(139, 92, 246)),
            );
            ui.separator();
            ui.label(RichText::new("Visual editor for multi-agent workflows").weak());
        });
    }
}

/// Sidebar listing the node types that can be dragged onto the canvas
#[derive(Debug)]
pub struct Palette {
    items: Vec<PaletteItem>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Palette with the six built-in components
    pub fn new() -> Self {
        let item = PaletteItem::new;
        Self {
            items: vec![
                item(NodeType::Trigger, "Input Trigger", "Triggers the whole workflow"),
                item(NodeType::Agent, "AI Agent", "Basic compute unit"),
                item(NodeType::Debug, "Debug Probe", "Monitors intermediate outputs"),
                item(NodeType::Output, "Output Gateway", "Final output formats"),
                item(NodeType::Workflow, "Sub-Workflow", "Nested agent system"),
                item(NodeType::Database, "Data Store", "Stores intermediate results"),
            ],
        }
    }

    /// Palette entries in display order
    pub fn items(&self) -> &[PaletteItem] {
        &self.items
    }

    /// Draw the palette
    pub fn ui(&self, ui: &mut egui::Ui) {
        ui.heading("Components");
        ui.label(RichText::new("Drag onto the canvas").small().weak());
        ui.add_space(8.0);

        for item in self.items() {
            palette_drag_source(ui, &item.node_type, |ui| Self::item_ui(ui, item));
            ui.add_space(4.0);
        }
    }

    fn item_ui(ui: &mut egui::Ui, item: &PaletteItem) {
        let [r, g, b] = item.node_type.color();
        let accent = Color32::from_rgb(r, g, b);

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.0, accent))
            .fill(Color32::from_rgba_unmultiplied(r, g, b, 20))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(item.title).strong().color(accent));
                ui.label(RichText::new(item.description).small().weak());
            });
    }
}

/// Bottom bar with graph statistics
#[derive(Debug, Default)]
pub struct StatusBar;

impl StatusBar {
    /// Status text for a graph
    pub fn summary(graph: &Graph) -> String {
        format!(
            "Nodes: {} | Connections: {}",
            graph.node_count(),
            graph.connection_count()
        )
    }

    /// Draw the status bar
    pub fn ui(ui: &mut egui::Ui, graph: &Graph, selected: Option<&str>) {
        ui.horizontal(|ui| {
            ui.label(Self::summary(graph));
            if let Some(label) = selected {
                ui.separator();
                ui.label(format!("Selected: {label}"));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("v{}", env!("CARGO_PKG_VERSION"))).weak());
            });
        });
    }
}
