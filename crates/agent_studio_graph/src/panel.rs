// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration panel for agent nodes.
//!
//! The canvas hands the panel a [`PanelRequest`]; the panel edits a local
//! [`AgentDraft`] and reports back with a [`PanelAction`]. The panel never
//! touches the graph itself.

use crate::node::{AgentModel, Node, NodeDataPatch, NodeId, Temperature};

/// Default panel width
const PANEL_WIDTH: f32 = 400.0;
/// Temperature slider step
const TEMPERATURE_STEP: f64 = 0.1;

/// What the canvas asks the panel to show
#[derive(Debug, Clone, Copy)]
pub struct PanelRequest<'a> {
    /// Whether the panel should be visible
    pub is_open: bool,
    /// Node being configured
    pub node: Option<&'a Node>,
}

impl<'a> PanelRequest<'a> {
    /// Request for the given configuration target.
    ///
    /// Only agent nodes open the panel.
    pub fn new(node: Option<&'a Node>) -> Self {
        Self {
            is_open: node.is_some_and(Node::is_agent),
            node,
        }
    }
}

/// What the panel reports back
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Merge `patch` into the node and close
    Save {
        /// Node being configured
        node: NodeId,
        /// Edited fields
        patch: NodeDataPatch,
    },
    /// Close without saving
    Close,
}

/// Editable copy of an agent node's data
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDraft {
    /// Node label
    pub label: String,
    /// Node description (empty for none)
    pub description: String,
    /// Agent name
    pub name: String,
    /// System prompt
    pub system_prompt: String,
    /// Model
    pub model: AgentModel,
    /// Temperature as edited by the slider
    pub temperature: f32,
}

impl AgentDraft {
    /// Seed a draft from an agent node, `None` for other node types
    pub fn from_node(node: &Node) -> Option<Self> {
        let agent = node.data.agent()?;
        Some(Self {
            label: node.data.label.clone(),
            description: node.data.description.clone().unwrap_or_default(),
            name: agent.name.clone(),
            system_prompt: agent.system_prompt.clone(),
            model: agent.model.clone(),
            temperature: agent.temperature.value(),
        })
    }

    /// Patch carrying every field of the draft
    pub fn to_patch(&self) -> NodeDataPatch {
        let mut patch = NodeDataPatch::new()
            .with_label(self.label.clone())
            .with_name(self.name.clone())
            .with_system_prompt(self.system_prompt.clone())
            .with_model(self.model.clone())
            .with_temperature(self.temperature);
        if !self.description.is_empty() {
            patch.description = Some(self.description.clone());
        }
        patch
    }
}

/// Side panel editing the agent node currently being configured
#[derive(Debug, Default)]
pub struct ConfigurationPanel {
    /// Node the draft belongs to, and the draft
    draft: Option<(NodeId, AgentDraft)>,
}

impl ConfigurationPanel {
    /// Create a closed panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft, if the panel is open
    pub fn draft(&self) -> Option<&AgentDraft> {
        self.draft.as_ref().map(|(_, draft)| draft)
    }

    /// Sync the draft with the request.
    ///
    /// A new target reseeds the draft; a closed request discards it.
    pub fn sync(&mut self, request: PanelRequest<'_>) {
        let node = match request.node {
            Some(node) if request.is_open => node,
            _ => {
                self.draft = None;
                return;
            }
        };

        if self.draft.as_ref().is_some_and(|(id, _)| *id == node.id) {
            return;
        }
        self.draft = AgentDraft::from_node(node).map(|draft| (node.id.clone(), draft));
    }

    /// Show the panel if requested, returning the user's decision
    pub fn show(&mut self, ctx: &egui::Context, request: PanelRequest<'_>) -> Option<PanelAction> {
        self.sync(request);
        let (node_id, draft) = self.draft.as_mut()?;

        let mut action = None;
        egui::SidePanel::right("node_configuration")
            .resizable(false)
            .default_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.heading("AI Agent Configuration");
                ui.label(
                    egui::RichText::new("Set the parameters of your AI agent").weak(),
                );
                ui.separator();

                Self::form(ui, draft);

                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Save changes").clicked() {
                        action = Some(PanelAction::Save {
                            node: node_id.clone(),
                            patch: draft.to_patch(),
                        });
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(PanelAction::Close);
                    }
                });
            });

        if action.is_some() {
            self.draft = None;
        }
        action
    }

    fn form(ui: &mut egui::Ui, draft: &mut AgentDraft) {
        ui.label("Agent name");
        ui.add(egui::TextEdit::singleline(&mut draft.name).hint_text("Enter the agent name"));
        ui.add_space(8.0);

        ui.label("System prompt");
        ui.add(
            egui::TextEdit::multiline(&mut draft.system_prompt)
                .desired_rows(6)
                .hint_text("Enter a system prompt for the agent..."),
        );
        ui.label(egui::RichText::new("Defines the behaviour and context of your agent").small().weak());
        ui.add_space(8.0);

        ui.label("AI model");
        egui::ComboBox::from_id_salt("agent_model")
            .selected_text(draft.model.name())
            .show_ui(ui, |ui| {
                for model in AgentModel::KNOWN {
                    ui.selectable_value(&mut draft.model, model.clone(), model.name());
                }
                if let AgentModel::Other(name) = &draft.model {
                    let current = draft.model.clone();
                    let label = name.clone();
                    ui.selectable_value(&mut draft.model, current, label);
                }
            });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Temperature");
            ui.label(egui::RichText::new(format!("{:.1}", draft.temperature)).monospace());
        });
        ui.add(
            egui::Slider::new(&mut draft.temperature, Temperature::MIN..=Temperature::MAX)
                .step_by(TEMPERATURE_STEP)
                .show_value(false),
        );
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Conservative (0.0)").small().weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new("Creative (1.0)").small().weak());
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::node::NodeType;

    #[test]
    fn test_request_opens_for_agents_only() {
        let mut graph = Graph::new();
        let agent = graph.create_node(NodeType::Agent, [0.0, 0.0]).clone();
        let trigger = graph.create_node(NodeType::Trigger, [0.0, 0.0]).clone();

        assert!(PanelRequest::new(Some(&agent)).is_open);
        assert!(!PanelRequest::new(Some(&trigger)).is_open);
        assert!(!PanelRequest::new(None).is_open);
    }

    #[test]
    fn test_draft_seeded_from_agent() {
        let mut graph = Graph::new();
        let node = graph.create_node(NodeType::Agent, [0.0, 0.0]).clone();

        let draft = AgentDraft::from_node(&node).unwrap();
        assert_eq!(draft.label, "Agent");
        assert_eq!(draft.name, "AI Agent 1");
        assert_eq!(draft.model, AgentModel::Gpt4Turbo);
        assert_eq!(draft.temperature, 0.7);
    }

    #[test]
    fn test_draft_patch_applies_edits() {
        let mut graph = Graph::new();
        let node = graph.create_node(NodeType::Agent, [0.0, 0.0]).clone();

        let mut draft = AgentDraft::from_node(&node).unwrap();
        draft.name = "Researcher".into();
        draft.system_prompt = "Find sources.".into();
        draft.model = AgentModel::from("Gemini Pro");
        draft.temperature = 0.3;

        assert!(graph.update_node_data(&node.id, draft.to_patch()));
        let updated = graph.node(&node.id).unwrap();
        let agent = updated.data.agent().unwrap();
        assert_eq!(agent.name, "Researcher");
        assert_eq!(agent.system_prompt, "Find sources.");
        assert_eq!(agent.model, AgentModel::GeminiPro);
        assert_eq!(agent.temperature.value(), 0.3);
        assert_eq!(updated.data.description, node.data.description);
    }

    #[test]
    fn test_sync_keeps_draft_for_same_node() {
        let mut graph = Graph::new();
        let node = graph.create_node(NodeType::Agent, [0.0, 0.0]).clone();
        let other = graph.create_node(NodeType::Agent, [0.0, 0.0]).clone();
        let mut panel = ConfigurationPanel::new();

        panel.sync(PanelRequest::new(Some(&node)));
        if let Some((_, draft)) = panel.draft.as_mut() {
            draft.name = "Edited".into();
        }
        panel.sync(PanelRequest::new(Some(&node)));
        assert_eq!(panel.draft().unwrap().name, "Edited");

        panel.sync(PanelRequest::new(Some(&other)));
        assert_eq!(panel.draft().unwrap().name, "AI Agent 2");

        panel.sync(PanelRequest::new(None));
        assert!(panel.draft().is_none());
    }

    #[test]
    fn test_draft_none_for_generic_node() {
        let mut graph = Graph::new();
        let node = graph.create_node(NodeType::Debug, [0.0, 0.0]).clone();
        assert!(AgentDraft::from_node(&node).is_none());
    }
}
