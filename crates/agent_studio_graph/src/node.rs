// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the studio canvas.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default sampling temperature for new agent nodes
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Unique identifier for a node
///
/// Built from the node type tag and a random suffix, e.g. `agent-3f2a...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a fresh ID for a node of the given type
    pub fn generate(node_type: &NodeType) -> Self {
        Self(format!("{}-{}", node_type.as_str(), Uuid::new_v4().simple()))
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of block placed on the canvas
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Starts a workflow
    Trigger,
    /// AI agent, the only configurable node
    Agent,
    /// Probe for intermediate outputs
    Debug,
    /// Final output gateway
    Output,
    /// Nested sub-workflow
    Workflow,
    /// Intermediate data store
    Database,
    /// Type tag not known to this build
    Custom(String),
}

impl NodeType {
    /// Node types offered by the palette
    pub const BUILTIN: &'static [NodeType] = &[
        NodeType::Trigger,
        NodeType::Agent,
        NodeType::Debug,
        NodeType::Output,
        NodeType::Workflow,
        NodeType::Database,
    ];

    /// Parse a type tag, keeping unknown tags as [`NodeType::Custom`]
    pub fn parse(tag: &str) -> Self {
        Self::from_builtin(tag).unwrap_or_else(|| Self::Custom(tag.to_string()))
    }

    /// Parse a type tag, accepting only the built-in types
    pub fn from_builtin(tag: &str) -> Option<Self> {
        Self::BUILTIN.iter().find(|t| t.as_str() == tag).cloned()
    }

    /// The type tag, as carried by palette drag payloads
    pub fn as_str(&self) -> &str {
        match self {
            Self::Trigger => "trigger",
            Self::Agent => "agent",
            Self::Debug => "debug",
            Self::Output => "output",
            Self::Workflow => "workflow",
            Self::Database => "database",
            Self::Custom(tag) => tag,
        }
    }

    /// Type tag with its first letter capitalized
    pub fn default_label(&self) -> String {
        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether nodes of this type open the configuration panel
    pub fn is_configurable(&self) -> bool {
        matches!(self, Self::Agent)
    }

    /// Accent color for this type (for UI)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Trigger => [250, 204, 21],
            Self::Agent => [139, 92, 246],
            Self::Debug => [59, 130, 246],
            Self::Output => [6, 182, 212],
            Self::Workflow => [74, 222, 128],
            Self::Database => [251, 146, 60],
            Self::Custom(_) => [150, 150, 160],
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language model an agent runs on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentModel {
    /// GPT-4 Turbo
    #[default]
    Gpt4Turbo,
    /// Claude 3 Opus
    Claude3Opus,
    /// Gemini Pro
    GeminiPro,
    /// Any other model name
    Other(String),
}

impl AgentModel {
    /// Models offered by the configuration panel
    pub const KNOWN: &'static [AgentModel] = &[
        AgentModel::Gpt4Turbo,
        AgentModel::Claude3Opus,
        AgentModel::GeminiPro,
    ];

    /// Display name of the model
    pub fn name(&self) -> &str {
        match self {
            Self::Gpt4Turbo => "GPT-4 Turbo",
            Self::Claude3Opus => "Claude 3 Opus",
            Self::GeminiPro => "Gemini Pro",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for AgentModel {
    fn from(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|m| m.name() == name)
            .cloned()
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }
}

impl fmt::Display for AgentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sampling temperature, always within `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    /// Lowest allowed value
    pub const MIN: f32 = 0.0;
    /// Highest allowed value
    pub const MAX: f32 = 1.0;

    /// Create a temperature, clamping into range. NaN maps to the default.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Get the raw value
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(DEFAULT_TEMPERATURE)
    }
}

impl From<f32> for Temperature {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

/// Agent-specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentData {
    /// Agent name
    pub name: String,
    /// System prompt
    pub system_prompt: String,
    /// Model the agent runs on
    pub model: AgentModel,
    /// Sampling temperature
    pub temperature: Temperature,
}

impl AgentData {
    /// Default configuration for a freshly dropped agent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: String::new(),
            model: AgentModel::default(),
            temperature: Temperature::default(),
        }
    }
}

/// Type-specific part of a node's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// No extra fields
    Generic,
    /// Agent configuration
    Agent(AgentData),
}

/// Data payload carried by every node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Title shown on the node
    pub label: String,
    /// Optional subtitle
    pub description: Option<String>,
    /// Type-specific fields
    pub kind: NodeKind,
}

impl NodeData {
    /// Default data seeded from the node type.
    ///
    /// `sequence` numbers agents so that each gets a distinct default name.
    pub fn for_type(node_type: &NodeType, sequence: u64) -> Self {
        let kind = match node_type {
            NodeType::Agent => NodeKind::Agent(AgentData::new(format!("AI Agent {sequence}"))),
            _ => NodeKind::Generic,
        };
        Self {
            label: node_type.default_label(),
            description: Some(format!("New {} node", node_type.as_str())),
            kind,
        }
    }

    /// Agent fields, if this is an agent node
    pub fn agent(&self) -> Option<&AgentData> {
        match &self.kind {
            NodeKind::Agent(agent) => Some(agent),
            NodeKind::Generic => None,
        }
    }

    /// Merge a patch into this data.
    ///
    /// Fields absent from the patch are left untouched. Agent fields are
    /// dropped for non-agent nodes.
    pub fn apply(&mut self, patch: NodeDataPatch) {
        let has_agent_fields = patch.has_agent_fields();
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }

        match &mut self.kind {
            NodeKind::Agent(agent) => {
                if let Some(name) = patch.name {
                    agent.name = name;
                }
                if let Some(system_prompt) = patch.system_prompt {
                    agent.system_prompt = system_prompt;
                }
                if let Some(model) = patch.model {
                    agent.model = model;
                }
                if let Some(temperature) = patch.temperature {
                    agent.temperature = Temperature::new(temperature);
                }
            }
            NodeKind::Generic => {
                if has_agent_fields {
                    tracing::debug!("Ignoring agent fields in patch for non-agent node");
                }
            }
        }
    }
}

/// Partial update for [`NodeData`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataPatch {
    /// New label
    pub label: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New agent name
    pub name: Option<String>,
    /// New system prompt
    pub system_prompt: Option<String>,
    /// New model
    pub model: Option<AgentModel>,
    /// New temperature (clamped when applied)
    pub temperature: Option<f32>,
}

impl NodeDataPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the agent name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: AgentModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Whether the patch touches any agent-only field
    pub fn has_agent_fields(&self) -> bool {
        self.name.is_some()
            || self.system_prompt.is_some()
            || self.model.is_some()
            || self.temperature.is_some()
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.description.is_none() && !self.has_agent_fields()
    }
}

/// A node instance on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type
    pub node_type: NodeType,
    /// Position in canvas-local space (center of the node card)
    pub position: [f32; 2],
    /// Data payload
    pub data: NodeData,
}

impl Node {
    /// Create a node with default data for its type
    pub fn new(node_type: NodeType, position: [f32; 2], sequence: u64) -> Self {
        Self {
            id: NodeId::generate(&node_type),
            data: NodeData::for_type(&node_type, sequence),
            node_type,
            position,
        }
    }

    /// Position as an egui point
    pub fn pos(&self) -> egui::Pos2 {
        egui::Pos2::new(self.position[0], self.position[1])
    }

    /// Whether this is an agent node
    pub fn is_agent(&self) -> bool {
        self.node_type == NodeType::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label_capitalizes_tag() {
        assert_eq!(NodeType::Trigger.default_label(), "Trigger");
        assert_eq!(NodeType::Database.default_label(), "Database");
        assert_eq!(NodeType::Custom("router".into()).default_label(), "Router");
        assert_eq!(NodeType::Custom(String::new()).default_label(), "");
    }

    #[test]
    fn test_parse_node_type() {
        assert_eq!(NodeType::parse("agent"), NodeType::Agent);
        assert_eq!(NodeType::parse("webhook"), NodeType::Custom("webhook".into()));
        assert_eq!(NodeType::from_builtin("webhook"), None);
        for node_type in NodeType::BUILTIN {
            assert_eq!(NodeType::from_builtin(node_type.as_str()).as_ref(), Some(node_type));
        }
    }

    #[test]
    fn test_agent_defaults() {
        let data = NodeData::for_type(&NodeType::Agent, 3);
        let agent = data.agent().unwrap();
        assert_eq!(data.label, "Agent");
        assert_eq!(agent.name, "AI Agent 3");
        assert!(agent.system_prompt.is_empty());
        assert_eq!(agent.model, AgentModel::Gpt4Turbo);
        assert_eq!(agent.temperature.value(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_generic_defaults() {
        let data = NodeData::for_type(&NodeType::Output, 0);
        assert_eq!(data.kind, NodeKind::Generic);
        assert_eq!(data.description.as_deref(), Some("New output node"));
    }

    #[test]
    fn test_model_names_round_trip_through_from() {
        assert_eq!(AgentModel::from("Claude 3 Opus"), AgentModel::Claude3Opus);
        assert_eq!(AgentModel::from("Mistral Large"), AgentModel::Other("Mistral Large".into()));
        assert_eq!(AgentModel::Other("Mistral Large".into()).name(), "Mistral Large");
    }

    #[test]
    fn test_temperature_clamps() {
        assert_eq!(Temperature::new(1.5).value(), 1.0);
        assert_eq!(Temperature::new(-0.2).value(), 0.0);
        assert_eq!(Temperature::new(0.3).value(), 0.3);
        assert_eq!(Temperature::new(f32::NAN).value(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_patch_merges_fields() {
        let mut data = NodeData::for_type(&NodeType::Agent, 1);
        data.apply(
            NodeDataPatch::new()
                .with_system_prompt("You summarize documents.")
                .with_temperature(0.2),
        );

        let agent = data.agent().unwrap();
        assert_eq!(agent.system_prompt, "You summarize documents.");
        assert_eq!(agent.temperature.value(), 0.2);
        // Untouched fields keep their values
        assert_eq!(agent.name, "AI Agent 1");
        assert_eq!(agent.model, AgentModel::Gpt4Turbo);
        assert_eq!(data.label, "Agent");
    }

    #[test]
    fn test_patch_agent_fields_ignored_on_generic_node() {
        let mut data = NodeData::for_type(&NodeType::Debug, 0);
        data.apply(NodeDataPatch::new().with_label("Inspector").with_name("ignored"));
        assert_eq!(data.label, "Inspector");
        assert_eq!(data.kind, NodeKind::Generic);
    }

    #[test]
    fn test_empty_patch() {
        assert!(NodeDataPatch::new().is_empty());
        assert!(!NodeDataPatch::new().with_temperature(0.5).is_empty());
    }

    #[test]
    fn test_node_ids_carry_type_tag() {
        let node = Node::new(NodeType::Trigger, [10.0, 20.0], 0);
        assert!(node.id.as_str().starts_with("trigger-"));
        assert_eq!(node.pos(), egui::Pos2::new(10.0, 20.0));
    }
}
