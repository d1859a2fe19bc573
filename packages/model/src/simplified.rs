//! Simplified output tree.
//!
//! Style payloads are not embedded in nodes. Nodes carry [`VarId`] references
//! into [`GlobalVars::styles`], where structurally equal values share one entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reference into the global style table (e.g. `fill_3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(String);

impl VarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedNode {
    /// Dash-delimited external id
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<VarId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub component_properties: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SimplifiedNode>,
}

impl SimplifiedNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            text: None,
            text_style: None,
            fills: None,
            strokes: None,
            effects: None,
            opacity: None,
            border_radius: None,
            layout: None,
            span: None,
            component_id: None,
            component_properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Preorder search by external id
    pub fn find(&self, external_id: &str) -> Option<&SimplifiedNode> {
        if self.id == external_id {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find(external_id))
    }

    /// Height of the emitted subtree (a leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedComponent {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedComponentSet {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Deduplicated style table shared by the whole output tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalVars {
    pub styles: BTreeMap<VarId, serde_json::Value>,
}

impl GlobalVars {
    pub fn get(&self, id: &VarId) -> Option<&serde_json::Value> {
        self.styles.get(id)
    }
}

/// Result of one extraction call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    pub last_modified: String,
    pub thumbnail_url: String,
    pub nodes: Vec<SimplifiedNode>,
    pub components: BTreeMap<String, SimplifiedComponent>,
    pub component_sets: BTreeMap<String, SimplifiedComponentSet>,
    pub global_vars: GlobalVars,
}

impl SimplifiedDesign {
    /// Preorder search across all roots by external id
    pub fn find(&self, external_id: &str) -> Option<&SimplifiedNode> {
        self.nodes.iter().find_map(|node| node.find(external_id))
    }

    /// Resolve a node's style reference to its stored value
    pub fn style(&self, id: Option<&VarId>) -> Option<&serde_json::Value> {
        id.and_then(|id| self.global_vars.get(id))
    }
}
