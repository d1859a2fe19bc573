//! API response shapes.
//!
//! The platform answers either with a whole document or with a subset of
//! nodes keyed by id. Both carry the same file-scoped metadata, so
//! [`DesignResponse`] lets the extraction code treat them interchangeably.

use crate::raw::RawNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleType {
    Fill,
    Text,
    Effect,
    Grid,
    #[serde(other)]
    Other,
}

/// Entry of the file-scoped style dictionary (style id → metadata)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMeta {
    #[serde(default)]
    pub key: String,
    pub name: String,
    pub style_type: StyleType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub component_set_id: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSetMeta {
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Whole-document response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub document: RawNode,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentMeta>,
    #[serde(default)]
    pub component_sets: BTreeMap<String, ComponentSetMeta>,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleMeta>,
}

/// One requested node of a node-subset response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub document: RawNode,
    #[serde(default)]
    pub components: BTreeMap<String, ComponentMeta>,
    #[serde(default)]
    pub component_sets: BTreeMap<String, ComponentSetMeta>,
    #[serde(default)]
    pub styles: BTreeMap<String, StyleMeta>,
}

/// Node-subset response. Ids the platform could not resolve map to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMapResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub nodes: BTreeMap<String, Option<NodeEntry>>,
}

impl NodeMapResponse {
    pub fn node(&self, internal_id: &str) -> Option<&RawNode> {
        self.nodes
            .get(internal_id)
            .and_then(Option::as_ref)
            .map(|entry| &entry.document)
    }

    /// Resolved entries only
    pub fn entries(&self) -> impl Iterator<Item = (&String, &NodeEntry)> {
        self.nodes
            .iter()
            .filter_map(|(id, entry)| entry.as_ref().map(|entry| (id, entry)))
    }
}

/// Either response shape, used interchangeably as traversal input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DesignResponse {
    Document(DocumentResponse),
    Nodes(NodeMapResponse),
}

impl DesignResponse {
    pub fn name(&self) -> &str {
        match self {
            DesignResponse::Document(doc) => &doc.name,
            DesignResponse::Nodes(nodes) => &nodes.name,
        }
    }

    pub fn last_modified(&self) -> &str {
        match self {
            DesignResponse::Document(doc) => &doc.last_modified,
            DesignResponse::Nodes(nodes) => &nodes.last_modified,
        }
    }

    pub fn thumbnail_url(&self) -> &str {
        match self {
            DesignResponse::Document(doc) => &doc.thumbnail_url,
            DesignResponse::Nodes(nodes) => &nodes.thumbnail_url,
        }
    }

    /// Traversal roots: the pages of a document, or each requested node
    pub fn roots(&self) -> Vec<&RawNode> {
        match self {
            DesignResponse::Document(doc) => doc.document.children.iter().collect(),
            DesignResponse::Nodes(nodes) => nodes.entries().map(|(_, entry)| &entry.document).collect(),
        }
    }

    pub fn styles(&self) -> BTreeMap<String, StyleMeta> {
        match self {
            DesignResponse::Document(doc) => doc.styles.clone(),
            DesignResponse::Nodes(nodes) => nodes
                .entries()
                .flat_map(|(_, entry)| entry.styles.clone())
                .collect(),
        }
    }

    pub fn components(&self) -> BTreeMap<String, ComponentMeta> {
        match self {
            DesignResponse::Document(doc) => doc.components.clone(),
            DesignResponse::Nodes(nodes) => nodes
                .entries()
                .flat_map(|(_, entry)| entry.components.clone())
                .collect(),
        }
    }

    pub fn component_sets(&self) -> BTreeMap<String, ComponentSetMeta> {
        match self {
            DesignResponse::Document(doc) => doc.component_sets.clone(),
            DesignResponse::Nodes(nodes) => nodes
                .entries()
                .flat_map(|(_, entry)| entry.component_sets.clone())
                .collect(),
        }
    }
}

impl From<DocumentResponse> for DesignResponse {
    fn from(doc: DocumentResponse) -> Self {
        DesignResponse::Document(doc)
    }
}

impl From<NodeMapResponse> for DesignResponse {
    fn from(nodes: NodeMapResponse) -> Self {
        DesignResponse::Nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::NodeKind;

    const DOCUMENT_JSON: &str = r#"{
        "name": "Landing",
        "lastModified": "2024-03-01T10:00:00Z",
        "thumbnailUrl": "https://example.com/thumb.png",
        "document": {
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [
                { "id": "0:1", "name": "Page 1", "type": "CANVAS", "children": [] }
            ]
        },
        "styles": {
            "5:1": { "key": "abc", "name": "Grid/12", "styleType": "GRID" }
        }
    }"#;

    const NODES_JSON: &str = r#"{
        "name": "Landing",
        "lastModified": "2024-03-01T10:00:00Z",
        "thumbnailUrl": "",
        "nodes": {
            "1:2": {
                "document": { "id": "1:2", "name": "Hero", "type": "FRAME" },
                "components": { "3:3": { "key": "k", "name": "Button" } },
                "styles": { "5:2": { "name": "Brand/Blue", "styleType": "FILL" } }
            },
            "9:9": null
        }
    }"#;

    #[test]
    fn test_document_response_is_detected() {
        let response: DesignResponse = serde_json::from_str(DOCUMENT_JSON).unwrap();
        assert!(matches!(response, DesignResponse::Document(_)));
        assert_eq!(response.name(), "Landing");

        let roots = response.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, NodeKind::Canvas);
        assert_eq!(response.styles()["5:1"].style_type, StyleType::Grid);
    }

    #[test]
    fn test_node_map_response_skips_unresolved_ids() {
        let response: DesignResponse = serde_json::from_str(NODES_JSON).unwrap();
        assert!(matches!(response, DesignResponse::Nodes(_)));

        let roots = response.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Hero");
        assert!(response.components().contains_key("3:3"));
        assert_eq!(response.styles()["5:2"].style_type, StyleType::Fill);
    }

    #[test]
    fn test_unknown_style_type() {
        let meta: StyleMeta =
            serde_json::from_str(r#"{ "name": "x", "styleType": "VARIABLE_ALIAS" }"#).unwrap();
        assert_eq!(meta.style_type, StyleType::Other);
    }
}
