//! Design-wide style catalog.
//!
//! Style metadata lives in the file-scoped style dictionary, but the values
//! live on the nodes defining each style. Those nodes are fetched in
//! sequential batches; a failed batch is logged and skipped so the catalog is
//! built from whatever the remaining batches return.

use crate::source::DesignSource;
use designlens_extractor::extractors::{convert_effects, convert_paints, SimplifiedTextStyle};
use designlens_model::{to_external_id, RawNode, StyleMeta, StyleType};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_STYLE_BATCH_SIZE: usize = 50;

/// Nodes returned by a batched fetch
#[derive(Debug, Clone, Default)]
pub struct StyleNodes {
    /// Keyed by colon-form node id
    pub nodes: BTreeMap<String, RawNode>,
    pub batches: usize,
    /// 1-based indices of batches that failed
    pub failed_batches: Vec<usize>,
}

/// One entry of the style catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignStyle {
    /// Dash-form id of the defining node
    pub id: String,
    pub name: String,
    pub style_type: StyleType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub value: Value,
}

/// Fetch `node_ids` in sequential batches of `batch_size`.
///
/// Never fails: a batch that errors contributes nothing and is recorded in
/// [`StyleNodes::failed_batches`].
#[instrument(skip(source, node_ids), fields(ids = node_ids.len()))]
pub async fn fetch_style_nodes(
    source: &dyn DesignSource,
    file_key: &str,
    node_ids: &[String],
    batch_size: usize,
) -> StyleNodes {
    let mut result = StyleNodes::default();

    for (index, batch) in node_ids.chunks(batch_size.max(1)).enumerate() {
        let batch_number = index + 1;
        result.batches += 1;

        match source.fetch_nodes(file_key, batch).await {
            Ok(response) => {
                let before = result.nodes.len();
                result.nodes.extend(
                    response
                        .nodes
                        .into_iter()
                        .filter_map(|(id, entry)| entry.map(|entry| (id, entry.document))),
                );
                debug!(batch = batch_number, fetched = result.nodes.len() - before, "Style batch fetched");
            }
            Err(err) => {
                warn!(batch = batch_number, size = batch.len(), error = %err, "Style batch failed, skipping");
                result.failed_batches.push(batch_number);
            }
        }
    }

    result
}

/// Build the catalog of every style in `styles`, keyed by dash-form style id
#[instrument(skip(source, styles), fields(styles = styles.len()))]
pub async fn extract_design_styles(
    source: &dyn DesignSource,
    file_key: &str,
    styles: &BTreeMap<String, StyleMeta>,
    batch_size: usize,
) -> BTreeMap<String, DesignStyle> {
    let ids: Vec<String> = styles.keys().cloned().collect();
    let fetched = fetch_style_nodes(source, file_key, &ids, batch_size).await;

    let catalog: BTreeMap<String, DesignStyle> = styles
        .iter()
        .filter_map(|(id, meta)| {
            let node = fetched.nodes.get(id)?;
            let value = style_value(&meta.style_type, node)?;
            let external = to_external_id(id);
            Some((
                external.clone(),
                DesignStyle {
                    id: external,
                    name: meta.name.clone(),
                    style_type: meta.style_type.clone(),
                    description: meta.description.clone(),
                    value,
                },
            ))
        })
        .collect();

    info!(
        resolved = catalog.len(),
        failed_batches = fetched.failed_batches.len(),
        "Style catalog built"
    );
    catalog
}

fn style_value(style_type: &StyleType, node: &RawNode) -> Option<Value> {
    let value = match style_type {
        StyleType::Fill => serde_json::to_value(convert_paints(&node.fills)),
        StyleType::Text => serde_json::to_value(SimplifiedTextStyle::from_type_style(node.style.as_ref()?)),
        StyleType::Effect => serde_json::to_value(convert_effects(&node.effects)),
        StyleType::Grid => serde_json::to_value(&node.layout_grids),
        StyleType::Other => return None,
    };
    match value {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(node_id = %node.id, error = %err, "Could not serialize style value");
            None
        }
    }
}
