//! Depth-first traversal driving the extractor pipeline.
//!
//! The walker owns context propagation: depth, the raw parent and the
//! ambient grid artboard are saved before descending into a node's children
//! and restored afterwards, so no extractor observes a sibling's state.

use crate::context::TraversalContext;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::ExtractorPipeline;
use designlens_model::{
    to_external_id, DesignResponse, GlobalVars, RawNode, SimplifiedComponent,
    SimplifiedComponentSet, SimplifiedDesign, SimplifiedNode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// What happens to the subtree of a node the filter rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Drop the node together with its whole subtree
    #[default]
    Prune,
    /// Drop the node but visit its children as if they sat in its place
    Hoist,
}

/// Predicate deciding whether a raw node is emitted
pub type NodeFilter = Box<dyn Fn(&RawNode) -> bool + Send + Sync>;

/// Options for one extraction
pub struct ExtractOptions {
    /// Nodes at this depth are emitted without children. Roots are depth 0.
    pub max_depth: Option<usize>,
    /// Emit nodes marked invisible (and their subtrees)
    pub include_hidden: bool,
    pub filter_mode: FilterMode,
    pub filter: Option<NodeFilter>,
}

impl ExtractOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    pub fn with_filter(mut self, filter: impl Fn(&RawNode) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    fn accepts(&self, node: &RawNode) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(node))
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_hidden: false,
            filter_mode: FilterMode::Prune,
            filter: None,
        }
    }
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("max_depth", &self.max_depth)
            .field("include_hidden", &self.include_hidden)
            .field("filter_mode", &self.filter_mode)
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Output of a traversal over bare roots, without file metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTree {
    pub nodes: Vec<SimplifiedNode>,
    pub components: BTreeMap<String, SimplifiedComponent>,
    pub component_sets: BTreeMap<String, SimplifiedComponentSet>,
    pub global_vars: GlobalVars,
}

pub struct NodeWalker<'p> {
    pipeline: &'p ExtractorPipeline,
    options: &'p ExtractOptions,
}

impl<'p> NodeWalker<'p> {
    pub fn new(pipeline: &'p ExtractorPipeline, options: &'p ExtractOptions) -> Self {
        Self { pipeline, options }
    }

    /// Simplify every root of a document or node-map response
    #[instrument(skip(self, response), fields(file = response.name(), extractors = self.pipeline.len()))]
    pub fn extract(&self, response: &DesignResponse) -> ExtractResult<SimplifiedDesign> {
        let roots = response.roots();
        let context = TraversalContext::new()
            .with_component_meta(response.components(), response.component_sets());
        let tree = self.walk(&roots, context)?;

        Ok(SimplifiedDesign {
            name: response.name().to_string(),
            last_modified: response.last_modified().to_string(),
            thumbnail_url: response.thumbnail_url().to_string(),
            nodes: tree.nodes,
            components: tree.components,
            component_sets: tree.component_sets,
            global_vars: tree.global_vars,
        })
    }

    /// Simplify bare raw roots
    pub fn extract_roots(&self, roots: &[&RawNode]) -> ExtractResult<ExtractedTree> {
        self.walk(roots, TraversalContext::new())
    }

    fn walk<'a>(
        &self,
        roots: &[&'a RawNode],
        mut context: TraversalContext<'a>,
    ) -> ExtractResult<ExtractedTree> {
        self.pipeline.validate()?;
        context.max_depth = self.options.max_depth;

        let mut nodes = Vec::with_capacity(roots.len());
        for root in roots {
            self.visit(root, &mut context, &mut nodes)?;
        }

        let (globals, components, component_sets) = context.into_parts();
        info!(
            roots = nodes.len(),
            nodes = nodes.iter().map(count_nodes).sum::<usize>(),
            styles = globals.len(),
            components = components.len(),
            "Extraction complete"
        );

        Ok(ExtractedTree {
            nodes,
            components,
            component_sets,
            global_vars: globals.into_global_vars(),
        })
    }

    fn visit<'a>(
        &self,
        node: &'a RawNode,
        context: &mut TraversalContext<'a>,
        siblings: &mut Vec<SimplifiedNode>,
    ) -> ExtractResult<()> {
        if !node.visible && !self.options.include_hidden {
            return Ok(());
        }

        if !self.options.accepts(node) {
            debug!(node_id = %node.id, mode = ?self.options.filter_mode, "Node rejected by filter");
            return match self.options.filter_mode {
                FilterMode::Prune => Ok(()),
                // Children take the rejected node's slot: same depth, parent and grid
                FilterMode::Hoist => node
                    .children
                    .iter()
                    .try_for_each(|child| self.visit(child, context, siblings)),
            };
        }

        context.begin_node();
        let mut output = SimplifiedNode::new(to_external_id(&node.id), &node.name, node.kind.as_str());

        for extractor in self.pipeline.extractors() {
            extractor
                .apply(node, &mut output, context)
                .map_err(|source| ExtractError::Traversal {
                    extractor: extractor.name().to_string(),
                    node_id: output.id.clone(),
                    source: Box::new(source),
                })?;
        }

        let descend = context.max_depth.map_or(true, |max| context.depth < max);
        if descend && !node.children.is_empty() {
            let scope = context.enter_children(node);
            let mut children = Vec::with_capacity(node.children.len());
            let result = node
                .children
                .iter()
                .try_for_each(|child| self.visit(child, context, &mut children));
            context.exit_children(scope);
            result?;
            output.children = children;
        }

        siblings.push(output);
        Ok(())
    }
}

/// Run `pipeline` over a response with `options`
pub fn simplify_design(
    response: &DesignResponse,
    pipeline: &ExtractorPipeline,
    options: &ExtractOptions,
) -> ExtractResult<SimplifiedDesign> {
    NodeWalker::new(pipeline, options).extract(response)
}

fn count_nodes(node: &SimplifiedNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use designlens_model::NodeKind;

    fn tree() -> RawNode {
        RawNode::new("1:0", "Page", NodeKind::Canvas).with_children(vec![
            RawNode::new("1:1", "Header", NodeKind::Frame)
                .with_child(RawNode::new("1:2", "Logo", NodeKind::Rectangle))
                .with_child(RawNode::new("1:3", "Title", NodeKind::Text)),
            RawNode::new("1:4", "Body", NodeKind::Frame),
        ])
    }

    fn ids(nodes: &[SimplifiedNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn test_ids_are_emitted_in_external_form() {
        let root = tree();
        let pipeline = ExtractorPipeline::empty();
        let options = ExtractOptions::default();

        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(out.nodes[0].id, "1-0");
        assert_eq!(ids(&out.nodes[0].children), vec!["1-1", "1-4"]);
        assert_eq!(ids(&out.nodes[0].children[0].children), vec!["1-2", "1-3"]);
    }

    #[test]
    fn test_prune_drops_subtree() {
        let root = tree();
        let pipeline = ExtractorPipeline::empty();
        let options = ExtractOptions::default().with_filter(|node| node.name != "Header");

        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(ids(&out.nodes[0].children), vec!["1-4"]);
    }

    #[test]
    fn test_hoist_splices_children_in_place() {
        let root = tree();
        let pipeline = ExtractorPipeline::empty();
        let options = ExtractOptions::default()
            .with_filter(|node| node.name != "Header")
            .with_filter_mode(FilterMode::Hoist);

        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(ids(&out.nodes[0].children), vec!["1-2", "1-3", "1-4"]);
    }

    #[test]
    fn test_hidden_nodes_are_skipped_unless_requested() {
        let mut root = tree();
        root.children[0].visible = false;
        let pipeline = ExtractorPipeline::empty();

        let options = ExtractOptions::default();
        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(ids(&out.nodes[0].children), vec!["1-4"]);

        let options = ExtractOptions::default().with_include_hidden(true);
        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(ids(&out.nodes[0].children), vec!["1-1", "1-4"]);
    }

    #[test]
    fn test_max_depth_zero_emits_roots_only() {
        let root = tree();
        let pipeline = ExtractorPipeline::empty();
        let options = ExtractOptions::default().with_max_depth(0);

        let out = NodeWalker::new(&pipeline, &options).extract_roots(&[&root]).unwrap();
        assert_eq!(out.nodes.len(), 1);
        assert!(out.nodes[0].children.is_empty());
    }

    #[test]
    fn test_debug_hides_filter_closure() {
        let options = ExtractOptions::default().with_filter(|_| true);
        assert!(format!("{:?}", options).contains("<fn>"));
    }
}
