use crate::context::TraversalContext;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use designlens_model::{to_external_id, NodeKind, RawNode, SimplifiedNode};

/// Records component linkage on instances and fills the design-level
/// component and component-set registries.
pub struct ComponentExtractor;

impl Extractor for ComponentExtractor {
    fn name(&self) -> &'static str {
        "component"
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        match &node.kind {
            NodeKind::Instance => {
                if let Some(component_id) = &node.component_id {
                    output.component_id = Some(to_external_id(component_id));
                    context.register_component(component_id, "");
                }
                output.component_properties = node
                    .component_properties
                    .iter()
                    .map(|(name, property)| (name.clone(), property.value.clone()))
                    .collect();
            }
            NodeKind::Component => context.register_component(&node.id, &node.name),
            NodeKind::ComponentSet => context.register_component_set(&node.id, &node.name),
            NodeKind::Document
            | NodeKind::Canvas
            | NodeKind::Frame
            | NodeKind::Group
            | NodeKind::Section
            | NodeKind::Text
            | NodeKind::Rectangle
            | NodeKind::Ellipse
            | NodeKind::Vector
            | NodeKind::Line
            | NodeKind::BooleanOperation
            | NodeKind::Other(_) => {}
        }
        Ok(())
    }
}
