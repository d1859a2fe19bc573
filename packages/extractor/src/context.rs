use crate::artboard::GridArtboard;
use crate::global_vars::GlobalVarStore;
use designlens_model::{
    to_external_id, ComponentMeta, ComponentSetMeta, RawNode, SimplifiedComponent,
    SimplifiedComponentSet,
};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Context state an extractor can declare it reads or writes.
///
/// Used by [`crate::ExtractorPipeline::validate`] to reject pipelines where a
/// reader runs before its writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    /// Current depth (walker-provided)
    Depth,
    /// Raw parent node (walker-provided)
    Parent,
    /// Nearest enclosing grid artboard
    AmbientGrid,
}

impl ContextField {
    /// Fields the walker maintains without any extractor
    pub fn walker_provided(self) -> bool {
        match self {
            ContextField::Depth | ContextField::Parent => true,
            ContextField::AmbientGrid => false,
        }
    }
}

/// Mutable state threaded through one traversal.
pub struct TraversalContext<'a> {
    pub globals: GlobalVarStore,
    pub depth: usize,
    pub max_depth: Option<usize>,
    parent: Option<&'a RawNode>,
    ambient_grid: Option<Rc<GridArtboard>>,
    /// Set by an extractor on the current node; becomes the children's ambient grid
    descendant_grid: Option<Rc<GridArtboard>>,
    component_meta: BTreeMap<String, ComponentMeta>,
    component_set_meta: BTreeMap<String, ComponentSetMeta>,
    components: BTreeMap<String, SimplifiedComponent>,
    component_sets: BTreeMap<String, SimplifiedComponentSet>,
}

/// Saved state restored when leaving a node's children
pub(crate) struct Scope<'a> {
    parent: Option<&'a RawNode>,
    ambient_grid: Option<Rc<GridArtboard>>,
}

impl<'a> TraversalContext<'a> {
    pub fn new() -> Self {
        Self {
            globals: GlobalVarStore::new(),
            depth: 0,
            max_depth: None,
            parent: None,
            ambient_grid: None,
            descendant_grid: None,
            component_meta: BTreeMap::new(),
            component_set_meta: BTreeMap::new(),
            components: BTreeMap::new(),
            component_sets: BTreeMap::new(),
        }
    }

    /// Seed the file-level component metadata used to fill the registries
    pub fn with_component_meta(
        mut self,
        components: BTreeMap<String, ComponentMeta>,
        component_sets: BTreeMap<String, ComponentSetMeta>,
    ) -> Self {
        self.component_meta = components;
        self.component_set_meta = component_sets;
        self
    }

    pub fn parent(&self) -> Option<&'a RawNode> {
        self.parent
    }

    /// Grid artboard inherited from the nearest grid-bearing ancestor.
    /// Never the current node's own grid.
    pub fn ambient_grid(&self) -> Option<&GridArtboard> {
        self.ambient_grid.as_deref()
    }

    /// Make `artboard` the ambient grid of the current node's descendants
    pub fn set_descendant_grid(&mut self, artboard: GridArtboard) {
        self.descendant_grid = Some(Rc::new(artboard));
    }

    /// Record a component definition or referenced component.
    ///
    /// `internal_id` is the colon-form id; the registry is keyed by the
    /// external form.
    pub fn register_component(&mut self, internal_id: &str, fallback_name: &str) {
        let id = to_external_id(internal_id);
        if self.components.contains_key(&id) {
            return;
        }
        let meta = self.component_meta.get(internal_id);
        let set_id = meta.and_then(|meta| meta.component_set_id.clone());
        let component = SimplifiedComponent {
            id: id.clone(),
            key: meta.map(|meta| meta.key.clone()).unwrap_or_default(),
            name: meta
                .map(|meta| meta.name.clone())
                .unwrap_or_else(|| fallback_name.to_string()),
            component_set_id: set_id.as_deref().map(to_external_id),
        };
        self.components.insert(id, component);

        if let Some(set_id) = set_id {
            self.register_component_set(&set_id, "");
        }
    }

    pub fn register_component_set(&mut self, internal_id: &str, fallback_name: &str) {
        let id = to_external_id(internal_id);
        if self.component_sets.contains_key(&id) {
            return;
        }
        let meta = self.component_set_meta.get(internal_id);
        let set = SimplifiedComponentSet {
            id: id.clone(),
            key: meta.map(|meta| meta.key.clone()).unwrap_or_default(),
            name: meta
                .map(|meta| meta.name.clone())
                .unwrap_or_else(|| fallback_name.to_string()),
            description: meta
                .map(|meta| meta.description.clone())
                .filter(|description| !description.is_empty()),
        };
        self.component_sets.insert(id, set);
    }

    pub fn components(&self) -> &BTreeMap<String, SimplifiedComponent> {
        &self.components
    }

    pub fn component_sets(&self) -> &BTreeMap<String, SimplifiedComponentSet> {
        &self.component_sets
    }

    pub(crate) fn begin_node(&mut self) {
        self.descendant_grid = None;
    }

    /// Step into `node`'s children
    pub(crate) fn enter_children(&mut self, node: &'a RawNode) -> Scope<'a> {
        let ambient = self
            .descendant_grid
            .take()
            .or_else(|| self.ambient_grid.clone());
        let scope = Scope {
            parent: self.parent.replace(node),
            ambient_grid: std::mem::replace(&mut self.ambient_grid, ambient),
        };
        self.depth += 1;
        scope
    }

    pub(crate) fn exit_children(&mut self, scope: Scope<'a>) {
        self.parent = scope.parent;
        self.ambient_grid = scope.ambient_grid;
        self.depth -= 1;
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        GlobalVarStore,
        BTreeMap<String, SimplifiedComponent>,
        BTreeMap<String, SimplifiedComponentSet>,
    ) {
        (self.globals, self.components, self.component_sets)
    }
}

impl Default for TraversalContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}
