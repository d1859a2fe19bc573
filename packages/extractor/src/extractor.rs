use crate::context::{ContextField, TraversalContext};
use crate::error::{ExtractError, ExtractResult};
use designlens_model::{RawNode, SimplifiedNode};
use std::collections::HashSet;

/// A unit of the extraction pipeline.
///
/// Called once per accepted node with the raw node, the output node under
/// construction and the shared traversal context. Extractors may write to
/// both the output node and the context.
pub trait Extractor: Send + Sync {
    /// Unique identifier, used in error reports
    fn name(&self) -> &'static str;

    /// Context fields this extractor reads
    fn requires(&self) -> &'static [ContextField] {
        &[]
    }

    /// Context fields this extractor writes
    fn provides(&self) -> &'static [ContextField] {
        &[]
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()>;
}

/// Ordered list of extractors
pub struct ExtractorPipeline {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorPipeline {
    /// Create an empty pipeline
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn from_extractors(extractors: Vec<Box<dyn Extractor>>) -> Self {
        Self { extractors }
    }

    /// Append an extractor; it runs after every extractor already registered
    pub fn add_extractor(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn with(mut self, extractor: impl Extractor + 'static) -> Self {
        self.add_extractor(Box::new(extractor));
        self
    }

    pub fn extractors(&self) -> &[Box<dyn Extractor>] {
        &self.extractors
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Check that every context field an extractor requires is provided by
    /// the walker or by an extractor registered before it.
    pub fn validate(&self) -> ExtractResult<()> {
        let mut provided: HashSet<ContextField> = HashSet::new();

        for extractor in &self.extractors {
            for field in extractor.requires() {
                if !field.walker_provided() && !provided.contains(field) {
                    return Err(ExtractError::configuration(format!(
                        "extractor '{}' requires {:?}, which no earlier extractor provides",
                        extractor.name(),
                        field
                    )));
                }
            }
            provided.extend(extractor.provides().iter().copied());
        }

        Ok(())
    }
}

impl Default for ExtractorPipeline {
    fn default() -> Self {
        crate::extractors::all_extractors()
    }
}

impl std::fmt::Debug for ExtractorPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extractors.iter().map(|e| e.name()).collect();
        f.debug_struct("ExtractorPipeline")
            .field("extractors", &names)
            .finish()
    }
}
