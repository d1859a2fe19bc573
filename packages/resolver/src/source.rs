use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use designlens_model::{DocumentResponse, NodeEntry, NodeId, NodeMapResponse, RawNode};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Access to design files on the authoring platform.
///
/// Node ids passed to and returned from a source are in the platform's
/// colon form.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Fetch a whole document
    async fn fetch_document(&self, file_key: &str) -> SourceResult<DocumentResponse>;

    /// Fetch a subset of nodes. Ids the source cannot resolve map to `None`.
    async fn fetch_nodes(&self, file_key: &str, node_ids: &[String]) -> SourceResult<NodeMapResponse>;
}

fn entry_for(node: &RawNode) -> NodeEntry {
    NodeEntry {
        document: node.clone(),
        components: BTreeMap::new(),
        component_sets: BTreeMap::new(),
        styles: BTreeMap::new(),
    }
}

/// Serves snapshots saved on disk.
///
/// `<dir>/<fileKey>.json` holds a document response. Nodes that live outside
/// the document tree (style definitions) can be supplied as a node-map
/// response in `<dir>/<fileKey>.styles.json`.
pub struct FileDesignSource {
    dir: PathBuf,
}

impl FileDesignSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, file_key: &str, suffix: &str) -> SourceResult<PathBuf> {
        if file_key.is_empty() || file_key.contains(['/', '\\']) || file_key.contains("..") {
            return Err(SourceError::NotFound(format!("invalid file key '{}'", file_key)));
        }
        Ok(self.dir.join(format!("{}{}", file_key, suffix)))
    }

    async fn read(path: &Path) -> SourceResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(SourceError::Auth(path.display().to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl DesignSource for FileDesignSource {
    async fn fetch_document(&self, file_key: &str) -> SourceResult<DocumentResponse> {
        let path = self.snapshot_path(file_key, ".json")?;
        debug!(path = %path.display(), "Reading document snapshot");

        let content = Self::read(&path)
            .await?
            .ok_or_else(|| SourceError::NotFound(path.display().to_string()))?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn fetch_nodes(&self, file_key: &str, node_ids: &[String]) -> SourceResult<NodeMapResponse> {
        let document = self.fetch_document(file_key).await?;

        let styles_path = self.snapshot_path(file_key, ".styles.json")?;
        let mut extra = match Self::read(&styles_path).await? {
            Some(content) => serde_json::from_str::<NodeMapResponse>(&content)?.nodes,
            None => BTreeMap::new(),
        };

        let nodes = node_ids
            .iter()
            .map(|id| {
                let entry = document
                    .document
                    .find_id(&NodeId::from_internal(id))
                    .map(entry_for)
                    .or_else(|| extra.remove(id).flatten());
                (id.clone(), entry)
            })
            .collect();

        Ok(NodeMapResponse {
            name: document.name,
            last_modified: document.last_modified,
            thumbnail_url: document.thumbnail_url,
            nodes,
        })
    }
}

/// In-memory source with failure injection, for tests and fixtures
#[derive(Default)]
pub struct MemoryDesignSource {
    documents: HashMap<String, DocumentResponse>,
    /// Nodes served by `fetch_nodes` in addition to the document tree
    nodes: HashMap<String, BTreeMap<String, RawNode>>,
    failing_documents: HashSet<String>,
    denied_files: HashSet<String>,
    failing_node_ids: HashSet<String>,
    document_calls: AtomicUsize,
    node_calls: AtomicUsize,
}

impl MemoryDesignSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, file_key: &str, document: DocumentResponse) {
        self.documents.insert(file_key.to_string(), document);
    }

    pub fn add_node(&mut self, file_key: &str, node: RawNode) {
        self.nodes
            .entry(file_key.to_string())
            .or_default()
            .insert(node.id.clone(), node);
    }

    /// Make every `fetch_document` for `file_key` fail
    pub fn fail_document(&mut self, file_key: &str) {
        self.failing_documents.insert(file_key.to_string());
    }

    /// Reject every call for `file_key` as unauthorized
    pub fn deny_file(&mut self, file_key: &str) {
        self.denied_files.insert(file_key.to_string());
    }

    fn check_access(&self, file_key: &str) -> SourceResult<()> {
        if self.denied_files.contains(file_key) {
            return Err(SourceError::Auth(format!("no access to {}", file_key)));
        }
        Ok(())
    }

    /// Make any `fetch_nodes` call requesting `node_id` fail
    pub fn fail_nodes_containing(&mut self, node_id: &str) {
        self.failing_node_ids.insert(node_id.to_string());
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn node_calls(&self) -> usize {
        self.node_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DesignSource for MemoryDesignSource {
    async fn fetch_document(&self, file_key: &str) -> SourceResult<DocumentResponse> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.check_access(file_key)?;
        if self.failing_documents.contains(file_key) {
            return Err(SourceError::Network(format!("injected failure for {}", file_key)));
        }
        self.documents
            .get(file_key)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(file_key.to_string()))
    }

    async fn fetch_nodes(&self, file_key: &str, node_ids: &[String]) -> SourceResult<NodeMapResponse> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        self.check_access(file_key)?;
        if node_ids.iter().any(|id| self.failing_node_ids.contains(id)) {
            return Err(SourceError::Network("injected batch failure".to_string()));
        }

        let document = self.documents.get(file_key);
        let extra = self.nodes.get(file_key);
        let nodes = node_ids
            .iter()
            .map(|id| {
                let node = extra
                    .and_then(|nodes| nodes.get(id))
                    .or_else(|| document.and_then(|doc| doc.document.find(id)));
                (id.clone(), node.map(entry_for))
            })
            .collect();

        Ok(NodeMapResponse {
            name: document.map(|doc| doc.name.clone()).unwrap_or_default(),
            last_modified: String::new(),
            thumbnail_url: String::new(),
            nodes,
        })
    }
}
