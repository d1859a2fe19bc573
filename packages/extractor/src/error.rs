use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Required identifiers are missing or the pipeline is mis-ordered.
    /// Raised before any traversal work starts.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An extractor failed while processing a node; the extraction is aborted
    #[error("Extractor '{extractor}' failed on node {node_id}: {source}")]
    Traversal {
        extractor: String,
        node_id: String,
        source: Box<ExtractError>,
    },

    /// Raised by an extractor for a node it cannot process
    #[error("{message}")]
    Fault { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ExtractError::Configuration {
            message: message.into(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        ExtractError::Fault {
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ExtractError::Configuration { .. })
    }
}
