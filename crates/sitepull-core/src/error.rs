//! Error types for the transformation pipeline.

/// Error while rewriting an entry's fields.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A reference points back at an entry that is already being expanded.
    #[error("cyclic reference: {}", .chain.join(" -> "))]
    CyclicReference {
        /// Entry ids from the outermost expansion to the repeated id.
        chain: Vec<String>,
    },
}

/// Error while rendering an entry into file content.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// The output path has an extension no serializer handles.
    #[error("unsupported output format '{extension}' for {path}")]
    UnsupportedFormat {
        /// Output path that was being rendered.
        path: String,
        /// Extension taken from the path (empty when there is none).
        extension: String,
    },

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error that aborts a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An entry could not be transformed.
    #[error("entry {id}: {source}")]
    Transform {
        /// Id of the entry being transformed.
        id: String,
        /// Underlying transform error.
        #[source]
        source: TransformError,
    },

    /// An entry could not be serialized.
    #[error("{path}: {source}")]
    Serialize {
        /// Output path of the entry.
        path: String,
        /// Underlying serialization error.
        #[source]
        source: SerializeError,
    },
}

/// Site generator identifier that is not one of the supported ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown site generator '{0}' (expected jekyll, hugo or gatsby)")]
pub struct UnknownGenerator(pub String);
