//! CLI error types.

use sitepull_client::ClientError;
use sitepull_config::ConfigError;
use sitepull_core::PipelineError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}
