//! `sitepull sync` command implementation.

use clap::Args;
use sitepull_client::SanityClient;
use sitepull_config::Config;

use super::site::{SiteArgs, pipeline_options, render};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Content store project id (overrides config).
    #[arg(long, env = "SANITY_PROJECT_ID")]
    project_id: Option<String>,

    /// Read token, required to see drafts (overrides config).
    #[arg(long, env = "SANITY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Dataset name (overrides config).
    #[arg(short, long, env = "SANITY_DATASET")]
    dataset: Option<String>,

    /// Dated API version, e.g. v2021-10-21 (overrides config).
    #[arg(long)]
    api_version: Option<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete, the fetch fails, or
    /// any file cannot be rendered or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut cli_settings = self.site.cli_settings();
        cli_settings.project_id = self.project_id;
        cli_settings.token = self.token;
        cli_settings.dataset = self.dataset;
        cli_settings.api_version = self.api_version;
        let config = Config::load(self.site.config.as_deref(), Some(&cli_settings))?;

        let project_id = config.require_project_id()?;
        let options = pipeline_options(&config)?;
        if options.preview && config.token().is_none() {
            output.warning("Warning: preview without a token only sees published documents");
        }

        let client = SanityClient::new(
            project_id,
            &config.sanity.dataset,
            &config.sanity.api_version,
            config.token(),
        )?;
        output.info(&format!(
            "Fetching documents from {project_id}/{}...",
            config.sanity.dataset
        ));
        let documents = client.fetch_documents(options.preview)?;
        output.info(&format!("Fetched {} documents", documents.len()));

        render(&output, &config, &options, documents, self.site.dry_run)
    }
}
