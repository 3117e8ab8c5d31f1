//! `sitepull convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitepull_client::parse_documents;
use sitepull_config::Config;

use super::site::{SiteArgs, pipeline_options, render};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Document export: a JSON array, a query response or NDJSON.
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the export cannot be read or parsed, or any file
    /// cannot be rendered or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.site.config.as_deref(), Some(&self.site.cli_settings()))?;
        let options = pipeline_options(&config)?;

        let text = std::fs::read_to_string(&self.input)?;
        let documents = parse_documents(&text)?;
        output.info(&format!(
            "Read {} documents from {}",
            documents.len(),
            self.input.display()
        ));

        render(&output, &config, &options, documents, self.site.dry_run)
    }
}
