//! Site options shared by the commands that produce output files.

use std::path::PathBuf;

use clap::Args;
use sitepull_config::{CliSettings, Config};
use sitepull_core::{Document, Generator, PipelineOptions, run, write_files};

use crate::error::CliError;
use crate::output::Output;

/// Output site options.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover sitepull.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target site generator: jekyll, hugo or gatsby (overrides config).
    #[arg(short, long, env = "SSG_TYPE")]
    pub generator: Option<Generator>,

    /// Overlay unpublished drafts on top of published documents.
    #[arg(long, env = "SANITY_PREVIEW")]
    pub preview: bool,

    /// Use published documents only, even if config enables preview.
    #[arg(long, conflicts_with = "preview")]
    pub no_preview: bool,

    /// Directory to write files under (overrides config).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// List the files that would be written without writing them.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output (show per-run logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Settings overriding the configuration file.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            generator: self.generator,
            preview: self.resolve_preview(),
            output_dir: self.output_dir.clone(),
            ..Default::default()
        }
    }

    fn resolve_preview(&self) -> Option<bool> {
        if self.no_preview {
            Some(false)
        } else if self.preview {
            Some(true)
        } else {
            None
        }
    }
}

/// Pipeline options of a loaded configuration.
pub(crate) fn pipeline_options(config: &Config) -> Result<PipelineOptions, CliError> {
    Ok(PipelineOptions {
        generator: config.require_generator()?,
        preview: config.site_resolved.preview,
    })
}

/// Render `documents` and write them under the configured output directory.
pub(crate) fn render(
    output: &Output,
    config: &Config,
    options: &PipelineOptions,
    documents: Vec<Document>,
    dry_run: bool,
) -> Result<(), CliError> {
    let files = run(documents, options)?;
    let root = &config.site_resolved.output_dir;

    if dry_run {
        output.highlight(&format!(
            "\n[DRY RUN] {} files would be written to {}:",
            files.len(),
            root.display()
        ));
        for file in &files {
            output.file(&file.path, file.content.len());
        }
        return Ok(());
    }

    write_files(root, &files)?;
    output.success(&format!(
        "Wrote {} files for {} to {}",
        files.len(),
        options.generator,
        root.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        site: SiteArgs,
    }

    fn parse(args: &[&str]) -> SiteArgs {
        TestCli::try_parse_from(std::iter::once("sitepull").chain(args.iter().copied()))
            .unwrap()
            .site
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let settings = parse(&["--generator", "hugo"]).cli_settings();
        assert_eq!(settings.generator, Some(Generator::Hugo));
        assert_eq!(settings.preview, None);
        assert_eq!(settings.output_dir, None);
    }

    #[test]
    fn test_preview_flags() {
        assert_eq!(parse(&["--preview"]).cli_settings().preview, Some(true));
        assert_eq!(parse(&["--no-preview"]).cli_settings().preview, Some(false));
        assert!(TestCli::try_parse_from(["sitepull", "--preview", "--no-preview"]).is_err());
    }

    #[test]
    fn test_unknown_generator_rejected() {
        assert!(TestCli::try_parse_from(["sitepull", "--generator", "eleventy"]).is_err());
    }

    #[test]
    fn test_render_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site_resolved.output_dir = dir.path().to_path_buf();
        let options = PipelineOptions {
            generator: Generator::Gatsby,
            preview: false,
        };
        let documents: Vec<Document> = serde_json::from_str(
            r#"[{"_id": "home", "stackbit_model_type": "page", "stackbit_url_path": "", "content": "Hi"}]"#,
        )
        .unwrap();

        render(&Output::new(), &config, &options, documents, false).unwrap();

        let written = std::fs::read_to_string(dir.path().join("src/pages/index.md")).unwrap();
        assert_eq!(written, "---\n---\nHi");
    }

    #[test]
    fn test_render_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site_resolved.output_dir = dir.path().join("site");
        let options = PipelineOptions {
            generator: Generator::Hugo,
            preview: false,
        };
        let documents: Vec<Document> = serde_json::from_str(
            r#"[{"_id": "home", "stackbit_model_type": "page", "stackbit_url_path": "/"}]"#,
        )
        .unwrap();

        render(&Output::new(), &config, &options, documents, true).unwrap();

        assert!(!dir.path().join("site").exists());
    }
}
