//! End-to-end conversion of fetched documents into output files.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::document::{Document, Role};
use crate::error::PipelineError;
use crate::overlay::overlay_drafts;
use crate::path::{Generator, resolve_output};
use crate::serialize::serialize;
use crate::transform::{ResolveContext, transform_entry};

/// Options for a single pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Directory layout of the target site.
    pub generator: Generator,
    /// Overlay drafts on top of published documents.
    pub preview: bool,
}

/// A rendered file, relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the site root, `/`-separated.
    pub path: String,
    /// UTF-8 file content.
    pub content: String,
}

/// Convert fetched documents into output files.
///
/// Every entry is rendered before anything is returned, so a failing entry
/// aborts the run without a partial file set. Entries are processed in
/// parallel; the result keeps the order of the overlaid collection.
///
/// # Errors
///
/// Returns [`PipelineError`] if an entry has a cyclic reference or its
/// output format is unsupported.
pub fn run(
    documents: Vec<Document>,
    options: &PipelineOptions,
) -> Result<Vec<OutputFile>, PipelineError> {
    let fetched = documents.len();
    let documents = overlay_drafts(documents, options.preview);
    let (assets, entries): (Vec<Document>, Vec<Document>) = documents
        .into_iter()
        .partition(|doc| doc.asset_kind().is_some());
    debug!(
        "{fetched} documents fetched, {} entries and {} assets after overlay",
        entries.len(),
        assets.len()
    );

    let ctx = ResolveContext::new(&entries, &assets);
    let rendered = entries
        .par_iter()
        .map(|entry| render_entry(entry, &ctx, options.generator))
        .collect::<Result<Vec<_>, _>>()?;

    let files: Vec<OutputFile> = rendered.into_iter().flatten().collect();
    warn_duplicate_paths(&files);
    info!(
        "Rendered {} files from {} entries for {}",
        files.len(),
        entries.len(),
        options.generator
    );
    Ok(files)
}

fn render_entry(
    entry: &Document,
    ctx: &ResolveContext<'_>,
    generator: Generator,
) -> Result<Option<OutputFile>, PipelineError> {
    let id = entry.id().unwrap_or("<no id>");
    if let Role::Unrecognized(marker) = entry.role() {
        debug!("Skipping entry {id} with model type {marker:?}");
        return Ok(None);
    }

    let transformed = transform_entry(entry, ctx).map_err(|source| PipelineError::Transform {
        id: id.to_owned(),
        source,
    })?;
    let Some(resolved) = resolve_output(transformed, generator) else {
        debug!("Entry {id} has no standalone output");
        return Ok(None);
    };
    let content = serialize(&resolved.path, &resolved.document).map_err(|source| {
        PipelineError::Serialize {
            path: resolved.path.clone(),
            source,
        }
    })?;

    Ok(Some(OutputFile {
        path: resolved.path,
        content,
    }))
}

fn warn_duplicate_paths(files: &[OutputFile]) {
    let mut seen = HashSet::new();
    for file in files {
        if !seen.insert(file.path.as_str()) {
            warn!("Multiple entries write to {}, the last one wins", file.path);
        }
    }
}
