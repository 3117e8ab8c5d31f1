//! Output path resolution for transformed entries.
//!
//! # Path Conventions
//!
//! | Generator | Data directory | Pages directory |
//! |-----------|----------------|-----------------|
//! | `jekyll`  | `_data`        | (site root)     |
//! | `hugo`    | `data`         | `content`       |
//! | `gatsby`  | `src/data`     | `src/pages`     |
//!
//! Pages derive their path from `stackbit_url_path`, data and config entries
//! name their file in `stackbit_file_path`. `stackbit_dir` and
//! `stackbit_file_ext` override the directory and extension per entry.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::document::{
    DIR_FIELD, Document, FILE_EXT_FIELD, FILE_PATH_FIELD, MARKER_PREFIX, Role, URL_PATH_FIELD,
};
use crate::error::UnknownGenerator;

const DEFAULT_PAGE_EXT: &str = ".md";

static POSTS_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_?posts/(.*)$").expect("invalid posts regex"));
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("invalid date regex"));
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("invalid underscore regex"));

/// Static site generator whose directory layout the output follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Jekyll,
    Hugo,
    Gatsby,
}

impl Generator {
    /// Default directory for data entries.
    pub fn data_dir(self) -> &'static str {
        match self {
            Self::Jekyll => "_data",
            Self::Hugo => "data",
            Self::Gatsby => "src/data",
        }
    }

    /// Default directory for pages (empty for the site root).
    pub fn pages_dir(self) -> &'static str {
        match self {
            Self::Jekyll => "",
            Self::Hugo => "content",
            Self::Gatsby => "src/pages",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Jekyll => "jekyll",
            Self::Hugo => "hugo",
            Self::Gatsby => "gatsby",
        }
    }
}

impl FromStr for Generator {
    type Err = UnknownGenerator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jekyll" => Ok(Self::Jekyll),
            "hugo" => Ok(Self::Hugo),
            "gatsby" => Ok(Self::Gatsby),
            other => Err(UnknownGenerator(other.to_owned())),
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry paired with the file it is written to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntry {
    /// Output path relative to the site root.
    pub path: String,
    /// Entry fields with routing markers removed.
    pub document: Document,
}

/// Compute where `entry` is written, if anywhere.
///
/// Returns `None` for entries without a recognized role and for data
/// entries without an explicit file path.
pub fn output_path(entry: &Document, generator: Generator) -> Option<String> {
    match entry.role() {
        Role::Page => Some(page_path(entry, generator)),
        Role::Data => data_path(entry, generator),
        Role::Config => {
            let path = entry
                .get_str(FILE_PATH_FIELD)
                .map(|p| p.trim_start_matches('/'))
                .filter(|p| !p.is_empty())
                .map(str::to_owned);
            if path.is_none() {
                warn!(
                    "Config entry {} has no {FILE_PATH_FIELD}, skipping",
                    entry.id().unwrap_or("<no id>")
                );
            }
            path
        }
        Role::Unrecognized(marker) => {
            debug!(
                "Skipping entry {} with model type {marker:?}",
                entry.id().unwrap_or("<no id>")
            );
            None
        }
    }
}

/// Resolve the output path of `entry` and strip every `stackbit_*` marker.
pub fn resolve_output(entry: Document, generator: Generator) -> Option<ResolvedEntry> {
    let path = output_path(&entry, generator)?;
    let mut fields = entry.into_fields();
    fields.retain(|key, _| !key.starts_with(MARKER_PREFIX));
    Some(ResolvedEntry {
        path,
        document: Document::new(fields),
    })
}

fn page_path(entry: &Document, generator: Generator) -> String {
    let url_path = entry.get_str(URL_PATH_FIELD).unwrap_or_default();
    let mut path = url_path.strip_prefix('/').unwrap_or(url_path).to_owned();
    if path.is_empty() || path.ends_with('/') {
        path.push_str("index");
    }

    match generator {
        Generator::Jekyll => path = jekyll_post_path(&path, entry.get_str("date")),
        Generator::Hugo => {
            if let Some(section) = path.strip_suffix("/index") {
                path = format!("{section}/_index");
            }
        }
        Generator::Gatsby => {}
    }

    let dir = entry.get_str(DIR_FIELD).unwrap_or(generator.pages_dir());
    let ext = match entry.get_str(FILE_EXT_FIELD) {
        Some(ext) if ext.starts_with('.') => ext.to_owned(),
        Some(ext) if !ext.is_empty() => format!(".{ext}"),
        _ => DEFAULT_PAGE_EXT.to_owned(),
    };
    format!("{}{ext}", join_dir(dir, &path))
}

/// Move Jekyll posts under `_posts/` with a dated, hyphenated filename.
fn jekyll_post_path(path: &str, date: Option<&str>) -> String {
    let Some(captures) = POSTS_PATH.captures(path) else {
        return path.to_owned();
    };
    let mut filename = captures[1].to_owned();
    if !DATE_PREFIX.is_match(&filename)
        && let Some(day) = date.and_then(|d| DATE_PREFIX.find(d))
    {
        filename = format!("{}-{filename}", day.as_str());
    }
    format!("_posts/{}", UNDERSCORE_RUN.replace_all(&filename, "-"))
}

fn data_path(entry: &Document, generator: Generator) -> Option<String> {
    let file_path = entry.get_str(FILE_PATH_FIELD)?.trim_start_matches('/');
    let dir = entry
        .get_str(DIR_FIELD)
        .unwrap_or(generator.data_dir())
        .trim_end_matches('/');
    let qualified =
        dir.is_empty() || file_path == dir || file_path.starts_with(&format!("{dir}/"));
    if qualified {
        Some(file_path.to_owned())
    } else {
        Some(format!("{dir}/{file_path}"))
    }
}

fn join_dir(dir: &str, path: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        path.to_owned()
    } else {
        format!("{dir}/{path}")
    }
}
