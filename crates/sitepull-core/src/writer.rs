//! Persisting rendered files under an output directory.

use std::fs;
use std::io;
use std::path::{Component, Path};

use tracing::{debug, info};

use crate::pipeline::OutputFile;

/// Write `files` under `root`, creating parent directories as needed.
///
/// All paths are checked before the first write: absolute paths and paths
/// containing `..` are rejected so nothing lands outside `root`.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidInput`] for a path escaping `root`, or the
/// underlying I/O error of a failed write.
pub fn write_files(root: &Path, files: &[OutputFile]) -> io::Result<()> {
    for file in files {
        check_relative(&file.path)?;
    }

    for file in files {
        let target = root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.content)?;
        debug!("Wrote {}", target.display());
    }

    info!("Wrote {} files to {}", files.len(), root.display());
    Ok(())
}

fn check_relative(path: &str) -> io::Result<()> {
    let contained = !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if contained {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output path escapes the output directory: {path}"),
        ))
    }
}
