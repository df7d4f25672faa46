//! Finding and checking `.pie` files.
//!
//! Every file is parsed independently, so a batch is split across scoped
//! worker threads. Each worker owns its parser state; only the shared
//! configuration is borrowed.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::debug;
use walkdir::WalkDir;

use crate::config::ParserConfig;
use crate::errors::PieError;
use crate::syntax::{parse_with_config, SyntaxTree};

pub const PIE_EXTENSION: &str = "pie";

/// The outcome of checking one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<SyntaxTree, PieError>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Recursively collects `.pie` files under `root`. A file path is returned as
/// is, whatever its extension. The list is sorted.
pub fn discover_pie_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, PieError> {
    let root = root.as_ref();
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| PieError::io(root.display(), e.into()))?;
        if entry.file_type().is_file() && is_pie_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

pub fn is_pie_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PIE_EXTENSION)
}

/// Reads and parses a single file.
pub fn check_file(path: &Path, config: &ParserConfig) -> Result<SyntaxTree, PieError> {
    let name = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|e| PieError::io(&name, e))?;
    parse_with_config(&source, config).map_err(|error| PieError::syntax(error, name, source))
}

/// Checks `paths` on up to `jobs` threads. Reports come back in the order of
/// `paths`.
pub fn check_files(paths: &[PathBuf], config: &ParserConfig, jobs: NonZeroUsize) -> Vec<FileReport> {
    if paths.is_empty() {
        return Vec::new();
    }
    let chunk_size = paths.len().div_ceil(jobs.get());
    debug!(files = paths.len(), jobs = jobs.get(), "checking");

    thread::scope(|scope| {
        let workers: Vec<_> = paths
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| FileReport {
                            path: path.clone(),
                            result: check_file(path, config),
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|worker| match worker.join() {
                Ok(reports) => reports,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Number of worker threads to use when the caller has no preference.
pub fn default_jobs() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
