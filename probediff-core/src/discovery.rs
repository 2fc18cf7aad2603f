//! File discovery for a benchmark run.
//!
//! Walks the whole tree below the root directory and returns every regular
//! file, sorted by path so runs over the same tree probe files in the same
//! order. Selection by extension happens later in the orchestrator.

use crate::error::{CoreError, CoreResult};

use walkdir::WalkDir;

use std::path::{Path, PathBuf};

/// Finds all files below `root_dir`, recursively.
///
/// Entries that cannot be read during the walk (permissions, races with
/// deletion) are logged and left out rather than failing the run.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - All files found, possibly empty
/// * `Err(CoreError::DirectoryNotFound)` - If `root_dir` is not a directory
///
/// # Examples
///
/// ```rust,no_run
/// use probediff_core::find_media_files;
/// use std::path::Path;
///
/// let files = find_media_files(Path::new("/path/to/media")).unwrap();
/// println!("Found {} files", files.len());
/// ```
pub fn find_media_files(root_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    if !root_dir.is_dir() {
        return Err(CoreError::DirectoryNotFound(root_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root_dir).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping unreadable entry: {}", e),
        }
    }

    files.sort();
    log::debug!("Found {} files below {}", files.len(), root_dir.display());
    Ok(files)
}
