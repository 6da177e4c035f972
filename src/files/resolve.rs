//! Request target to filesystem path resolution
//!
//! Resolution is purely lexical: no filesystem call is needed to reject a
//! traversal attempt. Any `..` anywhere in the target is refused, which also
//! refuses some legitimate names such as `file..txt`.
//!
//! Symlinks are the one way out of the root that lexical checks cannot see.
//! `DocumentRoot::contains` closes that gap after the file has been stat'd.

use anyhow::{Context, Result};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::StaticFilesConfig;

/// Longest resolved path, in bytes.
pub const MAX_PATH_LEN: usize = 4095;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Target contains `..` or names an absolute path
    Traversal,
    /// Joined path exceeds `MAX_PATH_LEN`
    PathTooLong,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Traversal => write!(f, "target escapes the document root"),
            ResolveError::PathTooLong => write!(f, "resolved path exceeds {} bytes", MAX_PATH_LEN),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Maps a raw request target to a path under `root`.
///
/// - `/` (or an empty target) maps to `<root>/<index_file>`
/// - a target ending in `/` maps to `<root>/<target><index_file>`
/// - anything else maps to `<root>/<target>` verbatim, query string included
pub fn resolve(root: &Path, target: &str, index_file: &str) -> Result<PathBuf, ResolveError> {
    if target.contains("..") {
        return Err(ResolveError::Traversal);
    }

    let relative = target.trim_start_matches('/');

    // Lexically absolute on this platform even without a leading slash (e.g. `C:\`).
    if Path::new(relative).has_root() {
        return Err(ResolveError::Traversal);
    }

    let mut path = root.to_path_buf();
    if relative.is_empty() {
        path.push(index_file);
    } else if relative.ends_with('/') {
        path.push(relative);
        path.push(index_file);
    } else {
        path.push(relative);
    }

    if path.as_os_str().len() > MAX_PATH_LEN {
        return Err(ResolveError::PathTooLong);
    }

    Ok(path)
}

/// The directory files are served from, as configured and canonicalized.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
    canonical: PathBuf,
    index_file: String,
    confine_symlinks: bool,
}

impl DocumentRoot {
    /// Opens an existing document root. Fails when the directory is missing.
    pub fn open(cfg: &StaticFilesConfig) -> Result<Self> {
        let canonical = std::fs::canonicalize(&cfg.root)
            .with_context(|| format!("Document root {} is not accessible", cfg.root.display()))?;

        Ok(Self {
            root: cfg.root.clone(),
            canonical,
            index_file: cfg.index_file.clone(),
            confine_symlinks: cfg.confine_symlinks,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    pub fn confines_symlinks(&self) -> bool {
        self.confine_symlinks
    }

    /// Resolves a request target against this root.
    pub fn resolve(&self, target: &str) -> Result<PathBuf, ResolveError> {
        resolve(&self.root, target, &self.index_file)
    }

    /// Whether `path`, with every symlink followed, still lies inside the root.
    pub async fn contains(&self, path: &Path) -> io::Result<bool> {
        let canonical = tokio::fs::canonicalize(path).await?;
        Ok(canonical.starts_with(&self.canonical))
    }
}
