//! Document root bootstrap
//!
//! Runs once before the listener starts. An existing root is left untouched.

use anyhow::{Context, Result};
use std::path::Path;

/// Page written into a freshly created document root.
pub const DEFAULT_INDEX: &str = "<!DOCTYPE html>
<html>
<head><title>docserve</title></head>
<body>
<h1>It works!</h1>
<p>Put your files in this directory to serve them.</p>
</body>
</html>
";

/// Creates `root` with a default index page if it does not exist yet.
///
/// Returns `true` when the directory was created.
pub fn ensure_document_root(root: &Path, index_file: &str) -> Result<bool> {
    if root.is_dir() {
        return Ok(false);
    }

    std::fs::create_dir_all(root)
        .with_context(|| format!("Failed to create document root {}", root.display()))?;

    let index = root.join(index_file);
    std::fs::write(&index, DEFAULT_INDEX)
        .with_context(|| format!("Failed to write {}", index.display()))?;

    tracing::info!(root = %root.display(), "Created document root with default index page");
    Ok(true)
}
