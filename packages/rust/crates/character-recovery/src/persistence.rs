//! Atomic text writes for the file-backed key-value store.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write text content atomically:
/// - ensure parent directory exists
/// - write to a temp file in the same directory
/// - fsync file + rename into place
pub(crate) fn atomic_write_text(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create key-value directory {}",
            parent.display()
        )
    })?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("entry.json");
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()));

    let mut temp_file = std::fs::File::create(&temp_path)
        .with_context(|| format!("failed to create temporary entry {}", temp_path.display()))?;
    let written = temp_file
        .write_all(content.as_bytes())
        .and_then(|()| temp_file.sync_all());
    if let Err(err) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err)
            .with_context(|| format!("failed to write temporary entry {}", temp_path.display()));
    }

    if let Err(err) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err).with_context(|| {
            format!(
                "failed to move entry {} into place at {}",
                temp_path.display(),
                path.display()
            )
        });
    }

    Ok(())
}
