use std::{io, path::Path};

/// Write `content` to `path`, creating parent directories as needed.
///
/// Existing files are fully overwritten. The write is not atomic.
pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)
}
