use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses filesystems. Readers see either the old or the new content.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;
    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Whether `path` already holds exactly `content`. Missing files differ.
pub fn is_up_to_date<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<bool, InfrastructureError> {
    match fs::read(path.as_ref()) {
        Ok(existing) => Ok(existing == content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InfrastructureError::Io(e)),
    }
}

/// Writes only when the content changed, so unchanged outputs keep their mtime.
/// Returns `true` when the file was (re)written.
pub fn write_if_changed<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<bool, InfrastructureError> {
    let path = path.as_ref();
    if is_up_to_date(path, content)? {
        return Ok(false);
    }
    atomic_write(path, content)?;
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("collections/covid.json");

        atomic_write(&file_path, "{}")?;

        assert_eq!(fs::read_to_string(file_path)?, "{}");
        Ok(())
    }

    #[test]
    fn test_write_if_changed() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("out.json");

        assert!(!is_up_to_date(&file_path, b"v1")?);
        assert!(write_if_changed(&file_path, b"v1")?);
        assert!(is_up_to_date(&file_path, b"v1")?);
        assert!(!write_if_changed(&file_path, b"v1")?);
        assert!(write_if_changed(&file_path, b"v2")?);
        assert_eq!(fs::read_to_string(file_path)?, "v2");
        Ok(())
    }
}
