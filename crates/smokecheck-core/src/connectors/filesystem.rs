//! Filesystem connector

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ConnectorError;

/// What exists at a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    /// Nothing at the path
    Missing,
    /// Regular file (or anything that is not a directory)
    File,
    /// Directory and the names of its direct children, sorted
    Directory { children: Vec<String> },
}

/// Stat `path` and, for directories, list its children.
///
/// A missing path is an answer, not a fault. Anything else the OS refuses
/// (permissions, broken mounts) is returned as `ConnectorError::Io`.
pub async fn inspect_path(path: &Path) -> Result<PathEntry, ConnectorError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PathEntry::Missing),
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Ok(PathEntry::File);
    }

    let mut children = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        children.push(entry.file_name().to_string_lossy().into_owned());
    }
    children.sort();

    Ok(PathEntry::Directory { children })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inspect_missing() {
        let dir = tempfile::tempdir().unwrap();
        let entry = inspect_path(&dir.path().join("nope")).await.unwrap();
        assert_eq!(entry, PathEntry::Missing);
    }

    #[tokio::test]
    async fn test_inspect_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<html></html>").unwrap();
        assert_eq!(inspect_path(&file).await.unwrap(), PathEntry::File);
    }

    #[tokio::test]
    async fn test_inspect_directory_lists_sorted_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();

        let entry = inspect_path(dir.path()).await.unwrap();
        assert_eq!(
            entry,
            PathEntry::Directory {
                children: vec!["a".to_string(), "b.txt".to_string()]
            }
        );
    }
}
