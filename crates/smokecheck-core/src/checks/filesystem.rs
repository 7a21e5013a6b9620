//! Path existence and required-children check

use std::path::PathBuf;

use crate::check::{Check, CheckFuture, CheckKind, Observation};
use crate::connectors::filesystem::{inspect_path, PathEntry};

/// Verifies a path exists and, if it is a directory, that it holds every
/// required child name.
#[derive(Debug, Clone)]
pub struct FilesystemCheck {
    path: PathBuf,
    required: Vec<String>,
}

impl FilesystemCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: Vec::new(),
        }
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }
}

impl Check for FilesystemCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Filesystem
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin(async move {
            let display = self.path.display().to_string();

            let observation = match inspect_path(&self.path).await? {
                PathEntry::Missing => {
                    Observation::fail(format!("path '{}' does not exist", display))
                }
                PathEntry::File if self.required.is_empty() => {
                    Observation::pass(format!("'{}' exists", display))
                }
                PathEntry::File => Observation::fail(format!(
                    "'{}' is not a directory, cannot hold {}",
                    display,
                    self.required.join(", ")
                )),
                PathEntry::Directory { children } => {
                    let missing: Vec<&str> = self
                        .required
                        .iter()
                        .filter(|name| !children.contains(name))
                        .map(String::as_str)
                        .collect();

                    let observation = match missing.as_slice() {
                        [] => Observation::pass(format!(
                            "'{}' exists with {} entries",
                            display,
                            children.len()
                        )),
                        [only] => Observation::fail(format!(
                            "essential file '{}' missing from '{}'",
                            only, display
                        )),
                        many => Observation::fail(format!(
                            "essential files missing from '{}': {}",
                            display,
                            many.join(", ")
                        )),
                    };

                    observation
                        .with_diagnostic("entry_count", children.len())
                        .with_diagnostic("missing", missing)
                }
            };

            Ok(observation.with_diagnostic("path", display))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Verdict;

    #[tokio::test]
    async fn test_missing_path_fails_naming_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build");
        let observation = FilesystemCheck::new(&path).observe().await.unwrap();

        assert_eq!(observation.verdict, Verdict::Fail);
        assert!(observation.message.contains(&path.display().to_string()));
        assert!(observation.message.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_directory_with_all_children_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();

        let observation = FilesystemCheck::new(dir.path())
            .with_required(["index.html", "static"])
            .observe()
            .await
            .unwrap();

        assert_eq!(observation.verdict, Verdict::Pass);
        assert_eq!(observation.diagnostics["entry_count"], 2);
    }

    #[tokio::test]
    async fn test_single_missing_child() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "").unwrap();

        let observation = FilesystemCheck::new(dir.path())
            .with_required(["index.html", "static"])
            .observe()
            .await
            .unwrap();

        assert_eq!(observation.verdict, Verdict::Fail);
        assert!(observation.message.starts_with("essential file 'static' missing"));
        assert_eq!(observation.diagnostics["missing"], serde_json::json!(["static"]));
    }

    #[tokio::test]
    async fn test_file_with_required_children_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("build");
        std::fs::write(&file, "").unwrap();

        let observation = FilesystemCheck::new(&file)
            .with_required(["index.html"])
            .observe()
            .await
            .unwrap();
        assert_eq!(observation.verdict, Verdict::Fail);
        assert!(observation.message.contains("is not a directory"));

        let plain = FilesystemCheck::new(&file).observe().await.unwrap();
        assert_eq!(plain.verdict, Verdict::Pass);
    }
}
