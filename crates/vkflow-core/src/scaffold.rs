use crate::error::Result;
use crate::io;
use crate::paths;
use crate::tags::AssetSource;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const README_TEMPLATE: &str = "templates/vkflow-readme.md";
pub const WORKFLOW_TEMPLATE: &str = "templates/openspec-validate.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldedFile {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Write the vkflow helper files into `root`.
///
/// Existing files are left alone unless `force` is set.
pub fn write_project_files(
    root: &Path,
    assets: &dyn AssetSource,
    force: bool,
) -> Result<Vec<ScaffoldedFile>> {
    let targets = [
        (paths::readme_path(root), README_TEMPLATE),
        (paths::validate_workflow_path(root), WORKFLOW_TEMPLATE),
    ];

    targets
        .into_iter()
        .map(|(path, template)| {
            let content = assets.read(template)?;
            let status = if io::write_file(&path, content.as_bytes(), force)? {
                FileStatus::Written
            } else {
                FileStatus::Exists
            };
            Ok(ScaffoldedFile { path, status })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::EmbeddedAssets;
    use tempfile::TempDir;

    #[test]
    fn writes_readme_and_workflow() {
        let dir = TempDir::new().unwrap();
        let files = write_project_files(dir.path(), &EmbeddedAssets, false).unwrap();
        assert!(files.iter().all(|f| f.status == FileStatus::Written));
        let readme = std::fs::read_to_string(paths::readme_path(dir.path())).unwrap();
        assert!(readme.contains("vkflow:change="));
        assert!(paths::validate_workflow_path(dir.path()).exists());
    }

    #[test]
    fn keeps_existing_files_without_force() {
        let dir = TempDir::new().unwrap();
        let readme = paths::readme_path(dir.path());
        std::fs::create_dir_all(readme.parent().unwrap()).unwrap();
        std::fs::write(&readme, "custom").unwrap();

        let files = write_project_files(dir.path(), &EmbeddedAssets, false).unwrap();
        assert_eq!(files[0].status, FileStatus::Exists);
        assert_eq!(files[1].status, FileStatus::Written);
        assert_eq!(std::fs::read_to_string(&readme).unwrap(), "custom");
    }

    #[test]
    fn force_overwrites() {
        let dir = TempDir::new().unwrap();
        let readme = paths::readme_path(dir.path());
        std::fs::create_dir_all(readme.parent().unwrap()).unwrap();
        std::fs::write(&readme, "custom").unwrap();

        write_project_files(dir.path(), &EmbeddedAssets, true).unwrap();
        assert_ne!(std::fs::read_to_string(&readme).unwrap(), "custom");
    }
}
