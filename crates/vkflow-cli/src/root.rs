use std::path::{Path, PathBuf};
use vkflow_core::paths;

/// Markers that identify a project root, in priority order.
const ROOT_MARKERS: [&str; 3] = [paths::VKFLOW_DIR, "openspec", ".git"];

/// Resolve the project root directory.
///
/// Priority:
/// 1. `--root` flag / `VKFLOW_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.vkflow/`, then `openspec/`, then `.git/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd).unwrap_or(cwd)
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    ROOT_MARKERS.iter().find_map(|marker| {
        start
            .ancestors()
            .find(|dir| dir.join(marker).is_dir())
            .map(Path::to_path_buf)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_openspec_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("openspec/changes")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_root_from(&subdir).unwrap(), dir.path());
    }

    #[test]
    fn vkflow_dir_beats_outer_git_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let inner = dir.path().join("packages/app");
        std::fs::create_dir_all(inner.join(".vkflow")).unwrap();
        std::fs::create_dir_all(inner.join("src")).unwrap();
        assert_eq!(find_root_from(&inner.join("src")).unwrap(), inner);
    }
}
