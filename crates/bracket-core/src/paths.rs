//! Backend executable path resolution.
//!
//! Resolution only builds a path; existence is checked by the supervisor
//! right before spawning.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::RunMode;

/// Environment override for the packaged resource directory.
pub const RESOURCE_DIR_ENV: &str = "BRACKET_RESOURCE_DIR";

/// Errors that can occur while resolving paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// The running executable's location could not be determined.
    #[error("Cannot determine current executable: {0}")]
    CurrentExe(String),

    /// The running executable has no parent directory.
    #[error("Executable {0} has no parent directory")]
    NoParent(PathBuf),
}

/// File name of the bundled backend server.
pub const fn backend_executable_name() -> &'static str {
    if cfg!(windows) {
        "bracket-backend.exe"
    } else {
        "bracket-backend"
    }
}

/// Root of the source checkout this binary was built from.
fn repo_root() -> PathBuf {
    PathBuf::from(env!("BRACKET_REPO_ROOT"))
}

/// Root of bundled resources for packaged builds.
///
/// Resolution order:
/// 1. `BRACKET_RESOURCE_DIR` environment variable
/// 2. `resources/` next to the running executable
pub fn resource_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(RESOURCE_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    let exe = env::current_exe().map_err(|e| PathError::CurrentExe(e.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| PathError::NoParent(exe.clone()))?;
    Ok(dir.join("resources"))
}

/// Resolve the backend executable for a run mode.
///
/// An explicit override always wins. Development builds use
/// `<repo>/dist/<name>`; packaged builds use `<resources>/app/<name>`.
pub fn resolve_backend_executable(
    mode: RunMode,
    override_path: Option<&Path>,
) -> Result<PathBuf, PathError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    let path = match mode {
        RunMode::Development => repo_root().join("dist").join(backend_executable_name()),
        RunMode::Production => resource_root()?
            .join("app")
            .join(backend_executable_name()),
    };
    tracing::debug!(mode = ?mode, path = %path.display(), "resolved backend executable");
    Ok(path)
}

/// Working directory for the backend: the executable's own directory.
pub fn backend_working_dir(executable: &Path) -> PathBuf {
    executable
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_in_every_mode() {
        let custom = Path::new("/srv/custom/bracket-backend");
        for mode in [RunMode::Development, RunMode::Production] {
            assert_eq!(
                resolve_backend_executable(mode, Some(custom)).unwrap(),
                custom
            );
        }
    }

    #[test]
    fn development_resolves_into_repo_dist() {
        let path = resolve_backend_executable(RunMode::Development, None).unwrap();
        assert!(path.ends_with(Path::new("dist").join(backend_executable_name())));
        assert!(path.starts_with(repo_root()));
    }

    #[test]
    fn production_resolves_under_app_resources() {
        let path = resolve_backend_executable(RunMode::Production, None).unwrap();
        assert!(path.ends_with(Path::new("app").join(backend_executable_name())));
    }

    #[test]
    fn working_dir_is_parent() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join(backend_executable_name());
        assert_eq!(backend_working_dir(&exe), dir.path());
        assert_eq!(backend_working_dir(Path::new("bracket-backend")), Path::new("."));
    }
}
