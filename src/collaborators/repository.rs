use std::path::{Path, PathBuf};
use std::process::Command;

use snafu::{ResultExt, Snafu, ensure};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Provisions empty repository storage.
pub trait RepositoryCreator {
    fn create(&self, path: &Path) -> Result<(), RepositoryError>;
}

impl<F> RepositoryCreator for F
where
    F: Fn(&Path) -> Result<(), RepositoryError>,
{
    fn create(&self, path: &Path) -> Result<(), RepositoryError> {
        self(path)
    }
}

/// Creates repositories with the admin tool (`svnadmin create <path>`).
#[derive(Debug, Clone)]
pub struct AdminCommandCreator {
    program: PathBuf,
}

impl AdminCommandCreator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl RepositoryCreator for AdminCommandCreator {
    fn create(&self, path: &Path) -> Result<(), RepositoryError> {
        debug!("Creating repository at {}", path.best_effort_path_display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(PrepareSnafu {
                path: path.to_path_buf(),
            })?;
        }

        let output = Command::new(&self.program)
            .arg("create")
            .arg(path)
            .output()
            .context(SpawnSnafu {
                program: self.program.clone(),
            })?;

        ensure!(
            output.status.success(),
            UnsuccessfulCreationSnafu {
                path: path.to_path_buf(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RepositoryError {
    #[snafu(display("Failed to prepare the parent of {}", path.best_effort_path_display()))]
    PrepareError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to start '{}'", program.display()))]
    SpawnError {
        program: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Creating the repository at {} failed with exit code {}: {}",
        path.best_effort_path_display(),
        status,
        stderr
    ))]
    UnsuccessfulCreation {
        path: PathBuf,
        status: i32,
        stderr: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_admin_tool_is_a_spawn_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let creator = AdminCommandCreator::new("/this/binary/does/not/exist");
        let result = creator.create(&dir.path().join("repos"));
        assert!(matches!(result, Err(RepositoryError::SpawnError { .. })));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn failing_admin_tool_reports_its_exit_code() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let creator = AdminCommandCreator::new("false");
        let result = creator.create(&dir.path().join("nested/repos"));
        assert!(matches!(
            result,
            Err(RepositoryError::UnsuccessfulCreation { status: 1, .. })
        ));
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn closures_are_creators() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let creator = |path: &Path| -> Result<(), RepositoryError> {
            std::fs::create_dir_all(path).context(PrepareSnafu {
                path: path.to_path_buf(),
            })
        };
        creator.create(&dir.path().join("repos")).unwrap();
        assert!(dir.path().join("repos").is_dir());
    }
}
