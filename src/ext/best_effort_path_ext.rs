use std::path::{Component, Path, PathBuf};

/// Absolute form of `path`, canonical when it exists and lexically
/// normalized when it does not (a working copy about to be checked out).
pub fn best_effort_absolute(path: &Path) -> PathBuf {
    if let Ok(canonical_path) = path.canonicalize() {
        return canonical_path;
    }

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    normalize_path(&absolute_path)
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !components.is_empty()
                    && !matches!(components.last(), Some(Component::RootDir))
                {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;

    /// `file://` URL of the absolute path, as the client expects for local
    /// repositories.
    fn to_file_url(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_absolute(self).display().to_string()
    }

    fn to_file_url(&self) -> String {
        let absolute = best_effort_absolute(self)
            .to_string_lossy()
            .replace('\\', "/");
        if absolute.starts_with('/') {
            format!("file://{absolute}")
        } else {
            format!("file:///{absolute}")
        }
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }

    fn to_file_url(&self) -> String {
        self.as_path().to_file_url()
    }
}
