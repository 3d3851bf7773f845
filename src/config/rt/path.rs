use std::path::{Component, Path, PathBuf};

/// Resolve the deployment directory, relative to the directory of the configuration file.
///
/// The result is absolute and lexically normalized. The file system is not consulted, other
/// than for the current directory when the configuration path itself is relative.
pub fn resolve_directory(config_file: &Path, directory: &str) -> PathBuf {
    let base = match config_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let joined = base.join(directory);

    let absolute = std::path::absolute(&joined).unwrap_or_else(|err| {
        tracing::debug!("unable to make '{}' absolute: {err}", joined.display());
        joined
    });

    dunce::simplified(&normalize(&absolute)).to_path_buf()
}

/// Drop `.` and resolve `..` components without following symlinks.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                // can't go above the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => result.push(component),
            },
            other => result.push(other),
        }
    }
    result
}
