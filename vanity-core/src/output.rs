use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub enum OutputError {
    UnsafePath(PathBuf),
    IoError { path: PathBuf, source: std::io::Error },
}

impl OutputError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        OutputError::IoError {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::UnsafePath(p) => {
                write!(f, "Refusing to write outside the output root: {}", p.display())
            }
            OutputError::IoError { path, source } => {
                write!(f, "IO error at {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OutputError {}

/// Resolve `path` to an absolute directory and recreate it empty.
///
/// Anything already at `path` is deleted first, so no page from an earlier
/// run survives.
pub fn prepare_root<P: AsRef<Path>>(path: P) -> Result<PathBuf, OutputError> {
    let path = path.as_ref();
    let root = std::path::absolute(path).map_err(|e| OutputError::io(path, e))?;

    if root.is_dir() {
        std::fs::remove_dir_all(&root).map_err(|e| OutputError::io(&root, e))?;
    } else if root.exists() {
        std::fs::remove_file(&root).map_err(|e| OutputError::io(&root, e))?;
    }
    std::fs::create_dir_all(&root).map_err(|e| OutputError::io(&root, e))?;

    Ok(root)
}

/// Write `data` to `relative` under `root`, creating parent directories.
///
/// Existing files are overwritten. Returns the absolute path written.
pub fn write<P: AsRef<Path>>(root: &Path, relative: P, data: &[u8]) -> Result<PathBuf, OutputError> {
    let relative = relative.as_ref();
    let is_safe = relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !is_safe {
        return Err(OutputError::UnsafePath(relative.to_path_buf()));
    }

    let out = root.join(relative);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }
    std::fs::write(&out, data).map_err(|e| OutputError::io(&out, e))?;

    Ok(out)
}
