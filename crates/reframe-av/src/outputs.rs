//! Output directory management.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// The directory transcoded files are written into.
///
/// Created once at startup and injected where needed; read-only after
/// that. `resolve` keeps every result inside the directory no matter
/// what the caller-supplied name looks like.
///
/// # Example
///
/// ```no_run
/// use reframe_av::OutputDir;
///
/// let outputs = OutputDir::create("output")?;
/// let path = outputs.resolve("clip.mp4")?;
/// # Ok::<(), reframe_av::Error>(())
/// ```
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create the directory (parents included, idempotent) and pin its
    /// absolute path.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let root = path.canonicalize()?;
        tracing::debug!("output directory ready at {}", root.display());
        Ok(Self { root })
    }

    /// Get the absolute directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied file name to a full path inside the
    /// directory.
    ///
    /// Only the final path component of `name` is used, so a name
    /// carrying separators still lands inside the directory. Names with
    /// no file component (empty, `.`, `..`) are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let file_name = Path::new(name).file_name().ok_or_else(|| {
            Error::invalid_option(format!("output name {name:?} does not name a file"))
        })?;
        Ok(self.root.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_is_idempotent() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("out");
        let first = OutputDir::create(&target).unwrap();
        let second = OutputDir::create(&target).unwrap();
        assert_eq!(first.root(), second.root());
        assert!(target.is_dir());
    }

    #[test]
    fn create_makes_parents() {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("a").join("b").join("out")).unwrap();
        assert!(outputs.root().is_dir());
    }

    #[test]
    fn root_is_absolute() {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("out")).unwrap();
        assert!(outputs.root().is_absolute());
    }

    #[test]
    fn resolve_joins_inside_root() {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("out")).unwrap();
        let path = outputs.resolve("clip.mp4").unwrap();
        assert_eq!(path, outputs.root().join("clip.mp4"));
    }

    #[test]
    fn resolve_strips_directory_components() {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("out")).unwrap();

        let nested = outputs.resolve("nested/dir/clip.mp4").unwrap();
        assert_eq!(nested, outputs.root().join("clip.mp4"));

        let upward = outputs.resolve("../clip.mp4").unwrap();
        assert_eq!(upward, outputs.root().join("clip.mp4"));
    }

    #[test]
    fn resolve_rejects_names_without_file_component() {
        let temp = tempdir().unwrap();
        let outputs = OutputDir::create(temp.path().join("out")).unwrap();
        assert!(matches!(outputs.resolve(""), Err(Error::InvalidOption(_))));
        assert!(matches!(outputs.resolve(".."), Err(Error::InvalidOption(_))));
        assert!(matches!(outputs.resolve("a/.."), Err(Error::InvalidOption(_))));
    }
}
