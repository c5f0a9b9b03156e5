//! `add visual`: copy the bundled visual template into a project.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Template written by [`add_visual`].
pub const VISUAL_TEMPLATE: &str = include_str!("../templates/visual.rs");

/// Destination directory, relative to the project root.
pub const DEST_DIR: &str = "src/components/ui";
pub const DEST_FILE: &str = "visual.rs";

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("visual.rs already exists at src/components/ui/")]
    AlreadyExists(PathBuf),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What [`add_visual`] did.
#[derive(Debug, PartialEq, Eq)]
pub struct Scaffolded {
    /// Set when the destination directory had to be created.
    pub created_dir: Option<PathBuf>,
    pub file: PathBuf,
}

/// Writes the visual template under `root`, creating the destination
/// directory if needed. Never overwrites an existing file.
pub fn add_visual(root: &Path) -> Result<Scaffolded, ScaffoldError> {
    let dest_dir = root.join(DEST_DIR);
    let target = dest_dir.join(DEST_FILE);

    let created_dir = if dest_dir.is_dir() {
        None
    } else {
        fs::create_dir_all(&dest_dir).map_err(|source| ScaffoldError::Io {
            path: dest_dir.clone(),
            source,
        })?;
        Some(dest_dir)
    };

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(ScaffoldError::AlreadyExists(target));
        }
        Err(source) => return Err(ScaffoldError::Io { path: target, source }),
    };
    file.write_all(VISUAL_TEMPLATE.as_bytes())
        .map_err(|source| ScaffoldError::Io {
            path: target.clone(),
            source,
        })?;

    tracing::debug!(path = %target.display(), "visual template written");
    Ok(Scaffolded {
        created_dir,
        file: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_directory_and_writes_template() {
        let dir = tempdir().unwrap();
        let out = add_visual(dir.path()).unwrap();

        assert_eq!(out.created_dir, Some(dir.path().join(DEST_DIR)));
        assert_eq!(out.file, dir.path().join(DEST_DIR).join(DEST_FILE));
        assert_eq!(fs::read_to_string(&out.file).unwrap(), VISUAL_TEMPLATE);
    }

    #[test]
    fn reuses_existing_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(DEST_DIR)).unwrap();

        let out = add_visual(dir.path()).unwrap();
        assert_eq!(out.created_dir, None);
        assert!(out.file.is_file());
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let target = dir.path().join(DEST_DIR).join(DEST_FILE);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "keep me").unwrap();

        let err = add_visual(dir.path()).unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists(ref p) if *p == target));
        assert!(!err.to_string().is_empty());
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep me");
    }

    #[test]
    fn second_call_fails() {
        let dir = tempdir().unwrap();
        add_visual(dir.path()).unwrap();
        assert!(matches!(
            add_visual(dir.path()),
            Err(ScaffoldError::AlreadyExists(_))
        ));
    }
}
