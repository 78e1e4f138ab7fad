mod error;
pub mod format;

use std::collections::BTreeSet;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

pub use error::ContainerError;

use crate::target::InternalPath;

/// In-memory view of one container file's directory tree.
///
/// Invariant: every entry with more than one segment has its parent path
/// present too. `mkdir`/`mkdir_all` preserve it and decoding enforces it,
/// so `save` always writes a well-formed container.
#[derive(Debug)]
pub struct Container {
    path: Utf8PathBuf,
    dirs: BTreeSet<InternalPath>,
    dirty: bool,
}

impl Container {
    /// Load the container at `path`, or start an empty one when the file
    /// does not exist. A fresh container is marked dirty so `save` writes
    /// it out even if no directory is added.
    pub fn open_or_create(path: &Utf8Path) -> Result<Self, ContainerError> {
        let (dirs, dirty) = if path.exists() {
            (format::decode(&fs::read(path)?)?, false)
        } else {
            (BTreeSet::new(), true)
        };
        Ok(Self {
            path: path.to_owned(),
            dirs,
            dirty,
        })
    }

    /// Create exactly the final directory of `path`. The parent must
    /// already exist; an existing leaf is a no-op.
    pub fn mkdir(&mut self, path: &InternalPath) -> Result<bool, ContainerError> {
        if self.dirs.contains(path) {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            if !self.dirs.contains(&parent) {
                return Err(ContainerError::MissingParent(path.to_string()));
            }
        }
        self.dirs.insert(path.clone());
        self.dirty = true;
        Ok(true)
    }

    /// Create every missing directory along `path`. Returns how many were
    /// actually added.
    pub fn mkdir_all(&mut self, path: &InternalPath) -> usize {
        let mut created = 0;
        for prefix in path.prefixes() {
            if self.dirs.insert(prefix) {
                created += 1;
            }
        }
        if created > 0 {
            self.dirty = true;
        }
        created
    }

    /// Write the container back to disk if anything changed. The encoded
    /// bytes go to a sibling temp file first and are renamed into place.
    pub fn save(&mut self) -> Result<(), ContainerError> {
        if !self.dirty {
            return Ok(());
        }
        let tmp = Utf8PathBuf::from(format!("{}.tmp{}", self.path, std::process::id()));
        fs::write(&tmp, format::encode(&self.dirs))?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    fn unique_temp_dir() -> Utf8PathBuf {
        testutil::unique_temp_dir("rootmkdir-test")
    }

    fn path(raw: &str) -> InternalPath {
        InternalPath::parse(raw).unwrap()
    }

    #[test]
    fn fresh_container_saves_an_empty_file() {
        let dir = unique_temp_dir();
        let file = dir.join("empty.rmkd");

        let mut container = Container::open_or_create(&file).unwrap();
        container.save().unwrap();
        assert!(file.exists());

        let reopened = Container::open_or_create(&file).unwrap();
        assert!(reopened.dirs.is_empty());
        assert!(!reopened.dirty);

        let _ = fs::remove_dir_all(dir.as_std_path());
    }

    #[test]
    fn mkdir_requires_an_existing_parent() {
        let dir = unique_temp_dir();
        let mut container = Container::open_or_create(&dir.join("t.rmkd")).unwrap();

        let err = container.mkdir(&path("a/b")).unwrap_err();
        assert!(matches!(err, ContainerError::MissingParent(_)));

        assert!(container.mkdir(&path("a")).unwrap());
        assert!(container.mkdir(&path("a/b")).unwrap());
        // Existing leaf is a no-op, not an error.
        assert!(!container.mkdir(&path("a/b")).unwrap());

        let _ = fs::remove_dir_all(dir.as_std_path());
    }

    #[test]
    fn mkdir_all_round_trips_through_disk() {
        let dir = unique_temp_dir();
        let file = dir.join("t.rmkd");

        let mut container = Container::open_or_create(&file).unwrap();
        assert_eq!(container.mkdir_all(&path("a/b/c")), 3);
        container.save().unwrap();

        let mut reopened = Container::open_or_create(&file).unwrap();
        assert!(reopened.dirs.contains(&path("a/b")));
        // Repeating the same creation changes nothing.
        assert_eq!(reopened.mkdir_all(&path("a/b/c")), 0);
        assert!(!reopened.dirty);

        let _ = fs::remove_dir_all(dir.as_std_path());
    }

    #[test]
    fn opening_a_non_container_file_fails() {
        let dir = unique_temp_dir();
        let file = dir.join("not-a-container");
        fs::write(&file, b"plain text").unwrap();

        let err = Container::open_or_create(&file).unwrap_err();
        assert!(matches!(err, ContainerError::Format(_)));

        let _ = fs::remove_dir_all(dir.as_std_path());
    }

    #[test]
    fn save_without_changes_writes_nothing() {
        let dir = unique_temp_dir();
        let file = dir.join("t.rmkd");

        let mut container = Container::open_or_create(&file).unwrap();
        container.mkdir_all(&path("a"));
        container.save().unwrap();
        let before = fs::metadata(&file).unwrap().modified().unwrap();

        let mut reopened = Container::open_or_create(&file).unwrap();
        reopened.save().unwrap();
        let after = fs::metadata(&file).unwrap().modified().unwrap();
        assert_eq!(before, after);

        let _ = fs::remove_dir_all(dir.as_std_path());
    }
}
