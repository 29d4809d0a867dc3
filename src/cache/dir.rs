//! Flat-directory object cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{CacheError, CacheResult, ObjectCache, object_name, object_prefix};

/// Objects stored as plain files in one directory, surviving across runs.
///
/// The directory is created lazily by the first compile.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
    root: PathBuf,
}

impl DirCache {
    /// `dir` holds the objects; `root` is the source root used for naming.
    pub fn new(dir: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            root: root.into(),
        }
    }

    /// Names of the immediate entries, sorted. A missing directory is empty.
    fn entry_names(&self) -> CacheResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CacheError::List(self.dir.clone(), err)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| CacheError::List(self.dir.clone(), err))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, name: &str) -> CacheResult<()> {
        let path = self.dir.join(name);
        fs::remove_file(&path).map_err(|err| CacheError::Remove(path, err))
    }
}

impl ObjectCache for DirCache {
    fn dir(&self) -> &Path {
        &self.dir
    }

    fn source_key(&self, source: &Path) -> PathBuf {
        let Ok(relative) = source.strip_prefix(&self.root) else {
            return source.to_path_buf();
        };
        match self.root.file_name() {
            Some(name) => Path::new(name).join(relative),
            None => relative.to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> CacheResult<()> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(CacheError::CreateDir(
                self.dir.clone(),
                std::io::Error::new(ErrorKind::AlreadyExists, "path exists and is not a directory"),
            )),
            Err(err) if err.kind() == ErrorKind::NotFound => fs::create_dir_all(&self.dir)
                .map_err(|err| CacheError::CreateDir(self.dir.clone(), err)),
            Err(err) => Err(CacheError::CreateDir(self.dir.clone(), err)),
        }
    }

    fn list_objects(&self) -> CacheResult<Vec<PathBuf>> {
        Ok(self
            .entry_names()?
            .into_iter()
            .map(|name| self.dir.join(name))
            .collect())
    }

    fn delete_objects(&self, prefix: &Path) -> CacheResult<usize> {
        let prefix = object_prefix(prefix);
        let mut removed = 0;
        for name in self.entry_names()? {
            if name.starts_with(&prefix) {
                self.remove(&name)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn delete_object(&self, source: &Path) -> CacheResult<bool> {
        let path = self.dir.join(object_name(&self.source_key(source)));
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(CacheError::Remove(path, err)),
        }
    }

    fn clear(&self) -> CacheResult<usize> {
        let names = self.entry_names()?;
        for name in &names {
            self.remove(name)?;
        }
        Ok(names.len())
    }
}
