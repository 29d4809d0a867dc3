//! `clean` command: remove cached objects.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cache::{DirCache, ObjectCache};
use crate::config::BuildConfig;
use crate::log;

/// Remove objects compiled from `prefix`, or every object without one.
pub fn clean(config: &BuildConfig, prefix: Option<&Path>) -> Result<()> {
    let cache = DirCache::new(&config.cache_dir, config.get_root());
    let removed = clean_cache(&cache, prefix)
        .with_context(|| format!("failed to clean {}", cache.dir().display()))?;
    log!("clean"; "removed {} objects from {}", removed, cache.dir().display());
    Ok(())
}

fn clean_cache(cache: &impl ObjectCache, prefix: Option<&Path>) -> Result<usize> {
    let removed = match prefix {
        Some(prefix) => cache.delete_objects(prefix)?,
        None => cache.clear()?,
    };
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cache_with(names: &[&str]) -> (TempDir, DirCache) {
        let temp = TempDir::new().unwrap();
        let cache = DirCache::new(temp.path().join("builds"), temp.path().join("src"));
        cache.ensure_dir().unwrap();
        for name in names {
            fs::write(cache.dir().join(name), b"obj").unwrap();
        }
        (temp, cache)
    }

    #[test]
    fn test_clean_prefix() {
        let (_temp, cache) = cache_with(&["src_a.c.o", "srclib_b.c.o"]);
        assert_eq!(clean_cache(&cache, Some(Path::new("src/lib"))).unwrap(), 1);
        assert_eq!(cache.list_objects().unwrap().len(), 1);
    }

    #[test]
    fn test_clean_all() {
        let (_temp, cache) = cache_with(&["src_a.c.o", "srclib_b.c.o"]);
        assert_eq!(clean_cache(&cache, None).unwrap(), 2);
        assert!(cache.list_objects().unwrap().is_empty());
    }
}
