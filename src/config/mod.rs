//! Build configuration loaded from `ccbuilder.json`.
//!
//! # Fields
//!
//! | Key                | Purpose                                          |
//! |--------------------|--------------------------------------------------|
//! | `sourceDir`        | Root of the watched source tree (required)       |
//! | `targetExts`       | Suffixes that are compiled, e.g. `["c"]`         |
//! | `ccopts`           | Extra compiler flags (space separated)           |
//! | `linkerOpts`       | Extra linker flags (space separated)             |
//! | `compiler`         | Compiler executable, also used as the linker     |
//! | `targetBinaryName` | Output binary path                               |
//! | `customLinkerCmd`  | Reserved, parsed but never executed              |
//! | `cacheDir`         | Object cache directory (default `./builds`)      |
//! | `purgeOnRemove`    | Invalidate objects when sources are removed      |
//!
//! The configuration is read once before the watcher starts and is read-only
//! afterwards.

mod error;

pub use error::ConfigError;

use crate::log;
use crate::utils::path::normalize_path;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ccbuilder.json";

fn default_compiler() -> String {
    "cc".into()
}

fn default_target_binary() -> PathBuf {
    PathBuf::from("a.out")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./builds")
}

/// Root configuration structure representing `ccbuilder.json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Unknown keys found while parsing (internal use only)
    #[serde(skip)]
    pub ignored: Vec<String>,

    /// Source root directory
    pub source_dir: PathBuf,

    /// Compilable file suffixes, without the leading dot
    #[serde(default)]
    pub target_exts: Vec<String>,

    /// Compiler flags appended after `-c -o <object> <source>`
    #[serde(default)]
    pub ccopts: String,

    /// Linker flags appended after the object list
    #[serde(default)]
    pub linker_opts: String,

    /// Compiler executable name or path
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Output binary path
    #[serde(default = "default_target_binary")]
    pub target_binary_name: PathBuf,

    /// Reserved: custom link command line
    #[serde(default)]
    pub custom_linker_cmd: Option<String>,

    /// Object cache directory
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Remove cached objects (and relink) when sources or directories are deleted
    #[serde(default)]
    pub purge_on_remove: bool,
}

impl BuildConfig {
    /// Load, finalize and validate configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let mut config = Self::parse(&content, path)?;
        config.config_path = normalize_path(path);
        config.finalize();
        config.validate()?;

        if !config.ignored.is_empty() {
            log!("warning"; "unknown fields in {} ignored: {}",
                path.display(), config.ignored.join(", "));
        }
        for warning in config.warnings() {
            log!("warning"; "{}", warning);
        }
        if let Some(cmd) = &config.custom_linker_cmd {
            crate::debug!("config"; "customLinkerCmd `{}` is reserved and ignored", cmd);
        }

        Ok(config)
    }

    /// Parse JSON content, collecting any unknown fields into `ignored`.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let json_err = |err| ConfigError::Json(path.to_path_buf(), err);

        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let mut config: Self =
            serde_ignored::deserialize(&mut deserializer, |field: serde_ignored::Path| {
                ignored.push(field.to_string());
            })
            .map_err(json_err)?;
        deserializer.end().map_err(json_err)?;

        config.ignored = ignored;
        Ok(config)
    }

    /// Normalize suffixes and resolve directories to absolute paths.
    pub fn finalize(&mut self) {
        self.target_exts = self
            .target_exts
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();

        self.source_dir = normalize_path(&self.source_dir);
        self.cache_dir = normalize_path(&self.cache_dir);
    }

    /// Check invariants that make the watcher meaningless when violated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("`sourceDir` is empty".into()));
        }
        if !self.source_dir.exists() {
            return Err(ConfigError::Validation(format!(
                "source directory `{}` does not exist",
                self.source_dir.display()
            )));
        }
        if !self.source_dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source path `{}` is not a directory",
                self.source_dir.display()
            )));
        }
        if self.compiler.trim().is_empty() {
            return Err(ConfigError::Validation("`compiler` is empty".into()));
        }
        Ok(())
    }

    /// Non-fatal problems worth reporting at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.target_exts.is_empty() {
            warnings.push("`targetExts` is empty, no file will ever be compiled".to_string());
        }
        if which::which(&self.compiler).is_err() {
            warnings.push(format!(
                "compiler `{}` not found, every compile and link will fail",
                self.compiler
            ));
        }
        warnings
    }

    /// Compiler flags, split on whitespace.
    pub fn cc_flags(&self) -> impl Iterator<Item = &str> {
        self.ccopts.split_whitespace()
    }

    /// Linker flags, split on whitespace.
    pub fn linker_flags(&self) -> impl Iterator<Item = &str> {
        self.linker_opts.split_whitespace()
    }

    /// Whether `path` carries one of the configured suffixes.
    ///
    /// Files without an extension never match.
    pub fn is_target(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.target_exts.iter().any(|t| t == ext))
    }

    /// Get the source root directory
    pub fn get_root(&self) -> &Path {
        &self.source_dir
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(json: &str) -> BuildConfig {
        BuildConfig::parse(json, Path::new("test.json")).unwrap()
    }

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"{
                "sourceDir": "src",
                "targetExts": ["c", "cpp"],
                "ccopts": "-O2 -Wall",
                "linkerOpts": "-lm",
                "compiler": "gcc",
                "targetBinaryName": "app",
                "customLinkerCmd": "ld",
                "cacheDir": "out/objs",
                "purgeOnRemove": true
            }"#,
        );

        assert_eq!(config.source_dir, PathBuf::from("src"));
        assert_eq!(config.target_exts, vec!["c", "cpp"]);
        assert_eq!(config.cc_flags().collect::<Vec<_>>(), vec!["-O2", "-Wall"]);
        assert_eq!(config.linker_flags().collect::<Vec<_>>(), vec!["-lm"]);
        assert_eq!(config.compiler, "gcc");
        assert_eq!(config.target_binary_name, PathBuf::from("app"));
        assert_eq!(config.custom_linker_cmd.as_deref(), Some("ld"));
        assert_eq!(config.cache_dir, PathBuf::from("out/objs"));
        assert!(config.purge_on_remove);
        assert!(config.ignored.is_empty());
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse(r#"{ "sourceDir": "src" }"#);

        assert!(config.target_exts.is_empty());
        assert_eq!(config.cc_flags().count(), 0);
        assert_eq!(config.linker_flags().count(), 0);
        assert_eq!(config.compiler, "cc");
        assert_eq!(config.target_binary_name, PathBuf::from("a.out"));
        assert_eq!(config.cache_dir, PathBuf::from("./builds"));
        assert!(!config.purge_on_remove);
    }

    #[test]
    fn test_parse_collects_unknown_fields() {
        let config = parse(r#"{ "sourceDir": "src", "verbose": true }"#);
        assert_eq!(config.ignored, vec!["verbose"]);
    }

    #[test]
    fn test_parse_missing_source_dir() {
        let err = BuildConfig::parse(r#"{ "targetExts": ["c"] }"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json(..)));
    }

    #[test]
    fn test_parse_malformed() {
        let err = BuildConfig::parse("{ not json", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json(..)));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        let err = BuildConfig::parse(r#"{ "sourceDir": "src" } x"#, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json(..)));
    }

    #[test]
    fn test_empty_option_strings_yield_no_flags() {
        let config = parse(r#"{ "sourceDir": "src", "ccopts": "", "linkerOpts": "   " }"#);
        assert_eq!(config.cc_flags().count(), 0);
        assert_eq!(config.linker_flags().count(), 0);
    }

    #[test]
    fn test_finalize_strips_dots_and_blanks() {
        let mut config = parse(r#"{ "sourceDir": "src", "targetExts": [".c", "h", ""] }"#);
        config.finalize();
        assert_eq!(config.target_exts, vec!["c", "h"]);
        assert!(config.source_dir.is_absolute());
        assert!(config.cache_dir.is_absolute());
    }

    #[test]
    fn test_is_target() {
        let mut config = parse(r#"{ "sourceDir": "src", "targetExts": ["c"] }"#);
        config.finalize();

        assert!(config.is_target(Path::new("src/a.c")));
        assert!(!config.is_target(Path::new("src/readme.md")));
        assert!(!config.is_target(Path::new("src/Makefile")));
        assert!(!config.is_target(Path::new("src/a.c.bak")));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = BuildConfig::load(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_source_dir() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("ccbuilder.json");
        let missing = temp.path().join("nope");
        fs::write(
            &config_path,
            format!(r#"{{ "sourceDir": "{}" }}"#, missing.display()),
        )
        .unwrap();

        let err = BuildConfig::load(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_rejects_file_as_source_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("main.c");
        fs::write(&file, "int main;").unwrap();
        let config_path = temp.path().join("ccbuilder.json");
        fs::write(
            &config_path,
            format!(r#"{{ "sourceDir": "{}" }}"#, file.display()),
        )
        .unwrap();

        let err = BuildConfig::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_load_ok() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir(&src).unwrap();
        let config_path = temp.path().join("ccbuilder.json");
        fs::write(
            &config_path,
            format!(
                r#"{{ "sourceDir": "{}", "targetExts": ["c"], "cacheDir": "{}" }}"#,
                src.display(),
                temp.path().join("builds").display()
            ),
        )
        .unwrap();

        let config = BuildConfig::load(&config_path).unwrap();
        assert_eq!(config.get_root(), normalize_path(&src));
        assert!(config.config_path.is_absolute());
    }

    #[test]
    fn test_warns_on_empty_targets() {
        let config = parse(r#"{ "sourceDir": "src", "compiler": "sh" }"#);
        let warnings = config.warnings();
        assert!(warnings.iter().any(|w| w.contains("targetExts")));
    }

    #[test]
    fn test_warns_on_missing_compiler() {
        let config = parse(
            r#"{ "sourceDir": "src", "targetExts": ["c"], "compiler": "no-such-compiler-xyz" }"#,
        );
        let warnings = config.warnings();
        assert!(warnings.iter().any(|w| w.contains("no-such-compiler-xyz")));
    }
}
