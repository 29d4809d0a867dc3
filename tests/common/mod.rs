//! Shared fixtures for the end-to-end tests.
//!
//! The "compiler" is a shell script that appends its argument list to a log
//! file and, in compile mode, creates the requested object file.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub struct Project {
    pub root: PathBuf,
    pub log: PathBuf,
    pub cache: PathBuf,
}

impl Project {
    /// Lay out `src/a.c` (10 bytes) and `src/readme.md` under `dir`.
    pub fn new(dir: &Path) -> Self {
        let src = dir.join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.c"), "int a = 1;").unwrap();
        fs::write(src.join("readme.md"), "# readme\n").unwrap();

        Self {
            root: dir.to_path_buf(),
            log: dir.join("cc.log"),
            cache: dir.join("builds"),
        }
    }

    /// Write the fake compiler; `link_status` is the exit status of link runs.
    pub fn fake_compiler(&self, link_status: u8) -> PathBuf {
        let path = self.root.join("fake-cc");
        let script = format!(
            "#!/bin/sh\n\
             echo \"$@\" >> '{log}'\n\
             if [ \"$1\" = \"-c\" ]; then\n  : > \"$3\"\n  exit 0\nfi\n\
             exit {link_status}\n",
            log = self.log.display(),
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn write_config(&self, compiler: &Path) {
        let config = serde_json::json!({
            "sourceDir": "src",
            "targetExts": ["c"],
            "ccopts": "-O2",
            "linkerOpts": "",
            "compiler": compiler,
            "targetBinaryName": self.root.join("app"),
            "cacheDir": self.cache,
        });
        fs::write(self.root.join("ccbuilder.json"), config.to_string()).unwrap();
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ccbuilder"))
            .args(["--color", "never"])
            .args(args)
            .current_dir(&self.root)
            .output()
            .expect("failed to run ccbuilder")
    }

    /// Recorded compiler invocations, one per line.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn compiles(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter(|line| line.starts_with("-c "))
            .collect()
    }

    pub fn links(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter(|line| !line.starts_with("-c "))
            .collect()
    }

    pub fn objects(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.cache) else {
            return Vec::new();
        };
        let mut names: Vec<_> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
