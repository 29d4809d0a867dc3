//! Driver for `cc`-compatible compilers.
//!
//! ```text
//! compile: <compiler> -c -o <object> <source> <ccopts...>
//! link:    <compiler> <objects...> <linkerOpts...> -o <targetBinaryName>
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::{CompileOutcome, LinkOutcome, SkipReason, Toolchain};
use crate::cache::{CacheError, ObjectCache};
use crate::config::BuildConfig;
use crate::logger::{status_error, status_success};
use crate::utils::exec::Cmd;
use crate::{debug, log};

/// Compiles and links through the configured compiler executable.
///
/// The same executable acts as the linker. Child output is streamed to the
/// terminal as-is.
pub struct CcToolchain<C> {
    config: Arc<BuildConfig>,
    cache: C,
}

impl<C: ObjectCache> CcToolchain<C> {
    pub fn new(config: Arc<BuildConfig>, cache: C) -> Self {
        Self { config, cache }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &C {
        &self.cache
    }

    /// Run a command and fold spawn errors and non-zero exits into one message.
    fn run(cmd: Cmd) -> Result<(), String> {
        debug!("exec"; "{}", cmd.display());
        match cmd.run() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(status.to_string()),
            Err(err) => Err(format!("{err:#}")),
        }
    }
}

impl<C: ObjectCache> Toolchain for CcToolchain<C> {
    fn compile(&self, source: &Path) -> Result<CompileOutcome, CacheError> {
        let key = self.cache.source_key(source);

        if !self.config.is_target(source) {
            debug!("compile"; "skip {} (not a target)", key.display());
            return Ok(CompileOutcome::Skipped(SkipReason::NotTarget));
        }

        self.cache.ensure_dir()?;

        match fs::metadata(source) {
            Ok(meta) if meta.len() == 0 => {
                debug!("compile"; "skip {} (empty)", key.display());
                return Ok(CompileOutcome::Skipped(SkipReason::Empty));
            }
            Ok(_) => {}
            Err(err) => {
                let reason = format!("cannot read {}: {err}", key.display());
                log!("error"; "{}", reason);
                return Ok(CompileOutcome::Failed(reason));
            }
        }

        let object = self.cache.object_path(source);
        let cmd = Cmd::new(&self.config.compiler)
            .args(["-c", "-o"])
            .arg(&object)
            .arg(source)
            .args(self.config.cc_flags());

        log!("compile"; "{}", key.display());
        match Self::run(cmd) {
            Ok(()) => Ok(CompileOutcome::Compiled(object)),
            Err(reason) => {
                log!("error"; "compile failed: {}: {}", key.display(), reason);
                Ok(CompileOutcome::Failed(reason))
            }
        }
    }

    fn link(&self) -> Result<LinkOutcome, CacheError> {
        let objects = self.cache.list_objects()?;
        if objects.is_empty() {
            log!("link"; "nothing to link");
            return Ok(LinkOutcome::NothingToLink);
        }

        let target = &self.config.target_binary_name;
        let cmd = Cmd::new(&self.config.compiler)
            .args(&objects)
            .args(self.config.linker_flags())
            .arg("-o")
            .arg(target);

        log!("link"; "{} objects -> {}", objects.len(), target.display());
        match Self::run(cmd) {
            Ok(()) => {
                status_success(&format!("linked {}", target.display()));
                Ok(LinkOutcome::Linked)
            }
            Err(reason) => {
                status_error("link failed", &reason);
                Ok(LinkOutcome::Failed(reason))
            }
        }
    }
}
