//! Edit-script service
//!
//! Loads edit scripts, runs them against a fresh tree built from the
//! settings and writes the rendered result.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::error_ext::PathContextExt;
use crate::application::script::ScriptParser;
use crate::application::session::EditSession;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::Tree;
use crate::infrastructure::traits::FileSystem;

/// Result of running one edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Output of `print` and `outline` commands, in script order
    pub outputs: Vec<String>,
    /// Rendered markup of the final tree
    pub markup: String,
}

/// Runs edit scripts.
pub struct EditService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    parser: ScriptParser,
}

impl EditService {
    /// Create a new edit service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self {
            fs,
            settings,
            parser: ScriptParser::new(),
        }
    }

    /// Fresh session: a childless root with the configured tag.
    pub fn new_session(&self) -> EditSession {
        EditSession::new(
            Tree::with_root_tag(&self.settings.root_tag),
            self.settings.render_options(),
            self.settings.check,
        )
    }

    /// Parse and run script text on a fresh tree.
    #[instrument(level = "debug", skip(self, script))]
    pub fn run_script(&self, script: &str) -> ApplicationResult<EditOutcome> {
        let lines = self.parser.parse(script)?;
        let mut session = self.new_session();
        let outputs = session.run(&lines)?;
        debug!(
            outputs = outputs.len(),
            nodes = session.tree().len(),
            depth = session.tree().depth(),
            "script finished"
        );
        Ok(EditOutcome {
            outputs,
            markup: session.render(),
        })
    }

    /// Read a script file and run it.
    pub fn run_file(&self, path: &Path) -> ApplicationResult<EditOutcome> {
        info!("running script {}", path.display());
        if !self.fs.exists(path) {
            let missing = io::Error::new(io::ErrorKind::NotFound, "no such script");
            return Err(missing).with_path_context("read script", path);
        }
        let script = self
            .fs
            .read_to_string(path)
            .with_path_context("read script", path)?;
        self.run_script(&script)
    }

    /// Write rendered markup to `path`.
    pub fn write_markup(&self, path: &Path, markup: &str) -> ApplicationResult<()> {
        debug!("write_markup: {}", path.display());
        self.fs
            .write(path, markup)
            .map_err(|source| ApplicationError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }
}
