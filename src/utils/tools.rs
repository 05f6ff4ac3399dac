/// External tool invocation
///
/// The analyzer never spawns processes directly. It talks to an `ExternalTool`,
/// which lets tests substitute canned output for `file` and `olevba`.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

/// Error raised when an external tool cannot be run
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The process could not be started or its output could not be read
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A test double or wrapper reported a failure of its own
    #[error("{0}")]
    Failed(String),
}

/// Something that can be run with arguments and yields its standard output
pub trait ExternalTool: Send + Sync {
    /// Run the tool and return the bytes it wrote to stdout
    fn run(&self, args: &[&OsStr]) -> Result<Vec<u8>, ToolError>;
}

/// Runs a real executable via `std::process::Command`
#[derive(Debug, Clone)]
pub struct CommandTool {
    program: PathBuf,
}

impl CommandTool {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ExternalTool for CommandTool {
    fn run(&self, args: &[&OsStr]) -> Result<Vec<u8>, ToolError> {
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Only stdout matters; olevba uses its exit status to report findings.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            );
        }

        Ok(output.stdout)
    }
}
