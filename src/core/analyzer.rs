/// Macro threat classifier
///
/// `MacroAnalyzer` runs the MIME detector on a file, hands Office documents to
/// olevba and matches its report against the rule set. Every outcome is
/// logged through the injected `Logger`; failures never escape `classify`.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::config::Config;
use crate::core::patterns::{self, RuleSet, OFFICE_XML_MARKER, XML_MIME_PREFIX};
use crate::core::result::ClassificationResult;
use crate::utils::file_utils::{self, PathKind};
use crate::utils::logger::Logger;
use crate::utils::output_formatter;
use crate::utils::tools::{CommandTool, ExternalTool, ToolError};

/// Reasons a check stops before a verdict
#[derive(Debug, thiserror::Error)]
enum ScanError {
    #[error("File {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Classifies files as clean or carrying dangerous macros
pub struct MacroAnalyzer {
    rules: Arc<RuleSet>,
    logger: Arc<dyn Logger>,
    mime_tool: Box<dyn ExternalTool>,
    macro_tool: Box<dyn ExternalTool>,
}

impl MacroAnalyzer {
    /// Create an analyzer from explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `rules` - Compiled rule set applied to macro tool output
    /// * `logger` - Sink for outcome messages
    /// * `mime_tool` - Tool answering `--brief --mime <path>`
    /// * `macro_tool` - Tool answering `-a <path>`
    pub fn new(
        rules: Arc<RuleSet>,
        logger: Arc<dyn Logger>,
        mime_tool: Box<dyn ExternalTool>,
        macro_tool: Box<dyn ExternalTool>,
    ) -> Self {
        Self {
            rules,
            logger,
            mime_tool,
            macro_tool,
        }
    }

    /// Create an analyzer that runs the executables named in `config`
    pub fn from_config(config: &Config, rules: Arc<RuleSet>, logger: Arc<dyn Logger>) -> Self {
        Self::new(
            rules,
            logger,
            Box::new(CommandTool::new(&config.paths.file)),
            Box::new(CommandTool::new(&config.paths.olevba)),
        )
    }

    /// Check a single file and log the outcome.
    ///
    /// Missing paths are logged as errors, non-regular files are skipped
    /// silently. Tool and I/O failures are logged and returned as `Error`.
    pub fn classify(&self, file_path: &Path, hide_details: bool) -> ClassificationResult {
        let result = match self.check(file_path) {
            Ok(flags) if flags.is_empty() => ClassificationResult::Clean,
            Ok(flags) => ClassificationResult::Infected(flags),
            Err(err @ ScanError::NotFound(_)) => {
                self.logger.error(&err.to_string());
                return ClassificationResult::Skipped("does not exist".to_string());
            }
            Err(ScanError::NotAFile(_)) => {
                return ClassificationResult::Skipped("not a file".to_string());
            }
            Err(err) => {
                let message = err.to_string();
                self.logger.error(&message);
                return ClassificationResult::Error(message);
            }
        };

        match &result {
            ClassificationResult::Infected(flags) => {
                self.logger
                    .error(&output_formatter::infected_message(flags, hide_details));
            }
            _ => {
                self.logger
                    .info(&format!("{} OK", file_utils::display_name(file_path)));
            }
        }

        result
    }

    /// Run the pipeline and return the matched flags
    fn check(&self, file_path: &Path) -> Result<Vec<String>, ScanError> {
        match file_utils::path_kind(file_path) {
            PathKind::Missing => return Err(ScanError::NotFound(file_path.to_path_buf())),
            PathKind::NotAFile => return Err(ScanError::NotAFile(file_path.to_path_buf())),
            PathKind::File => {}
        }

        if self.should_scan(file_path)? {
            self.macro_flags(file_path)
        } else {
            Ok(Vec::new())
        }
    }

    /// Lower-cased MIME type as reported by the detector
    fn detect_type(&self, file_path: &Path) -> Result<String, ScanError> {
        let output = self.mime_tool.run(&[
            OsStr::new("--brief"),
            OsStr::new("--mime"),
            file_path.as_os_str(),
        ])?;
        Ok(String::from_utf8_lossy(&output).to_lowercase())
    }

    fn should_scan(&self, file_path: &Path) -> Result<bool, ScanError> {
        let document_type = self.detect_type(file_path)?;
        debug!("{}: {}", file_path.display(), document_type.trim());

        // Office 2003 XML has no ZIP container and is reported as plain XML.
        if document_type.starts_with(XML_MIME_PREFIX) {
            let is_office_xml = file_utils::contains_marker(file_path, OFFICE_XML_MARKER)
                .map_err(|source| ScanError::Io {
                    path: file_path.to_path_buf(),
                    source,
                })?;
            if is_office_xml {
                return Ok(true);
            }
        }

        Ok(patterns::is_checked_mime_type(&document_type))
    }

    fn macro_flags(&self, file_path: &Path) -> Result<Vec<String>, ScanError> {
        let output = self
            .macro_tool
            .run(&[OsStr::new("-a"), file_path.as_os_str()])?;
        Ok(self.rules.matching_flags(&String::from_utf8_lossy(&output)))
    }
}
