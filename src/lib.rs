/// Macro Analyzer - flags Office documents carrying suspicious VBA macros
///
/// This library detects a file's MIME type with `file`, runs `olevba` on Office
/// documents and matches its report against a fixed table of macro rules.

pub mod config;
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::config::Config;
pub use crate::core::analyzer::MacroAnalyzer;
pub use crate::core::patterns::{RuleEntry, RuleSet};
pub use crate::core::result::{ClassificationResult, ScanRecord};
pub use crate::utils::logger::{ConsoleLogger, Logger, MemoryLogger};
pub use crate::utils::tools::{CommandTool, ExternalTool, ToolError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Classify a single file with the default tools and console logging
///
/// This is a convenience function for simple use cases.
pub fn classify_file<P: AsRef<std::path::Path>>(
    file_path: P,
    hide_details: bool,
) -> anyhow::Result<ClassificationResult> {
    let rules = std::sync::Arc::new(RuleSet::builtin()?);
    let analyzer = MacroAnalyzer::from_config(
        &Config::default(),
        rules,
        std::sync::Arc::new(ConsoleLogger),
    );

    Ok(analyzer.classify(file_path.as_ref(), hide_details))
}

/// Batch scanning used by the command-line application
pub mod app {
    use crate::core::analyzer::MacroAnalyzer;
    use crate::core::result::ScanRecord;
    use indicatif::ProgressBar;
    use log::{error, warn};
    use rayon::prelude::*;
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Gather the paths to check
    ///
    /// Explicit paths are kept as given so missing ones are still reported.
    /// A directory is walked recursively for regular files, stopping at
    /// `max_files`.
    pub fn collect_targets(
        file_paths: &[PathBuf],
        dir: Option<&Path>,
        max_files: usize,
    ) -> Vec<PathBuf> {
        let mut targets: Vec<PathBuf> = file_paths.to_vec();

        if let Some(dir_path) = dir {
            if !dir_path.is_dir() {
                error!("Directory not found: {}", dir_path.display());
                return targets;
            }

            let mut found = 0;
            for entry in WalkDir::new(dir_path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                if found >= max_files {
                    warn!("Reached maximum file limit ({})", max_files);
                    break;
                }
                targets.push(entry.into_path());
                found += 1;
            }
        }

        targets
    }

    /// Classify every file on a local thread pool
    ///
    /// # Arguments
    ///
    /// * `analyzer` - Shared classifier
    /// * `files` - Paths to check
    /// * `hide_details` - Log the short VIRUS message
    /// * `workers` - Number of threads (0 = available parallelism)
    /// * `progress` - Optional progress bar advanced per file
    ///
    /// # Returns
    ///
    /// One record per input path, in input order
    pub fn scan_files(
        analyzer: &MacroAnalyzer,
        files: &[PathBuf],
        hide_details: bool,
        workers: usize,
        progress: Option<&ProgressBar>,
    ) -> anyhow::Result<Vec<ScanRecord>> {
        let num_workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            workers
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;

        let records = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = analyzer.classify(path, hide_details);
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    ScanRecord {
                        path: path.clone(),
                        result,
                    }
                })
                .collect()
        });

        Ok(records)
    }
}
