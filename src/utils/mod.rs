/// Utility modules for the macro analyzer
///
/// This module contains helpers for file handling, running external tools,
/// logging and output formatting.

pub mod file_utils;
pub mod logger;
pub mod output_formatter;
pub mod tools;
