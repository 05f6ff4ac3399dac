/// Log sinks for classification messages
///
/// The analyzer reports its verdicts through a `Logger` handed to it at
/// construction. The console implementation forwards to the `log` facade,
/// which the binary wires up with `env_logger`.

use std::sync::Mutex;

use log::Level;

/// Destination for the fixed outcome messages
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }
}

/// Forwards messages to whatever `log` backend is installed
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "macro_analyzer", level, "{}", message);
    }
}

/// Keeps every message in memory, in the order it was logged
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded messages without their levels
    pub fn messages(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, message)| message).collect()
    }

    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut lines) => lines.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: Level, message: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push((level, message.to_string())),
            Err(poisoned) => poisoned.into_inner().push((level, message.to_string())),
        }
    }
}
