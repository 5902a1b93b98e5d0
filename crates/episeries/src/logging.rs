//! Diagnostic output: an injectable logger with nested indentation.

use std::io::{self, Write};
use std::sync::Mutex;

use colored::Colorize;

const INDENT_WIDTH: usize = 2;
const MAX_INDENTATION: usize = 20;

/// Severity-tagged diagnostic sink.
///
/// Implementations must be safe to share between ingest workers.
pub trait Logger: Send + Sync {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    /// Current indentation level.
    fn indentation(&self) -> usize;
    fn indent_increase(&self);
    fn indent_decrease(&self);
}

/// Raises the indentation of a logger until dropped.
pub struct IndentGuard<'a> {
    logger: &'a dyn Logger,
}

impl<'a> IndentGuard<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self {
        logger.indent_increase();
        Self { logger }
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        self.logger.indent_decrease();
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn error(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn info(&self, _message: &str) {}

    fn indentation(&self) -> usize {
        0
    }

    fn indent_increase(&self) {}
    fn indent_decrease(&self) {}
}

#[derive(Debug, Clone, Copy)]
enum Level {
    Error,
    Warning,
    Info,
}

struct ConsoleState {
    indentation: usize,
    out: Box<dyn Write + Send>,
}

/// Colored, indentation-aware logger writing one line per message.
///
/// A single lock covers both the indentation counter and the output, so
/// lines from concurrent workers never interleave.
pub struct ConsoleLogger {
    state: Mutex<ConsoleState>,
}

impl ConsoleLogger {
    /// Logger writing to standard error.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }

    /// Logger writing to an arbitrary sink.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                indentation: 0,
                out,
            }),
        }
    }

    fn write(&self, level: Level, message: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        let indent = " ".repeat(state.indentation * INDENT_WIDTH);
        let text = match level {
            Level::Error => message.red(),
            Level::Warning => message.yellow(),
            Level::Info => message.dimmed(),
        };

        // Diagnostics must never abort processing.
        let _ = writeln!(state.out, "{}{}", indent, text);
    }

    fn update_indentation(&self, update: impl FnOnce(usize) -> usize) {
        if let Ok(mut state) = self.state.lock() {
            state.indentation = update(state.indentation);
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for ConsoleLogger {
    fn error(&self, message: &str) {
        self.write(Level::Error, message);
    }

    fn warning(&self, message: &str) {
        self.write(Level::Warning, message);
    }

    fn info(&self, message: &str) {
        self.write(Level::Info, message);
    }

    fn indentation(&self) -> usize {
        self.state.lock().map(|s| s.indentation).unwrap_or(0)
    }

    fn indent_increase(&self) {
        self.update_indentation(|level| (level + 1).min(MAX_INDENTATION));
    }

    fn indent_decrease(&self) {
        self.update_indentation(|level| level.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(|l| l.to_string())
                .collect()
        }
    }

    #[test]
    fn test_indentation_is_applied() {
        colored::control::set_override(false);
        let buffer = SharedBuffer::default();
        let logger = ConsoleLogger::with_writer(Box::new(buffer.clone()));

        logger.info("top");
        {
            let _guard = IndentGuard::new(&logger);
            logger.warning("nested");
        }
        logger.error("back");

        assert_eq!(buffer.lines(), vec!["top", "  nested", "back"]);
    }

    #[test]
    fn test_indentation_bounds() {
        let logger = ConsoleLogger::with_writer(Box::new(io::sink()));
        logger.indent_decrease();
        assert_eq!(logger.indentation(), 0);

        for _ in 0..50 {
            logger.indent_increase();
        }
        assert_eq!(logger.indentation(), MAX_INDENTATION);
    }

    #[test]
    fn test_concurrent_writes_stay_whole() {
        colored::control::set_override(false);
        let buffer = SharedBuffer::default();
        let logger = ConsoleLogger::with_writer(Box::new(buffer.clone()));

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let logger = &logger;
                scope.spawn(move || {
                    for i in 0..25 {
                        logger.info(&format!("worker {} line {}", worker, i));
                    }
                });
            }
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with("worker ")));
    }

    #[test]
    fn test_null_logger_is_silent() {
        let logger = NullLogger;
        logger.indent_increase();
        logger.error("ignored");
        assert_eq!(logger.indentation(), 0);
    }
}
