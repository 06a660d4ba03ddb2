//! Append-only destinations for suite output.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Receives suite output one line at a time.
pub trait LogSink {
    fn line(&mut self, line: &str);
}

impl LogSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Prints to stdout and clones every line into an optional log file.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    file: Option<File>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self { file: None }
    }

    /// Clone output into `file`.
    pub fn cloned_to(file: File) -> Self {
        Self { file: Some(file) }
    }

    /// Print to stdout only.
    pub fn note(&mut self, line: &str) {
        println!("{}", line);
    }

    /// Write to the log file only.
    pub fn file_line(&mut self, line: &str) {
        let failed = match self.file.as_mut() {
            Some(file) => writeln!(file, "{}", line).err(),
            None => None,
        };
        if let Some(e) = failed {
            tracing::warn!(error = %e, "Writing the suite log failed, continuing on stdout only");
            self.file = None;
        }
    }
}

impl LogSink for ConsoleSink {
    fn line(&mut self, line: &str) {
        self.note(line);
        self.file_line(line);
    }
}

/// Open a log file for appending, creating it when missing.
pub fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<String> = Vec::new();
        sink.line("Test: a");
        sink.line("");
        assert_eq!(sink, vec!["Test: a", ""]);
    }

    #[test]
    fn test_console_sink_clones_into_file() {
        let path = std::env::temp_dir().join(format!("occi-tent-sink-{}.log", std::process::id()));
        let _ = fs::remove_file(&path);

        let mut sink = ConsoleSink::cloned_to(open_append(&path).unwrap());
        sink.line("Test: cloned");
        sink.note("stdout only");
        sink.file_line("file only");
        drop(sink);

        let mut sink = ConsoleSink::cloned_to(open_append(&path).unwrap());
        sink.line("appended");
        drop(sink);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Test: cloned\nfile only\nappended\n"
        );
        fs::remove_file(&path).unwrap();
    }
}
