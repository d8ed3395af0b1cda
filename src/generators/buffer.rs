//! Line-by-line replay of a text file into string readouts.

use std::fs;
use std::path::{Path, PathBuf};

use super::{SinkSet, Source};
use crate::readouts::{Capabilities, Update};
use crate::task::Flow;

/// Replays the lines of a text file, one line per work unit.
///
/// A file that cannot be read is replaced by a single diagnostic line, so the
/// sinks show what went wrong instead of staying blank. After the last line
/// the source reports [`Flow::Done`] and its generator deactivates.
#[derive(Clone, Debug)]
pub struct LineBuffer {
    path: PathBuf,
    lines: Vec<String>,
    cursor: usize,
}

impl LineBuffer {
    /// Load `path`; never fails.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let lines = match fs::read_to_string(&path) {
            Ok(text) => text.lines().map(str::to_owned).collect(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "replay file unavailable");
                vec![format!("cannot read {}: {err}", path.display())]
            }
        };
        Self { path, lines, cursor: 0 }
    }

    /// Replay from explicit lines rather than a file.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            path: PathBuf::new(),
            lines: lines.into_iter().map(Into::into).collect(),
            cursor: 0,
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Lines not yet replayed.
    pub fn remaining(&self) -> usize { self.lines.len() - self.cursor }

    /// Start the replay over from the first line.
    pub fn rewind(&mut self) { self.cursor = 0; }
}

impl Source for LineBuffer {
    fn produces(&self) -> Capabilities { Capabilities::STRING }

    fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
        let Some(line) = self.lines.get(self.cursor) else {
            return Flow::Done;
        };
        sinks.broadcast(&Update::Text(line.clone()));
        self.cursor += 1;
        if self.cursor == self.lines.len() { Flow::Done } else { Flow::Continue }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::generators::Generator;
    use crate::readouts::{BufferConfig, BufferReadout, share};

    fn log() -> std::sync::Arc<std::sync::Mutex<BufferReadout>> { share(BufferReadout::new(BufferConfig::default())) }

    #[test]
    fn test_replays_file_then_deactivates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ENGINE START").unwrap();
        writeln!(file, "GEAR 1").unwrap();
        writeln!(file, "GEAR 2").unwrap();
        file.flush().unwrap();

        let readout = log();
        let mut generator = Generator::new("replay", LineBuffer::open(file.path()), Duration::from_millis(1)).unwrap();
        assert!(generator.add("log", readout.clone()));
        generator.set_active(true).unwrap();

        let start = Instant::now();
        while generator.is_active() && start.elapsed() < Duration::from_secs(2) {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!generator.is_active(), "End of data deactivates the generator");
        assert_eq!(
            readout.lock().unwrap().lines().collect::<Vec<_>>(),
            ["ENGINE START", "GEAR 1", "GEAR 2"]
        );
        assert_eq!(generator.source().remaining(), 0);
    }

    #[test]
    fn test_missing_file_emits_one_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = LineBuffer::open(dir.path().join("missing.txt"));
        assert_eq!(source.remaining(), 1);

        let readout = log();
        let mut sinks = SinkSet::default();
        sinks.insert("log", readout.clone(), source.produces());

        assert_eq!(source.produce(&mut sinks), Flow::Done);
        assert_eq!(source.produce(&mut sinks), Flow::Done, "Nothing more after the diagnostic");
        let lines: Vec<String> = readout.lock().unwrap().lines().map(str::to_owned).collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("cannot read"), "Got {:?}", lines[0]);
    }

    #[test]
    fn test_rewind_replays_again() {
        let mut source = LineBuffer::from_lines(["a", "b"]);
        let mut sinks = SinkSet::default();
        assert_eq!(source.produce(&mut sinks), Flow::Continue);
        assert_eq!(source.produce(&mut sinks), Flow::Done);
        source.rewind();
        assert_eq!(source.remaining(), 2);
    }

    #[test]
    fn test_empty_source_is_done_immediately() {
        let mut source = LineBuffer::from_lines(Vec::<String>::new());
        assert_eq!(source.produce(&mut SinkSet::default()), Flow::Done);
    }
}
