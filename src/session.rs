use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::classifier::Classifier;
use crate::error::Result;
use crate::history::History;
use crate::label::ClassLabel;
use crate::output::{self, OutputFormat};
use crate::scanner;

/// One user's session: a shared classifier plus the history this user has built up.
pub struct Session
{
    classifier: Arc<Classifier>,
    history: History,
    format: OutputFormat,
}

impl Session
{
    pub fn new(classifier: Arc<Classifier>, format: OutputFormat) -> Self
    {
        Session { classifier, history: History::new(), format }
    }

    pub fn history(&self) -> &History
    {
        &self.history
    }

    /// Classifies one file, renders the outcome, and records it if it succeeded.
    pub fn classify_file(&mut self, path: &Path, out: &mut impl Write) -> io::Result<Result<ClassLabel>>
    {
        let result = self.classifier.classify_path(path);
        self.finish(path, result, out)
    }

    /// Classifies several files; decoding happens in parallel, history keeps input order.
    pub fn classify_files(&mut self, paths: &[PathBuf], out: &mut impl Write) -> io::Result<usize>
    {
        let results = self.classifier.classify_batch(paths);
        let mut failures = 0;
        for (path, result) in results {
            if self.finish(&path, result, out)?.is_err() {
                failures += 1;
            }
        }
        Ok(failures)
    }

    pub fn show_history(&self, out: &mut impl Write) -> io::Result<()>
    {
        output::write_history(out, self.format, &self.history)
    }

    /// Reads one command per line until `quit`, `exit`, or end of input.
    /// A line is either `history` or a path to an image file.
    pub fn run_interactive(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()>
    {
        for line in input.lines() {
            let line = line?;
            let command = line.trim();
            match command {
                "" => continue,
                "quit" | "exit" => break,
                "history" => self.show_history(out)?,
                path => {
                    self.classify_file(Path::new(path), out)?;
                },
            }
            out.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self, path: &Path, result: Result<ClassLabel>, out: &mut impl Write) -> io::Result<Result<ClassLabel>>
    {
        let filename = scanner::display_name(path);
        output::write_result(out, self.format, &filename, &result)?;
        match &result {
            Ok(label) => {
                info!("Classified {:?} as {}", path, label);
                self.history.record(filename, *label);
            },
            Err(e) => warn!("Could not classify {:?}: {}", path, e),
        }
        Ok(result)
    }
}
